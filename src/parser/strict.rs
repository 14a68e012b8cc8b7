use log::debug;

use super::lexicon::{class_body, Lexicon, LexiconError};
use super::pattern::{Outcome, Pattern};

/// Fields resolved from the three explicit markers of the strict template:
/// `【courier】请凭<code>...地址：<location>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StrictFields {
    pub courier: String,
    pub code: String,
    pub location: String,
}

#[derive(Debug)]
pub(crate) struct StrictExtractor {
    courier: Pattern,
    code: Pattern,
    location: Pattern,
}

impl StrictExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        let open = regex::escape(&lexicon.signature_open);
        let close = regex::escape(&lexicon.signature_close);
        let close_class = class_body(std::slice::from_ref(&lexicon.signature_close));

        let code_marker = regex::escape(&lexicon.strict_code_marker);
        let address_marker = regex::escape(&lexicon.strict_address_marker);
        let separators = class_body(&lexicon.strict_address_separators);

        Ok(StrictExtractor {
            courier: Pattern::new(
                "strict-signature",
                &format!("{open}([^{close_class}]+){close}"),
            )?,
            code: Pattern::new("strict-code", &format!(r"{code_marker}\s*([A-Za-z0-9-]+)"))?,
            // Line-scoped: a footer on the next line is not part of the address
            location: Pattern::new(
                "strict-address",
                &format!(r"(?m){address_marker}[{separators}]\s*(.*)$"),
            )?,
        })
    }

    /// All three markers must resolve to non-empty values, otherwise the
    /// whole attempt is unresolved.
    pub fn extract(&self, text: &str) -> Outcome<StrictFields> {
        let field = |pattern: &Pattern| {
            pattern
                .find(text)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (field(&self.courier), field(&self.code), field(&self.location)) {
            (Some(courier), Some(code), Some(location)) => {
                debug!(
                    "Strict format matched: courier={}, code={}, location={}",
                    courier, code, location
                );
                Outcome::Resolved(StrictFields { courier, code, location })
            }
            _ => {
                debug!("Strict format not matched, falling back to field heuristics");
                Outcome::Unresolved
            }
        }
    }
}
