use log::debug;

use super::lexicon::{alternation, class_body, Lexicon, LexiconError};
use super::pattern::{Outcome, Pattern, PatternSet};

/// Whether `text` holds a character of the CJK unified ideographs block
/// (U+4E00..=U+9FA5).
pub(crate) fn contains_ideograph(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Pickup code extraction: keyword-prefixed code, then dash-separated
/// locker code, then any bare alphanumeric run.
#[derive(Debug)]
pub(crate) struct CodeExtractor {
    patterns: PatternSet,
}

impl CodeExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        let keywords = alternation(&lexicon.code_keywords);
        let separators = class_body(&lexicon.code_separators);

        let patterns = PatternSet::new(vec![
            Pattern::new(
                "code-keyword",
                &format!(r"(?i){keywords}[{separators}\s]?([A-Z0-9-]{{4,12}})"),
            )?,
            Pattern::new("code-dashed", r"(?i)([A-Z0-9]{1,3}-[A-Z0-9]{1,3}-[A-Z0-9]{4,6})")?,
            // Unanchored and case-sensitive: lowercase prose is never a code,
            // but part of a phone or order number can be
            Pattern::new("code-bare", r"([A-Z0-9]{4,10})")?,
        ]);

        Ok(CodeExtractor { patterns })
    }

    pub fn extract(&self, text: &str) -> Outcome<String> {
        let found = self
            .patterns
            .first_accepted(text, |candidate| !contains_ideograph(candidate));
        match found {
            Some((label, code)) => {
                let code = code.trim().to_string();
                debug!("Found pickup code: {} (pattern: {})", code, label);
                Outcome::Resolved(code)
            }
            None => {
                debug!("Pickup code not found in text");
                Outcome::Unresolved
            }
        }
    }
}
