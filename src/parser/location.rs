use log::debug;
use regex::Regex;

use super::lexicon::{alternation, class_body, Lexicon, LexiconError};
use super::pattern::{Outcome, Pattern, PatternSet};

#[derive(Debug)]
pub(crate) struct LocationExtractor {
    patterns: PatternSet,
    leading_strip: Option<Regex>,
    truncators: Option<Regex>,
    trailing_punctuation: Vec<char>,
}

impl LocationExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        let anchors = alternation(&lexicon.location_anchors);
        let terminators = alternation(&lexicon.location_terminators);
        let punctuation = class_body(&lexicon.location_clause_punctuation);

        // The terminated span stops at the first terminator so a leading
        // "请" of "请凭" never stays glued to the location
        let patterns = PatternSet::new(vec![
            Pattern::new(
                "location-terminated",
                &format!(r"{anchors}\s?([^{punctuation}\s]{{4,}}?)[{punctuation} ]?{terminators}"),
            )?,
            Pattern::new("location-open", &format!(r"{anchors}\s?([^{punctuation}\s]{{4,}})"))?,
        ]);

        Ok(LocationExtractor {
            patterns,
            leading_strip: optional_regex(
                "location-leading-strip",
                &lexicon.location_leading_strip,
                |tokens| format!("^{tokens}"),
            )?,
            truncators: optional_regex(
                "location-truncators",
                &lexicon.location_truncators,
                |tokens| tokens,
            )?,
            trailing_punctuation: lexicon
                .location_trailing_punctuation
                .iter()
                .flat_map(|t| t.chars())
                .collect(),
        })
    }

    pub fn extract(&self, text: &str) -> Outcome<String> {
        let Some((label, span)) = self.patterns.first_match(text) else {
            debug!("Location not found in text");
            return Outcome::Unresolved;
        };

        let location = self.clean(span);
        if location.is_empty() {
            debug!("Location '{}' emptied by cleanup (pattern: {})", span, label);
            return Outcome::Unresolved;
        }

        debug!("Found location: {} (pattern: {})", location, label);
        Outcome::Resolved(location)
    }

    /// Strip a leftover leading anchor, cut at the first code instruction
    /// keyword, then drop one trailing comma or full stop.
    fn clean(&self, span: &str) -> String {
        let mut location = span.trim();

        if let Some(re) = &self.leading_strip {
            if let Some(m) = re.find(location) {
                location = &location[m.end()..];
            }
        }

        if let Some(re) = &self.truncators {
            if let Some(m) = re.find(location) {
                location = &location[..m.start()];
            }
        }

        if let Some(last) = location.chars().next_back() {
            if self.trailing_punctuation.contains(&last) {
                location = &location[..location.len() - last.len_utf8()];
            }
        }

        location.trim().to_string()
    }
}

fn optional_regex<F>(
    label: &'static str,
    tokens: &[String],
    wrap: F,
) -> Result<Option<Regex>, LexiconError>
where
    F: Fn(String) -> String,
{
    if tokens.iter().all(|t| t.is_empty()) {
        return Ok(None);
    }
    Regex::new(&wrap(alternation(tokens)))
        .map(Some)
        .map_err(|source| LexiconError::Pattern { label, source })
}
