use log::debug;
use regex::Regex;

use super::lexicon::LexiconError;

/// Result of one extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome<T> {
    Resolved(T),
    Unresolved,
}

impl Outcome<String> {
    /// Collapse into a record field: unresolved becomes the empty string
    pub fn or_empty(self) -> String {
        match self {
            Outcome::Resolved(value) => value,
            Outcome::Unresolved => String::new(),
        }
    }
}

/// A labelled candidate pattern.
#[derive(Debug)]
pub(crate) struct Pattern {
    label: &'static str,
    regex: Regex,
}

impl Pattern {
    pub fn new(label: &'static str, source: &str) -> Result<Self, LexiconError> {
        let regex =
            Regex::new(source).map_err(|source| LexiconError::Pattern { label, source })?;
        Ok(Pattern { label, regex })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Leftmost match only. Yields capture group 1 when the pattern has
    /// one, the whole match otherwise.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(text)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }
}

/// Candidate patterns evaluated in priority order.
#[derive(Debug)]
pub(crate) struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        PatternSet { patterns }
    }

    /// First candidate, in priority order, that `accept` keeps. A rejected
    /// candidate moves evaluation on to the next pattern.
    pub fn first_accepted<'t, F>(
        &self,
        text: &'t str,
        accept: F,
    ) -> Option<(&'static str, &'t str)>
    where
        F: Fn(&str) -> bool,
    {
        for pattern in &self.patterns {
            if let Some(candidate) = pattern.find(text) {
                if accept(candidate) {
                    return Some((pattern.label(), candidate));
                }
                debug!("Candidate '{}' rejected (pattern: {})", candidate, pattern.label());
            }
        }
        None
    }

    pub fn first_match<'t>(&self, text: &'t str) -> Option<(&'static str, &'t str)> {
        self.first_accepted(text, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_prefers_capture_group() {
        let pattern = Pattern::new("grouped", r"code:(\d+)").unwrap();
        assert_eq!(pattern.find("the code:42 here"), Some("42"));

        let whole = Pattern::new("whole", r"code:\d+").unwrap();
        assert_eq!(whole.find("the code:42 here"), Some("code:42"));
    }

    #[test]
    fn test_first_match_respects_priority() {
        let set = PatternSet::new(vec![
            Pattern::new("late", r"z+").unwrap(),
            Pattern::new("early", r"a+").unwrap(),
        ]);
        // "a" occurs first in the text but "late" has priority
        assert_eq!(set.first_match("aaazz"), Some(("late", "zz")));
    }

    #[test]
    fn test_rejected_candidate_falls_through() {
        let set = PatternSet::new(vec![
            Pattern::new("first", r"(\w{3})").unwrap(),
            Pattern::new("second", r"(\d{3})").unwrap(),
        ]);
        let found = set.first_accepted("abc 123", |c| c.chars().all(|ch| ch.is_ascii_digit()));
        assert_eq!(found, Some(("second", "123")));
    }

    #[test]
    fn test_outcome_collapse() {
        assert_eq!(Outcome::Resolved("x".to_string()).or_empty(), "x");
        assert_eq!(Outcome::<String>::Unresolved.or_empty(), "");
    }

    #[test]
    fn test_invalid_pattern_reports_label() {
        let err = Pattern::new("broken", r"(unclosed").unwrap_err();
        assert!(matches!(err, LexiconError::Pattern { label: "broken", .. }));
    }
}
