use log::debug;

use super::lexicon::{alternation, Lexicon, LexiconError};
use super::pattern::{Outcome, Pattern, PatternSet};

/// Courier name extraction.
///
/// Patterns, by priority:
/// 1. possessive mention "您的<courier>(<suffix>)?"
/// 2. "<courier><delivery suffix>"
/// 3. bracketed signature "【<courier>(<suffix>)?】"
/// 4. bare "<courier>(<suffix>)?"
#[derive(Debug)]
pub(crate) struct CourierExtractor {
    patterns: PatternSet,
    possessive_prefix: String,
    brackets: Vec<char>,
}

impl CourierExtractor {
    pub fn new(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        let couriers = alternation(&lexicon.couriers);
        let suffixes = alternation(&lexicon.courier_suffixes);
        let delivery = alternation(&lexicon.delivery_suffixes);
        let prefix = regex::escape(&lexicon.possessive_prefix);
        let open = regex::escape(&lexicon.signature_open);
        let close = regex::escape(&lexicon.signature_close);

        let patterns = PatternSet::new(vec![
            Pattern::new("courier-possessive", &format!("(?i){prefix}{couriers}{suffixes}?"))?,
            Pattern::new("courier-delivery", &format!("(?i){couriers}{delivery}"))?,
            Pattern::new("courier-signature", &format!("(?i){open}{couriers}{suffixes}?{close}"))?,
            Pattern::new("courier-bare", &format!("(?i){couriers}{suffixes}?"))?,
        ]);

        Ok(CourierExtractor {
            patterns,
            possessive_prefix: lexicon.possessive_prefix.clone(),
            brackets: lexicon
                .signature_open
                .chars()
                .chain(lexicon.signature_close.chars())
                .collect(),
        })
    }

    pub fn extract(&self, text: &str) -> Outcome<String> {
        let Some((label, span)) = self.patterns.first_match(text) else {
            debug!("Courier not found in text");
            return Outcome::Unresolved;
        };

        let courier: String = span
            .strip_prefix(self.possessive_prefix.as_str())
            .unwrap_or(span)
            .chars()
            .filter(|c| !self.brackets.contains(c))
            .collect();

        debug!("Found courier: {} (pattern: {})", courier, label);
        Outcome::Resolved(courier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> String {
        CourierExtractor::new(&Lexicon::default())
            .unwrap()
            .extract(text)
            .or_empty()
    }

    #[test]
    fn test_possessive_mention_beats_signature() {
        assert_eq!(extract("【菜鸟驿站】您的韵达快递已到达小区驿站"), "韵达快递");
    }

    #[test]
    fn test_possessive_without_suffix() {
        assert_eq!(extract("您的京东已签收"), "京东");
    }

    #[test]
    fn test_delivery_suffix_beats_signature() {
        assert_eq!(extract("【丰巢】圆通包裹已存入柜机"), "圆通包裹");
    }

    #[test]
    fn test_signature_brackets_are_stripped() {
        assert_eq!(extract("【极兔】取件码 5566，请及时领取"), "极兔");
        assert_eq!(extract("【菜鸟驿站】取件码 5566"), "菜鸟驿站");
    }

    #[test]
    fn test_bare_mention_is_last_resort() {
        assert_eq!(extract("丰巢柜提醒：包裹待取"), "丰巢");
    }

    #[test]
    fn test_latin_courier_is_case_insensitive() {
        assert_eq!(extract("您的ems包裹已到达"), "ems包裹");
    }

    #[test]
    fn test_no_courier() {
        assert_eq!(extract("hello world"), "");
    }
}
