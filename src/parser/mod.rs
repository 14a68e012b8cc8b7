/// Parcel notification parsing: strict template first, then per-field heuristics
pub mod lexicon;

mod code;
mod courier;
mod location;
mod pattern;
mod strict;

use std::sync::LazyLock;

use log::debug;
use serde::{Deserialize, Serialize};

pub use lexicon::{Lexicon, LexiconError};

use code::CodeExtractor;
use courier::CourierExtractor;
use location::LocationExtractor;
use pattern::Outcome;
use strict::StrictExtractor;

/// Pickup information extracted from one notification.
///
/// Unresolved fields are empty strings. `raw_text` is always the input,
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMessage {
    code: String,
    courier: String,
    location: String,
    raw_text: String,
}

impl ParsedMessage {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn courier(&self) -> &str {
        &self.courier
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// True when no field could be resolved
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.courier.is_empty() && self.location.is_empty()
    }
}

/// Extraction engine built from a [`Lexicon`]. Immutable once built and
/// safe to share between threads.
#[derive(Debug)]
pub struct MessageParser {
    strict: StrictExtractor,
    courier: CourierExtractor,
    code: CodeExtractor,
    location: LocationExtractor,
}

impl MessageParser {
    pub fn new(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        lexicon.validate()?;

        Ok(MessageParser {
            strict: StrictExtractor::new(lexicon)?,
            courier: CourierExtractor::new(lexicon)?,
            code: CodeExtractor::new(lexicon)?,
            location: LocationExtractor::new(lexicon)?,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedMessage {
        debug!("Parsing notification (length: {} bytes)", text.len());

        if let Outcome::Resolved(fields) = self.strict.extract(text) {
            return ParsedMessage {
                code: fields.code,
                courier: fields.courier,
                location: fields.location,
                raw_text: text.to_string(),
            };
        }

        self.parse_heuristic(text)
    }

    fn parse_heuristic(&self, text: &str) -> ParsedMessage {
        ParsedMessage {
            code: self.code.extract(text).or_empty(),
            courier: self.courier.extract(text).or_empty(),
            location: self.location.extract(text).or_empty(),
            raw_text: text.to_string(),
        }
    }
}

static DEFAULT_PARSER: LazyLock<MessageParser> = LazyLock::new(|| {
    MessageParser::new(&Lexicon::default()).expect("default lexicon must compile")
});

/// Parser built from the default lexicon, compiled on first use.
pub fn default_parser() -> &'static MessageParser {
    &DEFAULT_PARSER
}

/// Parse a notification with the default lexicon.
pub fn parse_message(text: &str) -> ParsedMessage {
    default_parser().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT_SAMPLE: &str =
        "【申通快递】请凭12-2-1203到紫桂苑东区二楼取件，地址：紫桂苑东区二楼";

    #[test]
    fn test_strict_result_wins_over_heuristics() {
        let parser = default_parser();

        let strict = parser.parse(STRICT_SAMPLE);
        assert_eq!(strict.courier(), "申通快递");
        assert_eq!(strict.code(), "12-2-1203");
        assert_eq!(strict.location(), "紫桂苑东区二楼");

        // No location anchor in the body, so the heuristics alone miss it
        let heuristic = parser.parse_heuristic(STRICT_SAMPLE);
        assert_eq!(heuristic.location(), "");
        assert_ne!(strict, heuristic);
    }

    #[test]
    fn test_partial_strict_match_uses_heuristics() {
        let text = "【顺丰速运】您的快递已放置在丰巢柜A区，地址：科技园南路88号";
        let parsed = default_parser().parse(text);

        assert_eq!(parsed, default_parser().parse_heuristic(text));
        assert_eq!(parsed.courier(), "顺丰速运");
        assert_eq!(parsed.code(), "");
        assert_eq!(parsed.location(), "丰巢柜A区");
    }

    #[test]
    fn test_serializes_with_camel_case_raw_text() {
        let parsed = parse_message("hello world");
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "",
                "courier": "",
                "location": "",
                "rawText": "hello world",
            })
        );
    }

    #[test]
    fn test_custom_lexicon_courier() {
        let lexicon = Lexicon {
            couriers: vec!["速递易".to_string()],
            ..Lexicon::default()
        };
        let parser = MessageParser::new(&lexicon).unwrap();
        assert_eq!(parser.parse("您的速递易包裹已到").courier(), "速递易包裹");
        assert_eq!(parser.parse("您的顺丰快递已到").courier(), "");
    }

    #[test]
    fn test_invalid_lexicon_rejected() {
        let lexicon = Lexicon {
            location_anchors: Vec::new(),
            ..Lexicon::default()
        };
        assert!(MessageParser::new(&lexicon).is_err());
    }
}
