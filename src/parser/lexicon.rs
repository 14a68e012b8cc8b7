use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Unable to load lexicon file '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: ::config::ConfigError,
    },

    #[error("Lexicon entry `{field}` must not be empty")]
    Empty { field: &'static str },

    #[error("Unable to compile {label} pattern: {source}")]
    Pattern {
        label: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Vocabulary and marker tokens used by the extractors.
///
/// Every token is matched literally. Fields holding character sets
/// (`code_separators`, `location_clause_punctuation`, ...) use every
/// character of every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub couriers: Vec<String>,
    pub possessive_prefix: String,
    /// Nouns that may follow a courier name (delivery, parcel, locker, store)
    pub courier_suffixes: Vec<String>,
    /// Subset of suffixes strong enough to anchor an unbracketed mention
    pub delivery_suffixes: Vec<String>,
    pub signature_open: String,
    pub signature_close: String,

    pub code_keywords: Vec<String>,
    pub code_separators: Vec<String>,

    pub location_anchors: Vec<String>,
    pub location_clause_punctuation: Vec<String>,
    pub location_terminators: Vec<String>,
    pub location_leading_strip: Vec<String>,
    pub location_truncators: Vec<String>,
    pub location_trailing_punctuation: Vec<String>,

    pub strict_code_marker: String,
    pub strict_address_marker: String,
    pub strict_address_separators: Vec<String>,
}

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon {
            couriers: owned(&[
                "圆通", "中通", "申通", "韵达", "顺丰", "京东", "极兔", "菜鸟",
                "丰巢", "德邦", "邮政", "EMS", "丹鸟", "天猫",
            ]),
            possessive_prefix: "您的".to_string(),
            courier_suffixes: owned(&["快递", "速运", "包裹", "驿站", "超市"]),
            delivery_suffixes: owned(&["快递", "速运", "包裹"]),
            signature_open: "【".to_string(),
            signature_close: "】".to_string(),

            code_keywords: owned(&["取件码", "凭", "码", "验证码", "密码", "取件"]),
            code_separators: owned(&[":", "："]),

            location_anchors: owned(&[
                "已到达", "已到", "存入", "在", "存放在", "送至", "放置在", "到达",
            ]),
            location_clause_punctuation: owned(&["，", "。", "！", "!", "？", "?"]),
            location_terminators: owned(&["请", "取件码", "凭", "地址"]),
            location_leading_strip: owned(&["到达", "在"]),
            location_truncators: owned(&["取件码", "凭", "请凭", "请于"]),
            location_trailing_punctuation: owned(&["，", "。"]),

            strict_code_marker: "请凭".to_string(),
            strict_address_marker: "地址".to_string(),
            strict_address_separators: owned(&[":", "："]),
        }
    }
}

impl Lexicon {
    /// Load a lexicon from a TOML or JSON file. Missing fields keep
    /// their default values.
    pub fn from_file(path: &str) -> Result<Self, LexiconError> {
        info!("Loading lexicon from {}", path);

        let load_error = |source| LexiconError::Load {
            path: path.to_string(),
            source,
        };

        let lexicon: Lexicon = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)?;

        lexicon.validate()?;
        debug!("Lexicon loaded: {} couriers, {} code keywords, {} location anchors",
               lexicon.couriers.len(), lexicon.code_keywords.len(), lexicon.location_anchors.len());

        Ok(lexicon)
    }

    pub fn validate(&self) -> Result<(), LexiconError> {
        let lists: [(&'static str, &[String]); 6] = [
            ("couriers", self.couriers.as_slice()),
            ("courier_suffixes", self.courier_suffixes.as_slice()),
            ("delivery_suffixes", self.delivery_suffixes.as_slice()),
            ("code_keywords", self.code_keywords.as_slice()),
            ("location_anchors", self.location_anchors.as_slice()),
            ("location_terminators", self.location_terminators.as_slice()),
        ];
        for (field, tokens) in lists {
            if tokens.iter().all(|t| t.is_empty()) {
                return Err(LexiconError::Empty { field });
            }
        }

        let markers: [(&'static str, &str); 5] = [
            ("possessive_prefix", &self.possessive_prefix),
            ("signature_open", &self.signature_open),
            ("signature_close", &self.signature_close),
            ("strict_code_marker", &self.strict_code_marker),
            ("strict_address_marker", &self.strict_address_marker),
        ];
        for (field, marker) in markers {
            if marker.is_empty() {
                return Err(LexiconError::Empty { field });
            }
        }

        if self.strict_address_separators.iter().all(|s| s.is_empty()) {
            return Err(LexiconError::Empty { field: "strict_address_separators" });
        }

        Ok(())
    }
}

/// Non-capturing alternation of literal tokens, longest first so that a
/// longer token wins over its own prefix at the same position.
pub(crate) fn alternation(tokens: &[String]) -> String {
    let mut sorted: Vec<&String> = tokens.iter().filter(|t| !t.is_empty()).collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let escaped: Vec<String> = sorted.iter().map(|t| regex::escape(t)).collect();
    format!("(?:{})", escaped.join("|"))
}

/// Body of a character class (without brackets) holding every character
/// of every token, hex-escaped.
pub(crate) fn class_body(tokens: &[String]) -> String {
    tokens
        .iter()
        .flat_map(|t| t.chars())
        .map(|c| format!(r"\x{{{:x}}}", c as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_is_valid() {
        assert!(Lexicon::default().validate().is_ok());
    }

    #[test]
    fn test_empty_courier_list_rejected() {
        let lexicon = Lexicon {
            couriers: Vec::new(),
            ..Lexicon::default()
        };
        assert!(matches!(
            lexicon.validate(),
            Err(LexiconError::Empty { field: "couriers" })
        ));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let lexicon = Lexicon {
            strict_code_marker: String::new(),
            ..Lexicon::default()
        };
        assert!(matches!(
            lexicon.validate(),
            Err(LexiconError::Empty { field: "strict_code_marker" })
        ));
    }

    #[test]
    fn test_alternation_orders_longest_first_and_escapes() {
        let tokens = owned(&["在", "存放在", "a.b"]);
        assert_eq!(alternation(&tokens), r"(?:存放在|a\.b|在)");
    }

    #[test]
    fn test_class_body_escapes_every_char() {
        assert_eq!(class_body(&owned(&[":", "-]"])), r"\x{3a}\x{2d}\x{5d}");
    }
}
