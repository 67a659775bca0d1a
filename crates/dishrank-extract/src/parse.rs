//! Recovery of the mention array from raw model output.
//!
//! Models routinely wrap the requested JSON in markdown fences or stray
//! prose. Parsing strips fences, cuts the text down to the outermost JSON
//! array, and deserializes from there.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use dishrank_core::Mention;

use crate::error::ExtractError;

/// One mention as the model emits it, before clamping and filtering.
#[derive(Debug, Deserialize)]
struct RawMention {
    dish: String,
    sentiment: f64,
    #[serde(default)]
    quote: String,
}

fn fence_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```(?:json)?\s*").expect("static regex"))
}

fn fence_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```$").expect("static regex"))
}

/// Parses model output text into mentions attributed to `review_id`.
///
/// Entries with an empty dish name are dropped; sentiment values outside
/// `[0.0, 1.0]` are clamped into range.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] if no JSON array can be found in the
/// text or the array does not deserialize.
pub fn parse_mentions(text: &str, review_id: &str) -> Result<Vec<Mention>, ExtractError> {
    let stripped = fence_open().replace(text.trim(), "");
    let stripped = fence_close().replace(&stripped, "");

    // When no array delimiters are present the stripped text itself goes to
    // the parser, which produces the descriptive error.
    let array = outermost_array(&stripped).unwrap_or(&stripped);

    let raw: Vec<RawMention> =
        serde_json::from_str(array).map_err(|e| ExtractError::Parse {
            context: format!("review {review_id}"),
            source: e,
        })?;

    Ok(raw
        .into_iter()
        .filter(|m| !m.dish.trim().is_empty())
        .map(|m| Mention {
            dish: m.dish,
            sentiment: m.sentiment.clamp(0.0, 1.0),
            review_id: review_id.to_string(),
            quote: m.quote,
        })
        .collect())
}

/// Slices `text` down to the outermost `[` ... `]` pair, if any.
fn outermost_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let text = r#"[{"dish": "Soondubu", "sentiment": 0.9, "quote": "soondubu was perfect"}]"#;
        let mentions = parse_mentions(text, "r1").unwrap();
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].dish, "Soondubu");
        assert_eq!(mentions[0].review_id, "r1");
        assert!((mentions[0].sentiment - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_markdown_fences() {
        let text = "```json\n[{\"dish\": \"Kimchi\", \"sentiment\": 0.4, \"quote\": \"kimchi was ok\"}]\n```";
        let mentions = parse_mentions(text, "r1").unwrap();
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].dish, "Kimchi");
    }

    #[test]
    fn recovers_array_from_surrounding_prose() {
        let text = "Here are the dishes:\n[{\"dish\": \"Pho\", \"sentiment\": 0.8, \"quote\": \"pho was great\"}]\nHope that helps!";
        let mentions = parse_mentions(text, "r1").unwrap();
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].dish, "Pho");
    }

    #[test]
    fn empty_array_is_ok() {
        let mentions = parse_mentions("[]", "r1").unwrap();
        assert!(mentions.is_empty());
    }

    #[test]
    fn sentiment_is_clamped() {
        let text = r#"[
            {"dish": "A", "sentiment": 1.7, "quote": "x"},
            {"dish": "B", "sentiment": -0.2, "quote": "y"}
        ]"#;
        let mentions = parse_mentions(text, "r1").unwrap();
        assert!((mentions[0].sentiment - 1.0).abs() < f64::EPSILON);
        assert!(mentions[1].sentiment.abs() < f64::EPSILON);
    }

    #[test]
    fn blank_dish_names_are_dropped() {
        let text = r#"[
            {"dish": "  ", "sentiment": 0.5, "quote": "x"},
            {"dish": "Bibimbap", "sentiment": 0.6, "quote": "y"}
        ]"#;
        let mentions = parse_mentions(text, "r1").unwrap();
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].dish, "Bibimbap");
    }

    #[test]
    fn missing_quote_defaults_to_empty() {
        let text = r#"[{"dish": "Pho", "sentiment": 0.8}]"#;
        let mentions = parse_mentions(text, "r1").unwrap();
        assert_eq!(mentions[0].quote, "");
    }

    #[test]
    fn no_array_is_parse_error() {
        let err = parse_mentions("I could not find any dishes.", "r1").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[test]
    fn malformed_array_is_parse_error() {
        let err = parse_mentions("[{\"dish\": }]", "r1").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }
}
