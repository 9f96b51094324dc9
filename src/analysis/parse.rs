//! Lenient extraction of a JSON object from model output
//!
//! Strategies are tried in order and the first one yielding an object wins.

use serde_json::{Map, Value};

type Strategy = fn(&str) -> Option<Map<String, Value>>;

const STRATEGIES: &[Strategy] = &[strict_object, outermost_braces];

/// Parse model output into a JSON object, or `None` if no strategy succeeds
pub fn parse_model_output(raw: &str) -> Option<Map<String, Value>> {
    STRATEGIES.iter().find_map(|strategy| strategy(raw))
}

/// Remove a surrounding Markdown code fence, with or without a `json` tag
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn strict_object(raw: &str) -> Option<Map<String, Value>> {
    as_object(serde_json::from_str(strip_code_fence(raw)).ok()?)
}

fn outermost_braces(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    as_object(serde_json::from_str(&raw[start..=end]).ok()?)
}

fn as_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let map = parse_model_output(r#"{"overall_rating": "Good"}"#).unwrap();
        assert_eq!(map["overall_rating"], "Good");
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"overall_rating\": \"Fair\"}\n```";
        assert_eq!(parse_model_output(raw).unwrap()["overall_rating"], "Fair");

        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(parse_model_output(raw).unwrap()["a"], 1);
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let raw = "Here is my analysis:\n{\"overall_rating\": \"Poor\", \"x\": {\"y\": 2}}\nHope it helps!";
        let map = parse_model_output(raw).unwrap();
        assert_eq!(map["overall_rating"], "Poor");
        assert_eq!(map["x"]["y"], 2);
    }

    #[test]
    fn test_unparseable_output() {
        assert!(parse_model_output("I cannot analyze this restaurant.").is_none());
        assert!(parse_model_output("} backwards {").is_none());
        assert!(parse_model_output("{not json}").is_none());
        assert!(parse_model_output("").is_none());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(parse_model_output("[1, 2, 3]").is_none());
        assert!(parse_model_output("\"just a string\"").is_none());
    }
}
