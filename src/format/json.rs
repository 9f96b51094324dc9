//! JSON output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};

/// Pretty-printed JSON of the whole report
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_report;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format(&sample_report()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total_found"], 1);
        assert_eq!(parsed["restaurants"][0]["name"], "Joe's Pizza");
        assert!(parsed.get("search_location").is_some());
    }
}
