//! JSON reporter
//!
//! Outputs the full run record as pretty-printed JSON, the same document
//! that is persisted as the durable record.

use super::RunRecord;
use anyhow::Result;

/// Render record as JSON
pub fn render(record: &RunRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_record;

    #[test]
    fn test_json_render_valid() {
        let record = test_record();
        let json_str = render(&record).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["verdict"]["tier"], record.verdict.tier.to_string());
        assert!(!parsed["verdict"]["recommendations"]
            .as_array()
            .expect("recommendations array")
            .is_empty());
    }

    #[test]
    fn test_every_report_is_present() {
        let record = test_record();
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&record).unwrap()).unwrap();
        for key in ["structure", "source", "documentation", "build", "tests"] {
            assert!(parsed["reports"][key]["metrics"].is_object(), "{key} missing");
            assert!(parsed["reports"][key]["warnings"].is_array());
        }
    }
}
