use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the extraction table — everything derived from a single
/// scanned report, accumulated across the processing passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Source filename (or stable index), unique within a batch.
    pub id: String,
    /// Full extracted text, lowercased at ingestion.
    pub raw_text: String,
    /// Measurement name → numeric value. Keys are always a subset of
    /// [`crate::pipeline::prompt::RECOGNIZED_FIELDS`]; an absent key means
    /// "not found", never zero.
    pub extracted_fields: BTreeMap<String, f64>,
    /// Unparsed completion text the fields were derived from (kept for audit).
    pub raw_model_output_values: Option<String>,
    /// Unparsed completion text the date was derived from.
    pub raw_model_output_date: Option<String>,
    /// Canonical `dd-mm-yyyy HH:MM` timestamp, if one could be resolved.
    pub resolved_date: Option<String>,
}

impl DocumentRecord {
    pub fn new(id: &str, raw_text: &str) -> Self {
        Self {
            id: id.to_string(),
            raw_text: raw_text.to_string(),
            extracted_fields: BTreeMap::new(),
            raw_model_output_values: None,
            raw_model_output_date: None,
            resolved_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_derived_columns() {
        let record = DocumentRecord::new("report_01.pdf", "ph 7.41");
        assert_eq!(record.id, "report_01.pdf");
        assert_eq!(record.raw_text, "ph 7.41");
        assert!(record.extracted_fields.is_empty());
        assert!(record.raw_model_output_values.is_none());
        assert!(record.raw_model_output_date.is_none());
        assert!(record.resolved_date.is_none());
    }

    #[test]
    fn record_serde_roundtrip() {
        let mut record = DocumentRecord::new("a.pdf", "sodium 140");
        record.extracted_fields.insert("sodium".into(), 140.0);
        record.resolved_date = Some("14-03-2023 01:12".into());

        let json = serde_json::to_string(&record).unwrap();
        let parsed: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "a.pdf");
        assert_eq!(parsed.extracted_fields["sodium"], 140.0);
        assert_eq!(parsed.resolved_date.as_deref(), Some("14-03-2023 01:12"));
    }
}
