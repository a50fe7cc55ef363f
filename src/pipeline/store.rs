use std::collections::BTreeMap;

use super::PipelineError;
use crate::models::DocumentRecord;

/// In-memory table of document records, one row per ingested report.
///
/// A store lives for one upload batch and is rebuilt for the next; rows are
/// only ever added and mutated, never removed. All mutation happens on the
/// single processing thread.
#[derive(Debug, Default)]
pub struct RecordStore {
    rows: Vec<DocumentRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a row for a newly ingested document. The text is lowercased on
    /// the way in; every downstream prompt operates on the lowercased form.
    pub fn add_document(&mut self, id: &str, raw_text: &str) -> Result<(), PipelineError> {
        if self.rows.iter().any(|r| r.id == id) {
            return Err(PipelineError::DuplicateDocument(id.to_string()));
        }
        self.rows
            .push(DocumentRecord::new(id, &raw_text.to_lowercase()));
        Ok(())
    }

    /// Merge extracted measurements into a row's field mapping.
    pub fn set_field_values(
        &mut self,
        id: &str,
        mapping: BTreeMap<String, f64>,
    ) -> Result<(), PipelineError> {
        self.row_mut(id)?.extracted_fields.extend(mapping);
        Ok(())
    }

    /// Record unparsed completion text for audit. `Some` overwrites the
    /// corresponding column, `None` leaves it untouched — the two passes
    /// write their columns at different times.
    pub fn set_raw_outputs(
        &mut self,
        id: &str,
        values_text: Option<String>,
        date_text: Option<String>,
    ) -> Result<(), PipelineError> {
        let row = self.row_mut(id)?;
        if let Some(text) = values_text {
            row.raw_model_output_values = Some(text);
        }
        if let Some(text) = date_text {
            row.raw_model_output_date = Some(text);
        }
        Ok(())
    }

    pub fn set_resolved_date(
        &mut self,
        id: &str,
        date: Option<String>,
    ) -> Result<(), PipelineError> {
        self.row_mut(id)?.resolved_date = date;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Read-only view of every row, in ingestion order.
    pub fn rows(&self) -> &[DocumentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, id: &str) -> Result<&mut DocumentRecord, PipelineError> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PipelineError::UnknownDocument(id.to_string()))
    }
}
