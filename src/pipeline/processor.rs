use super::dates::{resolve_date, DateResolution};
use super::extract::ReportExtractor;
use super::store::RecordStore;
use super::values::parse_value_payload;
use super::PipelineError;

/// Runs the extraction passes over every row of a record store, one document
/// at a time on the calling thread.
///
/// Failure policy: a completion-service error that escapes the retry budget
/// aborts the run; a document whose completion cannot be parsed keeps its
/// gap (empty fields, absent date) and the run continues.
pub struct ReportProcessor {
    extractor: ReportExtractor,
}

impl ReportProcessor {
    pub fn new(extractor: ReportExtractor) -> Self {
        Self { extractor }
    }

    /// Create one row per (id, text) pair.
    pub fn ingest<I>(&self, store: &mut RecordStore, documents: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (id, text) in documents {
            store.add_document(&id, &text)?;
        }
        tracing::info!(documents = store.len(), "ingested upload batch");
        Ok(())
    }

    /// Values pass: ask the model for a value mapping per document, keep the
    /// raw completion for audit, and merge whatever parses.
    pub fn run_values_pass(&self, store: &mut RecordStore) -> Result<(), PipelineError> {
        for (id, text) in snapshot_texts(store) {
            tracing::info!(doc_id = %id, "requesting value extraction");
            let raw = self.extractor.extract_values(&id, &text)?;
            store.set_raw_outputs(&id, Some(raw.clone()), None)?;

            match parse_value_payload(&raw) {
                Ok(fields) => store.set_field_values(&id, fields)?,
                Err(e) => {
                    tracing::warn!(
                        doc_id = %id,
                        error = %e,
                        "unable to parse completion into a value mapping"
                    );
                }
            }
        }
        Ok(())
    }

    /// Date pass: ask the model for each document's date text, unparsed.
    pub fn run_date_pass(&self, store: &mut RecordStore) -> Result<(), PipelineError> {
        for (id, text) in snapshot_texts(store) {
            tracing::info!(doc_id = %id, "requesting date extraction");
            let raw = self.extractor.extract_date(&id, &text)?;
            store.set_raw_outputs(&id, None, Some(raw))?;
        }
        Ok(())
    }

    /// Resolution pass: reduce each stored raw date text to the canonical
    /// format. No service calls; failures are per-document diagnostics.
    pub fn resolve_dates(&self, store: &mut RecordStore) -> Result<(), PipelineError> {
        let raw_dates: Vec<(String, String)> = store
            .rows()
            .iter()
            .map(|r| (r.id.clone(), r.raw_model_output_date.clone().unwrap_or_default()))
            .collect();

        for (id, raw) in raw_dates {
            match resolve_date(&raw) {
                DateResolution::Resolved(date) => {
                    store.set_resolved_date(&id, Some(date))?;
                }
                DateResolution::NotFound => {
                    tracing::warn!(doc_id = %id, raw = %raw, "no date found in completion text");
                    store.set_resolved_date(&id, None)?;
                }
                DateResolution::NotCalendarValid => {
                    tracing::warn!(doc_id = %id, raw = %raw, "could not parse date from completion text");
                    store.set_resolved_date(&id, None)?;
                }
            }
        }
        Ok(())
    }

    /// Run every extraction pass over an already-ingested store.
    pub fn process(&self, store: &mut RecordStore) -> Result<(), PipelineError> {
        self.run_values_pass(store)?;
        self.run_date_pass(store)?;
        self.resolve_dates(store)
    }
}

fn snapshot_texts(store: &RecordStore) -> Vec<(String, String)> {
    store
        .rows()
        .iter()
        .map(|r| (r.id.clone(), r.raw_text.clone()))
        .collect()
}
