//! CLI glue: read pre-extracted report text files from a directory, run the
//! extraction pipeline, print the resulting table. Text extraction from PDFs
//! and any real display surface live outside this crate.

use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use labgas::completion::OpenAiClient;
use labgas::config;
use labgas::pipeline::{
    ExtractorConfig, RecordStore, ReportExtractor, ReportProcessor, RECOGNIZED_FIELDS,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Labgas starting v{}", config::APP_VERSION);

    let Some(dir) = std::env::args().nth(1) else {
        eprintln!("usage: labgas <directory of extracted report .txt files>");
        return ExitCode::FAILURE;
    };

    match run(Path::new(&dir)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let documents = read_documents(dir)?;
    if documents.is_empty() {
        tracing::warn!(dir = %dir.display(), "no .txt documents found");
        return Ok(());
    }

    let extractor = ReportExtractor::new(
        Box::new(OpenAiClient::from_env()),
        ExtractorConfig::default(),
    );
    let processor = ReportProcessor::new(extractor);

    let mut store = RecordStore::new();
    processor.ingest(&mut store, documents)?;
    processor.process(&mut store)?;

    print_table(&store);
    Ok(())
}

/// Collect (filename, text) pairs from every .txt file in the directory,
/// sorted by name so row order is stable across runs.
fn read_documents(dir: &Path) -> std::io::Result<Vec<(String, String)>> {
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            let id = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = std::fs::read_to_string(&path)?;
            documents.push((id, text));
        }
    }
    documents.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(documents)
}

fn print_table(store: &RecordStore) {
    for record in store.rows() {
        println!("{}", record.id);
        println!(
            "  date: {}",
            record.resolved_date.as_deref().unwrap_or("-")
        );
        for field in RECOGNIZED_FIELDS {
            if let Some(value) = record.extracted_fields.get(*field) {
                println!("  {field}: {value}");
            }
        }
    }
}
