//! Check results across envelope files.

use serde::Serialize;
use tracing::{info, info_span, warn};

use claim_ingest::EnvelopeOutcome;
use claim_model::ClaimRecord;
use claim_validate::ValidationEngine;

use crate::logging::redact_value;

/// Outcome of checking one envelope file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub records: Vec<ClaimRecord>,
}

impl FileReport {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of a whole `check` run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub files: Vec<FileReport>,
}

impl CheckReport {
    /// Validate the records of every decoded envelope.
    pub fn build(outcomes: Vec<EnvelopeOutcome>, engine: &ValidationEngine) -> Self {
        let files = outcomes
            .into_iter()
            .map(|outcome| {
                let file = outcome.file_name();
                let span = info_span!("check", file = %file);
                let _guard = span.enter();
                match outcome.result {
                    Ok(mut records) => {
                        engine.revalidate(&mut records);
                        for record in &records {
                            info!(
                                claim = %redact_value(&record.id),
                                errors = record.error_count(),
                                warnings = record.warning_count(),
                                "claim checked"
                            );
                        }
                        FileReport {
                            file,
                            error: None,
                            records,
                        }
                    }
                    Err(error) => {
                        warn!(%error, "envelope could not be decoded");
                        FileReport {
                            file,
                            error: Some(error.to_string()),
                            records: Vec::new(),
                        }
                    }
                }
            })
            .collect();
        Self { files }
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &ClaimRecord)> {
        self.files.iter().flat_map(|file| {
            file.records
                .iter()
                .map(move |record| (file.file.as_str(), record))
        })
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.is_failed())
    }

    pub fn record_count(&self) -> usize {
        self.files.iter().map(|file| file.records.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.records().map(|(_, record)| record.error_count()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.records().map(|(_, record)| record.warning_count()).sum()
    }

    /// True when a file failed or a deduction-class result was produced.
    pub fn has_failures(&self) -> bool {
        self.failed_files().next().is_some() || self.error_count() > 0
    }
}
