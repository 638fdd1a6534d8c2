//! Reading envelope files from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info_span, warn};

use claim_model::ClaimRecord;

use crate::envelope::decode_envelope;
use crate::error::{IngestError, Result};

/// Outcome of one envelope file in a batch.
#[derive(Debug)]
pub struct EnvelopeOutcome {
    pub path: PathBuf,
    pub result: Result<Vec<ClaimRecord>>,
}

impl EnvelopeOutcome {
    /// File name used to stamp records and label reports.
    pub fn file_name(&self) -> String {
        source_name(&self.path)
    }
}

/// Read and decode one envelope file, stamping each record with the file
/// name.
pub fn ingest_envelope_file(path: &Path) -> Result<Vec<ClaimRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source = source_name(path);
    let mut records = decode_envelope(&text)?;
    for record in &mut records {
        record.source_file = Some(source.clone());
    }
    debug!(file = %source, records = records.len(), "decoded envelope");
    Ok(records)
}

/// Decode every file independently; one file's failure never affects the
/// others. Outcomes are returned in input order.
pub fn ingest_envelope_files(paths: &[PathBuf]) -> Vec<EnvelopeOutcome> {
    paths
        .iter()
        .map(|path| {
            let span = info_span!("envelope", file = %path.display());
            let _guard = span.enter();
            let result = ingest_envelope_file(path);
            if let Err(error) = &result {
                warn!(%error, "envelope rejected");
            }
            EnvelopeOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
