//! Claim envelope ingestion.
//!
//! Turns raw envelope text into [`ClaimRecord`](claim_model::ClaimRecord)s
//! and exposes the group normalizer that fixes row positions.

pub mod batch;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod xml;

pub use batch::{EnvelopeOutcome, ingest_envelope_file, ingest_envelope_files};
pub use discovery::{is_envelope_file, list_envelope_files};
pub use envelope::{CLAIM_LIST_PATH, decode_envelope, decode_payload, unwrap_summary};
pub use error::{DecodeError, IngestError, Result};
pub use normalize::{list_items, retain_rows};
pub use xml::parse_xml;
