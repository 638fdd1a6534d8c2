//! Envelope decoding.
//!
//! An envelope is one outer XML submission:
//!
//! ```text
//! GIAMDINHHS
//! └── THONGTINHOSO
//!     └── DANHSACHHOSO
//!         └── HOSO            (one per claim, repeated)
//!             └── FILEHOSO    (one per subfile, repeated)
//!                 ├── LOAIHOSO     type tag (XML1, XML2, ...)
//!                 └── NOIDUNGFILE  Base64-encoded inner XML
//! ```
//!
//! Only a missing claim list fails the envelope. Payloads that do not
//! decode are kept as their raw text.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;
use uuid::Uuid;

use claim_model::{CLAIM_KEY_FIELD, ClaimRecord, Group, GroupType, XmlValue};

use crate::error::{DecodeError, IngestError, Result};
use crate::xml::parse_xml;

/// Path from the document root to the repeated claim element.
pub const CLAIM_LIST_PATH: [&str; 4] = ["GIAMDINHHS", "THONGTINHOSO", "DANHSACHHOSO", "HOSO"];

/// Subfile element inside a claim.
pub const SUBFILE_TAG: &str = "FILEHOSO";

/// Type tag inside a subfile.
pub const SUBFILE_TYPE_TAG: &str = "LOAIHOSO";

/// Payload inside a subfile.
pub const SUBFILE_CONTENT_TAG: &str = "NOIDUNGFILE";

/// Wrapper of the summary record inside an `XML1` payload.
pub const SUMMARY_TAG: &str = "TONG_HOP";

/// Lenient Base64: optional padding, trailing bits tolerated.
const PAYLOAD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode one envelope into claim records, in document order.
///
/// # Errors
///
/// Returns [`IngestError::MalformedXml`] when the text is not XML and
/// [`IngestError::Structural`] when the claim list path is absent.
pub fn decode_envelope(text: &str) -> Result<Vec<ClaimRecord>> {
    let document = parse_xml(text)?;
    let claims = document
        .get_path(&CLAIM_LIST_PATH)
        .filter(|claims| !claims.is_blank())
        .ok_or_else(|| IngestError::Structural {
            path: CLAIM_LIST_PATH.join("."),
        })?;

    Ok(claims
        .as_sequence()
        .into_iter()
        .enumerate()
        .map(|(position, claim)| decode_claim(position, claim))
        .collect())
}

fn decode_claim(position: usize, claim: &XmlValue) -> ClaimRecord {
    let groups: Vec<Group> = claim
        .get(SUBFILE_TAG)
        .map(XmlValue::as_sequence)
        .unwrap_or_default()
        .into_iter()
        .map(|subfile| decode_subfile(position, subfile))
        .collect();

    let summary = groups
        .iter()
        .find(|group| group.group_type.is_summary())
        .and_then(|group| unwrap_summary(&group.data))
        .cloned();

    let mut record = ClaimRecord {
        id: String::new(),
        summary,
        groups,
        validation_results: Vec::new(),
        source_file: None,
    };
    record.id = match record.summary_field(CLAIM_KEY_FIELD) {
        Some(key) => key.to_string(),
        None => {
            let generated = Uuid::now_v7().to_string();
            debug!(claim = position, id = %generated, "claim has no key, generated one");
            generated
        }
    };
    record
}

fn decode_subfile(position: usize, subfile: &XmlValue) -> Group {
    let tag = subfile
        .get(SUBFILE_TYPE_TAG)
        .and_then(XmlValue::leaf_text)
        .unwrap_or_default();
    let group_type = GroupType::from_tag(tag);

    let data = match subfile.get(SUBFILE_CONTENT_TAG) {
        Some(XmlValue::Text(raw)) => match decode_payload(raw) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(claim = position, group = %group_type, error = %err, "kept payload undecoded");
                XmlValue::Text(raw.clone())
            }
        },
        Some(inline) => inline.clone(),
        None => XmlValue::default(),
    };

    Group::new(group_type, data)
}

/// Decode a Base64 payload and parse it when it holds XML.
///
/// Whitespace inside the payload is ignored. The decoded bytes are read as
/// UTF-8 (lossy, byte-order mark dropped).
pub fn decode_payload(raw: &str) -> std::result::Result<XmlValue, DecodeError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = PAYLOAD_BASE64.decode(compact.as_bytes())?;
    let decoded = String::from_utf8_lossy(&bytes);
    let decoded = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
    if !decoded.trim_start().starts_with('<') {
        return Err(DecodeError::NotMarkup);
    }
    parse_xml(decoded).map_err(DecodeError::Xml)
}

/// The summary record of an `XML1` payload: its `TONG_HOP` child when
/// present, else the whole payload. Blank text counts as absent.
pub fn unwrap_summary(data: &XmlValue) -> Option<&XmlValue> {
    data.get(SUMMARY_TAG)
        .filter(|summary| !summary.is_blank())
        .or(Some(data))
        .filter(|summary| !summary.is_blank())
}
