//! Subfile kinds and groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::node::XmlValue;

/// Subfile kind carried in an envelope's type tag.
///
/// `XML1` is the whole-record summary; the remaining kinds are detail
/// tables. Unknown tags are kept verbatim (upper-cased) as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    /// Summary record (TONG_HOP).
    Xml1,
    /// Medicines.
    Xml2,
    /// Technical services and medical supplies.
    Xml3,
    /// Paraclinical services.
    Xml4,
    /// Clinical progress notes.
    Xml5,
    Xml6,
    /// Discharge papers.
    Xml7,
    Xml8,
    Xml9,
    Xml10,
    Xml11,
    Xml12,
    Xml13,
    Xml14,
    Xml15,
    Other(String),
}

const KNOWN: [GroupType; 15] = [
    GroupType::Xml1,
    GroupType::Xml2,
    GroupType::Xml3,
    GroupType::Xml4,
    GroupType::Xml5,
    GroupType::Xml6,
    GroupType::Xml7,
    GroupType::Xml8,
    GroupType::Xml9,
    GroupType::Xml10,
    GroupType::Xml11,
    GroupType::Xml12,
    GroupType::Xml13,
    GroupType::Xml14,
    GroupType::Xml15,
];

impl GroupType {
    /// Classify a raw tag. Never fails; unrecognized tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_uppercase();
        KNOWN
            .iter()
            .find(|known| known.as_str() == normalized)
            .cloned()
            .unwrap_or(GroupType::Other(normalized))
    }

    pub fn as_str(&self) -> &str {
        match self {
            GroupType::Xml1 => "XML1",
            GroupType::Xml2 => "XML2",
            GroupType::Xml3 => "XML3",
            GroupType::Xml4 => "XML4",
            GroupType::Xml5 => "XML5",
            GroupType::Xml6 => "XML6",
            GroupType::Xml7 => "XML7",
            GroupType::Xml8 => "XML8",
            GroupType::Xml9 => "XML9",
            GroupType::Xml10 => "XML10",
            GroupType::Xml11 => "XML11",
            GroupType::Xml12 => "XML12",
            GroupType::Xml13 => "XML13",
            GroupType::Xml14 => "XML14",
            GroupType::Xml15 => "XML15",
            GroupType::Other(tag) => tag,
        }
    }

    /// True for the whole-record summary kind.
    pub fn is_summary(&self) -> bool {
        matches!(self, GroupType::Xml1)
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ModelError::EmptyGroupType);
        }
        Ok(Self::from_tag(s))
    }
}

impl From<String> for GroupType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<GroupType> for String {
    fn from(group_type: GroupType) -> Self {
        group_type.as_str().to_string()
    }
}

/// One subfile of a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "type")]
    pub group_type: GroupType,
    /// Decoded inner tree, or the raw payload when decoding did not apply.
    pub data: XmlValue,
}

impl Group {
    pub fn new(group_type: GroupType, data: XmlValue) -> Self {
        Self { group_type, data }
    }
}
