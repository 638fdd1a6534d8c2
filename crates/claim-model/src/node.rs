//! Parsed XML tree values.
//!
//! Envelope payloads are parsed into a small tagged tree instead of a
//! generic JSON-like value so that leaf text (including CDATA content) is
//! never confused with a nested record.
//!
//! # Key conventions
//!
//! - Child elements are keyed by tag name, in document order.
//! - Attributes are keyed `@_<name>`.
//! - Text mixed with child elements or attributes is kept under `#text`.
//! - CDATA content of an element with attributes is kept under `__cdata`.
//!
//! A tag that repeats among siblings becomes an [`XmlValue::List`].

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key prefix used for element attributes.
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key holding text content mixed with children or attributes.
pub const TEXT_KEY: &str = "#text";

/// Key holding CDATA content of an element that also has attributes.
pub const CDATA_KEY: &str = "__cdata";

/// A value in a parsed XML tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// Leaf text of an element without attributes or children.
    Text(String),
    /// Repeated sibling elements sharing one tag.
    List(Vec<XmlValue>),
    /// Element with children and/or attributes.
    Node(XmlNode),
}

impl XmlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Leaf string of this value: plain text, or the CDATA/text content of
    /// a node wrapping one. Returns `None` for subtrees and lists.
    pub fn leaf_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Node(node) => node.text_content(),
            Self::List(_) => None,
        }
    }

    /// True for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Child value for `key` when this value is a node.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.as_node().and_then(|node| node.get(key))
    }

    /// Walk a fixed sequence of exact keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&XmlValue> {
        path.iter()
            .try_fold(self, |current, segment| current.get(segment))
    }

    /// View this value as a sequence: a list yields its items, anything
    /// else yields itself as the only element.
    pub fn as_sequence(&self) -> Vec<&XmlValue> {
        match self {
            Self::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

impl Default for XmlValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<XmlNode> for XmlValue {
    fn from(node: XmlNode) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Ordered element map with a lazily built case-insensitive key index.
#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    entries: IndexMap<String, XmlValue>,
    folded: OnceLock<HashMap<String, usize>>,
}

impl XmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child, turning a repeated key into a list in arrival order.
    pub fn push(&mut self, key: impl Into<String>, value: XmlValue) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(XmlValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = XmlValue::List(vec![first, value]);
            }
            None => {
                self.entries.insert(key, value);
                self.folded = OnceLock::new();
            }
        }
    }

    /// Builder form of [`XmlNode::push`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<XmlValue>) -> Self {
        self.push(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.entries.get(key)
    }

    /// Case-insensitive lookup; the first key in document order wins.
    pub fn get_ignore_case(&self, key: &str) -> Option<&XmlValue> {
        let index = self.folded.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.entries.len());
            for (position, existing) in self.entries.keys().enumerate() {
                index.entry(existing.to_lowercase()).or_insert(position);
            }
            index
        });
        index
            .get(&key.to_lowercase())
            .and_then(|&position| self.entries.get_index(position))
            .map(|(_, value)| value)
    }

    /// Exact lookup, falling back to a case-insensitive match.
    pub fn lookup(&self, key: &str) -> Option<&XmlValue> {
        self.get(key).or_else(|| self.get_ignore_case(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// CDATA content, else mixed text content, when either is a plain string.
    pub fn text_content(&self) -> Option<&str> {
        self.get(CDATA_KEY)
            .or_else(|| self.get(TEXT_KEY))
            .and_then(XmlValue::as_text)
    }
}

impl PartialEq for XmlNode {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl From<IndexMap<String, XmlValue>> for XmlNode {
    fn from(entries: IndexMap<String, XmlValue>) -> Self {
        Self {
            entries,
            folded: OnceLock::new(),
        }
    }
}

impl Serialize for XmlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for XmlNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexMap::deserialize(deserializer).map(Self::from)
    }
}
