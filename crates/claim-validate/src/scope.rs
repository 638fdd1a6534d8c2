//! Evaluation scopes: where rule paths are resolved.
//!
//! A path's first segment is looked up in layers, in order:
//!
//! 1. fields of the current list item (ambient access, `NGAY_YL`)
//! 2. the item under its alias `XML` or its group type (`XML3.NGAY_YL`)
//! 3. the record's groups by type (`XML1.NGAY_VAO`)
//!
//! Every layer is tried with an exact key before any layer is tried
//! case-insensitively. Later segments walk into nodes (exact, then
//! case-insensitive) or index into repeated elements.

use std::collections::HashMap;

use indexmap::IndexMap;

use claim_ingest::unwrap_summary;
use claim_model::{ClaimRecord, XmlNode, XmlValue};

/// Key under which the current list item is always reachable.
pub const ITEM_ALIAS: &str = "XML";

/// Group data of one record keyed by group type.
#[derive(Debug)]
pub struct BaseContext<'a> {
    groups: IndexMap<&'a str, &'a XmlValue>,
    folded: HashMap<String, usize>,
}

impl<'a> BaseContext<'a> {
    /// The summary type maps to its unwrapped summary element. When a type
    /// repeats, its last group wins.
    pub fn new(record: &'a ClaimRecord) -> Self {
        let mut groups = IndexMap::with_capacity(record.groups.len());
        for group in &record.groups {
            let data = if group.group_type.is_summary() {
                unwrap_summary(&group.data).unwrap_or(&group.data)
            } else {
                &group.data
            };
            groups.insert(group.group_type.as_str(), data);
        }

        let mut folded = HashMap::with_capacity(groups.len());
        for (position, key) in groups.keys().enumerate() {
            folded.entry(key.to_lowercase()).or_insert(position);
        }
        Self { groups, folded }
    }

    pub fn get(&self, key: &str) -> Option<&'a XmlValue> {
        self.groups.get(key).copied()
    }

    pub fn get_ignore_case(&self, key: &str) -> Option<&'a XmlValue> {
        self.folded
            .get(&key.to_lowercase())
            .and_then(|&position| self.groups.get_index(position))
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct ItemLayer<'a> {
    target: &'a str,
    value: &'a XmlValue,
    /// `None` for text rows, which have no fields of their own.
    fields: Option<&'a XmlNode>,
}

/// Resolution scope for one evaluation: the base context, optionally
/// overlaid with a list item.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'c, 'a> {
    base: &'c BaseContext<'a>,
    item: Option<ItemLayer<'a>>,
}

impl<'c, 'a> Scope<'c, 'a> {
    pub fn base(base: &'c BaseContext<'a>) -> Self {
        Self { base, item: None }
    }

    /// Overlay `item` as a row of group type `target`. A text row adds no
    /// ambient fields but is still reachable through its aliases.
    pub fn item(base: &'c BaseContext<'a>, target: &'a str, item: &'a XmlValue) -> Self {
        Self {
            base,
            item: Some(ItemLayer {
                target,
                value: item,
                fields: item.as_node(),
            }),
        }
    }

    /// Resolve a path. `None` means missing.
    pub fn resolve(&self, path: &str) -> Option<&'a XmlValue> {
        if path.contains('.')
            && let Some(value) = self.top_exact(path)
        {
            return Some(value);
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let root = self.top_exact(first).or_else(|| self.top_ignore_case(first))?;
        segments.try_fold(root, descend)
    }

    fn top_exact(&self, key: &str) -> Option<&'a XmlValue> {
        if let Some(item) = &self.item {
            if let Some(value) = item.fields.and_then(|fields| fields.get(key)) {
                return Some(value);
            }
            if key == ITEM_ALIAS || key == item.target {
                return Some(item.value);
            }
        }
        self.base.get(key)
    }

    fn top_ignore_case(&self, key: &str) -> Option<&'a XmlValue> {
        if let Some(item) = &self.item {
            if let Some(value) = item.fields.and_then(|fields| fields.get_ignore_case(key)) {
                return Some(value);
            }
            if key.eq_ignore_ascii_case(ITEM_ALIAS) || key.eq_ignore_ascii_case(item.target) {
                return Some(item.value);
            }
        }
        self.base.get_ignore_case(key)
    }
}

fn descend<'a>(current: &'a XmlValue, segment: &str) -> Option<&'a XmlValue> {
    match current {
        XmlValue::Node(node) => node.lookup(segment),
        XmlValue::List(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        XmlValue::Text(_) => None,
    }
}
