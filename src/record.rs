// 📄 Records
// The narrow view of a persisted row that the dispatcher works through

use crate::value::AttributeValue;
use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// One row worth of (field, value) pairs, in column order
pub type Row = Vec<(String, AttributeValue)>;

/// Read a JSON object as a row, keeping key order
pub fn row_from_json(document: &serde_json::Value) -> Result<Row> {
    let object = document
        .as_object()
        .ok_or_else(|| anyhow!("Expected a JSON object, got: {}", document))?;

    Ok(object
        .iter()
        .map(|(name, value)| (name.clone(), AttributeValue::from(value.clone())))
        .collect())
}

// ============================================================================
// RECORD INTERFACE
// ============================================================================

/// What the dispatcher needs from a record owned by a persistence layer.
///
/// Implementors keep attribute storage and dirty tracking; the formatter
/// only reads names and swaps values in place.
pub trait FormattableRecord {
    /// Every currently-set attribute, in insertion order
    fn attribute_names(&self) -> Vec<String>;

    /// Attributes changed since the record was loaded or last saved
    fn dirty_names(&self) -> Vec<String>;

    fn get_attribute(&self, name: &str) -> Option<&AttributeValue>;

    fn set_attribute(&mut self, name: &str, value: AttributeValue);
}

// ============================================================================
// IN-MEMORY RECORD
// ============================================================================

/// Reference record with insertion-ordered attributes and snapshot-based
/// dirty tracking: a field is dirty when its value differs from the value
/// recorded at the last `sync_original`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    order: Vec<String>,
    attributes: HashMap<String, AttributeValue>,
    original: HashMap<String, AttributeValue>,
}

impl Record {
    /// Empty record; everything set afterwards counts as changed
    pub fn new() -> Self {
        Self::default()
    }

    /// Record as read from storage: nothing is dirty yet
    pub fn from_storage(row: impl IntoIterator<Item = (String, AttributeValue)>) -> Self {
        let mut record = Self::from_changes(row);
        record.sync_original();
        record
    }

    /// Record whose every attribute is pending persistence
    pub fn from_changes(row: impl IntoIterator<Item = (String, AttributeValue)>) -> Self {
        let mut record = Self::new();
        for (name, value) in row {
            record.set(name, value);
        }
        record
    }

    /// Set an attribute; new names are appended to the order
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        if !self.attributes.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.attributes.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        match self.attributes.get(name) {
            Some(current) => self.original.get(name) != Some(current),
            None => false,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.order.iter().all(|name| !self.is_dirty(name))
    }

    /// Value as of the last load/save
    pub fn original(&self, name: &str) -> Option<&AttributeValue> {
        self.original.get(name)
    }

    /// Take the current values as the new baseline (after load or save)
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    /// (name, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.order
            .iter()
            .filter_map(|name| self.attributes.get(name).map(|value| (name.as_str(), value)))
    }

    /// Attributes as a JSON object, dates in storage layout
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .iter()
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(value.clone())))
            .collect::<serde_json::Map<_, _>>();

        serde_json::Value::Object(object)
    }
}

impl FormattableRecord for Record {
    fn attribute_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn dirty_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| self.is_dirty(name))
            .cloned()
            .collect()
    }

    fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.get(name)
    }

    fn set_attribute(&mut self, name: &str, value: AttributeValue) {
        self.set(name, value);
    }
}

// ============================================================================
// TESTS
// ============================================================================
