//! Untyped spreadsheet rows, as produced by the decoder

use chrono::NaiveDateTime;
use std::collections::HashMap;

/// A single non-empty cell value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// One spreadsheet row keyed by column header. Empty cells are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.cells.get(header)
    }

    pub fn insert(&mut self, header: impl Into<String>, value: RawValue) {
        self.cells.insert(header.into(), value);
    }

    pub fn contains(&self, header: &str) -> bool {
        self.cells.contains_key(header)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
