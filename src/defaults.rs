use std::sync::Arc;

use crate::value::{Map, Value};

/// Default entries merged beneath the data of every query that uses them.
///
/// Built once by the host and shared by cloning (the table sits behind an
/// `Arc`). Entries are read-only once built; to reset, build a new table.
///
/// ```
/// use dotquery::{Defaults, Query, Value};
///
/// let defaults = Defaults::new().with("site", Value::from("example.com"));
/// let result = Query::new("site").with_defaults(defaults).resolve(Value::Null).unwrap();
/// assert_eq!(result, Value::from("example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    entries: Arc<Map>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map) -> Self {
        Defaults {
            entries: Arc::new(entries),
        }
    }

    /// Adds or replaces an entry.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.entries).insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layers `data` over the defaults; keys in `data` win.
    pub fn merge_under(&self, data: Map) -> Map {
        if self.entries.is_empty() {
            return data;
        }
        let mut merged = Map::clone(&self.entries);
        merged.extend(data);
        merged
    }
}
