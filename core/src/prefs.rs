//! Session-scoped key/value preferences.
//!
//! The dashboard remembers page size, search text and sort across reloads
//! within one session. The backing store is opaque to the state machine: it
//! only needs string `get`/`set`/`remove`.

use std::collections::HashMap;

pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const SEARCH_KEY: &str = "search";
pub const SORT_FIELD_KEY: &str = "sortField";
pub const SORT_DIRECTION_KEY: &str = "sortDirection";
/// Written on every page change, never read back.
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// String key to string value store scoped to a session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store; its lifetime is the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    entries: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryPreferences {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
