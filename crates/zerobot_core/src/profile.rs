use std::cmp::Ordering;

use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub payload: JsonValue,
    pub key: JsonValue,
    pub modifier: JsonValue,
    pub name: String,
}

impl Profile {
    pub fn new(
        payload: JsonValue,
        key: JsonValue,
        modifier: JsonValue,
        name: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            key,
            modifier,
            name: name.into(),
        }
    }

    /// Name shown to the user; unnamed profiles fall back to their position.
    pub fn display_name(&self, index: usize) -> String {
        fallback_name(&self.name, index)
    }

    /// Number of entries in an array payload, 0 for anything else.
    pub fn entry_count(&self) -> usize {
        self.payload.as_array().map_or(0, Vec::len)
    }

    /// Sorts the payload entries by case-insensitive `name`. Returns false
    /// when the payload is not an array.
    pub(crate) fn sort_entries_by_name(&mut self) -> bool {
        let Some(entries) = self.payload.as_array_mut() else {
            return false;
        };
        entries.sort_by(compare_entry_names);
        true
    }
}

pub(crate) fn fallback_name(name: &str, index: usize) -> String {
    if name.trim().is_empty() {
        format!("Profile {}", index + 1)
    } else {
        name.to_string()
    }
}

fn entry_name(entry: &JsonValue) -> String {
    entry
        .get("name")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

fn compare_entry_names(a: &JsonValue, b: &JsonValue) -> Ordering {
    entry_name(a).cmp(&entry_name(b))
}
