//! Display name to plugin path mapping offered as the selectable choices

use std::collections::BTreeMap;

use serde::Serialize;

use super::record::PluginRecord;

/// Sentinel choice meaning "no plugin"
pub const NONE_CHOICE: &str = "none";

/// Mapping from display name to plugin path
///
/// Always contains the `none → none` sentinel. Inserting a name that is
/// already present replaces its path; the sentinel itself cannot be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionMap {
    entries: BTreeMap<String, String>,
}

impl Default for SelectionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionMap {
    /// Map holding only the sentinel
    #[must_use]
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(NONE_CHOICE.to_string(), NONE_CHOICE.to_string());
        Self { entries }
    }

    /// Build from records in traversal order; later names overwrite earlier ones
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PluginRecord>) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(record.name.clone(), record.path_string());
        }
        map
    }

    /// Insert a choice, returning the path it replaced
    ///
    /// A choice named like the sentinel is refused and leaves the map
    /// unchanged.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) -> Option<String> {
        let name = name.into();
        let path = path.into();
        if name == NONE_CHOICE {
            tracing::warn!(path = %path, "plugin name collides with the sentinel choice, skipping");
            return None;
        }
        self.entries.insert(name, path)
    }

    /// Path for a display name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Resolve a requested value to `(name, path)`
    ///
    /// Display names are matched first, then paths.
    #[must_use]
    pub fn resolve(&self, value: &str) -> Option<(&str, &str)> {
        self.entries
            .get_key_value(value)
            .or_else(|| self.entries.iter().find(|(_, path)| path.as_str() == value))
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    /// Whether `record` is the entry that currently owns its name
    #[must_use]
    pub fn holds(&self, record: &PluginRecord) -> bool {
        self.get(&record.name) == Some(record.path_string().as_str())
    }

    /// Iterate `(name, path)` pairs ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Display names ordered by name
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of choices including the sentinel
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the sentinel is never removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether only the sentinel is present
    #[must_use]
    pub fn is_sentinel_only(&self) -> bool {
        self.entries.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::PluginType;

    #[test]
    fn new_map_has_sentinel() {
        let map = SelectionMap::new();
        assert_eq!(map.get(NONE_CHOICE), Some(NONE_CHOICE));
        assert!(map.is_sentinel_only());
        assert!(!map.is_empty());
    }

    #[test]
    fn last_record_wins_on_collision() {
        let first = PluginRecord::new("Foo", PluginType::Source, "/p/a.so");
        let second = PluginRecord::new("Foo", PluginType::Filter, "/p/z.so");

        let map = SelectionMap::from_records([&first, &second]);
        assert_eq!(map.get("Foo"), Some("/p/z.so"));
        assert_eq!(map.len(), 2);
        assert!(map.holds(&second));
        assert!(!map.holds(&first));
    }

    #[test]
    fn resolve_by_name_or_path() {
        let mut map = SelectionMap::new();
        map.insert("Foo", "/p/a.so");

        assert_eq!(map.resolve("Foo"), Some(("Foo", "/p/a.so")));
        assert_eq!(map.resolve("/p/a.so"), Some(("Foo", "/p/a.so")));
        assert_eq!(map.resolve("none"), Some(("none", "none")));
        assert_eq!(map.resolve("Bar"), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut map = SelectionMap::new();
        map.insert("Foo", "/p/a.so");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({"Foo": "/p/a.so", "none": "none"}));
    }

    #[test]
    fn plugin_named_like_sentinel_is_skipped() {
        let shadow = PluginRecord::new(NONE_CHOICE, PluginType::Source, "/p/none.so");

        let map = SelectionMap::from_records([&shadow]);
        assert_eq!(map.get(NONE_CHOICE), Some(NONE_CHOICE));
        assert!(map.is_sentinel_only());
        assert!(!map.holds(&shadow));
        assert_eq!(map.resolve("/p/none.so"), None);
    }
}
