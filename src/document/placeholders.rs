//! Flat, fully resolved values handed to the template.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single template value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlaceholderValue {
    Text(String),
    /// Drives conditional sections.
    Flag(bool),
    /// Drives repeated sections, one instantiation per entry.
    List(Vec<PlaceholderMap>),
}

impl PlaceholderValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::List(_) => "list",
        }
    }
}

/// Tag name to value. Keys are unique; inserting an existing key replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlaceholderMap(BTreeMap<String, PlaceholderValue>);

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PlaceholderValue) {
        self.0.insert(key.into(), value);
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, PlaceholderValue::Text(value.into()));
    }

    pub fn insert_flag(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, PlaceholderValue::Flag(value));
    }

    pub fn insert_list(&mut self, key: impl Into<String>, items: Vec<PlaceholderMap>) {
        self.insert(key, PlaceholderValue::List(items));
    }

    pub fn get(&self, key: &str) -> Option<&PlaceholderValue> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PlaceholderValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(PlaceholderValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[PlaceholderMap]> {
        match self.0.get(key) {
            Some(PlaceholderValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut map = PlaceholderMap::new();
        map.insert_text("student_name", "سارة");
        map.insert_flag("hasSiblings", false);
        map.insert_list("siblings", Vec::new());

        assert_eq!(map.text("student_name"), Some("سارة"));
        assert_eq!(map.flag("hasSiblings"), Some(false));
        assert_eq!(map.list("siblings").map(|l| l.len()), Some(0));
        assert_eq!(map.text("hasSiblings"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_serializes_as_plain_json_object() {
        let mut child = PlaceholderMap::new();
        child.insert_text("name", "Ali");
        let mut map = PlaceholderMap::new();
        map.insert_flag("isAnnual", true);
        map.insert_list("contactPersons", vec![child]);

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["isAnnual"], true);
        assert_eq!(json["contactPersons"][0]["name"], "Ali");
    }
}
