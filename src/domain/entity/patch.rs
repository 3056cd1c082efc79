//! Partial update payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field-level changes applied by an update operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field change
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_builder() {
        let patch = Patch::new().set("title", "T").set("priority", 3);

        assert_eq!(patch.get("title"), Some(&Value::from("T")));
        assert_eq!(patch.get("priority"), Some(&Value::from(3)));
        assert_eq!(patch.fields().collect::<Vec<_>>(), vec!["priority", "title"]);
    }

    #[test]
    fn test_patch_serializes_as_object() {
        let patch = Patch::new().set("title", "T");
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"title":"T"}"#);
    }
}
