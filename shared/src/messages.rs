//! Named message maps used for risk warnings and recommendations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name -> message map with last-write-wins semantics
///
/// Two rules that emit under the same name overwrite each other; the later
/// rule's message is the one that survives. Keys are kept sorted so the
/// serialized form is stable across regenerations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedMessages(BTreeMap<String, String>);

impl NamedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the message stored under `name`
    pub fn put(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.insert(name.into(), message.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
