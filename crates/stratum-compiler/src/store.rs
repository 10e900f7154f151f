//! Material keyword storage
//!
//! The persisted form of a material configuration is its feature set. The
//! compiler reads through [`KeywordStore`] so hosts can back it with whatever
//! asset database they have.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stratum_features::{FeatureSet, Result};

/// Material id to feature set mapping
pub trait KeywordStore {
    fn get(&self, material_id: &str) -> Option<FeatureSet>;
    fn set(&mut self, material_id: &str, features: FeatureSet);
    fn remove(&mut self, material_id: &str) -> Option<FeatureSet>;
}

/// In-memory store, serializable as one JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryKeywordStore {
    materials: BTreeMap<String, FeatureSet>,
}

impl MemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn material_ids(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(|id| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl KeywordStore for MemoryKeywordStore {
    fn get(&self, material_id: &str) -> Option<FeatureSet> {
        self.materials.get(material_id).cloned()
    }

    fn set(&mut self, material_id: &str, features: FeatureSet) {
        self.materials.insert(material_id.to_string(), features);
    }

    fn remove(&mut self, material_id: &str) -> Option<FeatureSet> {
        self.materials.remove(material_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut store = MemoryKeywordStore::new();
        store.set("rock", ["_MAX8TEXTURES", "_TESSDISTANCE"].into_iter().collect());
        store.set("sand", FeatureSet::new());

        let json = store.to_json().unwrap();
        let restored = MemoryKeywordStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.material_ids().collect::<Vec<_>>(), vec!["rock", "sand"]);
    }

    #[test]
    fn test_json_duplicates_collapse() {
        let store = MemoryKeywordStore::from_json(r#"{ "rock": ["_WORLDUV", "_WORLDUV"] }"#).unwrap();
        assert_eq!(store.get("rock").map(|f| f.len()), Some(1));
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryKeywordStore::new();
        store.set("rock", FeatureSet::new());
        assert!(store.remove("rock").is_some());
        assert!(store.get("rock").is_none());
        assert!(store.is_empty());
    }
}
