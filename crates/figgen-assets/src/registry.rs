//! Named asset registry
//!
//! Maps icon names to absolute paths of the sliced transparent assets.
//! Created once per run during the icon stage and consumed read-only by
//! every later synthesis prompt; insertion order follows slot order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Icon name -> absolute asset path, in slot order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetRegistry {
    entries: IndexMap<String, PathBuf>,
}

impl AssetRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under `name`
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(name.into(), path.into());
    }

    /// Look up an asset path
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Iterate entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Number of registered assets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no assets
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut registry = AssetRegistry::new();
        registry.insert("Brain", "/run/assets/icon_0_Brain.png");
        registry.insert("Database", "/run/assets/icon_1_Database.png");
        let names: Vec<_> = registry.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Brain", "Database"]);
        assert!(registry.get("Brain").is_some());
        assert_eq!(registry.len(), 2);
    }
}
