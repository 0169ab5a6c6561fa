//! Manifest-driven module storage
//!
//! A bundle is a directory of `*.toml` minigame manifests. Each manifest
//! carries the menu metadata and names an `entry`, which is resolved against
//! an [`EntryTable`] of compiled-in factories:
//!
//! ```toml
//! id = "pong"
//! name = "Pong"
//! author = "Aaron"
//! description = "This is a game of Pong."
//! instructions = "Move your paddle with the joystick."
//! entry = "pong"
//! ```

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::Deserialize;

use super::storage::ModuleStorage;
use crate::minigame::{MinigameDescriptor, MinigameFactory};

/// On-disk description of one bundled minigame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinigameManifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    /// Key into the [`EntryTable`]
    pub entry: String,
}

/// Compiled-in factories that manifests can refer to by name.
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    factories: HashMap<String, MinigameFactory>,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: impl Into<String>, factory: MinigameFactory) {
        self.factories.insert(entry.into(), factory);
    }

    pub fn get(&self, entry: &str) -> Option<MinigameFactory> {
        self.factories.get(entry).copied()
    }
}

/// Directory of minigame manifests.
#[derive(Debug, Clone)]
pub struct BundleStorage {
    dir: PathBuf,
    entries: EntryTable,
    label: String,
}

impl BundleStorage {
    pub fn new(dir: impl Into<PathBuf>, entries: EntryTable) -> Self {
        let dir = dir.into();
        let label = format!("bundle {}", dir.display());
        Self {
            dir,
            entries,
            label,
        }
    }

    /// Parse one manifest file. Invalid manifests are logged and skipped.
    fn load_manifest(&self, path: &Path) -> Option<MinigameDescriptor> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let manifest: MinigameManifest = match toml::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!("Skipping {}: invalid manifest: {}", path.display(), e);
                return None;
            }
        };

        let Some(factory) = self.entries.get(&manifest.entry) else {
            tracing::warn!(
                "Skipping {}: no minigame entry named '{}'",
                path.display(),
                manifest.entry
            );
            return None;
        };

        Some(
            MinigameDescriptor::new(manifest.id, manifest.name, factory)
                .with_author(manifest.author)
                .with_description(manifest.description)
                .with_instructions(manifest.instructions),
        )
    }
}

impl ModuleStorage for BundleStorage {
    fn name(&self) -> &str {
        &self.label
    }

    fn modules(&self) -> std::io::Result<Vec<MinigameDescriptor>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("toml")
            })
            .collect();

        // read_dir order is platform dependent
        paths.sort();

        Ok(paths
            .iter()
            .filter_map(|path| self.load_manifest(path))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MinigameRegistry, RegistryError};
    use crate::test_utils::ProbeGame;

    fn entries() -> EntryTable {
        let mut entries = EntryTable::new();
        entries.register("probe", ProbeGame::boxed);
        entries
    }

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_scans_manifests_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "b_sumo.toml",
            r#"
id = "sumo"
name = "Sumo"
entry = "probe"
"#,
        );
        write(
            dir.path(),
            "a_pong.toml",
            r#"
id = "pong"
name = "Pong"
author = "Aaron"
description = "This is a game of Pong."
instructions = "Move your paddle with the joystick."
entry = "probe"
"#,
        );
        write(dir.path(), "README.txt", "not a manifest");

        let storage = BundleStorage::new(dir.path(), entries());
        let modules = storage.modules().unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id, "pong");
        assert_eq!(modules[0].author, "Aaron");
        assert_eq!(modules[0].instructions, "Move your paddle with the joystick.");
        assert_eq!(modules[1].id, "sumo");
        assert!(modules[1].author.is_empty());
    }

    #[test]
    fn test_skips_invalid_and_unknown_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.toml", "id = ");
        write(
            dir.path(),
            "missing_entry.toml",
            r#"
id = "ghost"
name = "Ghost"
entry = "does-not-exist"
"#,
        );
        write(
            dir.path(),
            "ok.toml",
            r#"
id = "ok"
name = "Ok"
entry = "probe"
"#,
        );

        let storage = BundleStorage::new(dir.path(), entries());
        let ids: Vec<String> = storage.modules().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, ["ok"]);
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BundleStorage::new(dir.path().join("nope"), entries());

        let err = MinigameRegistry::from_storage(&storage).unwrap_err();
        assert!(matches!(err, RegistryError::StorageUnavailable { .. }));
        assert!(err.to_string().contains("nope"));
    }
}
