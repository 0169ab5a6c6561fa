//! Minigame registry
//!
//! Populated once at startup from a [`ModuleStorage`], read-only afterwards
//! apart from the "currently selected" pointer the session loop moves.

mod bundle;
mod resolver;
mod storage;

use hashbrown::HashMap;
use thiserror::Error;

use crate::minigame::MinigameDescriptor;

pub use bundle::{BundleStorage, EntryTable, MinigameManifest};
pub use resolver::{find_similar, levenshtein_distance};
pub use storage::{BuiltinStorage, ModuleStorage};

/// Registry failures
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The module storage could not be read. Startup cannot continue.
    #[error("minigame storage '{storage}' is unavailable")]
    StorageUnavailable {
        storage: String,
        #[source]
        source: std::io::Error,
    },

    /// Two modules registered the same id
    #[error("minigame '{0}' is registered more than once")]
    Duplicate(String),

    /// `load_all` was called on an already populated registry
    #[error("minigame registry is already loaded")]
    AlreadyLoaded,

    /// No descriptor has this exact id
    #[error("minigame '{name}' not found{}", format_suggestions(.suggestions))]
    NotFound {
        name: String,
        suggestions: Vec<String>,
    },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Id → descriptor mapping plus the current selection.
#[derive(Debug, Default)]
pub struct MinigameRegistry {
    /// Descriptors in registration order
    descriptors: Vec<MinigameDescriptor>,
    /// Id -> position in `descriptors`
    index: HashMap<String, usize>,
    loaded: bool,
    current: Option<usize>,
}

impl MinigameRegistry {
    /// Create an empty, unloaded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and populate it from `storage`.
    pub fn from_storage(storage: &dyn ModuleStorage) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load_all(storage)?;
        Ok(registry)
    }

    /// Register every module the storage provides.
    ///
    /// Returns the number of minigames registered. Fails if the storage is
    /// unreadable or two modules share an id; callers treat both as fatal.
    pub fn load_all(&mut self, storage: &dyn ModuleStorage) -> Result<usize, RegistryError> {
        if self.loaded {
            return Err(RegistryError::AlreadyLoaded);
        }

        let modules = storage
            .modules()
            .map_err(|source| RegistryError::StorageUnavailable {
                storage: storage.name().to_string(),
                source,
            })?;

        let mut descriptors = Vec::with_capacity(modules.len());
        let mut index = HashMap::with_capacity(modules.len());
        for descriptor in modules {
            if index.insert(descriptor.id.clone(), descriptors.len()).is_some() {
                return Err(RegistryError::Duplicate(descriptor.id));
            }
            tracing::debug!("Registered minigame '{}' ({})", descriptor.id, descriptor.name);
            descriptors.push(descriptor);
        }

        tracing::info!(
            "Loaded {} minigame(s) from {}",
            descriptors.len(),
            storage.name()
        );

        self.descriptors = descriptors;
        self.index = index;
        self.loaded = true;
        Ok(self.descriptors.len())
    }

    /// Make the minigame with exactly this id the current one.
    pub fn select(&mut self, name: &str) -> Result<&MinigameDescriptor, RegistryError> {
        let Some(&position) = self.index.get(name) else {
            return Err(RegistryError::NotFound {
                name: name.to_string(),
                suggestions: find_similar(name, &self.descriptors, |d| d.id.as_str()),
            });
        };
        self.current = Some(position);
        Ok(&self.descriptors[position])
    }

    /// The selected minigame, if a session is in progress.
    pub fn current(&self) -> Option<&MinigameDescriptor> {
        self.current.map(|position| &self.descriptors[position])
    }

    /// Drop the current selection (end of session).
    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Look up a descriptor without selecting it.
    pub fn get(&self, id: &str) -> Option<&MinigameDescriptor> {
        self.index.get(id).map(|&position| &self.descriptors[position])
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> &[MinigameDescriptor] {
        &self.descriptors
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
