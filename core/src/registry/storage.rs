//! Module storage abstraction
//!
//! A storage is wherever the bundled minigames live. The registry asks it
//! for descriptors exactly once at startup.

use crate::minigame::MinigameDescriptor;

/// Source of bundled minigame descriptors.
pub trait ModuleStorage {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Every minigame this storage holds, in a stable order.
    ///
    /// An `Err` means the storage itself could not be read.
    fn modules(&self) -> std::io::Result<Vec<MinigameDescriptor>>;
}

/// Minigames compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct BuiltinStorage {
    descriptors: Vec<MinigameDescriptor>,
}

impl BuiltinStorage {
    pub fn new(descriptors: Vec<MinigameDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl ModuleStorage for BuiltinStorage {
    fn name(&self) -> &str {
        "builtin"
    }

    fn modules(&self) -> std::io::Result<Vec<MinigameDescriptor>> {
        Ok(self.descriptors.clone())
    }
}
