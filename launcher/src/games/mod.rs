//! Built-in minigames
//!
//! Every minigame compiled into the launcher is listed here, both as a
//! [`BuiltinStorage`] and as bundle entries so manifests can refer to it.

use std::sync::atomic::{AtomicU64, Ordering};

use minigame_core::{BuiltinStorage, EntryTable, MinigameDescriptor};
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub mod pong;

/// Seed for the next session's RNG. Bumped on every use.
static NEXT_SEED: AtomicU64 = AtomicU64::new(0);

/// Seed the RNG sequence handed to minigames. Called once at startup.
pub fn seed_rng(seed: u64) {
    NEXT_SEED.store(seed, Ordering::Relaxed);
}

/// Fresh RNG for one session.
///
/// Sessions after the same `seed_rng` call get the same sequence of
/// generators, so a seeded run replays exactly.
pub fn session_rng() -> Pcg32 {
    Pcg32::seed_from_u64(NEXT_SEED.fetch_add(1, Ordering::Relaxed))
}

pub fn pong_descriptor() -> MinigameDescriptor {
    MinigameDescriptor::new("pong", "Pong", pong::Pong::boxed)
        .with_author("Aaron")
        .with_description("This is a game of Pong.")
        .with_instructions("Move your paddle with the joystick.")
}

/// All built-in minigames, in menu order.
pub fn builtin() -> BuiltinStorage {
    BuiltinStorage::new(vec![pong_descriptor()])
}

/// Entry names manifests can use.
pub fn entry_table() -> EntryTable {
    let mut entries = EntryTable::new();
    entries.register("pong", pong::Pong::boxed);
    entries
}

#[cfg(test)]
mod tests {
    use minigame_core::{MinigameRegistry, ModuleStorage};
    use rand::Rng;

    use super::*;

    #[test]
    fn test_builtin_contains_pong() {
        let registry = MinigameRegistry::from_storage(&builtin()).unwrap();
        let pong = registry.get("pong").unwrap();
        assert_eq!(pong.name, "Pong");
        assert_eq!(builtin().name(), "builtin");
    }

    #[test]
    fn test_entry_table_resolves_pong() {
        assert!(entry_table().get("pong").is_some());
        assert!(entry_table().get("tetris").is_none());
    }

    #[test]
    fn test_session_rng_differs_per_session() {
        seed_rng(1234);
        let a: u64 = session_rng().random();
        let b: u64 = session_rng().random();
        assert_ne!(a, b);
    }
}
