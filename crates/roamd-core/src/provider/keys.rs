//! Seam to the keyed secure-material store.
//!
//! Providers reference certificates and keys by opaque alias strings only;
//! nothing in this crate ever dereferences an alias into key material.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Mutex;

pub trait KeyMaterialStore: Send + Sync + Debug {
    /// Whether material is installed under this alias.
    fn contains_alias(&self, alias: &str) -> bool;

    /// Remove the material under this alias. Returns whether anything was
    /// removed.
    fn remove_alias(&self, alias: &str) -> bool;
}

/// In-memory alias store, for tests and tooling that never touches real
/// key material.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    aliases: Mutex<HashSet<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_alias(&self, alias: impl Into<String>) {
        self.lock().insert(alias.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set of plain strings is still usable.
        self.aliases.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyMaterialStore for MemoryKeyStore {
    fn contains_alias(&self, alias: &str) -> bool {
        self.lock().contains(alias)
    }

    fn remove_alias(&self, alias: &str) -> bool {
        self.lock().remove(alias)
    }
}
