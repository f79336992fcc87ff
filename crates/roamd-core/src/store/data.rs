//! Store framework seams: the dataset contract and the provider data
//! source callback interface.

use std::fmt::Debug;

use crate::codec::{SectionReader, SectionWriter};
use crate::provider::RealmProvider;
use crate::store::error::StoreError;

/// Which physical store file a dataset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFile {
    /// System-wide data, shared across users.
    SharedGeneral,
    /// Data scoped to the current user.
    UserGeneral,
}

impl StoreFile {
    pub const ALL: [StoreFile; 2] = [StoreFile::SharedGeneral, StoreFile::UserGeneral];

    pub fn file_name(&self) -> &'static str {
        match self {
            StoreFile::SharedGeneral => "shared_general.store",
            StoreFile::UserGeneral => "user_general.store",
        }
    }
}

/// One named dataset inside a store file.
///
/// Implementations own the encoding of their section's contents; the store
/// manager owns the file envelope around them.
pub trait StoreData: Send + Sync + Debug {
    /// Write this dataset's contents into the writer. The manager has
    /// already opened the dataset's named section.
    fn serialize(&self, out: &mut SectionWriter) -> Result<(), StoreError>;

    /// Read this dataset's contents. An absent source means there is
    /// nothing to load and must be a no-op, not an error.
    fn deserialize(
        &self,
        source: Option<&mut SectionReader>,
        outer_depth: usize,
    ) -> Result<(), StoreError>;

    /// Drop all in-memory data belonging to this dataset.
    fn reset(&self);

    /// Whether the next persistence cycle should re-serialize this dataset.
    fn has_pending_changes(&self) -> bool;

    /// Fixed section identifier this dataset is stored under.
    fn name(&self) -> &'static str;

    /// Which store file this dataset is persisted in.
    fn target_file(&self) -> StoreFile;
}

/// Callback interface through which the store exchanges the provider list
/// with its owner.
pub trait ProviderDataSource: Send {
    /// Snapshot of the current provider list, in order.
    fn get_providers(&self) -> Vec<RealmProvider>;

    /// Replace the provider list wholesale.
    fn set_providers(&mut self, providers: Vec<RealmProvider>);
}

/// Plain in-memory data source.
#[derive(Debug, Default)]
pub struct MemoryProviderSource {
    providers: Vec<RealmProvider>,
}

impl MemoryProviderSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProviderDataSource for MemoryProviderSource {
    fn get_providers(&self) -> Vec<RealmProvider> {
        self.providers.clone()
    }

    fn set_providers(&mut self, providers: Vec<RealmProvider>) {
        self.providers = providers;
    }
}
