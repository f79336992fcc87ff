//! Core library for roamd, the realm credential store daemon.
//!
//! Persists named provider records (credential/profile bundles for
//! auto-discovered network realms) in a forward- and backward-compatible
//! section/value text format, and drives the scan-only operating mode's
//! run state.

// Declare modules
pub mod clock;
pub mod codec;
pub mod error;
pub mod modes;
pub mod provider;
pub mod store;

// Re-export key public types/traits for easier use by the binary and tests
pub use clock::{Clock, SystemClock};
pub use codec::{SectionReader, SectionWriter, Value};
pub use error::{Error, Result};
pub use modes::{ModeCommand, ModeState, ScanModeManager};
pub use provider::{KeyMaterialStore, MemoryKeyStore, RealmConfig, RealmProvider};
pub use store::{
    MemoryProviderSource, ProviderDataSource, ProviderStoreData, StoreData, StoreFile,
    StoreManager,
};
