//! # Roamd Core Errors
//!
//! Crate-level error type aggregating the subsystem errors.
use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    /// Section/value format error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Store layer error
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
