//! # Roamd Core Store Errors
//!
//! Defines error types specific to the persistent store layer.
//!
//! This module includes [`StoreError`], covering structural parse failures
//! while decoding provider records (missing required fields, conflicting
//! legacy/current field shapes), store-file envelope problems, I/O with
//! operation and path context, and provisioning-profile rejection. Codec
//! failures pass through unchanged.
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("missing provider id")]
    MissingProviderId,

    #[error("missing realm configuration")]
    MissingConfiguration,

    #[error("record carries both CaCertificateAliases and the legacy CaCertificateAlias")]
    ConflictingAliasShapes,

    #[error("missing required value '{name}'")]
    MissingRequiredValue { name: &'static str },

    #[error("store file has no version value")]
    MissingVersion,

    #[error("store file has no envelope section")]
    MissingEnvelope,

    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid provisioning profile: {0}")]
    Provisioning(#[from] serde_json::Error),
}

// Helper for creating Io errors, ensuring path is always included.
impl StoreError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StoreError::Io {
            path,
            operation: operation.into(),
            source,
        }
    }
}
