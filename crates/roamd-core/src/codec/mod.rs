//! Nested section/value text codec.
//!
//! The persisted store format is a line-oriented tree: named sections nest
//! (`Name {` ... `}`), named typed values are leaves (`Key = i64(42)`), and
//! depth must balance. The reader is a hand-written pull parser over a
//! token cursor; the writer mirrors it and is byte-deterministic so that
//! re-encoding unchanged data yields identical files.

pub mod error;
pub mod reader;
pub mod value;
pub mod writer;

/// Re-export key types
pub use error::CodecError;
pub use reader::{Element, SectionReader};
pub use value::Value;
pub use writer::SectionWriter;

/// Section and value names are a single bare word on the wire.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// Test module declaration
#[cfg(test)]
mod tests;
