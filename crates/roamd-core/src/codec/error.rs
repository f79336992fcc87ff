//! # Roamd Core Codec Errors
//!
//! Defines error types specific to the section/value text codec.
//!
//! This module includes [`CodecError`], the primary enum encompassing
//! failures while lexing, reading, or writing the nested section/value
//! format: malformed lines, unbalanced sections, payload type mismatches,
//! and structurally unexpected sections.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed input at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("section end at line {line} without a matching start")]
    UnbalancedEnd { line: usize },

    #[error("input ended with {open} unclosed section(s)")]
    UnclosedSections { open: usize },

    #[error("unexpected end of input inside a section")]
    UnexpectedEof,

    #[error("value '{name}' is {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected section '{expected}', found '{found}'")]
    UnexpectedSection { expected: String, found: String },

    #[error("invalid section or value name '{0}'")]
    InvalidName(String),

    #[error("section end '{found}' does not match open section '{expected}'")]
    MismatchedSectionEnd { expected: String, found: String },

    #[error("section end requested with no open section")]
    NoOpenSection,
}

// Helper for creating Malformed errors without spelling the struct out at
// every call site.
impl CodecError {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        CodecError::Malformed {
            line,
            message: message.into(),
        }
    }
}
