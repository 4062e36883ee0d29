//! Schema codec error types

use thiserror::Error;

/// Errors raised while compiling a schema or running a decode/encode pass
#[derive(Error, Debug)]
pub enum Error {
    /// Definition references a type name the registry does not know
    #[error("unknown field type: {name:?}")]
    UnknownFieldType {
        /// Unresolved type name
        name: String,
    },

    /// Byte order spelling is neither big nor little
    #[error("invalid endianness: {found:?} (expected \"BE\", \"big\", \"LE\" or \"little\")")]
    InvalidEndianness {
        /// Rejected spelling
        found: String,
    },

    /// Integer does not fit in the configured width
    #[error("value {value} does not fit in {width} byte(s)")]
    ValueOutOfRange {
        /// Value being encoded
        value: u64,
        /// Configured width in bytes
        width: usize,
    },

    /// Integer width outside the supported range
    #[error("invalid integer width: {width} byte(s) (supported 1..=8)")]
    InvalidWidth {
        /// Requested width in bytes
        width: usize,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Value kind does not match what the field type encodes
    #[error("type mismatch for field {field:?}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Field name, or the type name for unnamed fields
        field: String,
        /// Expected value kind
        expected: &'static str,
        /// Value kind that was supplied
        found: &'static str,
    },

    /// Neither the record nor the descriptor default supplies a value
    #[error("no value for field {field:?}")]
    MissingValue {
        /// Field name, or the type name for unnamed fields
        field: String,
    },

    /// Options variant belongs to a different field type
    #[error("options do not apply to field type {field_type:?}")]
    InvalidOptions {
        /// Type that rejected the options
        field_type: String,
    },

    /// Registration would silently replace an existing type
    #[error("field type {name:?} is already registered")]
    DuplicateFieldType {
        /// Name already taken
        name: String,
    },

    /// Invalid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
