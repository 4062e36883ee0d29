//! Schema codec core
//!
//! This module provides the field type capability, the type registry, schema
//! compilation, and the decode/encode traversal.

mod codec;
mod endian;
mod error;
mod field;
mod registry;
mod types;
mod value;

pub use codec::{Decoded, Schema};
pub use endian::{Endianness, max_uint, read_uint, write_uint};
pub use error::{Error, Result};
pub use field::{Field, FieldDef, FieldOptions, FieldType, Parsed, TypeRef};
pub use registry::{TypeRegistry, compile};
pub use types::{
    NUL, StringOptions, StringRead, StringType, UIntOptions, UIntType, read_string, write_string,
};
pub use value::{Record, Value};

/// Widest supported integer, in bytes
pub const MAX_UINT_WIDTH: usize = 8;
