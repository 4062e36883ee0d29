//! Buffproto - schema-driven binary codec
//!
//! A definition is an ordered list of fields. Compiling it yields a
//! [`Schema`] that decodes raw bytes into a [`Record`] and encodes records
//! back, for fixed-layout formats built from length-prefixed or
//! null-terminated strings and fixed-width integers in either byte order.
//!
//! # Quick Start
//!
//! ```rust
//! use buffproto::{FieldDef, Record, StringOptions, UIntOptions, compile};
//!
//! let schema = compile(&[
//!     FieldDef::new("uint").named("id").options(UIntOptions::new(2)),
//!     FieldDef::new("string").named("name").options(StringOptions::prefixed(1)),
//! ])?;
//!
//! let record = Record::new().with("id", 7u16).with("name", "hi");
//! let bytes = schema.encode(&record)?;
//! assert_eq!(bytes.as_ref(), &[0x00, 0x07, 0x02, b'h', b'i']);
//!
//! let decoded = schema.decode(&bytes)?;
//! assert_eq!(decoded, record);
//! # Ok::<(), buffproto::Error>(())
//! ```
//!
//! # Extending
//!
//! New data kinds implement [`FieldType`] and are added to a
//! [`TypeRegistry`], which then compiles definitions that name them. A
//! compiled [`Schema`] is itself a field type and can be nested.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod schema;

pub use schema::{
    Decoded, Endianness, Error, Field, FieldDef, FieldOptions, FieldType, Parsed, Record,
    Result, Schema, StringOptions, TypeRef, TypeRegistry, UIntOptions, Value, compile,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
