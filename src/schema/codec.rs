//! Schema-driven decode/encode traversal
//!
//! Both directions walk the compiled descriptors in order; there is no
//! field reordering.

use std::sync::{Arc, Weak};

use bytes::{Bytes, BytesMut};
use tracing::{instrument, trace};

use super::{Error, Field, FieldType, Parsed, Record, Result, Value};

/// Compiled, immutable field layout
///
/// Cloning is cheap and clones share the same descriptors. A schema is also
/// a [`FieldType`], so it can be embedded as a field of a larger definition.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Arc<[Field]>,
}

/// Decode result carrying the number of bytes consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded record
    pub data: Record,
    /// Bytes consumed from the input
    pub length: usize,
}

impl Schema {
    pub(crate) fn from_fields(fields: Arc<[Field]>) -> Self {
        Self { fields }
    }

    pub(crate) fn downgrade(&self) -> Weak<[Field]> {
        Arc::downgrade(&self.fields)
    }

    /// Descriptors in wire order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no descriptors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First descriptor surfaced under `name`
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == Some(name))
    }

    /// Whether both handles share the same compiled descriptors
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    /// Decode a record from the front of `buf`
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by a field type.
    pub fn decode(&self, buf: &[u8]) -> Result<Record> {
        self.decode_with_length(buf).map(|decoded| decoded.data)
    }

    /// Decode a record and report how many bytes it occupied
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field type fails to parse
    /// - A field type reports consuming more bytes than remain
    #[instrument(level = "trace", skip_all, fields(len = buf.len()))]
    pub fn decode_with_length(&self, buf: &[u8]) -> Result<Decoded> {
        let mut record = Record::for_schema(self);
        let mut cursor = 0;

        for field in self.fields.iter() {
            let ty = field.field_type();
            let mut repetitions = 0u32;

            loop {
                let Parsed { length, value } = ty.parse(field, &buf[cursor..])?;
                if length > buf.len() - cursor {
                    return Err(Error::BufferTooSmall {
                        needed: cursor + length,
                        got: buf.len(),
                    });
                }
                trace!(field = %field.label(), offset = cursor, length, "decoded field");

                if let Some(name) = field.name() {
                    if field.is_repeated() {
                        record.append(name, value);
                    } else {
                        record.insert(name, value);
                    }
                }
                cursor += length;

                // A zero-length read would repeat forever without progress.
                if repetitions >= field.repeated() || cursor >= buf.len() || length == 0 {
                    break;
                }
                repetitions += 1;
            }
        }

        Ok(Decoded {
            data: record,
            length: cursor,
        })
    }

    /// Encode `record` into a freshly allocated buffer
    ///
    /// Each field takes its value from the record, falling back to the
    /// descriptor default. A list value is encoded element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field has neither a record entry nor a default
    /// - A field type rejects its value
    #[instrument(level = "trace", skip_all, fields(count = self.fields.len()))]
    pub fn encode(&self, record: &Record) -> Result<Bytes> {
        let mut out = BytesMut::new();

        for field in self.fields.iter() {
            let ty = field.field_type();
            let value = field
                .name()
                .and_then(|name| record.get(name))
                .or_else(|| field.default_value())
                .ok_or_else(|| Error::MissingValue {
                    field: field.label(),
                })?;

            let start = out.len();
            match value {
                Value::List(items) => {
                    for item in items {
                        out.extend_from_slice(&ty.encode(field, item)?);
                    }
                }
                single => out.extend_from_slice(&ty.encode(field, single)?),
            }
            trace!(field = %field.label(), offset = start, length = out.len() - start, "encoded field");
        }

        Ok(out.freeze())
    }
}

impl FieldType for Schema {
    fn name(&self) -> &str {
        "schema"
    }

    fn parse(&self, _field: &Field, buf: &[u8]) -> Result<Parsed> {
        let Decoded { data, length } = self.decode_with_length(buf)?;
        Ok(Parsed::new(length, data))
    }

    fn encode(&self, field: &Field, value: &Value) -> Result<Bytes> {
        let Value::Record(record) = value else {
            return Err(Error::TypeMismatch {
                field: field.label(),
                expected: "record",
                found: value.kind(),
            });
        };
        Schema::encode(self, record)
    }
}
