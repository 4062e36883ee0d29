//! Built-in field types: `string` and `uint`

use bytes::{Bytes, BytesMut};

use super::endian::{check_width, read_uint, write_uint};
use super::{Endianness, Error, Field, FieldOptions, FieldType, Parsed, Result, Value};

/// String terminator byte
pub const NUL: u8 = 0x00;

/// Options for the `string` type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringOptions {
    /// Width of the length prefix; 0 means the string is null-terminated
    pub length_bytes: usize,
    /// Byte order of the length prefix
    pub length_endian: Endianness,
    /// Append a terminator byte when encoding
    pub nul: bool,
}

impl StringOptions {
    /// Null-terminated string with the terminator written on encode
    #[must_use]
    pub const fn null_terminated() -> Self {
        Self {
            length_bytes: 0,
            length_endian: Endianness::Big,
            nul: true,
        }
    }

    /// String preceded by a big-endian length prefix of `length_bytes`
    #[must_use]
    pub const fn prefixed(length_bytes: usize) -> Self {
        Self {
            length_bytes,
            length_endian: Endianness::Big,
            nul: false,
        }
    }

    /// Set the byte order of the length prefix
    #[must_use]
    pub const fn length_endian(mut self, endian: Endianness) -> Self {
        self.length_endian = endian;
        self
    }

    /// Set whether a terminator is appended on encode
    #[must_use]
    pub const fn nul(mut self, nul: bool) -> Self {
        self.nul = nul;
        self
    }
}

/// Options for the `uint` type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UIntOptions {
    /// Integer width in bytes
    pub bytes: usize,
    /// Byte order
    pub endian: Endianness,
}

impl UIntOptions {
    /// Big-endian integer of `bytes` width
    #[must_use]
    pub const fn new(bytes: usize) -> Self {
        Self {
            bytes,
            endian: Endianness::Big,
        }
    }

    /// Set the byte order
    #[must_use]
    pub const fn endian(mut self, endian: Endianness) -> Self {
        self.endian = endian;
        self
    }
}

/// Result of reading a string field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRead {
    /// Decoded text, terminator excluded
    pub text: String,
    /// Bytes consumed: prefix + payload, plus the terminator when the
    /// string has no prefix and one was found
    pub length: usize,
    /// Whether a terminator byte ended the text
    pub terminated: bool,
}

/// Read a string from the front of `buf`
///
/// With a length prefix exactly the announced number of payload bytes is
/// consumed (or what remains, if less), embedded terminator bytes included.
/// When `nul` is set a single trailing terminator inside that payload is
/// stripped from the text. Without a prefix the payload runs up to the
/// first terminator byte, which is consumed, or to the end of `buf`.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is shorter than the length prefix
/// - The payload is not valid UTF-8
pub fn read_string(options: &StringOptions, buf: &[u8]) -> Result<StringRead> {
    let prefix = options.length_bytes;
    if prefix > 0 {
        let announced = read_uint(buf, options.length_endian, 0, prefix)?;
        let body = &buf[prefix..];
        let announced = usize::try_from(announced).unwrap_or(usize::MAX);
        let payload = &body[..announced.min(body.len())];

        let (text, terminated) = match payload.split_last() {
            Some((&NUL, head)) if options.nul => (head, true),
            _ => (payload, false),
        };
        return Ok(StringRead {
            length: prefix + payload.len(),
            text: String::from_utf8(text.to_vec())?,
            terminated,
        });
    }

    let (payload, terminated) = match buf.iter().position(|&b| b == NUL) {
        Some(end) => (&buf[..end], true),
        None => (buf, false),
    };

    Ok(StringRead {
        length: payload.len() + usize::from(terminated),
        text: String::from_utf8(payload.to_vec())?,
        terminated,
    })
}

/// Encode `text` as a string field
///
/// The output is exactly prefix bytes + payload bytes long, where the
/// payload includes the terminator when `nul` is set.
///
/// # Errors
///
/// Returns [`Error::ValueOutOfRange`] if the payload length does not fit in
/// the length prefix.
pub fn write_string(options: &StringOptions, text: &str) -> Result<Bytes> {
    let prefix = options.length_bytes;
    let payload_len = text.len() + usize::from(options.nul);

    // Terminator, when requested, is the trailing zero left by `zeroed`.
    let mut buf = BytesMut::zeroed(prefix + payload_len);
    if prefix > 0 {
        write_uint(&mut buf, payload_len as u64, options.length_endian, 0, prefix)?;
    }
    buf[prefix..prefix + text.len()].copy_from_slice(text.as_bytes());

    Ok(buf.freeze())
}

/// Built-in `string` type
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl StringType {
    /// Registry name
    pub const NAME: &'static str = "string";

    fn options(field: &Field) -> Result<StringOptions> {
        match field.options() {
            FieldOptions::String(options) => Ok(*options),
            FieldOptions::None => Ok(StringOptions::default()),
            FieldOptions::UInt(_) | FieldOptions::Custom(_) => Err(Error::InvalidOptions {
                field_type: Self::NAME.to_owned(),
            }),
        }
    }
}

impl FieldType for StringType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, field: &Field) -> Result<()> {
        let options = Self::options(field)?;
        if options.length_bytes > 0 {
            check_width(options.length_bytes)?;
        }
        Ok(())
    }

    fn parse(&self, field: &Field, buf: &[u8]) -> Result<Parsed> {
        let read = read_string(&Self::options(field)?, buf)?;
        Ok(Parsed::new(read.length, read.text))
    }

    fn encode(&self, field: &Field, value: &Value) -> Result<Bytes> {
        let Value::Text(text) = value else {
            return Err(Error::TypeMismatch {
                field: field.label(),
                expected: "text",
                found: value.kind(),
            });
        };
        write_string(&Self::options(field)?, text)
    }
}

/// Built-in `uint` type
#[derive(Debug, Clone, Copy, Default)]
pub struct UIntType;

impl UIntType {
    /// Registry name
    pub const NAME: &'static str = "uint";

    fn options(field: &Field) -> Result<UIntOptions> {
        match field.options() {
            FieldOptions::UInt(options) => Ok(*options),
            FieldOptions::None | FieldOptions::String(_) | FieldOptions::Custom(_) => {
                Err(Error::InvalidOptions {
                    field_type: Self::NAME.to_owned(),
                })
            }
        }
    }
}

impl FieldType for UIntType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, field: &Field) -> Result<()> {
        check_width(Self::options(field)?.bytes)
    }

    fn parse(&self, field: &Field, buf: &[u8]) -> Result<Parsed> {
        let options = Self::options(field)?;
        let value = read_uint(buf, options.endian, 0, options.bytes)?;
        Ok(Parsed::new(options.bytes, value))
    }

    fn encode(&self, field: &Field, value: &Value) -> Result<Bytes> {
        let Value::UInt(v) = value else {
            return Err(Error::TypeMismatch {
                field: field.label(),
                expected: "uint",
                found: value.kind(),
            });
        };
        let options = Self::options(field)?;
        let mut buf = BytesMut::zeroed(options.bytes);
        write_uint(&mut buf, *v, options.endian, 0, options.bytes)?;
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_string_encode() {
        let bytes = write_string(&StringOptions::prefixed(1), "hi").unwrap();
        assert_eq!(bytes.as_ref(), &[0x02, b'h', b'i']);
    }

    #[test]
    fn test_prefixed_string_decode() {
        let read = read_string(&StringOptions::prefixed(1), &[0x02, b'h', b'i']).unwrap();
        assert_eq!(read.text, "hi");
        assert_eq!(read.length, 3);
        assert!(!read.terminated);
    }

    #[test]
    fn test_null_terminated_string() {
        let options = StringOptions::null_terminated();
        let bytes = write_string(&options, "ok").unwrap();
        assert_eq!(bytes.as_ref(), b"ok\0");

        let read = read_string(&options, &bytes).unwrap();
        assert_eq!(read.text, "ok");
        assert!(read.terminated);
        assert_eq!(read.length, 3);
    }

    #[test]
    fn test_consumed_length_counts_prefix_and_payload() {
        // 2-byte prefix announcing 5, payload carries an embedded terminator
        let buf = [0x00, 0x05, b'a', b'b', b'c', 0x00, b'z', 0xFF];
        let read = read_string(&StringOptions::prefixed(2), &buf).unwrap();
        assert_eq!(read.text, "abc\0z");
        assert!(!read.terminated);
        assert_eq!(read.length, 2 + 5);
    }

    #[test]
    fn test_consumed_length_counts_terminator_without_prefix() {
        let buf = [b'a', b'b', b'c', 0x00, b'z'];
        let read = read_string(&StringOptions::default(), &buf).unwrap();
        assert_eq!(read.text, "abc");
        assert!(read.terminated);
        assert_eq!(read.length, 3 + 1);
    }

    #[test]
    fn test_prefixed_string_keeps_embedded_terminator() {
        let options = StringOptions::prefixed(1);
        let bytes = write_string(&options, "a\0b").unwrap();
        assert_eq!(bytes.as_ref(), &[3, b'a', 0x00, b'b']);

        let read = read_string(&options, &bytes).unwrap();
        assert_eq!(read.text, "a\0b");
        assert_eq!(read.length, 4);
    }

    #[test]
    fn test_prefixed_string_with_terminator_roundtrip() {
        let options = StringOptions::prefixed(1).nul(true);
        let bytes = write_string(&options, "hi").unwrap();
        assert_eq!(bytes.as_ref(), &[3, b'h', b'i', 0x00]);

        let read = read_string(&options, &bytes).unwrap();
        assert_eq!(read.text, "hi");
        assert!(read.terminated);
        assert_eq!(read.length, 4);
    }

    #[test]
    fn test_encoded_size_is_prefix_plus_payload() {
        let options = StringOptions::prefixed(2).nul(true);
        let bytes = write_string(&options, "hello").unwrap();
        assert_eq!(bytes.len(), 2 + 5 + 1);
        assert_eq!(&bytes[..2], &[0x00, 0x06]);
        assert_eq!(bytes[7], NUL);

        let multibyte = write_string(&StringOptions::prefixed(1), "é").unwrap();
        assert_eq!(multibyte.as_ref(), &[0x02, 0xC3, 0xA9]);
    }

    #[test]
    fn test_prefixed_string_ignores_trailing_terminator() {
        let buf = [0x02, b'h', b'i', 0x00];
        let read = read_string(&StringOptions::prefixed(1), &buf).unwrap();
        assert_eq!(read.length, 3);
        assert!(!read.terminated);
    }

    #[test]
    fn test_unterminated_string_reads_to_end() {
        let read = read_string(&StringOptions::default(), b"tail").unwrap();
        assert_eq!(read.text, "tail");
        assert_eq!(read.length, 4);
        assert!(!read.terminated);
    }

    #[test]
    fn test_empty_strings() {
        let read = read_string(&StringOptions::prefixed(1), &[0x00]).unwrap();
        assert_eq!(read.text, "");
        assert_eq!(read.length, 1);

        let read = read_string(&StringOptions::default(), &[0x00, b'x']).unwrap();
        assert_eq!(read.text, "");
        assert_eq!(read.length, 1);
        assert!(read.terminated);

        let read = read_string(&StringOptions::default(), &[]).unwrap();
        assert_eq!(read.length, 0);
    }

    #[test]
    fn test_little_endian_prefix() {
        let options = StringOptions::prefixed(2).length_endian(Endianness::Little);
        let bytes = write_string(&options, "ab").unwrap();
        assert_eq!(bytes.as_ref(), &[0x02, 0x00, b'a', b'b']);
        assert_eq!(read_string(&options, &bytes).unwrap().text, "ab");
    }

    #[test]
    fn test_prefix_longer_than_buffer_is_clamped() {
        let read = read_string(&StringOptions::prefixed(1), &[0x09, b'a', b'b']).unwrap();
        assert_eq!(read.text, "ab");
        assert_eq!(read.length, 3);
    }

    #[test]
    fn test_prefix_overflow() {
        let long = "x".repeat(256);
        let result = write_string(&StringOptions::prefixed(1), &long);
        assert!(matches!(result, Err(Error::ValueOutOfRange { value: 256, width: 1 })));
    }

    #[test]
    fn test_invalid_utf8() {
        let result = read_string(&StringOptions::default(), &[0xFF, 0xFE]);
        assert!(matches!(result, Err(Error::InvalidUtf8(_))));
    }
}
