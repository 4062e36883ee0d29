//! Fixed-width unsigned integer codec
//!
//! Reads and writes unsigned integers of 1 to 8 bytes at a buffer offset in
//! either byte order.

use std::fmt;
use std::str::FromStr;

use super::{Error, MAX_UINT_WIDTH, Result};

/// Byte order of a multi-byte integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Endianness {
    /// Most significant byte first
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

impl Endianness {
    /// Short spelling (`"BE"` / `"LE"`)
    #[must_use]
    pub const fn as_short_str(self) -> &'static str {
        match self {
            Self::Big => "BE",
            Self::Little => "LE",
        }
    }
}

impl FromStr for Endianness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BE" | "big" => Ok(Self::Big),
            "LE" | "little" => Ok(Self::Little),
            other => Err(Error::InvalidEndianness {
                found: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Big => "big",
            Self::Little => "little",
        };
        write!(f, "{name}")
    }
}

/// Check that `width` is a supported integer width
pub(crate) fn check_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_UINT_WIDTH {
        return Err(Error::InvalidWidth { width });
    }
    Ok(())
}

/// Largest value representable in `width` bytes
#[must_use]
pub fn max_uint(width: usize) -> u64 {
    if width >= MAX_UINT_WIDTH {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// Read an unsigned integer of `width` bytes at `offset`
///
/// # Errors
///
/// Returns an error if:
/// - `width` is outside `1..=8`
/// - `buffer` ends before `offset + width`
pub fn read_uint(buffer: &[u8], endian: Endianness, offset: usize, width: usize) -> Result<u64> {
    check_width(width)?;
    let end = offset + width;
    let src = buffer.get(offset..end).ok_or(Error::BufferTooSmall {
        needed: end,
        got: buffer.len(),
    })?;

    let mut raw = [0u8; MAX_UINT_WIDTH];
    let value = match endian {
        Endianness::Big => {
            raw[MAX_UINT_WIDTH - width..].copy_from_slice(src);
            u64::from_be_bytes(raw)
        }
        Endianness::Little => {
            raw[..width].copy_from_slice(src);
            u64::from_le_bytes(raw)
        }
    };
    Ok(value)
}

/// Write `value` as an unsigned integer of `width` bytes at `offset`
///
/// # Errors
///
/// Returns an error if:
/// - `width` is outside `1..=8`
/// - `value` does not fit in `width` bytes
/// - `buffer` ends before `offset + width`
pub fn write_uint(
    buffer: &mut [u8],
    value: u64,
    endian: Endianness,
    offset: usize,
    width: usize,
) -> Result<()> {
    check_width(width)?;
    if value > max_uint(width) {
        return Err(Error::ValueOutOfRange { value, width });
    }

    let end = offset + width;
    let got = buffer.len();
    let dst = buffer
        .get_mut(offset..end)
        .ok_or(Error::BufferTooSmall { needed: end, got })?;

    match endian {
        Endianness::Big => dst.copy_from_slice(&value.to_be_bytes()[MAX_UINT_WIDTH - width..]),
        Endianness::Little => dst.copy_from_slice(&value.to_le_bytes()[..width]),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endianness_spellings() {
        assert_eq!("BE".parse::<Endianness>().unwrap(), Endianness::Big);
        assert_eq!("big".parse::<Endianness>().unwrap(), Endianness::Big);
        assert_eq!("LE".parse::<Endianness>().unwrap(), Endianness::Little);
        assert_eq!("little".parse::<Endianness>().unwrap(), Endianness::Little);
    }

    #[test]
    fn test_invalid_endianness() {
        let result = "middle".parse::<Endianness>();
        assert!(matches!(result, Err(Error::InvalidEndianness { found }) if found == "middle"));

        // Spellings are case sensitive
        assert!("be".parse::<Endianness>().is_err());
    }

    #[test]
    fn test_write_uint_byte_order() {
        let mut buf = [0u8; 2];
        write_uint(&mut buf, 0x1234, Endianness::Big, 0, 2).unwrap();
        assert_eq!(buf, [0x12, 0x34]);

        write_uint(&mut buf, 0x1234, Endianness::Little, 0, 2).unwrap();
        assert_eq!(buf, [0x34, 0x12]);
    }

    #[test]
    fn test_read_uint_at_offset() {
        let buf = [0xFF, 0x00, 0x01, 0x02, 0xFF];
        assert_eq!(read_uint(&buf, Endianness::Big, 1, 3).unwrap(), 0x0102);
        assert_eq!(read_uint(&buf, Endianness::Little, 1, 3).unwrap(), 0x02_0100);
    }

    #[test]
    fn test_six_and_eight_byte_widths() {
        let mut buf = [0u8; 8];
        write_uint(&mut buf, 0x0102_0304_0506, Endianness::Little, 0, 6).unwrap();
        assert_eq!(&buf[..6], &[0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(read_uint(&buf, Endianness::Little, 0, 6).unwrap(), 0x0102_0304_0506);

        write_uint(&mut buf, u64::MAX, Endianness::Big, 0, 8).unwrap();
        assert_eq!(read_uint(&buf, Endianness::Big, 0, 8).unwrap(), u64::MAX);
    }

    #[test]
    fn test_value_out_of_range() {
        let mut buf = [0u8; 1];
        let result = write_uint(&mut buf, 256, Endianness::Big, 0, 1);
        assert!(matches!(
            result,
            Err(Error::ValueOutOfRange { value: 256, width: 1 })
        ));

        write_uint(&mut buf, 255, Endianness::Big, 0, 1).unwrap();
        assert_eq!(buf, [0xFF]);
    }

    #[test]
    fn test_invalid_width() {
        let buf = [0u8; 16];
        assert!(matches!(
            read_uint(&buf, Endianness::Big, 0, 0),
            Err(Error::InvalidWidth { width: 0 })
        ));
        assert!(matches!(
            read_uint(&buf, Endianness::Big, 0, 9),
            Err(Error::InvalidWidth { width: 9 })
        ));
    }

    #[test]
    fn test_read_past_end() {
        let buf = [0x01];
        let result = read_uint(&buf, Endianness::Big, 0, 2);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall { needed: 2, got: 1 })
        ));
    }
}
