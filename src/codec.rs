//! Conversion between timestamps and the 48-bit UUIDv7 timestamp prefix

use crate::{Error, Timestamp};
use chrono::TimeZone;
use fstr::FStr;
use std::{fmt, ops, str};

/// Number of hexadecimal digits in a [`Prefix`].
pub const PREFIX_LEN: usize = 12;

const MASK_48: u64 = (1 << 48) - 1;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// The 12 lowercase hexadecimal digits that encode the `unix_ts_ms` field of a UUIDv7.
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::{Prefix, Timestamp};
///
/// let p = "01890C1C-35F1-7000-9C9F-4237C55A8D19".parse::<Prefix>()?;
/// assert_eq!(p.as_str(), "01890c1c35f1");
/// assert_eq!(p.timestamp(), Timestamp::from_millis(0x0189_0c1c_35f1));
/// # Ok::<(), uuid7_prefix::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Prefix(FStr<PREFIX_LEN>);

impl Prefix {
    /// Creates a prefix from the low 48 bits of `bits`; upper bits are discarded.
    pub fn from_bits(bits: u64) -> Self {
        let bits = bits & MASK_48;
        let mut buffer = [0u8; PREFIX_LEN];
        for (i, e) in buffer.iter_mut().enumerate() {
            *e = DIGITS[((bits >> (4 * (PREFIX_LEN - 1 - i))) & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        Self(unsafe { FStr::from_inner_unchecked(buffer) })
    }

    /// Returns the 48-bit value as an unsigned integer.
    pub fn to_bits(&self) -> u64 {
        self.0
            .as_bytes()
            .iter()
            .fold(0, |acc, &e| (acc << 4) | hex_value(e) as u64)
    }

    /// Returns the timestamp encoded in this prefix.
    pub fn timestamp(&self) -> Timestamp {
        // never exceeds 48 bits, so always fits in i64
        Timestamp::from_millis(self.to_bits() as i64)
    }

    /// Returns the six big-endian bytes that occupy the head of a UUIDv7.
    pub fn to_be_bytes(&self) -> [u8; 6] {
        let mut dst = [0u8; 6];
        dst.copy_from_slice(&self.to_bits().to_be_bytes()[2..]);
        dst
    }

    /// Returns the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the first `len` digits, or the whole prefix if `len` exceeds its length.
    pub fn truncate(&self, len: usize) -> &str {
        &self.as_str()[..len.min(PREFIX_LEN)]
    }

    /// Splits the prefix after the first `len` digits, e.g. to highlight the significant part.
    pub fn split_at(&self, len: usize) -> (&str, &str) {
        self.as_str().split_at(len.min(PREFIX_LEN))
    }

    /// Parses the leading 12 hexadecimal digits of a UUID string or a bare prefix.
    ///
    /// Hyphens and braces are ignored anywhere in the input and letter case is insignificant, so
    /// both `01890c1c-35f1-...` and `{01890C1C35F1...}` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the input contains any other character, or
    /// [`Error::TooShort`] if it holds fewer than 12 hexadecimal digits.
    pub fn parse(src: &str) -> Result<Self, Error> {
        let mut head = [0u8; PREFIX_LEN];
        let mut len = 0;
        for c in src.bytes() {
            match c {
                b'-' | b'{' | b'}' => continue,
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                    if len < PREFIX_LEN {
                        head[len] = c.to_ascii_lowercase();
                    }
                    len += 1;
                }
                _ => return Err(Error::InvalidFormat),
            }
        }

        if len < PREFIX_LEN {
            return Err(Error::TooShort { len });
        }
        debug_assert!(head.is_ascii());
        Ok(Self(unsafe { FStr::from_inner_unchecked(head) }))
    }
}

/// Maps a lowercase hexadecimal digit to its value.
const fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => 0,
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for Prefix {
    type Err = Error;

    /// Equivalent to [`Prefix::parse()`].
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl ops::Deref for Prefix {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Timestamp> for Prefix {
    fn from(src: Timestamp) -> Self {
        encode_timestamp(src)
    }
}

impl From<Prefix> for String {
    fn from(src: Prefix) -> Self {
        src.as_str().to_owned()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Prefix};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Prefix {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> serde::Deserialize<'de> for Prefix {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(VisitorImpl)
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Prefix;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUIDv7 timestamp prefix")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Prefix;
        use serde_test::{assert_tokens, Token};

        /// Serializes and deserializes as a string
        #[test]
        fn serializes_and_deserializes_as_a_string() {
            let p = Prefix::from_bits(0x0189_0c1c_35f1);
            assert_tokens(&p, &[Token::Str("01890c1c35f1")]);
        }
    }
}

/// Encodes a timestamp into the 12-digit big-endian hexadecimal UUIDv7 prefix.
///
/// Only the low 48 bits of the two's complement representation are kept. Timestamps within
/// `0..=0xffff_ffff_ffff` round-trip through [`decode_timestamp()`]; values before the epoch or
/// after the year 10889 silently wrap around.
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::{encode_timestamp, Timestamp};
///
/// let p = encode_timestamp(Timestamp::from_millis(1_688_125_322_737));
/// assert_eq!(p.as_str(), "01890c1c35f1");
/// ```
pub fn encode_timestamp(t: Timestamp) -> Prefix {
    Prefix::from_bits(t.as_millis() as u64)
}

/// Decodes the timestamp embedded in the first 48 bits of a UUIDv7 string.
///
/// Input is normalized by dropping hyphens and braces and ignoring letter case; see
/// [`Prefix::parse()`] for the accepted forms and errors. The result ranges up to
/// [`Timestamp::MAX_UUIDV7`].
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::decode_timestamp;
///
/// let t = decode_timestamp("01890c1c-35f1-7000-9c9f-4237c55a8d19")?;
/// assert_eq!(t.to_string(), "2023-06-30T11:42:02.737Z");
/// # Ok::<(), uuid7_prefix::Error>(())
/// ```
pub fn decode_timestamp(src: &str) -> Result<Timestamp, Error> {
    Prefix::parse(src).map(|p| p.timestamp())
}

/// Date information extracted from user input, ready for display.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DateInfo {
    /// The decoded timestamp.
    pub timestamp: Timestamp,

    /// Rendering in the observer's time zone.
    pub local: String,

    /// ISO 8601 rendering in UTC.
    pub iso: String,
}

impl DateInfo {
    /// Decodes user input and renders the result in the system's local time zone.
    pub fn parse(src: &str) -> Result<Self, Error> {
        Self::parse_in(src, &chrono::Local)
    }

    /// Decodes user input and renders the result in `tz`.
    pub fn parse_in<Tz>(src: &str, tz: &Tz) -> Result<Self, Error>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let timestamp = decode_timestamp(src)?;
        // a 48-bit timestamp is always within chrono's range
        Ok(Self {
            timestamp,
            local: timestamp.format_in(tz),
            iso: timestamp.to_string(),
        })
    }
}
