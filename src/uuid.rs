use crate::{Error, Prefix, Timestamp};
use std::{fmt, ops, str};

const DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Represents a Universally Unique IDentifier.
///
/// Values produced by [`generate()`](crate::generate) follow the UUIDv7 layout, but any 128-bit
/// value can be held and inspected.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// The variant field of a UUID.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0b0xxx`: the reserved NCS-compatible variant, including the Nil UUID.
    Var0,

    /// `0b10xx`: the variant defined by RFC 9562, used by UUIDv7.
    Var10,

    /// `0b110x`: the reserved Microsoft-compatible variant.
    Var110,

    /// `0b111x`: reserved for future definition, including the Max UUID.
    VarReserved,
}

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Assembles a UUIDv7 from a timestamp prefix and 10 random bytes.
    ///
    /// Bytes 0-5 receive the prefix, the high nibble of byte 6 is set to the version `0111`, and
    /// the high two bits of byte 8 are set to the variant `10`. The remaining 74 bits are taken
    /// from `random`.
    pub fn from_prefix_v7(prefix: &Prefix, random: [u8; 10]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..6].copy_from_slice(&prefix.to_be_bytes());
        bytes[6..].copy_from_slice(&random);
        bytes[6] = 0x70 | (bytes[6] & 0x0f);
        bytes[8] = 0x80 | (bytes[8] & 0x3f);
        Self(bytes)
    }

    /// Returns the 48-bit timestamp prefix stored in the first six bytes.
    pub fn prefix(&self) -> Prefix {
        Prefix::from_bits(
            self.0[..6]
                .iter()
                .fold(0u64, |acc, &e| (acc << 8) | e as u64),
        )
    }

    /// Returns the timestamp stored in the first six bytes.
    pub fn timestamp(&self) -> Timestamp {
        self.prefix().timestamp()
    }

    /// Reports the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0x0..=0x7 => Variant::Var0,
            0x8..=0xb => Variant::Var10,
            0xc..=0xd => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field value of the UUID, or `None` if the UUID does not have the
    /// variant field value of `10`.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid7_prefix::Uuid;
    ///
    /// let x = "01890c1c-35f1-7000-9c9f-4237c55a8d19".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "01890c1c-35f1-7000-9c9f-4237c55a8d19");
    /// # Ok::<(), uuid7_prefix::Error>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        UuidStr(self.encode_hyphenated(DIGITS))
    }

    /// Returns the braced uppercase representation used by some platforms, e.g.
    /// `{01890C1C-35F1-7000-9C9F-4237C55A8D19}`.
    pub fn to_braced_upper(&self) -> String {
        let buffer = self.encode_hyphenated(UPPER_DIGITS);
        let mut dst = String::with_capacity(38);
        dst.push('{');
        dst.push_str(&UuidStr(buffer));
        dst.push('}');
        dst
    }

    fn encode_hyphenated(&self, digits: &[u8; 16]) -> [u8; 36] {
        let mut buffer = [0u8; 36];
        let mut j = 0;
        for (i, &e) in self.0.iter().enumerate() {
            buffer[j] = digits[(e >> 4) as usize];
            buffer[j + 1] = digits[(e & 15) as usize];
            j += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[j] = b'-';
                j += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        buffer
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from a textual representation.
    ///
    /// Hyphens and braces are stripped and letter case is ignored, so the canonical form, the
    /// braced uppercase form, and the bare 32-digit form all parse to the same value. Anything
    /// that does not leave exactly 32 hexadecimal digits is rejected with
    /// [`Error::InvalidFormat`].
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let mut dst = [0u8; 16];
        let mut n_digits = 0;
        for c in src.chars() {
            if c == '-' || c == '{' || c == '}' {
                continue;
            }
            let value = c.to_digit(16).ok_or(Error::InvalidFormat)? as u8;
            let e = dst.get_mut(n_digits / 2).ok_or(Error::InvalidFormat)?;
            *e = (*e << 4) | value;
            n_digits += 1;
        }
        if n_digits == 32 {
            Ok(Self(dst))
        } else {
            Err(Error::InvalidFormat)
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
