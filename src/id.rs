use core::{fmt, str};

/// Represents a 16-byte Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates a UUID from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
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

    /// Returns the version field value of the UUID or `None` if the UUID does not have the
    /// RFC 4122 variant field value.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use int_to_uuid::Uuid;
    ///
    /// let x = "2d7d6ac6-7a63-8f6e-a62d-0e0c32bd19bd".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "2d7d6ac6-7a63-8f6e-a62d-0e0c32bd19bd");
    /// assert_eq!(format!("{}", y), "2d7d6ac6-7a63-8f6e-a62d-0e0c32bd19bd");
    /// # Ok::<(), int_to_uuid::ParseError>(())
    /// ```
    pub fn encode(&self) -> fstr::FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [b'-'; 36];
        let mut cursor = 0;
        for (i, e) in self.0.iter().enumerate() {
            buffer[cursor] = DIGITS[usize::from(e >> 4)];
            buffer[cursor + 1] = DIGITS[usize::from(e & 15)];
            cursor += if matches!(i, 3 | 5 | 7 | 9) { 3 } else { 2 };
        }

        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte written is an ASCII hex digit or hyphen
        unsafe { fstr::FStr::from_bytes_unchecked(buffer) }
    }

    /// Parses the 8-4-4-4-12 hexadecimal representation from raw ASCII bytes.
    ///
    /// Both lower- and upper-case hexadecimal digits are accepted.
    pub fn parse_ascii(src: &[u8]) -> Result<Self, ParseError> {
        const ERR: ParseError = ParseError {};
        if src.len() != 36 {
            return Err(ERR);
        }

        let mut dst = [0u8; 16];
        let mut iter = src.iter().copied();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().and_then(hex_digit).ok_or(ERR)?;
            let lo = iter.next().and_then(hex_digit).ok_or(ERR)?;
            *e = (hi << 4) | lo;
            if matches!(i, 3 | 5 | 7 | 9) && iter.next() != Some(b'-') {
                return Err(ERR);
            }
        }
        Ok(Self(dst))
    }
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Represents the variant field of a UUID.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// The variant field value `0b0xxx` reserved for NCS backward compatibility, which also
    /// covers the Nil UUID.
    Var0,

    /// The variant field value `0b10xx` specified by RFC 4122.
    Var10,

    /// The variant field value `0b110x` reserved for Microsoft backward compatibility.
    Var110,

    /// The variant field value `0b111x` reserved for future definition, which also covers the Max
    /// UUID.
    VarReserved,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_ascii(src.as_bytes())
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

/// Error parsing an invalid string representation of UUID.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("invalid string representation")]
pub struct ParseError {}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{ParseError, Uuid};

    impl From<Uuid> for String {
        fn from(src: Uuid) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Uuid {
        type Error = ParseError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
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
                deserializer.deserialize_str(UuidVisitor)
            } else {
                deserializer.deserialize_bytes(UuidVisitor)
            }
        }
    }

    struct UuidVisitor;

    impl de::Visitor<'_> for UuidVisitor {
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
                .map_err(|_| de::Error::invalid_length(value.len(), &self))
        }
    }

}
