//! Namespaced integer identifier.

use core::str;

use crate::error::{Error, Field};
use crate::{codec, Uuid};

/// Represents an integer identifier scoped by a namespace.
///
/// Instances are obtainable only through [`IntegerId::make`] (or conversions that go through it),
/// so both fields always lie within their inclusive domains.
///
/// # Examples
///
/// ```rust
/// use int_to_uuid::IntegerId;
///
/// let id = IntegerId::make(12345, 1155)?;
/// assert_eq!((id.value(), id.namespace()), (12345, 1155));
///
/// let uuid = id.to_uuid();
/// assert_eq!(uuid.version(), Some(8));
/// assert_eq!(uuid.to_string().parse::<IntegerId>(), Ok(id));
///
/// assert!(IntegerId::make(-1, 123).is_err());
/// # Ok::<(), int_to_uuid::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct IntegerId {
    value: u64,
    namespace: u32,
}

impl IntegerId {
    /// The smallest accepted value.
    pub const ID_MIN: u64 = 0;

    /// The largest accepted value, which is the largest signed 64-bit integer.
    pub const ID_MAX: u64 = i64::MAX as u64;

    /// The smallest accepted namespace.
    pub const NAMESPACE_MIN: u32 = 0;

    /// The largest accepted namespace.
    pub const NAMESPACE_MAX: u32 = u32::MAX;

    /// Creates an identifier after checking that `value` and `namespace` lie within their
    /// inclusive domains.
    ///
    /// Any integer type that converts losslessly into `i128` is accepted, so negative and
    /// oversize inputs are reported as [`Error::Range`] instead of being truncated. The value is
    /// checked before the namespace.
    pub fn make(value: impl Into<i128>, namespace: impl Into<i128>) -> Result<Self, Error> {
        let value = check_range(Field::Value, value.into(), Self::ID_MIN, Self::ID_MAX)?;
        let namespace = check_range(
            Field::Namespace,
            namespace.into(),
            Self::NAMESPACE_MIN.into(),
            Self::NAMESPACE_MAX.into(),
        )?;

        Ok(Self {
            value,
            namespace: u32::try_from(namespace).map_err(|_| Error::Internal)?,
        })
    }

    /// Creates an identifier in the default namespace `0`.
    pub fn from_value(value: impl Into<i128>) -> Result<Self, Error> {
        Self::make(value, Self::NAMESPACE_MIN)
    }

    /// Returns the integer value.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the namespace.
    pub const fn namespace(&self) -> u32 {
        self.namespace
    }

    /// Encodes the identifier as a version 8 UUID.
    pub fn to_uuid(&self) -> Uuid {
        codec::encode(self)
    }
}

fn check_range(field: Field, value: i128, min: u64, max: u64) -> Result<u64, Error> {
    if value < i128::from(min) || value > i128::from(max) {
        return Err(Error::Range {
            field,
            min,
            max,
            value,
        });
    }
    u64::try_from(value).map_err(|_| Error::Internal)
}

impl From<IntegerId> for Uuid {
    fn from(src: IntegerId) -> Self {
        codec::encode(&src)
    }
}

impl TryFrom<Uuid> for IntegerId {
    type Error = Error;

    fn try_from(src: Uuid) -> Result<Self, Self::Error> {
        codec::decode(&src)
    }
}

impl str::FromStr for IntegerId {
    type Err = Error;

    /// Decodes an identifier from the 8-4-4-4-12 string representation of an encoded UUID.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        codec::decode(src)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::IntegerId;
    use core::fmt;
    use serde::{de, ser::SerializeTuple, Deserializer, Serializer};

    impl serde::Serialize for IntegerId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut tuple = serializer.serialize_tuple(2)?;
            tuple.serialize_element(&self.value)?;
            tuple.serialize_element(&self.namespace)?;
            tuple.end()
        }
    }

    impl<'de> serde::Deserialize<'de> for IntegerId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_tuple(2, IntegerIdVisitor)
        }
    }

    struct IntegerIdVisitor;

    impl<'de> de::Visitor<'de> for IntegerIdVisitor {
        type Value = IntegerId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a (value, namespace) pair")
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let value: u64 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let namespace: u64 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(1, &self))?;
            IntegerId::make(value, namespace).map_err(de::Error::custom)
        }
    }

}
