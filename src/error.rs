//! Error kinds reported by identifier construction and the codec.

use core::fmt;

use crate::ParseError;

/// Errors returned by [`IntegerId::make`](crate::IntegerId::make), [`decode`](crate::decode), and
/// their conveniences.
///
/// Callers are expected to branch on the variant: [`Range`](Error::Range) and
/// [`Format`](Error::Format) flag bad caller input, while [`Checksum`](Error::Checksum) flags a
/// well-formed UUID that this crate did not produce.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum Error {
    /// A value or namespace fell outside its inclusive domain.
    #[error("{field} must be an integer between {min} and {max}, inclusive; got {value}")]
    Range {
        /// The offending field.
        field: Field,
        /// The inclusive lower bound of the field.
        min: u64,
        /// The inclusive upper bound of the field.
        max: u64,
        /// The rejected input.
        value: i128,
    },

    /// The input is not the string form of an RFC 4122 version 8 UUID.
    #[error("UUID does not match required RFC4122 v8 format")]
    Format,

    /// The input is a well-formed version 8 UUID, but its embedded checksum does not match its
    /// payload.
    #[error("UUID could not be decoded successfully")]
    Checksum,

    /// A fixed-width byte reinterpretation failed.
    #[error("UUID unpack error")]
    Internal,
}

/// Names a field of [`IntegerId`](crate::IntegerId) in [`Error::Range`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Field {
    /// The integer value.
    Value,
    /// The namespace scoping the value.
    Namespace,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Value => "value",
            Self::Namespace => "namespace",
        })
    }
}

impl From<ParseError> for Error {
    fn from(_: ParseError) -> Self {
        Self::Format
    }
}
