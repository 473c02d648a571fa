//! Reversible encoding of namespaced 64-bit integer IDs as RFC 4122 version 8 UUIDs
//!
//! ```rust
//! use int_to_uuid::{decode, encode, IntegerId};
//!
//! let id = IntegerId::make(12345, 1155)?;
//! let uuid = encode(&id);
//! println!("{}", uuid); // a fixed "xxxxxxxx-xxxx-8xxx-[89ab]xxx-xxxxxxxxxxxx" string
//! assert_eq!(decode(&uuid)?, id);
//! assert_eq!(decode(&uuid.to_string())?, id);
//! # Ok::<(), int_to_uuid::Error>(())
//! ```
//!
//! Sequential database IDs become UUIDs that look unrelated to each other, and UUIDs that were not
//! produced by [`encode`] are rejected by [`decode`] through an embedded checksum. The
//! transform is obfuscation, not encryption: anyone with this crate can reverse it.
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         namespace_xor                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           value_xor           |  ver  |         seed          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|           seed            |           value_xor           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           value_xor                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 32-bit `seed` is the leading 32 bits of the XXH3 hash of the big-endian value and
//!   namespace, with its `ver` nibble forced to `1000` and its `var` bits forced to `10`. It
//!   doubles as the checksum verified on decode.
//! - The 64-bit `value_xor` field is the big-endian value XORed with the hash of the namespace
//!   and seed, split into a 16-bit head and a 48-bit tail around the seed.
//! - The 32-bit `namespace_xor` field is the big-endian namespace XORed with the leading 32 bits
//!   of the hash of the seed.
//!
//! # Crate features
//!
//! - `std` (default): enables `String` conversions and `std` support of dependencies. Without
//!   it, this crate is `no_std`.
//! - `serde`: implements `Serialize` and `Deserialize` for [`Uuid`] and [`IntegerId`].
//! - `uuid`: enables conversions between [`Uuid`] and `uuid::Uuid`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ParseError, Uuid, Variant};

mod error;
pub use error::{Error, Field};

mod integer_id;
pub use integer_id::IntegerId;

mod codec;
pub use codec::{
    decode, encode, int_to_uuid, RFC4122_VARIANT, RFC4122_VERSION, VALIDATION_PATTERN,
};
