//! Reversible transform between [`IntegerId`] and version 8 [`Uuid`].
//!
//! The 16 bytes of an encoded UUID hold three regions:
//!
//! ```text
//! | namespace ^ h(seed) | value ^ h(ns || seed) [0:2] | seed | value ^ h(ns || seed) [2:8] |
//! |       4 bytes       |          2 bytes            |  4   |          6 bytes            |
//! ```
//!
//! `h` is XXH3 64-bit in canonical big-endian byte order. When a region is narrower than the
//! 8-byte digest, it is XORed with the leading digest bytes.

use core::fmt::{self, Write};

use xxhash_rust::xxh3::xxh3_64;

use crate::{Error, IntegerId, Uuid, Variant};

/// The regular expression that every encoded UUID string matches.
pub const VALIDATION_PATTERN: &str =
    r"^[0-9a-f]{8}-[0-9a-f]{4}-8[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";

/// The version field value of encoded UUIDs.
pub const RFC4122_VERSION: u8 = 8;

/// The variant field value of encoded UUIDs.
pub const RFC4122_VARIANT: Variant = Variant::Var10;

/// Clears the version nibble and the variant bits of the 32-bit seed.
const SEED_MASK: u32 = 0x0fff_3fff;

/// Sets the version nibble to `1000` and the variant bits to `10`.
const SEED_MARK: u32 = 0x8000_8000;

/// Encodes an identifier into a version 8 UUID.
///
/// The result is a pure function of the identifier.
///
/// # Examples
///
/// ```rust
/// use int_to_uuid::{decode, encode, IntegerId};
///
/// let id = IntegerId::make(12345, 1155)?;
/// let uuid = encode(&id);
/// assert_eq!(uuid, encode(&id));
/// assert_eq!(decode(&uuid)?, id);
/// # Ok::<(), int_to_uuid::Error>(())
/// ```
pub fn encode(integer_id: &IntegerId) -> Uuid {
    let mut id = integer_id.value().to_be_bytes();
    let mut namespace = integer_id.namespace().to_be_bytes();
    let seed = seed(&id, &namespace);

    xor_assign(&mut id, &hash_pair(&namespace, &seed));
    xor_assign(&mut namespace, &hash(&seed));

    let uuid = assemble(&namespace, &id, &seed);
    tracing::trace!(
        value = integer_id.value(),
        namespace = integer_id.namespace(),
        %uuid,
        "encoded integer id"
    );
    uuid
}

/// Decodes an identifier from anything whose [`Display`](fmt::Display) output is the 8-4-4-4-12
/// string representation of an encoded UUID.
///
/// This accepts [`Uuid`], `str`, `String`, `uuid::Uuid`, and caller-defined wrappers alike.
/// Upper-case hexadecimal digits are accepted.
///
/// # Errors
///
/// - [`Error::Format`] if the input is not an RFC 4122 version 8 UUID string.
/// - [`Error::Checksum`] if the input is a version 8 UUID not produced by [`encode`].
/// - [`Error::Range`] if the recovered value exceeds [`IntegerId::ID_MAX`].
///
/// # Examples
///
/// ```rust
/// use int_to_uuid::{decode, Error};
///
/// assert_eq!(decode("00000000-0000-0000-0000-000000000000"), Err(Error::Format));
/// assert_eq!(decode("489a188c-945a-8628-8599-b5b5e604d144"), Err(Error::Checksum));
/// ```
pub fn decode<T: fmt::Display + ?Sized>(input: &T) -> Result<IntegerId, Error> {
    let uuid = normalize(input).inspect_err(|_| {
        tracing::debug!("rejected input not in 8-4-4-4-12 hexadecimal form");
    })?;
    if uuid.version() != Some(RFC4122_VERSION) {
        tracing::debug!(%uuid, "rejected UUID not matching the v8 format");
        return Err(Error::Format);
    }

    let (mut namespace, mut id, seed) = split(uuid.as_bytes())?;

    xor_assign(&mut namespace, &hash(&seed));
    xor_assign(&mut id, &hash_pair(&namespace, &seed));

    if self::seed(&id, &namespace) != seed {
        tracing::debug!(%uuid, "rejected UUID with mismatched checksum");
        return Err(Error::Checksum);
    }

    IntegerId::make(u64::from_be_bytes(id), u32::from_be_bytes(namespace))
}

/// Formats `input` into a stack buffer and parses it as a UUID string.
fn normalize<T: fmt::Display + ?Sized>(input: &T) -> Result<Uuid, Error> {
    let mut buffer = AsciiBuffer::new();
    write!(buffer, "{input}").map_err(|_| Error::Format)?;
    Ok(Uuid::parse_ascii(buffer.as_bytes())?)
}

/// Derives the 4-byte seed, which also serves as the checksum, from the plain value and namespace.
fn seed(id: &[u8; 8], namespace: &[u8; 4]) -> [u8; 4] {
    let mut message = [0u8; 12];
    message[..8].copy_from_slice(id);
    message[8..].copy_from_slice(namespace);

    let [b0, b1, b2, b3, ..] = hash(&message);
    ((u32::from_be_bytes([b0, b1, b2, b3]) & SEED_MASK) | SEED_MARK).to_be_bytes()
}

fn hash(message: &[u8]) -> [u8; 8] {
    xxh3_64(message).to_be_bytes()
}

fn hash_pair(namespace: &[u8; 4], seed: &[u8; 4]) -> [u8; 8] {
    let mut message = [0u8; 8];
    message[..4].copy_from_slice(namespace);
    message[4..].copy_from_slice(seed);
    hash(&message)
}

/// XORs `dst` with the leading bytes of `key`.
fn xor_assign<const N: usize>(dst: &mut [u8; N], key: &[u8; 8]) {
    debug_assert!(N <= key.len());
    dst.iter_mut().zip(key).for_each(|(d, k)| *d ^= k);
}

fn assemble(namespace: &[u8; 4], id: &[u8; 8], seed: &[u8; 4]) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes[0..4].copy_from_slice(namespace);
    bytes[4..6].copy_from_slice(&id[0..2]);
    bytes[6..10].copy_from_slice(seed);
    bytes[10..16].copy_from_slice(&id[2..8]);
    Uuid::from(bytes)
}

fn split(bytes: &[u8; 16]) -> Result<([u8; 4], [u8; 8], [u8; 4]), Error> {
    let mut id = [0u8; 8];
    id[0..2].copy_from_slice(&bytes[4..6]);
    id[2..8].copy_from_slice(&bytes[10..16]);

    let namespace = bytes[0..4].try_into().map_err(|_| Error::Internal)?;
    let seed = bytes[6..10].try_into().map_err(|_| Error::Internal)?;
    Ok((namespace, id, seed))
}

/// Fixed-capacity sink sized for the 8-4-4-4-12 representation.
struct AsciiBuffer {
    bytes: [u8; 36],
    len: usize,
}

impl AsciiBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; 36],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Write for AsciiBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        self.bytes
            .get_mut(self.len..end)
            .ok_or(fmt::Error)?
            .copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Encodes `value` in `namespace` in one step.
///
/// # Examples
///
/// ```rust
/// use int_to_uuid::{int_to_uuid, Error, IntegerId};
///
/// let uuid = int_to_uuid(12345, 1155)?;
/// assert_eq!(uuid, IntegerId::make(12345, 1155)?.to_uuid());
/// assert!(matches!(int_to_uuid(-1, 0), Err(Error::Range { .. })));
/// # Ok::<(), int_to_uuid::Error>(())
/// ```
pub fn int_to_uuid(value: impl Into<i128>, namespace: impl Into<i128>) -> Result<Uuid, Error> {
    IntegerId::make(value, namespace).map(|e| encode(&e))
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::{decode, encode, int_to_uuid, seed, Error, IntegerId, Uuid};
    use super::{RFC4122_VARIANT, RFC4122_VERSION, VALIDATION_PATTERN};

    /// Returns a collection of prepared identifiers including domain corners
    fn prepare_cases() -> Vec<IntegerId> {
        let mut cases = vec![
            IntegerId::make(IntegerId::ID_MIN, IntegerId::NAMESPACE_MIN).unwrap(),
            IntegerId::make(IntegerId::ID_MIN, IntegerId::NAMESPACE_MAX).unwrap(),
            IntegerId::make(IntegerId::ID_MAX, IntegerId::NAMESPACE_MIN).unwrap(),
            IntegerId::make(IntegerId::ID_MAX, IntegerId::NAMESPACE_MAX).unwrap(),
            IntegerId::make(12345, 1155).unwrap(),
        ];
        for _ in 0..1_000 {
            let value = rand::random::<u64>() >> 1;
            cases.push(IntegerId::make(value, rand::random::<u32>()).unwrap());
        }
        cases
    }

    /// Encodes and decodes integer ids
    #[test]
    fn encodes_and_decodes_integer_ids() {
        let re = regex::Regex::new(VALIDATION_PATTERN).unwrap();
        for e in prepare_cases() {
            let uuid = encode(&e);
            assert!(re.is_match(&uuid.encode()), "{uuid}");
            assert_eq!(uuid.version(), Some(RFC4122_VERSION));
            assert_eq!(uuid.variant(), RFC4122_VARIANT);
            assert_eq!(decode(&uuid), Ok(e));
            assert_eq!(decode(&uuid.to_string()), Ok(e));
            assert_eq!(decode(&*uuid.encode()), Ok(e));
            assert_eq!(decode(&uuid.encode().to_uppercase()), Ok(e));
        }
    }

    /// Encodes deterministically
    #[test]
    fn encodes_deterministically() {
        let e = IntegerId::make(12345, 1155).unwrap();
        let first = encode(&e);
        for _ in 0..100 {
            assert_eq!(encode(&e), first);
        }
        assert_eq!(int_to_uuid(12345, 1155), Ok(first));
        assert_eq!(Uuid::from(e), first);
    }

    /// Takes XXH3 digest in canonical big-endian byte order
    #[test]
    fn takes_xxh3_digest_in_canonical_big_endian_byte_order() {
        assert_eq!(
            super::hash(b""),
            [0x2d, 0x06, 0x80, 0x05, 0x38, 0xd3, 0x94, 0xc2]
        );
    }

    /// Encodes prepared cases to known UUIDs
    #[test]
    fn encodes_prepared_cases_to_known_uuids() {
        let cases = [
            ((12345, 1155), "5ad90d29-429d-8faa-9d85-3849425c941f"),
            ((0, 0), "5fec6701-fc03-8499-8f91-4168936d858f"),
            ((0, u32::MAX), "6d5fa5ad-754f-8082-ada3-61de1b09aa35"),
            ((IntegerId::ID_MAX, 0), "977507dc-c58c-8cc5-b9f9-1b7bc1e798c2"),
            (
                (IntegerId::ID_MAX, u32::MAX),
                "019e07d3-805d-88a4-ba7f-9ce33620cdff",
            ),
            ((1, 0), "764bb373-b10f-8f8a-b66c-3e7930926aed"),
        ];

        for ((value, namespace), text) in cases {
            let e = IntegerId::make(value, namespace).unwrap();
            assert_eq!(&encode(&e).encode() as &str, text);
            assert_eq!(decode(text), Ok(e));
        }
    }

    /// Places seed at version and variant positions
    #[test]
    fn places_seed_at_version_and_variant_positions() {
        for e in prepare_cases() {
            let bytes = *encode(&e).as_bytes();
            let seed = seed(&e.value().to_be_bytes(), &e.namespace().to_be_bytes());
            assert_eq!(bytes[6..10], seed);
            assert_eq!(seed[0] >> 4, 0b1000);
            assert_eq!(seed[2] >> 6, 0b10);
        }
    }

    /// Hides sequential ids behind distinct UUIDs
    #[test]
    fn hides_sequential_ids_behind_distinct_uuids() {
        use std::collections::HashSet;
        let uuids: HashSet<Uuid> = (0..10_000u64)
            .map(|i| encode(&IntegerId::from_value(i).unwrap()))
            .collect();
        assert_eq!(uuids.len(), 10_000);

        let same_value_other_namespace: HashSet<Uuid> = (0..1_000u32)
            .map(|ns| encode(&IntegerId::make(7, ns).unwrap()))
            .collect();
        assert_eq!(same_value_other_namespace.len(), 1_000);
    }

    /// Sets constant bits and hash-derived bits properly
    #[test]
    fn sets_constant_bits_and_hash_derived_bits_properly() {
        const N_SAMPLES: u64 = 100_000;

        // count '1' of each bit over sequential ids
        let mut bins = [0u32; 128];
        for i in 0..N_SAMPLES {
            let num = u128::from(encode(&IntegerId::from_value(i).unwrap()));
            for (j, bin) in bins.iter_mut().enumerate() {
                *bin += ((num >> (127 - j)) & 1) as u32;
            }
        }

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], n, "version bit 48");
        assert_eq!(bins[49], 0, "version bit 49");
        assert_eq!(bins[50], 0, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if other bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.99999% confidence interval
        let margin = 5.326724 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (0..48).chain(52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "hash-derived bit {i}: {p}");
        }
    }

    /// Rejects v8 UUIDs not produced by encoder
    #[test]
    fn rejects_v8_uuids_not_produced_by_encoder() {
        let cases = [
            "4b9a188c-945a-8628-8599-b5b5e604d144",
            "489a188c-945a-8728-8599-b5b5e604d144",
            "489a188c-945a-8628-85a9-b5b5e604d144",
            "489a188c-945a-8628-8599-b5b5e604da44",
            "6359de08-baf9-8060-85e0-90fe7ee66b40",
            "f218614f-a95f-8d78-a74d-653fe5092b74",
            "0276bc60-a49e-888a-ac70-da3f3cedb903",
            "3a282590-fd57-8492-8de8-52eb6fbbc05a",
            "10efb154-0d23-8794-8841-84a966631e8f",
            "772e5800-40be-84d4-9567-09899746d872",
        ];

        for e in cases {
            assert_eq!(decode(e), Err(Error::Checksum), "{e}");
            assert_eq!(decode(&e.parse::<Uuid>().unwrap()), Err(Error::Checksum));
        }
    }

    /// Rejects single byte mutations
    #[test]
    fn rejects_single_byte_mutations() {
        let original = encode(&IntegerId::make(12345, 1155).unwrap());
        for i in 0..16 {
            let mut bytes = *original.as_bytes();
            // flip the lowest bit to keep version and variant intact
            bytes[i] ^= 0x01;
            assert_eq!(decode(&Uuid::from(bytes)), Err(Error::Checksum), "byte {i}");
        }
    }

    /// Rejects UUIDs without v8 format
    #[test]
    fn rejects_uuids_without_v8_format() {
        let cases = [
            "00000000-0000-0000-0000-000000000000",
            "ffffffff-ffff-ffff-ffff-ffffffffffff",
            "489a188c-945a-4628-8599-b5b5e604d144",
            "6359de08-baf9-4060-85e0-90fe7ee66b40",
            "f218614f-a95f-4d78-a74d-653fe5092b74",
            "0276bc60-a49e-488a-ac70-da3f3cedb903",
            "489a188c-945a-8628-c599-b5b5e604d144",
            "489a188c-945a-8628-7599-b5b5e604d144",
            "489a188c945a86288599b5b5e604d144",
            "{489a188c-945a-8628-8599-b5b5e604d144}",
            "489a188c-945a-8628-8599-b5b5e604d144-0000",
            "",
        ];

        for e in cases {
            assert_eq!(decode(e), Err(Error::Format), "{e}");
        }
        assert_eq!(decode(&Uuid::NIL), Err(Error::Format));
        assert_eq!(decode(&Uuid::MAX), Err(Error::Format));
    }

    /// Rejects broken version and variant bits of encoded UUIDs
    #[test]
    fn rejects_broken_version_and_variant_bits_of_encoded_uuids() {
        let original = encode(&IntegerId::make(12345, 1155).unwrap());

        let mut bytes = *original.as_bytes();
        bytes[6] ^= 0xc0;
        assert_eq!(decode(&Uuid::from(bytes)), Err(Error::Format));

        let mut bytes = *original.as_bytes();
        bytes[8] ^= 0x40;
        assert_eq!(decode(&Uuid::from(bytes)), Err(Error::Format));
    }

    /// Reports out-of-range value carrying valid checksum as range error
    #[test]
    fn reports_out_of_range_value_carrying_valid_checksum_as_range_error() {
        // forge a UUID with the same transform for a value above ID_MAX
        let mut id = u64::MAX.to_be_bytes();
        let mut namespace = 0u32.to_be_bytes();
        let seed = seed(&id, &namespace);
        super::xor_assign(&mut id, &super::hash_pair(&namespace, &seed));
        super::xor_assign(&mut namespace, &super::hash(&seed));
        let forged = super::assemble(&namespace, &id, &seed);

        assert!(matches!(
            decode(&forged),
            Err(Error::Range {
                field: crate::Field::Value,
                ..
            })
        ));
    }

    /// Accepts caller-defined string wrappers
    #[test]
    fn accepts_caller_defined_string_wrappers() {
        struct StringWrapper(String);
        impl std::fmt::Display for StringWrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        let e = IntegerId::make(987_654_321, 42).unwrap();
        let wrapped = StringWrapper(encode(&e).to_string());
        assert_eq!(decode(&wrapped), Ok(e));
        assert_eq!(
            decode(&StringWrapper("not a uuid".to_owned())),
            Err(Error::Format)
        );
    }

    /// Converts through standard traits
    #[test]
    fn converts_through_standard_traits() {
        let e = IntegerId::make(12345, 1155).unwrap();
        let uuid = Uuid::from(e);
        assert_eq!(IntegerId::try_from(uuid), Ok(e));
        assert_eq!(uuid.to_string().parse::<IntegerId>(), Ok(e));
        assert_eq!(
            "489a188c-945a-8628-8599-b5b5e604d144".parse::<IntegerId>(),
            Err(Error::Checksum)
        );
        #[cfg(feature = "uuid")]
        assert_eq!(decode(&uuid::Uuid::from(uuid)), Ok(e));
    }
}
