// src/utils/crypto.rs
//! Cryptographic helpers for turning a DID into a root store.
//!
//! - SHA-256 multihash fingerprints (via `ring`)
//! - secp256k1 point decompression (via `k256`)

use crate::utils::multihash::{HashAlgorithm, Multihash};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use ring::digest::{digest, SHA256};

/// Computes the hex-encoded sha2-256 multihash of a string.
///
/// This is the fingerprint used to name a DID's root store. The output is
/// always 68 hex characters: the `0x12` code, the `0x20` length, then the
/// 32 digest bytes.
///
/// # Example
/// ```
/// use did_root_store::utils::crypto::sha256_multihash;
/// assert!(sha256_multihash("did:example:123").starts_with("1220"));
/// ```
pub fn sha256_multihash(input: &str) -> String {
    sha256_multihash_bytes(input.as_bytes())
}

/// Byte-oriented form of [`sha256_multihash`].
pub fn sha256_multihash_bytes(input: &[u8]) -> String {
    let hash = digest(&SHA256, input);
    // ring's SHA-256 output is always 32 bytes, matching the registered length.
    let multihash = Multihash::wrap(HashAlgorithm::Sha2_256, hash.as_ref())
        .unwrap_or_else(|_| unreachable!("sha256 digest is 32 bytes"));
    hex::encode(multihash.to_bytes())
}

/// Converts a hex-encoded SEC1 secp256k1 public key into its uncompressed hex form.
///
/// Compressed (`02`/`03`, 33 bytes) input is the common case since that is what DID
/// documents publish; already uncompressed (`04`, 65 bytes) input is accepted and
/// normalized. An optional `0x` prefix is ignored.
///
/// # Errors
/// - [`KeyError::Hex`] if the input is not valid hex
/// - [`KeyError::InvalidPoint`] if the bytes do not decode to a point on the curve
///   (wrong length, unknown prefix byte, x coordinate with no matching y)
pub fn uncompress_secp256k1_key(key_hex: &str) -> Result<String, KeyError> {
    let trimmed = key_hex.strip_prefix("0x").unwrap_or(key_hex);
    let bytes = hex::decode(trimmed)?;
    let public_key = PublicKey::from_sec1_bytes(&bytes).map_err(|_| KeyError::InvalidPoint {
        len: bytes.len(),
        prefix: bytes.first().copied(),
    })?;
    Ok(hex::encode(public_key.to_encoded_point(false).as_bytes()))
}

#[derive(thiserror::Error, Debug)]
pub enum KeyError {
    #[error("key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("{len} byte key with prefix {prefix:02x?} is not a valid secp256k1 point")]
    InvalidPoint { len: usize, prefix: Option<u8> },
    #[error("key has no publicKeyHex value")]
    MissingHex,
}
