// src/utils/multihash.rs
//! Minimal self-describing digest codec.
//!
//! A multihash is laid out as `<varint code><varint length><digest>`, where the
//! code identifies the hash function. Only the functions this crate can produce
//! (via `ring`) are registered.
//!
//! See <https://github.com/multiformats/multihash>.

/// bitmask for 7 least significant bits
const LSB_7: u8 = u8::MAX / 2;
/// bitmask for most significant bit
const MSB: u8 = !LSB_7;

/// Hash functions with a registered multicodec code.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum HashAlgorithm {
    Sha2_256,
    Sha2_512,
}

impl HashAlgorithm {
    /// The multicodec table code.
    pub const fn code(self) -> u64 {
        match self {
            HashAlgorithm::Sha2_256 => 0x12,
            HashAlgorithm::Sha2_512 => 0x13,
        }
    }

    /// Digest size in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha2_256 => 32,
            HashAlgorithm::Sha2_512 => 64,
        }
    }

    /// The multicodec table name, e.g. `sha2-256`.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha2_256 => "sha2-256",
            HashAlgorithm::Sha2_512 => "sha2-512",
        }
    }

    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0x12 => Some(HashAlgorithm::Sha2_256),
            0x13 => Some(HashAlgorithm::Sha2_512),
            _ => None,
        }
    }
}

/// A decoded multihash: the algorithm tag plus the raw digest bytes.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct Multihash {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl Multihash {
    /// Wraps a raw digest. The digest length must match the algorithm's output size.
    pub fn wrap(algorithm: HashAlgorithm, digest: &[u8]) -> Result<Self, MultihashError> {
        if digest.len() != algorithm.digest_len() {
            return Err(MultihashError::LengthMismatch {
                expected: algorithm.digest_len(),
                actual: digest.len(),
            });
        }
        Ok(Self {
            algorithm,
            digest: digest.to_vec(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Serializes to `<code><length><digest>`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.digest.len() + 4);
        encode_varint(self.algorithm.code(), &mut out);
        encode_varint(self.digest.len() as u64, &mut out);
        out.extend_from_slice(&self.digest);
        out
    }

    /// Parses a complete multihash. Trailing bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MultihashError> {
        let (code, rest) = decode_varint(bytes)?;
        let algorithm =
            HashAlgorithm::from_code(code).ok_or(MultihashError::UnknownCode(code))?;
        let (len, digest) = decode_varint(rest)?;
        if len as usize != digest.len() {
            return Err(MultihashError::LengthMismatch {
                expected: len as usize,
                actual: digest.len(),
            });
        }
        Self::wrap(algorithm, digest)
    }
}

/// Appends `value` as an unsigned varint (LEB128) to `out`.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let chunk = (value as u8) & LSB_7;
        value >>= 7;
        if value == 0 {
            out.push(chunk);
            return;
        }
        out.push(chunk | MSB);
    }
}

/// Decodes an unsigned varint from the front of `encoded`, returning the value
/// and the unread remainder.
pub fn decode_varint(encoded: &[u8]) -> Result<(u64, &[u8]), MultihashError> {
    let mut result: u64 = 0;
    // Multiformats caps varints at 9 bytes (63 bits).
    for (idx, byte) in encoded.iter().enumerate().take(9) {
        result |= u64::from(byte & LSB_7) << (7 * idx);
        if byte & MSB == 0 {
            return Ok((result, &encoded[idx + 1..]));
        }
    }
    if encoded.len() >= 9 {
        Err(MultihashError::VarintOverflow)
    } else {
        Err(MultihashError::MissingBytes)
    }
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum MultihashError {
    #[error("expected more bytes than what were provided")]
    MissingBytes,
    #[error("varint is longer than 9 bytes")]
    VarintOverflow,
    #[error("unknown multihash code 0x{0:x}")]
    UnknownCode(u64),
    #[error("digest length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
