// src/error.rs
//! Errors raised while deriving a root store address.
//!
//! Each variant corresponds to one pipeline stage and keeps the stage's own
//! error as its `source()`, so callers can decide on retries per cause.

use crate::resolver::ResolverError;
use crate::storage::AllocatorError;
use crate::utils::crypto::KeyError;

#[derive(thiserror::Error, Debug)]
pub enum AddressError {
    /// The DID could not be resolved: malformed, unsupported method, or the
    /// resolver was unreachable.
    #[error("failed to resolve {did}: {source}")]
    Resolution {
        did: String,
        #[source]
        source: ResolverError,
    },

    /// The resolved document has no public key marked as a signing key.
    #[error("document for {did} has no public key with an id containing \"#signingKey\"")]
    KeyNotFound { did: String },

    /// The signing key is not a valid secp256k1 point.
    #[error("signing key {key_id} is invalid: {source}")]
    InvalidKey {
        key_id: String,
        #[source]
        source: KeyError,
    },

    /// The allocator rejected or failed the request.
    #[error("failed to allocate store {name}: {source}")]
    Allocation {
        name: String,
        #[source]
        source: AllocatorError,
    },
}
