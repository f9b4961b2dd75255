// src/services/address_resolver.rs
//! Derivation of a DID's root store address.
//!
//! A root store is a single-writer `feed` log. Its name is a fingerprint of the
//! DID and its access controller admits only the DID's signing key, so the same
//! DID always maps to the same address and only the key holder can append.
//!
//! # Process Flow
//! 1. Resolve the DID document
//! 2. Pick the first public key whose id contains `#signingKey`
//! 3. Decompress the key (the access controller rejects compressed points)
//! 4. Fingerprint the DID as a hex sha2-256 multihash
//! 5. Build a single-writer access policy
//! 6. Ask the allocator for the address
//!
//! Any failure aborts the remaining steps. Nothing is retried and nothing is
//! stored before step 6.

use crate::error::AddressError;
use crate::models::access::{StoreKind, StoreOptions};
use crate::models::did::{DidDocument, PublicKeyEntry};
use crate::resolver::DidResolver;
use crate::storage::AddressAllocator;
use crate::utils::crypto::{sha256_multihash, uncompress_secp256k1_key, KeyError};
use log::{debug, info};

/// Suffix appended to the DID fingerprint to name the root store.
pub const ROOT_STORE_SUFFIX: &str = ".root";

/// Kind of store used for root stores.
pub const ROOT_STORE_KIND: StoreKind = StoreKind::Feed;

/// A fully prepared allocation request for a DID's root store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootStoreRequest {
    pub name: String,
    pub kind: StoreKind,
    pub options: StoreOptions,
}

/// Maps DIDs to root store addresses using an injected resolver.
///
/// Holds no mutable state, so one instance can serve concurrent derivations.
#[derive(Debug, Clone)]
pub struct IdentityAddressResolver<R> {
    resolver: R,
}

impl<R: DidResolver> IdentityAddressResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolves `did` to its document.
    pub async fn resolve_did(&self, did: &str) -> Result<DidDocument, AddressError> {
        debug!("resolving {}", did);
        self.resolver
            .resolve(did)
            .await
            .map_err(|source| AddressError::Resolution {
                did: did.to_string(),
                source,
            })
    }

    /// Resolves `did` and returns its signing key as published (usually compressed hex).
    pub async fn did_extract_signing_key(&self, did: &str) -> Result<String, AddressError> {
        let document = self.resolve_did(did).await?;
        let key = extract_signing_key(did, &document)?;
        Ok(signing_key_hex(key)?.to_string())
    }

    /// Derives the root store address of `did`.
    ///
    /// The allocator's address string is returned unmodified. Callers wanting a timeout or
    /// retries wrap this call; cancelling it leaves nothing behind unless the
    /// allocator had already been reached.
    pub async fn derive_address<A>(
        &self,
        did: &str,
        allocator: &A,
    ) -> Result<String, AddressError>
    where
        A: AddressAllocator + ?Sized,
    {
        let document = self.resolve_did(did).await?;
        let request = prepare_root_store(did, &document)?;

        let address = allocator
            .allocate(&request.name, request.kind, &request.options)
            .await
            .map_err(|source| AddressError::Allocation {
                name: request.name.clone(),
                source,
            })?;
        info!("root store for {} is {}", did, address);
        Ok(address)
    }
}

/// Returns the signing key entry of `document`.
///
/// Entries are scanned in document order; the first id containing `#signingKey`
/// wins even when several entries carry the marker.
pub fn extract_signing_key<'a>(
    did: &str,
    document: &'a DidDocument,
) -> Result<&'a PublicKeyEntry, AddressError> {
    let key = document.signing_key().ok_or_else(|| AddressError::KeyNotFound {
        did: did.to_string(),
    })?;
    let marked = document
        .public_key
        .iter()
        .filter(|entry| entry.is_signing_key())
        .count();
    if marked > 1 {
        debug!("{} lists {} signing keys, using {}", did, marked, key.id);
    }
    Ok(key)
}

/// Hex material of a signing key entry.
///
/// Only `publicKeyHex` is usable for the access controller; an entry published
/// in any other encoding fails with [`AddressError::InvalidKey`].
pub fn signing_key_hex(key: &PublicKeyEntry) -> Result<&str, AddressError> {
    key.public_key_hex
        .as_deref()
        .ok_or_else(|| AddressError::InvalidKey {
            key_id: key.id.clone(),
            source: KeyError::MissingHex,
        })
}

/// Name of the root store of `did`: its fingerprint plus [`ROOT_STORE_SUFFIX`].
pub fn root_store_name(did: &str) -> String {
    format!("{}{}", sha256_multihash(did), ROOT_STORE_SUFFIX)
}

/// Access policy admitting only `uncompressed_key`.
pub fn root_store_options(uncompressed_key: &str) -> StoreOptions {
    StoreOptions::single_writer(uncompressed_key)
}

/// Builds the allocation request for `did` from its resolved document.
///
/// This covers every step between resolution and allocation and is pure.
pub fn prepare_root_store(
    did: &str,
    document: &DidDocument,
) -> Result<RootStoreRequest, AddressError> {
    let key = extract_signing_key(did, document)?;
    let signing_key = uncompress_secp256k1_key(signing_key_hex(key)?).map_err(|source| {
        AddressError::InvalidKey {
            key_id: key.id.clone(),
            source,
        }
    })?;
    let name = root_store_name(did);
    debug!("{} fingerprints to {}", did, name);

    Ok(RootStoreRequest {
        name,
        kind: ROOT_STORE_KIND,
        options: root_store_options(&signing_key),
    })
}
