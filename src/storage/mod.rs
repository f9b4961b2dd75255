// src/storage/mod.rs
//! Address allocation for log stores.
//!
//! An [`AddressAllocator`] turns a store name, kind and access policy into an
//! opaque address string. The bundled [`ManifestAllocator`] does this the way
//! OrbitDB-style databases do: it writes the access controller and database
//! manifests into a [`ContentStore`] and uses the manifest's content identifier
//! as the root of a [`StoreAddress`](crate::models::access::StoreAddress).

use crate::models::access::{ManifestFormat, StoreKind, StoreOptions};
use async_trait::async_trait;
use std::sync::Arc;

mod ipfs_client;
mod manifest;
mod memory;

pub use ipfs_client::IpfsStorage;
pub use manifest::{
    ControllerManifest, ControllerParams, DatabaseManifest, IpfsAllocator, ManifestAllocator,
    MemoryAllocator, WriteAccess,
};
pub use memory::MemoryStore;

/// Determines the address of a store.
///
/// The returned address is opaque to callers and handed back unmodified.
#[async_trait]
pub trait AddressAllocator: Send + Sync {
    async fn allocate(
        &self,
        name: &str,
        kind: StoreKind,
        options: &StoreOptions,
    ) -> Result<String, AllocatorError>;
}

#[async_trait]
impl<A: AddressAllocator + ?Sized> AddressAllocator for Arc<A> {
    async fn allocate(
        &self,
        name: &str,
        kind: StoreKind,
        options: &StoreOptions,
    ) -> Result<String, AllocatorError> {
        (**self).allocate(name, kind, options).await
    }
}

/// Content-addressed block storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Writes `data` and returns its content identifier.
    async fn put(&self, data: Vec<u8>, format: ManifestFormat) -> Result<String, StorageError>;

    /// Reads back a block written with [`put`](Self::put).
    async fn get(&self, cid: &str, format: ManifestFormat) -> Result<Vec<u8>, StorageError>;
}

#[derive(thiserror::Error, Debug)]
pub enum AllocatorError {
    #[error("allocation rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode manifest: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("ipfs request failed: {0}")]
    Ipfs(String),
    #[error("invalid ipfs api url {0}")]
    InvalidUri(String),
    #[error("block {0} not found")]
    NotFound(String),
    #[error("ipfs api unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected ipfs response: {0}")]
    Response(#[from] serde_json::Error),
}
