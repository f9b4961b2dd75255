// src/storage/manifest.rs
//! Manifest-based address allocation.
//!
//! Layout written for a store:
//! 1. the write allowlist, `{"write": [...]}`
//! 2. unless `skipManifest` is set, an access controller manifest
//!    `{"type": ..., "params": {"address": <cid of 1>}}`
//! 3. the database manifest
//!    `{"name": ..., "type": ..., "accessController": "/ipfs/<cid of 1 or 2>"}`
//!
//! The address is `/orbitdb/<cid of 3>/<name>`. Every block is written with the
//! format from the store options.

use super::{AddressAllocator, AllocatorError, ContentStore, IpfsStorage, MemoryStore};
use crate::config::IpfsSettings;
use crate::models::access::{ManifestFormat, StoreAddress, StoreKind, StoreOptions};
use crate::utils::serialization::{deserialize, serialize_bytes};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WriteAccess {
    pub write: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ControllerManifest {
    #[serde(rename = "type")]
    pub controller_type: String,
    pub params: ControllerParams,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ControllerParams {
    pub address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StoreKind,
    /// `/ipfs/<cid>` of the access controller.
    pub access_controller: String,
}

/// Allocates addresses by writing manifests to a [`ContentStore`].
#[derive(Clone)]
pub struct ManifestAllocator<S> {
    store: S,
}

/// Allocator backed by an IPFS node.
pub type IpfsAllocator = ManifestAllocator<IpfsStorage>;

/// Allocator backed by process memory.
pub type MemoryAllocator = ManifestAllocator<MemoryStore>;

impl<S> ManifestAllocator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl IpfsAllocator {
    pub fn from_settings(settings: &IpfsSettings) -> Result<Self, AllocatorError> {
        Ok(Self::new(IpfsStorage::from_settings(settings)?))
    }
}

impl MemoryAllocator {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

fn validate(name: &str, options: &StoreOptions) -> Result<(), AllocatorError> {
    if name.is_empty() || name.contains('/') {
        return Err(AllocatorError::Rejected(format!(
            "store name {:?} must be non-empty and contain no '/'",
            name
        )));
    }
    let controller = &options.access_controller;
    if controller.controller_type.is_empty() {
        return Err(AllocatorError::Rejected(
            "access controller type is empty".to_string(),
        ));
    }
    if controller.write.is_empty() || controller.write.iter().any(|key| key.is_empty()) {
        return Err(AllocatorError::Rejected(
            "write allowlist must contain at least one non-empty key".to_string(),
        ));
    }
    Ok(())
}

impl<S: ContentStore> ManifestAllocator<S> {
    /// Reads back and decodes the database manifest behind `address`.
    pub async fn fetch_manifest(
        &self,
        address: &StoreAddress,
        format: ManifestFormat,
    ) -> Result<DatabaseManifest, AllocatorError> {
        let bytes = self.store.get(&address.root, format).await?;
        let text = String::from_utf8(bytes)
            .map_err(|_| AllocatorError::Rejected(format!("manifest {} is not utf-8", address.root)))?;
        let manifest: DatabaseManifest = deserialize(&text)?;
        if manifest.name != address.path {
            return Err(AllocatorError::Rejected(format!(
                "manifest {} names store {:?}, not {:?}",
                address.root, manifest.name, address.path
            )));
        }
        Ok(manifest)
    }

    /// Writes the manifests for a store and returns its structured address.
    ///
    /// [`AddressAllocator::allocate`] returns the same address rendered as a string.
    pub async fn write_manifests(
        &self,
        name: &str,
        kind: StoreKind,
        options: &StoreOptions,
    ) -> Result<StoreAddress, AllocatorError> {
        validate(name, options)?;
        let format = options.format;
        let controller = &options.access_controller;

        let write_access = WriteAccess {
            write: controller.write.clone(),
        };
        let mut controller_address = self.store.put(serialize_bytes(&write_access)?, format).await?;

        if !controller.skip_manifest {
            let controller_manifest = ControllerManifest {
                controller_type: controller.controller_type.clone(),
                params: ControllerParams {
                    address: controller_address,
                },
            };
            controller_address = self
                .store
                .put(serialize_bytes(&controller_manifest)?, format)
                .await?;
        }
        debug!("access controller for {} at /ipfs/{}", name, controller_address);

        let manifest = DatabaseManifest {
            name: name.to_string(),
            kind,
            access_controller: format!("/ipfs/{}", controller_address),
        };
        let root = self.store.put(serialize_bytes(&manifest)?, format).await?;

        let address = StoreAddress::new(root, name);
        info!("allocated {} store {}", kind, address);
        Ok(address)
    }
}

#[async_trait]
impl<S: ContentStore> AddressAllocator for ManifestAllocator<S> {
    async fn allocate(
        &self,
        name: &str,
        kind: StoreKind,
        options: &StoreOptions,
    ) -> Result<String, AllocatorError> {
        Ok(self.write_manifests(name, kind, options).await?.to_string())
    }
}
