// src/storage/memory.rs
//! In-memory content store.

use super::{ContentStore, StorageError};
use crate::models::access::ManifestFormat;
use crate::utils::crypto::sha256_multihash_bytes;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Keeps blocks in a map keyed by a sha2-256 multihash of format and content.
///
/// Identifiers are hex multihashes rather than real CIDs, so addresses produced
/// on top of this store are deterministic but do not match an IPFS node's.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blocks: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn block_id(data: &[u8], format: ManifestFormat) -> String {
        let mut tagged = Vec::with_capacity(format.as_str().len() + 1 + data.len());
        tagged.extend_from_slice(format.as_str().as_bytes());
        tagged.push(b'\n');
        tagged.extend_from_slice(data);
        sha256_multihash_bytes(&tagged)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.lock().map(|blocks| blocks.len()).unwrap_or(0)
    }

    pub fn contains(&self, cid: &str) -> bool {
        self.blocks
            .lock()
            .map(|blocks| blocks.contains_key(cid))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn put(&self, data: Vec<u8>, format: ManifestFormat) -> Result<String, StorageError> {
        let cid = Self::block_id(&data, format);
        // A poisoned lock only means another writer panicked mid-insert; the map
        // itself is still consistent.
        let mut blocks = self.blocks.lock().unwrap_or_else(|e| e.into_inner());
        blocks.insert(cid.clone(), data);
        Ok(cid)
    }

    async fn get(&self, cid: &str, _format: ManifestFormat) -> Result<Vec<u8>, StorageError> {
        let blocks = self.blocks.lock().unwrap_or_else(|e| e.into_inner());
        blocks
            .get(cid)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(cid.to_string()))
    }
}
