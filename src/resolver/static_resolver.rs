// src/resolver/static_resolver.rs
//! In-memory resolver backed by a DID -> document map.

use super::{DidResolver, ResolverError};
use crate::models::did::{did_method, DidDocument};
use async_trait::async_trait;
use std::collections::HashMap;

/// Serves pre-registered documents. Useful for pinned identities and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    documents: HashMap<String, DidDocument>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `document` under its own `id`, replacing any previous entry.
    pub fn insert(&mut self, document: DidDocument) {
        self.documents.insert(document.id.clone(), document);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, document: DidDocument) -> Self {
        self.insert(document);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DidResolver for StaticResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        if did_method(did).is_none() {
            return Err(ResolverError::InvalidDid(did.to_string()));
        }
        self.documents
            .get(did)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(did.to_string()))
    }
}
