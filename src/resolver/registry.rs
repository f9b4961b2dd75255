// src/resolver/registry.rs
//! Per-method resolver dispatch.

use super::{DidResolver, ResolverError};
use crate::models::did::{did_method, DidDocument};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Routes each DID to the resolver registered for its method.
///
/// DIDs whose method has no registered resolver fail with
/// [`ResolverError::UnsupportedMethod`]; there is no catch-all fallback.
#[derive(Default, Clone)]
pub struct MethodRegistry {
    resolvers: HashMap<String, Arc<dyn DidResolver>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` for `method` (e.g. `"3"`, `"web"`, `"ethr"`).
    pub fn register(mut self, method: impl Into<String>, resolver: Arc<dyn DidResolver>) -> Self {
        self.resolvers.insert(method.into(), resolver);
        self
    }

    pub fn supports(&self, method: &str) -> bool {
        self.resolvers.contains_key(method)
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl DidResolver for MethodRegistry {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        let method = did_method(did).ok_or_else(|| ResolverError::InvalidDid(did.to_string()))?;
        let resolver = self
            .resolvers
            .get(method)
            .ok_or_else(|| ResolverError::UnsupportedMethod {
                method: method.to_string(),
            })?;
        debug!("resolving {} with the did:{} resolver", did, method);
        resolver.resolve(did).await
    }
}
