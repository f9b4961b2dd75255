// src/resolver/mod.rs
//! DID resolution capability.
//!
//! The address pipeline only needs "DID in, document out". Resolution itself is
//! delegated to an implementation of [`DidResolver`]:
//! - [`UniversalResolver`] queries a DIF universal-resolver compatible HTTP endpoint
//! - [`MethodRegistry`] routes each DID to a resolver registered for its method
//! - [`StaticResolver`] serves documents from memory

use crate::models::did::DidDocument;
use async_trait::async_trait;
use std::sync::Arc;

mod registry;
mod static_resolver;
mod universal;

pub use registry::MethodRegistry;
pub use static_resolver::StaticResolver;
pub use universal::UniversalResolver;

/// Resolves a DID to its document.
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError>;
}

#[async_trait]
impl<R: DidResolver + ?Sized> DidResolver for Arc<R> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        (**self).resolve(did).await
    }
}

#[async_trait]
impl<R: DidResolver + ?Sized> DidResolver for Box<R> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        (**self).resolve(did).await
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    #[error("malformed DID {0:?}")]
    InvalidDid(String),
    #[error("unsupported DID method {method:?}")]
    UnsupportedMethod { method: String },
    #[error("DID {0} was not found")]
    NotFound(String),
    #[error("resolver request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("resolver responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("resolver returned a malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("resolver reported {0:?}")]
    Failed(String),
}
