// src/resolver/universal.rs
//! HTTP resolver for DIF universal-resolver compatible endpoints.
//!
//! Queries `GET <base>/1.0/identifiers/<did>`. The body is either a DID
//! resolution result (`{ "didDocument": { ... }, ... }`) or a bare document;
//! both are accepted. A resolution result whose `didDocument` is `null` is
//! mapped through its `didResolutionMetadata.error` code.

use super::{DidResolver, ResolverError};
use crate::config::ResolverSettings;
use crate::models::did::{did_method, DidDocument};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UniversalResolver {
    client: reqwest::Client,
    base_url: String,
}

impl UniversalResolver {
    /// Creates a resolver using an existing HTTP client, so connection pools
    /// can be shared with the rest of an application.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Builds a resolver from configuration. The configured timeout applies to
    /// each HTTP request, not to the address pipeline as a whole.
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::new(client, settings.url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn identifier_url(&self, did: &str) -> String {
        format!("{}/1.0/identifiers/{}", self.base_url, did)
    }

    fn parse_body(did: &str, method: &str, body: &[u8]) -> Result<DidDocument, ResolverError> {
        let mut body: Value = serde_json::from_slice(body)?;
        match body.get_mut("didDocument").map(Value::take) {
            Some(Value::Null) => Err(Self::reported_error(did, method, &body)),
            Some(document) => Ok(serde_json::from_value(document)?),
            None => Ok(serde_json::from_value(body)?),
        }
    }

    /// Maps the error code of a resolution result that carries no document.
    fn reported_error(did: &str, method: &str, body: &Value) -> ResolverError {
        let code = body
            .pointer("/didResolutionMetadata/error")
            .and_then(Value::as_str);
        match code {
            None | Some("notFound") => ResolverError::NotFound(did.to_string()),
            Some("methodNotSupported") => ResolverError::UnsupportedMethod {
                method: method.to_string(),
            },
            Some("invalidDid") => ResolverError::InvalidDid(did.to_string()),
            Some(other) => ResolverError::Failed(other.to_string()),
        }
    }
}

#[async_trait]
impl DidResolver for UniversalResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        let method = did_method(did).ok_or_else(|| ResolverError::InvalidDid(did.to_string()))?;
        let url = self.identifier_url(did);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/did+ld+json, application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await?;
                Self::parse_body(did, method, &body)
            }
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(ResolverError::NotFound(did.to_string())),
            StatusCode::NOT_IMPLEMENTED => Err(ResolverError::UnsupportedMethod {
                method: method.to_string(),
            }),
            status => {
                warn!("resolver at {} answered {} for {}", self.base_url, status, did);
                Err(ResolverError::Status(status))
            }
        }
    }
}
