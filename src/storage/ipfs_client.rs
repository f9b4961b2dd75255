// src/storage/ipfs_client.rs
//! IPFS block storage for store manifests.
//!
//! Talks to a node's RPC API (`/api/v0`) for:
//! - Writing manifests as unixfs (`dag-pb`) files or `dag-cbor` nodes
//! - Reading them back by content identifier
//!
//! Every RPC command is a `POST`; uploads are multipart bodies with a single
//! `file` part.
//!
//! # Security Considerations
//! - All stored data is public by default (IPFS is a public network)
//! - Hashes are content-addressable and permanent

use super::{ContentStore, StorageError};
use crate::config::IpfsSettings;
use crate::models::access::ManifestFormat;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::Deserialize;

/// API endpoint of a local node.
pub const DEFAULT_API_URL: &str = "http://localhost:5001";

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

#[derive(Deserialize)]
struct DagPutResponse {
    #[serde(rename = "Cid")]
    cid: CidLink,
}

#[derive(Deserialize)]
struct CidLink {
    #[serde(rename = "/")]
    cid: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

/// IPFS RPC client. Cloning shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct IpfsStorage {
    client: Client,
    api_url: String,
}

impl IpfsStorage {
    /// Creates a client for the node at [`DEFAULT_API_URL`].
    ///
    /// Connection errors surface on the first operation, not here.
    pub fn new() -> Self {
        IpfsStorage {
            client: Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Creates a client for the configured API endpoint.
    pub fn from_settings(settings: &IpfsSettings) -> Result<Self, StorageError> {
        Self::with_client(Client::new(), &settings.api_url)
    }

    /// Uses `client` for requests to the node at `api_url`.
    pub fn with_client(client: Client, api_url: &str) -> Result<Self, StorageError> {
        let url = Url::parse(api_url)
            .map_err(|e| StorageError::InvalidUri(format!("{}: {}", api_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StorageError::InvalidUri(format!(
                "{}: scheme must be http or https",
                api_url
            )));
        }
        Ok(IpfsStorage {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.api_url, command)
    }

    /// Passes successful responses through and turns the rest into errors
    /// carrying the node's message.
    async fn check(response: Response) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        warn!("ipfs api returned {}: {}", status, message);
        Err(StorageError::Ipfs(format!("{}: {}", status, message)))
    }

    async fn upload(
        &self,
        command: &str,
        query: &[(&str, &str)],
        data: Vec<u8>,
    ) -> Result<Bytes, StorageError> {
        let form = Form::new().part("file", Part::bytes(data).file_name("manifest"));
        let response = self
            .client
            .post(self.endpoint(command))
            .query(query)
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.bytes().await?)
    }

    async fn download(&self, command: &str, cid: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .post(self.endpoint(command))
            .query(&[("arg", cid)])
            .send()
            .await?;
        let data = Self::check(response)
            .await?
            .bytes_stream()
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?;
        Ok(data.to_vec())
    }

    /// Stores raw bytes as a pinned unixfs file and returns its CID.
    pub async fn store_data(&self, data: Vec<u8>) -> Result<String, StorageError> {
        let body = self.upload("add", &[("pin", "true")], data).await?;
        let added: AddResponse = serde_json::from_slice(&body)?;
        Ok(added.hash)
    }

    /// Stores a JSON document as a pinned `dag-cbor` node and returns its CID.
    pub async fn store_dag(&self, json: Vec<u8>) -> Result<String, StorageError> {
        let query = [
            ("store-codec", "dag-cbor"),
            ("input-codec", "dag-json"),
            ("pin", "true"),
        ];
        let body = self.upload("dag/put", &query, json).await?;
        let put: DagPutResponse = serde_json::from_slice(&body)?;
        Ok(put.cid.cid)
    }

    /// Retrieves a unixfs file by CID.
    pub async fn retrieve_data(&self, cid: &str) -> Result<Vec<u8>, StorageError> {
        self.download("cat", cid).await
    }

    /// Retrieves a DAG node by CID, rendered as JSON by the node.
    pub async fn retrieve_dag(&self, cid: &str) -> Result<Vec<u8>, StorageError> {
        self.download("dag/get", cid).await
    }
}

impl Default for IpfsStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for IpfsStorage {
    async fn put(&self, data: Vec<u8>, format: ManifestFormat) -> Result<String, StorageError> {
        let cid = match format {
            ManifestFormat::DagPb => self.store_data(data).await?,
            ManifestFormat::DagCbor => self.store_dag(data).await?,
        };
        debug!("stored {} block {}", format.as_str(), cid);
        Ok(cid)
    }

    async fn get(&self, cid: &str, format: ManifestFormat) -> Result<Vec<u8>, StorageError> {
        match format {
            ManifestFormat::DagPb => self.retrieve_data(cid).await,
            ManifestFormat::DagCbor => self.retrieve_dag(cid).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::access::{StoreKind, StoreOptions};
    use crate::storage::{AddressAllocator, IpfsAllocator};
    use mockito::{mock, Matcher};

    fn mock_node() -> IpfsStorage {
        IpfsStorage::from_settings(&IpfsSettings {
            api_url: mockito::server_url(),
        })
        .unwrap()
    }

    #[test]
    fn test_from_settings_rejects_bad_uri() {
        for api_url in ["not a uri", "ftp://localhost:5001"] {
            let settings = IpfsSettings {
                api_url: api_url.to_string(),
            };
            assert!(matches!(
                IpfsStorage::from_settings(&settings),
                Err(StorageError::InvalidUri(_))
            ));
        }
    }

    #[test]
    fn test_from_settings_accepts_default() {
        let storage = IpfsStorage::from_settings(&IpfsSettings::default()).unwrap();
        assert_eq!(storage.api_url(), DEFAULT_API_URL);
        assert_eq!(storage.endpoint("add"), "http://localhost:5001/api/v0/add");

        let trailing = IpfsStorage::with_client(Client::new(), "http://127.0.0.1:5001/").unwrap();
        assert_eq!(trailing.endpoint("cat"), "http://127.0.0.1:5001/api/v0/cat");
    }

    #[tokio::test]
    async fn test_store_data_posts_unixfs_file() {
        let m = mock("POST", Matcher::Regex(r"^/api/v0/add".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Name":"manifest","Hash":"QmManifest","Size":"42"}"#)
            .create();

        let cid = mock_node()
            .put(b"{\"write\":[]}".to_vec(), ManifestFormat::DagPb)
            .await
            .unwrap();
        assert_eq!(cid, "QmManifest");
        m.assert();
    }

    #[tokio::test]
    async fn test_retrieve_data_collects_body() {
        let _m = mock("POST", Matcher::Regex(r"^/api/v0/cat".to_string()))
            .with_status(200)
            .with_body("{\"name\":\"abc.root\"}")
            .create();

        let data = mock_node().retrieve_data("QmManifest").await.unwrap();
        assert_eq!(data, b"{\"name\":\"abc.root\"}");
    }

    #[tokio::test]
    async fn test_node_error_message_is_reported() {
        let _m = mock("POST", Matcher::Regex(r"^/api/v0/dag/get".to_string()))
            .with_status(500)
            .with_body(r#"{"Message":"merkledag: not found","Code":0,"Type":"error"}"#)
            .create();

        match mock_node().get("bafyMissing", ManifestFormat::DagCbor).await {
            Err(StorageError::Ipfs(message)) => assert!(message.contains("merkledag: not found")),
            other => panic!("expected ipfs error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_allocator_writes_dag_cbor_blocks() {
        let m = mock("POST", Matcher::Regex(r"^/api/v0/dag/put".to_string()))
            .with_status(200)
            .with_body(r#"{"Cid":{"/":"bafyreimanifest"}}"#)
            .expect(2)
            .create();

        let allocator = IpfsAllocator::new(mock_node());
        let mut options = StoreOptions::single_writer("04aa");
        options.format = ManifestFormat::DagCbor;
        let address = allocator
            .allocate("abc.root", StoreKind::Feed, &options)
            .await
            .unwrap();
        assert_eq!(address, "/orbitdb/bafyreimanifest/abc.root");
        m.assert();
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let storage = IpfsStorage::with_client(Client::new(), "http://127.0.0.1:1").unwrap();
        assert!(matches!(
            storage.store_data(b"x".to_vec()).await,
            Err(StorageError::Http(_))
        ));
    }
}
