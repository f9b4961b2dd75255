// src/models/access.rs
//! Store options, access policies and store addresses.
//!
//! These mirror the options an OrbitDB-style log database takes when an address
//! is determined: a manifest format, an access controller with a write
//! allowlist, and the kind of store being opened.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access controller type understood by 3Box-era root stores.
pub const LEGACY_ACCESS_CONTROLLER: &str = "legacy-ipfs-3box";

/// Store kinds a log database can open.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Append-only log whose entries can be removed by hash.
    Feed,
    EventLog,
    KeyValue,
    DocStore,
    Counter,
}

impl StoreKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKind::Feed => "feed",
            StoreKind::EventLog => "eventlog",
            StoreKind::KeyValue => "keyvalue",
            StoreKind::DocStore => "docstore",
            StoreKind::Counter => "counter",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IPLD format used when writing the database manifest.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManifestFormat {
    #[default]
    #[serde(rename = "dag-pb")]
    DagPb,
    #[serde(rename = "dag-cbor")]
    DagCbor,
}

impl ManifestFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            ManifestFormat::DagPb => "dag-pb",
            ManifestFormat::DagCbor => "dag-cbor",
        }
    }
}

/// Access controller section of [`StoreOptions`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessControllerOptions {
    /// Keys allowed to append, in order.
    pub write: Vec<String>,
    #[serde(rename = "type")]
    pub controller_type: String,
    /// When set, the write list itself is the controller address and no
    /// separate controller manifest is written.
    pub skip_manifest: bool,
}

/// The access policy handed to an allocator alongside the store name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreOptions {
    pub format: ManifestFormat,
    pub access_controller: AccessControllerOptions,
}

impl StoreOptions {
    /// Options for a root store writable only by `signing_key`.
    ///
    /// The key must already be in uncompressed form; the legacy access
    /// controller does not accept compressed points.
    pub fn single_writer(signing_key: impl Into<String>) -> Self {
        Self {
            format: ManifestFormat::DagPb,
            access_controller: AccessControllerOptions {
                write: vec![signing_key.into()],
                controller_type: LEGACY_ACCESS_CONTROLLER.to_string(),
                skip_manifest: true,
            },
        }
    }
}

/// Address of a store, rendered as `/orbitdb/<root>/<path>`.
///
/// `root` is the content identifier of the database manifest and `path` is the
/// store name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreAddress {
    pub root: String,
    pub path: String,
}

impl StoreAddress {
    pub const PREFIX: &'static str = "/orbitdb/";

    pub fn new(root: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    /// Parses `/orbitdb/<root>/<path>`; the leading `/orbitdb/` is optional.
    pub fn parse(address: &str) -> Result<Self, AddressParseError> {
        let trimmed = address.strip_prefix(Self::PREFIX).unwrap_or(address);
        match trimmed.split_once('/') {
            Some((root, path)) if !root.is_empty() && !path.is_empty() => {
                Ok(Self::new(root, path))
            }
            _ => Err(AddressParseError(address.to_string())),
        }
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", Self::PREFIX, self.root, self.path)
    }
}

impl FromStr for StoreAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("not a store address: {0:?}")]
pub struct AddressParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_writer_shape() {
        let options = StoreOptions::single_writer("04abcd");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "format": "dag-pb",
                "accessController": {
                    "write": ["04abcd"],
                    "type": "legacy-ipfs-3box",
                    "skipManifest": true
                }
            })
        );
    }

    #[test]
    fn test_store_kind_names() {
        assert_eq!(StoreKind::Feed.to_string(), "feed");
        assert_eq!(serde_json::to_value(StoreKind::DocStore).unwrap(), json!("docstore"));
        assert_eq!(
            serde_json::from_value::<StoreKind>(json!("eventlog")).unwrap(),
            StoreKind::EventLog
        );
    }

    #[test]
    fn test_address_display_and_parse() {
        let address = StoreAddress::new("zdpuAx", "1220ab.root");
        assert_eq!(address.to_string(), "/orbitdb/zdpuAx/1220ab.root");
        assert_eq!(StoreAddress::parse("/orbitdb/zdpuAx/1220ab.root").unwrap(), address);
        assert_eq!("zdpuAx/1220ab.root".parse::<StoreAddress>().unwrap(), address);
        assert!(StoreAddress::parse("/orbitdb/zdpuAx").is_err());
        assert!(StoreAddress::parse("/orbitdb//name").is_err());
    }
}
