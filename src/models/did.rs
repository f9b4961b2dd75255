// src/models/did.rs
//! Decentralized Identifier (DID) document model.
//!
//! Covers the subset of the [DID Core Specification](https://www.w3.org/TR/did-core/)
//! needed to locate a subject's signing key. Older documents (3Box, uPort, ethr)
//! list keys under `publicKey`; newer ones use `verificationMethod`. Both are
//! accepted, and a document carrying both lists is read as `publicKey` followed
//! by `verificationMethod`.

use serde::{Deserialize, Serialize};

/// Fragment marker identifying the signing key entry of a document,
/// e.g. `did:3:bafy...#signingKey`.
pub const SIGNING_KEY_MARKER: &str = "#signingKey";

/// A resolved DID Document.
///
/// # DID Format
/// The `id` field follows DID syntax:
/// ```text
/// did:<method>:<method-specific-id>
/// ```
/// Deserialization requires `id`; key lists are optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "RawDidDocument")]
pub struct DidDocument {
    /// The complete DID string identifier
    /// Example: "did:example:123456789abcdefghi"
    pub id: String,

    /// Public keys in the order the document lists them.
    pub public_key: Vec<PublicKeyEntry>,
}

/// Wire shape of a document before the two key lists are merged.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDidDocument {
    id: String,
    #[serde(default)]
    public_key: Vec<PublicKeyEntry>,
    #[serde(default)]
    verification_method: Vec<PublicKeyEntry>,
}

impl From<RawDidDocument> for DidDocument {
    fn from(raw: RawDidDocument) -> Self {
        let mut public_key = raw.public_key;
        public_key.extend(raw.verification_method);
        DidDocument {
            id: raw.id,
            public_key,
        }
    }
}

/// One entry of a document's `publicKey` list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyEntry {
    /// Key identifier, usually `<did>#<fragment>`.
    pub id: String,

    /// Key type, e.g. `Secp256k1VerificationKey2018`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,

    /// DID controlling the key. Legacy documents call this `owner`.
    #[serde(default, alias = "owner", skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// Hex-encoded public key material. Absent on keys published in another
    /// encoding, such as 3Box encryption keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,

    /// Base64-encoded public key material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_base64: Option<String>,
}

impl PublicKeyEntry {
    pub fn new(id: impl Into<String>, public_key_hex: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key_type: None,
            controller: None,
            public_key_hex: Some(public_key_hex.into()),
            public_key_base64: None,
        }
    }

    pub fn is_signing_key(&self) -> bool {
        self.id.contains(SIGNING_KEY_MARKER)
    }
}

impl DidDocument {
    pub fn new(id: impl Into<String>, public_key: Vec<PublicKeyEntry>) -> Self {
        Self {
            id: id.into(),
            public_key,
        }
    }

    /// Returns the signing key entry.
    ///
    /// Entries are scanned in document order and the first one whose `id`
    /// contains [`SIGNING_KEY_MARKER`] wins; later marked entries are ignored.
    /// There is no fallback to unmarked keys.
    pub fn signing_key(&self) -> Option<&PublicKeyEntry> {
        self.public_key.iter().find(|entry| entry.is_signing_key())
    }
}

/// Returns the method name of a DID (`web` for `did:web:example.com`).
///
/// Returns `None` unless the string has the `did:<method>:<id>` shape with a
/// lowercase alphanumeric method and a non-empty method-specific id.
pub fn did_method(did: &str) -> Option<&str> {
    let rest = did.strip_prefix("did:")?;
    let (method, id) = rest.split_once(':')?;
    let valid_method = !method.is_empty()
        && method
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    if valid_method && !id.is_empty() {
        Some(method)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_marked_key_wins() {
        let doc = DidDocument::new(
            "did:example:123",
            vec![
                PublicKeyEntry::new("did:example:123#managementKey", "aa"),
                PublicKeyEntry::new("did:example:123#signingKey-1", "bb"),
                PublicKeyEntry::new("did:example:123#signingKey-2", "cc"),
            ],
        );
        assert_eq!(doc.signing_key().unwrap().public_key_hex.as_deref(), Some("bb"));
    }

    #[test]
    fn test_no_fallback_without_marker() {
        let doc = DidDocument::new(
            "did:example:123",
            vec![
                PublicKeyEntry::new("did:example:123#encryptionKey", "aa"),
                PublicKeyEntry::new("did:example:123#signing", "bb"),
            ],
        );
        assert!(doc.signing_key().is_none());
        assert!(DidDocument::new("did:example:123", vec![]).signing_key().is_none());
    }

    #[test]
    fn test_parse_legacy_document() {
        let json = r##"{
            "@context": "https://w3id.org/did/v1",
            "id": "did:3:bafyabc",
            "publicKey": [
                {
                    "id": "did:3:bafyabc#signingKey",
                    "type": "Secp256k1VerificationKey2018",
                    "owner": "did:3:bafyabc",
                    "publicKeyHex": "02aa"
                }
            ],
            "authentication": []
        }"##;
        let doc: DidDocument = serde_json::from_str(json).unwrap();
        let key = doc.signing_key().unwrap();
        assert_eq!(key.public_key_hex.as_deref(), Some("02aa"));
        assert_eq!(key.controller.as_deref(), Some("did:3:bafyabc"));
        assert_eq!(key.key_type.as_deref(), Some("Secp256k1VerificationKey2018"));
    }

    #[test]
    fn test_parse_verification_method() {
        let json = r##"{
            "id": "did:example:123",
            "verificationMethod": [
                { "id": "did:example:123#signingKey", "controller": "did:example:123", "publicKeyHex": "03bb" }
            ]
        }"##;
        let doc: DidDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.public_key.len(), 1);
        assert_eq!(doc.signing_key().unwrap().public_key_hex.as_deref(), Some("03bb"));
    }

    #[test]
    fn test_parse_3box_document_with_base64_key() {
        let json = r##"{
            "@context": "https://w3id.org/did/v1",
            "id": "did:3:bafyabc",
            "publicKey": [
                {
                    "id": "did:3:bafyabc#signingKey",
                    "type": "Secp256k1VerificationKey2018",
                    "publicKeyHex": "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
                },
                {
                    "id": "did:3:bafyabc#encryptionKey",
                    "type": "Curve25519EncryptionPublicKey",
                    "publicKeyBase64": "8DqJ5Ssm/Lb+bKIqh8tkuwtC8y1JfYpeIoJ5d7hzvGU="
                }
            ],
            "authentication": [
                { "type": "Secp256k1SignatureAuthentication2018", "publicKey": "did:3:bafyabc#signingKey" }
            ]
        }"##;
        let doc: DidDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.public_key.len(), 2);
        let encryption = &doc.public_key[1];
        assert!(encryption.public_key_hex.is_none());
        assert_eq!(
            encryption.public_key_base64.as_deref(),
            Some("8DqJ5Ssm/Lb+bKIqh8tkuwtC8y1JfYpeIoJ5d7hzvGU=")
        );
        assert_eq!(doc.signing_key().unwrap().id, "did:3:bafyabc#signingKey");
    }

    #[test]
    fn test_parse_both_key_lists() {
        let json = r##"{
            "id": "did:example:123",
            "verificationMethod": [
                { "id": "did:example:123#signingKey-2", "publicKeyHex": "03bb" }
            ],
            "publicKey": [
                { "id": "did:example:123#managementKey", "publicKeyHex": "02aa" },
                { "id": "did:example:123#signingKey-1", "publicKeyHex": "02cc" }
            ]
        }"##;
        let doc: DidDocument = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = doc.public_key.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "did:example:123#managementKey",
                "did:example:123#signingKey-1",
                "did:example:123#signingKey-2"
            ]
        );
        assert_eq!(doc.signing_key().unwrap().public_key_hex.as_deref(), Some("02cc"));
    }

    #[test]
    fn test_document_requires_id() {
        assert!(serde_json::from_str::<DidDocument>("{}").is_err());
        assert!(serde_json::from_str::<DidDocument>(r#"{"publicKey": []}"#).is_err());
        let doc: DidDocument = serde_json::from_str(r#"{"id": "did:example:123"}"#).unwrap();
        assert!(doc.public_key.is_empty());
    }

    #[test]
    fn test_serializes_merged_keys_as_public_key() {
        let doc = DidDocument::new(
            "did:example:123",
            vec![PublicKeyEntry::new("did:example:123#signingKey", "02aa")],
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["publicKey"][0]["publicKeyHex"], "02aa");
        assert!(value.get("verificationMethod").is_none());
        assert!(value["publicKey"][0].get("publicKeyBase64").is_none());
        let back: DidDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_did_method() {
        assert_eq!(did_method("did:example:123"), Some("example"));
        assert_eq!(did_method("did:web:example.com:user:alice"), Some("web"));
        assert_eq!(did_method("did:3:bafy"), Some("3"));
        assert_eq!(did_method("did:example:"), None);
        assert_eq!(did_method("did::123"), None);
        assert_eq!(did_method("did:Example:123"), None);
        assert_eq!(did_method("example:123"), None);
        assert_eq!(did_method(""), None);
    }
}
