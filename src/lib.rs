// src/lib.rs

//! # DID Root Store
//!
//! Derives the address of a DID's root store: a single-writer append log whose
//! name is a fingerprint of the DID and whose only writer is the DID's signing key.
//!
//! ## Architecture Overview
//! 1. **Resolver Layer**: [`resolver::DidResolver`] implementations turn a DID into a document
//! 2. **Cryptography Layer**: secp256k1 key decompression and multihash fingerprints
//! 3. **Storage Layer**: [`storage::AddressAllocator`] implementations turn a name and
//!    policy into an address, optionally writing manifests to IPFS
//! 4. **Services Layer**: [`IdentityAddressResolver`] ties the pipeline together
//!
//! ## Example
//! ```no_run
//! use did_root_store::config::Settings;
//! use did_root_store::resolver::UniversalResolver;
//! use did_root_store::storage::IpfsAllocator;
//! use did_root_store::IdentityAddressResolver;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(Some("did-root-store"))?;
//! let resolver = IdentityAddressResolver::new(UniversalResolver::from_settings(&settings.resolver)?);
//! let allocator = IpfsAllocator::from_settings(&settings.ipfs)?;
//! let address = resolver.derive_address("did:3:bafy...", &allocator).await?;
//! println!("{}", address);
//! # Ok(())
//! # }
//! ```

pub mod config;        // Settings and logger setup
pub mod error;         // Pipeline error taxonomy
pub mod models;        // DID documents, store options and addresses
pub mod resolver;      // DID resolution
pub mod services;      // Address derivation
pub mod storage;       // Address allocation and manifest storage
pub mod utils;         // Hashing, key handling, serialization

pub use error::AddressError;
pub use models::access::{StoreAddress, StoreKind, StoreOptions};
pub use models::did::{DidDocument, PublicKeyEntry};
pub use services::address_resolver::IdentityAddressResolver;
