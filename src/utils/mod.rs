pub mod crypto;
pub mod multihash;
pub mod serialization;
