// src/utils/serialization.rs
//! JSON serialization helpers shared by the resolvers and the manifest writers.

use serde::{Deserialize, Serialize};
use serde_json;

/// Serializes a value to JSON bytes, ready to be written to content-addressed storage.
///
/// Field order follows the struct declaration, so equal values always produce
/// identical bytes.
pub fn serialize_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(data)
}

/// Deserializes a value from a JSON string.
///
/// # Note
/// The lifetime parameter lets the deserialized value borrow from the input.
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sample {
        name: String,
        write: Vec<String>,
    }

    #[test]
    fn test_bytes_are_stable() {
        let sample = Sample {
            name: "abc.root".to_string(),
            write: vec!["04aa".to_string()],
        };
        let first = serialize_bytes(&sample).unwrap();
        let second = serialize_bytes(&sample).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, br#"{"name":"abc.root","write":["04aa"]}"#);
    }

    #[test]
    fn test_deserialize_error() {
        assert!(deserialize::<Sample>("{\"name\": 1}").is_err());
        let parsed: Sample = deserialize("{\"name\":\"x\",\"write\":[]}").unwrap();
        assert!(parsed.write.is_empty());
    }
}
