use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// A stored document: any JSON value (mapping, sequence or scalar).
///
/// The store never interprets document contents beyond requiring that they
/// encode to JSON.
pub type Document = serde_json::Value;

/// Encode a document into its persisted form.
pub fn encode(document: &Document, pretty: bool) -> StoreResult<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(document)
    } else {
        serde_json::to_vec(document)
    };
    encoded.map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a persisted entry. Empty input is an error.
pub fn decode(bytes: &[u8]) -> Result<Document, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Convert a typed value into a document.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> StoreResult<Document> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Convert a document back into a typed value.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    serde_json::from_value(document).map_err(|e| StoreError::Serialization(e.to_string()))
}
