//! JSON value codec.
//!
//! Every element value crosses the wire as JSON text of the caller's type.
//! The codec boundary is the only place the storage format appears; adapter
//! logic never inspects value structure beyond round-tripping it here.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::CacheError;

/// Serialize a value to its wire representation.
pub fn encode<T: Serialize>(value: &T) -> Result<String, CacheError> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize stored text into a value.
///
/// Empty or whitespace-only text is the "absent" sentinel and yields the
/// type's zero value. Malformed text fails with
/// [`CacheError::Serialization`]; it is never silently swallowed.
pub fn decode<T: DeserializeOwned + Default>(text: &str) -> Result<T, CacheError> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(text)?)
}

/// Deserialize possibly-missing stored text; a missing value is the same
/// "absent" sentinel as empty text.
pub fn decode_opt<T: DeserializeOwned + Default>(text: Option<&str>) -> Result<T, CacheError> {
    match text {
        Some(text) => decode(text),
        None => Ok(T::default()),
    }
}
