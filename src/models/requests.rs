//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming lookup requests.

use serde::Deserialize;

use crate::error::{ProxyError, Result};

/// Query string for the lookup operation (GET /cache?key=...)
///
/// # Fields
/// - `key`: The key to look up; required and non-empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupQuery {
    /// The requested key
    #[serde(default)]
    pub key: Option<String>,
}

impl LookupQuery {
    /// Validates the query and returns the key.
    pub fn into_key(self) -> Result<String> {
        match self.key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ProxyError::InvalidRequest(
                "query parameter 'key' is required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_query_deserialize() {
        let query: LookupQuery = serde_json::from_str(r#"{"key": "test"}"#).unwrap();
        assert_eq!(query.into_key().unwrap(), "test");
    }

    #[test]
    fn test_missing_key_is_invalid() {
        let query: LookupQuery = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            query.into_key(),
            Err(ProxyError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_empty_key_is_invalid() {
        let query = LookupQuery {
            key: Some(String::new()),
        };
        assert!(query.into_key().is_err());
    }
}
