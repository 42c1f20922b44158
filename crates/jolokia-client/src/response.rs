//! Decoding of Jolokia response envelopes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Envelope, Tree};

/// Sub-tree of a LIST bean entry holding attribute meta-data.
pub const ATTR_KEY: &str = "attr";

/// Sub-tree of a LIST bean entry holding operation meta-data.
pub const OP_KEY: &str = "op";

/// Parse an envelope and return its value if the agent reported success.
///
/// The value is only converted to `T` once the status is known to be 200;
/// an error envelope's value is never looked at.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    let envelope: Envelope<Value> = serde_json::from_slice(body).map_err(Error::Decode)?;
    if !envelope.is_success() {
        tracing::warn!(
            status = envelope.status,
            error = envelope.error.as_deref().unwrap_or_default(),
            "Jolokia agent reported an error"
        );
        return Err(Error::Protocol {
            status: envelope.status,
            message: envelope
                .error
                .unwrap_or_else(|| format!("status {}", envelope.status)),
            error_type: envelope.error_type,
        });
    }
    envelope
        .value
        .map(|value| serde_json::from_value(value).map_err(Error::Decode))
        .transpose()
}

/// Decode an envelope whose value is a key/value tree.
pub fn decode_tree(body: &[u8]) -> Result<Tree> {
    Ok(decode::<Tree>(body)?.unwrap_or_default())
}

/// Decode an envelope whose value is any single JSON value.
pub fn decode_scalar(body: &[u8]) -> Result<Value> {
    Ok(decode::<Value>(body)?.unwrap_or(Value::Null))
}

/// Keys of a tree in alphabetical order.
pub fn sorted_keys(tree: &Tree) -> Vec<String> {
    let mut keys: Vec<String> = tree.keys().cloned().collect();
    keys.sort();
    keys.dedup();
    keys
}

/// The mapping stored under `key`, which a LIST bean entry must carry.
pub fn sub_tree<'a>(tree: &'a Tree, key: &str) -> Result<&'a Tree> {
    tree.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MalformedResponse(format!("missing {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_decode_tree_sorted_keys() {
        let tree = decode_tree(&body(json!({
            "status": 200,
            "timestamp": 1700000000,
            "request": {"type": "list"},
            "value": {"b": 2, "a": 1}
        })))
        .unwrap();

        assert_eq!(sorted_keys(&tree), vec!["a", "b"]);
    }

    #[test]
    fn test_decode_scalar_values() {
        let number = decode_scalar(&body(json!({"status": 200, "timestamp": 1, "value": 153})))
            .unwrap();
        assert_eq!(number, json!(153));

        let nested = decode_scalar(&body(json!({
            "status": 200,
            "timestamp": 1,
            "value": {"used": 10, "max": 20}
        })))
        .unwrap();
        assert_eq!(nested["max"], 20);

        let missing = decode_scalar(&body(json!({"status": 200, "timestamp": 1}))).unwrap();
        assert!(missing.is_null());
    }

    #[test]
    fn test_non_200_status_is_protocol_error() {
        let err = decode_scalar(&body(json!({
            "status": 404,
            "timestamp": 1,
            "error": "bean not found",
            "error_type": "javax.management.InstanceNotFoundException"
        })))
        .unwrap_err();

        match err {
            Error::Protocol {
                status,
                message,
                error_type,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "bean not found");
                assert_eq!(
                    error_type.as_deref(),
                    Some("javax.management.InstanceNotFoundException")
                );
            }
            other => panic!("Expected Protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_protocol_error_ignores_value() {
        let err = decode_tree(&body(json!({
            "status": 500,
            "value": {"stale": true},
            "error": "boom"
        })))
        .unwrap_err();
        assert_eq!(err.protocol_message(), Some("boom"));
    }

    #[test]
    fn test_protocol_error_with_non_tree_value() {
        let err = decode_tree(&body(json!({
            "status": 404,
            "value": "n/a",
            "error": "bean not found"
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol { status: 404, ref message, .. } if message == "bean not found"
        ));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = decode_tree(b"<html>not json</html>").unwrap_err();
        assert!(err.is_decode());

        let err = decode_tree(&body(json!({"status": 200, "value": [1, 2]}))).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_sub_tree_requires_mapping() {
        let tree: Tree = serde_json::from_value(json!({
            "attr": {"HeapMemoryUsage": {"type": "javax.management.openmbean.CompositeData"}},
            "op": "not-a-map",
            "desc": "Memory"
        }))
        .unwrap();

        let attrs = sub_tree(&tree, ATTR_KEY).unwrap();
        assert_eq!(sorted_keys(attrs), vec!["HeapMemoryUsage"]);

        let err = sub_tree(&tree, OP_KEY).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(ref m) if m == "missing op"));

        let empty = Tree::new();
        let err = sub_tree(&empty, ATTR_KEY).unwrap_err();
        assert_eq!(err.to_string(), "Invalid response format: missing attr");
    }
}
