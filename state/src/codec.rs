//! JSON snapshot codec

use keepsake_core::{KeepsakeError, KeepsakeResult, SnapshotCodec};
use serde_json::Value;
use std::path::Path;

/// Default codec: UTF-8 JSON, compact unless `pretty` is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotCodec for JsonCodec {
    fn encode(&self, value: &Value) -> KeepsakeResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(|e| KeepsakeError::Encode(e.to_string()))
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> KeepsakeResult<Value> {
        serde_json::from_slice(bytes).map_err(|e| KeepsakeError::decode(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_and_pretty() {
        let value = json!({ "counter": 10 });

        let compact = JsonCodec::new().encode(&value).unwrap();
        assert_eq!(compact, br#"{"counter":10}"#);

        let pretty = JsonCodec::pretty().encode(&value).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains('\n'));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let codec = JsonCodec::new();
        let path = Path::new("AppState/1/AppState.json");

        let err = codec.decode(path, br#"{"counter":"#).unwrap_err();
        assert!(matches!(err, KeepsakeError::Decode { path: p, .. } if p.as_path() == path));
        assert_eq!(codec.decode(path, b"[1,2]").unwrap(), json!([1, 2]));
    }
}
