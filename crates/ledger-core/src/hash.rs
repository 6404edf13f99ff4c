use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::block::Block;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compact JSON of the block with object keys in lexicographic order at every level.
pub fn canonical_json(block: &Block) -> serde_json::Result<Vec<u8>> {
    let value = sorted(serde_json::to_value(block)?);
    serde_json::to_vec(&value)
}

/// Hex SHA-256 over the canonical encoding of the whole block, transactions included.
pub fn hash_block(block: &Block) -> serde_json::Result<String> {
    Ok(sha256_hex(&canonical_json(block)?))
}

// Rebuild maps in key order so the encoding does not depend on how serde_json's
// map type is configured elsewhere in the dependency graph.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, sorted(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
