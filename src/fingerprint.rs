//! Tool call argument fingerprinting.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Fingerprint returned for non-object or null argument payloads.
pub const SENTINEL_FINGERPRINT: u64 = 0;

/// Compute a deterministic structural hash of a tool call's arguments.
///
/// Object keys are visited in sorted order, so two payloads that differ only
/// in key insertion order produce the same fingerprint. Non-object input
/// (including null) yields [`SENTINEL_FINGERPRINT`]; the hash walk itself
/// cannot fail. Used only for equality between consecutive calls, so
/// collisions are tolerated.
#[must_use]
pub fn fingerprint(args: &Value) -> u64 {
    if !args.is_object() {
        return SENTINEL_FINGERPRINT;
    }

    let mut hasher = Sha256::new();
    hash_value(&mut hasher, args);
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let hash = u64::from_be_bytes(prefix);

    // 0 stays reserved for the sentinel.
    if hash == SENTINEL_FINGERPRINT {
        1
    } else {
        hash
    }
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update(b"n"),
        Value::Bool(true) => hasher.update(b"t"),
        Value::Bool(false) => hasher.update(b"f"),
        Value::Number(number) => {
            hasher.update(b"#");
            hasher.update(number.to_string().as_bytes());
        }
        Value::String(text) => hash_str(hasher, text),
        Value::Array(items) => {
            hasher.update(b"[");
            for item in items {
                hash_value(hasher, item);
            }
            hasher.update(b"]");
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            hasher.update(b"{");
            for key in keys {
                hash_str(hasher, key);
                if let Some(item) = map.get(key) {
                    hash_value(hasher, item);
                }
            }
            hasher.update(b"}");
        }
    }
}

// Length-prefixed so adjacent strings cannot alias each other.
fn hash_str(hasher: &mut Sha256, text: &str) {
    hasher.update((text.len() as u64).to_le_bytes());
    hasher.update(text.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::{fingerprint, SENTINEL_FINGERPRINT};
    use serde_json::{json, Map, Value};

    #[test]
    fn key_order_does_not_matter() {
        let mut forward = Map::new();
        forward.insert("alpha".to_string(), json!(1));
        forward.insert("beta".to_string(), json!([1, 2]));

        let mut reverse = Map::new();
        reverse.insert("beta".to_string(), json!([1, 2]));
        reverse.insert("alpha".to_string(), json!(1));

        assert_eq!(
            fingerprint(&Value::Object(forward)),
            fingerprint(&Value::Object(reverse))
        );
    }

    #[test]
    fn non_object_input_yields_sentinel() {
        assert_eq!(fingerprint(&Value::Null), SENTINEL_FINGERPRINT);
        assert_eq!(fingerprint(&json!("text")), SENTINEL_FINGERPRINT);
        assert_eq!(fingerprint(&json!(42)), SENTINEL_FINGERPRINT);
        assert_eq!(fingerprint(&json!([1, 2, 3])), SENTINEL_FINGERPRINT);
    }

    #[test]
    fn object_never_yields_sentinel() {
        assert_ne!(fingerprint(&json!({})), SENTINEL_FINGERPRINT);
        assert_ne!(fingerprint(&json!({ "a": 1 })), SENTINEL_FINGERPRINT);
    }

    #[test]
    fn value_changes_change_the_fingerprint() {
        assert_ne!(
            fingerprint(&json!({ "path": "a.txt" })),
            fingerprint(&json!({ "path": "b.txt" }))
        );
        assert_ne!(
            fingerprint(&json!({ "items": [1, 2] })),
            fingerprint(&json!({ "items": [2, 1] }))
        );
    }

    #[test]
    fn identical_payloads_are_stable() {
        let args = json!({ "cmd": "ls", "cwd": "/tmp", "env": { "A": "1" } });
        assert_eq!(fingerprint(&args), fingerprint(&args.clone()));
    }
}
