//! File-backed response cache.
//!
//! One `<fingerprint>.json` file per cached response. Expiry is derived from the
//! file modification time and checked on read; there is no background sweep.
//! Writes go through a temporary file and a rename, so a concurrent reader sees
//! either the previous complete entry or the new one.

use crate::executor::Arguments;
use crate::types::Result;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Deterministic cache key for a call: SHA-256 over the canonical JSON of
/// `{"arguments": .., "endpoint": ..}` with object keys sorted at every depth.
pub fn fingerprint(endpoint: &str, arguments: &Arguments) -> String {
    let mut key = Map::new();
    key.insert("arguments".to_string(), Value::Object(arguments.clone()));
    key.insert("endpoint".to_string(), Value::String(endpoint.to_string()));

    let mut canonical = String::new();
    write_canonical(&Value::Object(key), &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Response cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    /// Create the cache directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the entry for `fingerprint`.
    pub fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.root.join(format!("{fingerprint}.json"))
    }

    /// Fetch a live entry. Expired entries are deleted and reported absent.
    pub async fn lookup(&self, fingerprint: &str) -> Result<Option<Value>> {
        self.lookup_at(fingerprint, SystemTime::now()).await
    }

    /// [`lookup`](Self::lookup) with an explicit notion of "now".
    pub async fn lookup_at(&self, fingerprint: &str, now: SystemTime) -> Result<Option<Value>> {
        let path = self.entry_path(fingerprint);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        // A modification time in the future counts as age zero.
        let age = now
            .duration_since(metadata.modified()?)
            .unwrap_or(Duration::ZERO);
        if age > self.ttl {
            tracing::debug!(fingerprint, age_secs = age.as_secs(), "cache entry expired");
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(fingerprint, error = %err, "failed to delete expired cache entry");
                }
            }
            return Ok(None);
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            // Deleted by another process between stat and read.
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Overwrite the entry for `fingerprint` with `value`.
    pub async fn store(&self, fingerprint: &str, value: &Value) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let payload = serde_json::to_vec(value)?;
        let target = self.entry_path(fingerprint);
        let tmp = self
            .root
            .join(format!(".{fingerprint}.{}.tmp", uuid::Uuid::new_v4()));

        tokio::fs::write(&tmp, &payload).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let mut a = Map::new();
        a.insert("lat".to_string(), json!("39.9"));
        a.insert("lon".to_string(), json!(116.4));

        let mut b = Map::new();
        b.insert("lon".to_string(), json!(116.4));
        b.insert("lat".to_string(), json!("39.9"));

        assert_eq!(
            fingerprint("https://api.example.com/forecast", &a),
            fingerprint("https://api.example.com/forecast", &b)
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_endpoint_and_values() {
        let a = args(json!({"place": "Beijing,CN"}));
        let b = args(json!({"place": "London,GB"}));

        let base = fingerprint("https://api.example.com/forecast", &a);
        assert_ne!(base, fingerprint("https://api.example.com/forecast", &b));
        assert_ne!(base, fingerprint("https://api.example.com/current", &a));
        assert_eq!(base.len(), 64);
        assert!(base.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let mut out = String::new();
        write_canonical(&json!({"b": {"z": 1, "a": [{"y": true, "x": null}]}, "a": "s"}), &mut out);
        assert_eq!(out, r#"{"a":"s","b":{"a":[{"x":null,"y":true}],"z":1}}"#);
    }

    proptest! {
        #[test]
        fn prop_fingerprint_is_order_independent(
            entries in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12)
        ) {
            let mut forward = Map::new();
            for (k, v) in entries.iter() {
                forward.insert(k.clone(), json!(v));
            }
            let mut backward = Map::new();
            for (k, v) in entries.iter().rev() {
                backward.insert(k.clone(), json!(v));
            }
            prop_assert_eq!(
                fingerprint("https://api.example.com", &forward),
                fingerprint("https://api.example.com", &backward)
            );
        }
    }

    #[tokio::test]
    async fn test_lookup_missing_entry_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));
        assert!(cache.lookup("deadbeef").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));

        cache.store("abc", &json!({"temp": 21.5})).await.unwrap();
        assert!(cache.entry_path("abc").exists());
        assert_eq!(cache.lookup("abc").await.unwrap(), Some(json!({"temp": 21.5})));
    }

    #[tokio::test]
    async fn test_empty_payloads_are_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));

        cache.store("empty", &json!({})).await.unwrap();
        cache.store("null", &Value::Null).await.unwrap();
        assert_eq!(cache.lookup("empty").await.unwrap(), Some(json!({})));
        assert_eq!(cache.lookup("null").await.unwrap(), Some(Value::Null));
    }

    #[tokio::test]
    async fn test_store_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));

        cache.store("key", &json!(1)).await.unwrap();
        cache.store("key", &json!(2)).await.unwrap();
        assert_eq!(cache.lookup("key").await.unwrap(), Some(json!(2)));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["key.json".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_entry_is_purged() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));
        cache.store("old", &json!({"stale": true})).await.unwrap();

        let later = SystemTime::now() + Duration::from_secs(3601);
        assert!(cache.lookup_at("old", later).await.unwrap().is_none());
        assert!(!cache.entry_path("old").exists());

        // Gone for good, even at the original time.
        assert!(cache.lookup("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_within_ttl_survives() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));
        cache.store("fresh", &json!([1, 2])).await.unwrap();

        let later = SystemTime::now() + Duration::from_secs(1800);
        assert_eq!(cache.lookup_at("fresh", later).await.unwrap(), Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path(), Duration::from_secs(3600));
        std::fs::write(cache.entry_path("bad"), b"{truncated").unwrap();

        assert!(cache.lookup("bad").await.is_err());
    }

    #[tokio::test]
    async fn test_store_recreates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("api");
        let cache = CacheStore::new(&root, Duration::from_secs(60));

        cache.store("k", &json!("v")).await.unwrap();
        assert!(root.join("k.json").exists());
    }
}
