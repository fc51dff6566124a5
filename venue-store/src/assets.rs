//! The external asset store seam.
//!
//! Assets are addressed by an opaque, store-defined key: `upload` returns the
//! key, `delete` accepts it back. Callers make no assumptions about its shape
//! (in particular, no URL suffix parsing).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque handle to one externally stored binary asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey(String);

impl AssetKey {
    /// Wrap a store-defined key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key as the store issued it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error types for asset store operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Deletion failed
    #[error("Deletion failed for {key}: {reason}")]
    Delete { key: AssetKey, reason: String },

    /// Store is unreachable
    #[error("Asset store unavailable: {0}")]
    Unavailable(String),
}

/// Trait seam for the external asset store.
///
/// Deletion is best-effort from the caller's perspective: a failed delete is
/// logged and never retried, because the caller's visible state has already
/// moved on.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the given bytes and return the key addressing them.
    async fn upload(&self, bytes: Vec<u8>) -> Result<AssetKey, AssetError>;

    /// Remove the asset behind the key.
    async fn delete(&self, key: &AssetKey) -> Result<(), AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_opaque_passthrough() {
        let key = AssetKey::new("bucket/7f3a-cover.png");
        assert_eq!(key.as_str(), "bucket/7f3a-cover.png");
        assert_eq!(key.to_string(), "bucket/7f3a-cover.png");
    }
}
