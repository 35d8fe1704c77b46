use async_trait::async_trait;
use derive_more::Display;

#[derive(Debug, Display, PartialEq)]
pub enum StorageError {
    #[display("Object not found")]
    NotFound,

    #[display("Invalid object key: {_0}")]
    InvalidKey(String),

    #[display("Storage I/O failed: {_0}")]
    Io(String),
}

/// Backend for uploaded media. Objects are addressed by `bucket` and `key`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` and returns the public URL of the object.
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Object keys are single path segments: `[a-z0-9-_]` plus at most one
/// dot for the extension.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 100
        && key.matches('.').count() <= 1
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_cannot_escape_the_bucket() {
        assert!(is_safe_key("0b6f1c2e-2f5a-4c39-a3b8-3f0c1d2e4f5a.png"));
        assert!(!is_safe_key("../secret.png"));
        assert!(!is_safe_key("a/b.png"));
        assert!(!is_safe_key(".env"));
        assert!(!is_safe_key("a..png"));
        assert!(!is_safe_key(""));
    }
}
