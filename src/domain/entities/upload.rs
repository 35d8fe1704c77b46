use actix_multipart::form::{bytes::Bytes, MultipartForm};
use serde::{Deserialize, Serialize};

/// Where an uploaded image ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Written to object storage and served by URL.
    Object,
    /// Storage failed; the bytes are embedded in a `data:` URL.
    Inline,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub storage: StorageKind,
    pub content_type: String,
    pub size_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub bucket: Option<String>,
}

/// Multipart body of an image upload. Size is capped by `MultipartFormConfig`.
#[derive(Debug, MultipartForm)]
pub struct ImageUpload {
    #[multipart(rename = "file")]
    pub file: Bytes,
}

pub const DEFAULT_BUCKET: &str = "images";

/// Buckets map to directories, so names are kept to a safe alphabet.
pub fn is_valid_bucket(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket.len() <= 40
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names() {
        assert!(is_valid_bucket("blog-images"));
        assert!(!is_valid_bucket("../etc"));
        assert!(!is_valid_bucket(""));
        assert!(!is_valid_bucket("Images"));
    }

    #[test]
    fn storage_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(StorageKind::Inline).unwrap(), "inline");
    }
}
