use base64::{engine::general_purpose::STANDARD, Engine};
use uuid::Uuid;

use crate::{
    entities::upload::{is_valid_bucket, StorageKind, UploadedImage},
    errors::AppError,
    storage::object_storage::{ObjectStorage, StorageError},
};

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp", "image/avif"];

pub struct UploadHandler<S>
where
    S: ObjectStorage,
{
    pub storage: S,
    pub max_upload_bytes: usize,
    pub inline_fallback_max_bytes: usize,
}

impl<S> UploadHandler<S>
where
    S: ObjectStorage,
{
    pub fn new(storage: S, max_upload_bytes: usize, inline_fallback_max_bytes: usize) -> Self {
        UploadHandler {
            storage,
            max_upload_bytes,
            inline_fallback_max_bytes,
        }
    }

    /// Stores an image and returns where it can be fetched from. When the
    /// backend fails, small images come back as a `data:` URL instead.
    pub async fn upload(&self, bucket: &str, bytes: &[u8]) -> Result<UploadedImage, AppError> {
        if !is_valid_bucket(bucket) {
            return Err(AppError::field("bucket", "Bucket names may contain lowercase letters, digits, '-' or '_'"));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".into()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Images may be at most {} bytes",
                self.max_upload_bytes
            )));
        }

        let kind = infer::get(bytes)
            .filter(|kind| ALLOWED_IMAGE_TYPES.contains(&kind.mime_type()))
            .ok_or_else(|| {
                AppError::UnsupportedMediaType("Only PNG, JPEG, GIF, WebP and AVIF images are accepted".into())
            })?;

        let key = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let content_type = kind.mime_type().to_string();

        match self.storage.put(bucket, &key, bytes, &content_type).await {
            Ok(url) => {
                tracing::info!(bucket, key = %key, size = bytes.len(), "Image uploaded");
                Ok(UploadedImage {
                    url,
                    storage: StorageKind::Object,
                    content_type,
                    size_bytes: bytes.len(),
                })
            }
            Err(e) if bytes.len() <= self.inline_fallback_max_bytes => {
                tracing::warn!(bucket, error = %e, "Object storage failed, embedding image inline");
                Ok(UploadedImage {
                    url: format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
                    storage: StorageKind::Inline,
                    content_type,
                    size_bytes: bytes.len(),
                })
            }
            Err(e) => Err(AppError::InternalError(format!("Image storage failed: {}", e))),
        }
    }

    /// Reads a stored object back with the content type sniffed from its bytes.
    pub async fn read(&self, bucket: &str, file: &str) -> Result<(Vec<u8>, String), AppError> {
        let bytes = self.storage.get(bucket, file).await.map_err(|e| match e {
            StorageError::NotFound | StorageError::InvalidKey(_) => AppError::NotFound("File not found".into()),
            StorageError::Io(msg) => AppError::InternalError(msg),
        })?;

        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok((bytes, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Storage {}

        #[async_trait]
        impl ObjectStorage for Storage {
            async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError>;
            async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
        }
    }

    // Smallest valid PNG signature plus IHDR start; enough for sniffing.
    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R'];

    #[actix_rt::test]
    async fn stores_png_under_uuid_key() {
        let mut storage = MockStorage::new();
        storage
            .expect_put()
            .withf(|bucket, key, _, content_type| {
                bucket == "images" && key.ends_with(".png") && content_type == "image/png"
            })
            .returning(|bucket, key, _, _| Ok(format!("https://cdn.test/{}/{}", bucket, key)));

        let handler = UploadHandler::new(storage, 1024, 64);
        let uploaded = handler.upload("images", PNG).await.unwrap();
        assert_eq!(uploaded.storage, StorageKind::Object);
        assert!(uploaded.url.starts_with("https://cdn.test/images/"));
        assert_eq!(uploaded.size_bytes, PNG.len());
    }

    #[actix_rt::test]
    async fn falls_back_to_data_url_for_small_files() {
        let mut storage = MockStorage::new();
        storage.expect_put().returning(|_, _, _, _| Err(StorageError::Io("disk full".into())));

        let handler = UploadHandler::new(storage, 1024, 64);
        let uploaded = handler.upload("images", PNG).await.unwrap();
        assert_eq!(uploaded.storage, StorageKind::Inline);
        assert!(uploaded.url.starts_with("data:image/png;base64,"));
    }

    #[actix_rt::test]
    async fn large_files_fail_when_storage_is_down() {
        let mut storage = MockStorage::new();
        storage.expect_put().returning(|_, _, _, _| Err(StorageError::Io("disk full".into())));

        let handler = UploadHandler::new(storage, 1024, 4);
        let result = handler.upload("images", PNG).await;
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[actix_rt::test]
    async fn rejects_non_images_and_oversized_files() {
        let handler = UploadHandler::new(MockStorage::new(), 8, 4);
        assert!(matches!(
            handler.upload("images", b"%PDF").await,
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            handler.upload("images", PNG).await,
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(
            handler.upload("images", &[]).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            handler.upload("../etc", PNG).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_rt::test]
    async fn missing_files_read_as_not_found() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_, _| Err(StorageError::NotFound));
        let handler = UploadHandler::new(storage, 1024, 64);
        assert!(matches!(
            handler.read("images", "nope.png").await,
            Err(AppError::NotFound(_))
        ));
    }
}
