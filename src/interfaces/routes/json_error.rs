use actix_multipart::form::MultipartFormConfig;
use actix_web::{error::JsonPayloadError, http::StatusCode, web, HttpResponse, ResponseError};
use serde_json::json;

use crate::errors::AppError;

/// Malformed JSON bodies answer 400 with a JSON error body.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| JsonError::from(err).into()));
}

/// Multipart limits for image uploads. The whole file is buffered, so the
/// memory limit is the upload cap plus room for the other form parts.
pub fn multipart_config(max_upload_bytes: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .memory_limit(max_upload_bytes + 64 * 1024)
        .total_limit(max_upload_bytes + 64 * 1024)
        .error_handler(|err, _req| AppError::from(err).into())
}

#[derive(Debug)]
pub struct JsonError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match &err {
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        JsonError {
            message: format!("JSON payload error: {}", err),
            status,
        }
    }
}
