use actix_multipart::form::MultipartForm;
use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::upload::{ImageUpload, UploadQuery, DEFAULT_BUCKET},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, form))]
pub async fn upload_image(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    form: MultipartForm<ImageUpload>,
) -> Result<impl Responder, AppError> {
    let bucket = query.bucket.as_deref().unwrap_or(DEFAULT_BUCKET);
    let form = form.into_inner();

    let uploaded = state.upload_handler.upload(bucket, &form.file.data).await?;
    Ok(HttpResponse::Created().json(uploaded))
}

/// Serves a stored object. Names are immutable UUIDs, so responses are
/// cacheable for a long time.
#[instrument(skip(state))]
pub async fn serve_media(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (bucket, file) = path.into_inner();
    let (bytes, content_type) = state.upload_handler.read(&bucket, &file).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .body(bytes))
}
