use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::site_setting::UpsertSiteSetting, errors::AppError,
    use_cases::extractors::AdminClaims, AppState,
};

/// Flat `{key: value}` map used by the public site.
#[instrument(skip(state))]
pub async fn get_site_settings(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let settings = state.settings_handler.load().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_settings(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let settings = state.settings_handler.list_raw().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[instrument(skip(_claims, state, data))]
pub async fn upsert_setting(
    _claims: AdminClaims,
    key: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpsertSiteSetting>,
) -> Result<impl Responder, AppError> {
    let setting = state
        .settings_handler
        .upsert(key.into_inner(), data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(setting))
}

#[instrument(skip(_claims, state))]
pub async fn delete_setting(
    _claims: AdminClaims,
    key: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.settings_handler.delete(&key).await?;
    Ok(HttpResponse::NoContent().finish())
}
