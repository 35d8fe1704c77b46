use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::service_area::{NewServiceAreaRequest, UpdateServiceAreaRequest},
    errors::AppError,
    listing::ListQuery,
    seo::{with_seo, SiteInfo},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_service_areas(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let areas = state.service_area_handler.list_public(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(areas))
}

#[instrument(skip(state))]
pub async fn get_service_area_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let area = state.service_area_handler.get_active(&slug).await?;
    let site = SiteInfo::from(&state.config);
    Ok(HttpResponse::Ok().json(with_seo(area, &site)))
}

#[instrument(skip(_claims, state, query))]
pub async fn admin_list_service_areas(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let areas = state.service_area_handler.list_all(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(areas))
}

#[instrument(skip(_claims, state))]
pub async fn admin_get_service_area(
    _claims: AdminClaims,
    area_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let area = state.service_area_handler.get_service_area(&area_id).await?;
    Ok(HttpResponse::Ok().json(area))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_service_area(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewServiceAreaRequest>,
) -> Result<impl Responder, AppError> {
    let area = state
        .service_area_handler
        .create_service_area(data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(area))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_service_area(
    _claims: AdminClaims,
    area_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateServiceAreaRequest>,
) -> Result<impl Responder, AppError> {
    let area = state
        .service_area_handler
        .update_service_area(&area_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(area))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_service_area_active(
    _claims: AdminClaims,
    area_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let area = state.service_area_handler.toggle_active(&area_id).await?;
    Ok(HttpResponse::Ok().json(area))
}

#[instrument(skip(_claims, state))]
pub async fn delete_service_area(
    _claims: AdminClaims,
    area_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.service_area_handler.delete_service_area(&area_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
