use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::service::{NewServiceRequest, UpdateServiceRequest},
    errors::AppError,
    listing::ListQuery,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_services(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let services = state.service_handler.list_public().await?;
    Ok(HttpResponse::Ok().json(services))
}

#[instrument(skip(_claims, state, query))]
pub async fn admin_list_services(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let services = state.service_handler.list_all(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(services))
}

#[instrument(skip(_claims, state))]
pub async fn admin_get_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let service = state.service_handler.get_service(&service_id).await?;
    Ok(HttpResponse::Ok().json(service))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_service(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewServiceRequest>,
) -> Result<impl Responder, AppError> {
    let service = state.service_handler.create_service(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(service))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateServiceRequest>,
) -> Result<impl Responder, AppError> {
    let service = state
        .service_handler
        .update_service(&service_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(service))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_service_published(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let service = state.service_handler.toggle_published(&service_id).await?;
    Ok(HttpResponse::Ok().json(service))
}

#[instrument(skip(_claims, state))]
pub async fn delete_service(
    _claims: AdminClaims,
    service_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.service_handler.delete_service(&service_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
