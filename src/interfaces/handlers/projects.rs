use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::project::{NewProjectRequest, UpdateProjectRequest},
    errors::AppError,
    listing::ListQuery,
    seo::{with_seo, SiteInfo},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_public(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn get_project_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_published(&slug).await?;
    let site = SiteInfo::from(&state.config);
    Ok(HttpResponse::Ok().json(with_seo(project, &site)))
}

#[instrument(skip(_claims, state, query))]
pub async fn admin_list_projects(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_all(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(_claims, state))]
pub async fn admin_get_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(&project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_project_published(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.toggle_published(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_project_featured(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.toggle_featured(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
