use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::code_snippet::{NewCodeSnippetRequest, UpdateCodeSnippetRequest},
    errors::AppError,
    listing::ListQuery,
    seo::{with_seo, SiteInfo},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_snippets(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let snippets = state.snippet_handler.list_public(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(snippets))
}

#[instrument(skip(state))]
pub async fn get_snippet_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let snippet = state.snippet_handler.get_published(&slug).await?;
    let site = SiteInfo::from(&state.config);
    Ok(HttpResponse::Ok().json(with_seo(snippet, &site)))
}

#[instrument(skip(_claims, state, query))]
pub async fn admin_list_snippets(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let snippets = state.snippet_handler.list_all(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(snippets))
}

#[instrument(skip(_claims, state))]
pub async fn admin_get_snippet(
    _claims: AdminClaims,
    snippet_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let snippet = state.snippet_handler.get_snippet(&snippet_id).await?;
    Ok(HttpResponse::Ok().json(snippet))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_snippet(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewCodeSnippetRequest>,
) -> Result<impl Responder, AppError> {
    let snippet = state.snippet_handler.create_snippet(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(snippet))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_snippet(
    _claims: AdminClaims,
    snippet_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateCodeSnippetRequest>,
) -> Result<impl Responder, AppError> {
    let snippet = state
        .snippet_handler
        .update_snippet(&snippet_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(snippet))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_snippet_published(
    _claims: AdminClaims,
    snippet_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let snippet = state.snippet_handler.toggle_published(&snippet_id).await?;
    Ok(HttpResponse::Ok().json(snippet))
}

#[instrument(skip(_claims, state))]
pub async fn delete_snippet(
    _claims: AdminClaims,
    snippet_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.snippet_handler.delete_snippet(&snippet_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
