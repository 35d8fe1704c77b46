use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::blog_post::{NewBlogPostRequest, UpdateBlogPostRequest},
    errors::AppError,
    listing::ListQuery,
    seo::{with_seo, SiteInfo},
    use_cases::extractors::AdminClaims,
    AppState,
};

/// Published posts, one page at a time.
#[instrument(skip(state, query))]
pub async fn list_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(state.config.blog_per_page);

    let posts = state
        .blog_handler
        .list_public(&query.filter(), page, per_page)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state))]
pub async fn list_featured_blog_posts(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let posts = state.blog_handler.list_featured().await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_published(&slug).await?;
    let site = SiteInfo::from(&state.config);
    Ok(HttpResponse::Ok().json(with_seo(post, &site)))
}

#[instrument(skip(_claims, state, query))]
pub async fn admin_list_blog_posts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog_handler.list_all(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(_claims, state))]
pub async fn admin_get_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_blog_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.create_blog_post(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state
        .blog_handler
        .update_blog_post(&post_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_blog_post_published(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.toggle_published(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_blog_post_featured(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.toggle_featured(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn delete_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.blog_handler.delete_blog_post(&post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
