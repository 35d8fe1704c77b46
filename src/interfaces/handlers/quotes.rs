use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::quote_request::{QuoteForm, UpdateQuoteStatus},
    errors::AppError,
    handlers::form_limits::enforce_form_limits,
    listing::ListQuery,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_quote_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<QuoteForm>,
) -> Result<impl Responder, AppError> {
    // Malformed submissions are rejected before they count against the limits
    let form = form.into_inner().normalized();
    form.validate()?;
    enforce_form_limits(&req, &state, "quote", &form.email).await?;

    let quote = state.quote_handler.submit(form).await?;
    Ok(HttpResponse::Created().json(quote))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_quotes(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let quotes = state.quote_handler.list_quotes(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(quotes))
}

#[instrument(skip(_claims, state))]
pub async fn get_quote(
    _claims: AdminClaims,
    quote_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let quote = state.quote_handler.get_quote(&quote_id).await?;
    Ok(HttpResponse::Ok().json(quote))
}

#[instrument(skip(_claims, state, data))]
pub async fn set_quote_status(
    _claims: AdminClaims,
    quote_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateQuoteStatus>,
) -> Result<impl Responder, AppError> {
    let quote = state
        .quote_handler
        .set_status(&quote_id, data.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(quote))
}

#[instrument(skip(_claims, state))]
pub async fn delete_quote(
    _claims: AdminClaims,
    quote_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.quote_handler.delete_quote(&quote_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
