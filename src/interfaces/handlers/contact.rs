use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::contact_message::{ContactForm, UpdateMessageStatus},
    errors::AppError,
    handlers::form_limits::enforce_form_limits,
    listing::ListQuery,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_contact_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    // Malformed submissions are rejected before they count against the limits
    let form = form.into_inner().normalized();
    form.validate()?;
    enforce_form_limits(&req, &state, "contact", &form.email).await?;

    let message = state.contact_handler.submit(form).await?;
    Ok(HttpResponse::Created().json(message))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let messages = state.contact_handler.list_messages(&query.filter()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[instrument(skip(_claims, state))]
pub async fn get_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.get_message(&message_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state, data))]
pub async fn set_message_status(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateMessageStatus>,
) -> Result<impl Responder, AppError> {
    let message = state
        .contact_handler
        .set_status(&message_id, data.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state))]
pub async fn delete_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_message(&message_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
