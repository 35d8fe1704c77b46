use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    auth::jwt::remaining_ttl,
    constants::{ACCESS_DENY_PREFIX, REFRESH_DENY_PREFIX},
    entities::{
        token::{LogoutRequest, RefreshTokenRequest},
        user::LoginUser,
    },
    errors::{AppError, AuthError},
    middlewares::auth::parse_bearer,
    repositories::token::TokenServiceRepository,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state, credentials))]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginUser>,
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler.login(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Rotates the refresh token: the presented one is revoked once a new pair
/// has been issued.
#[instrument(skip(state, request))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let token = request.into_inner().refresh_token;

    if state.is_token_revoked(REFRESH_DENY_PREFIX, &token).await? {
        return Err(AuthError::TokenRevoked);
    }

    let response = state.auth_handler.refresh_token(&token).await?;

    let decoded = state.auth_handler.token_service.decode_refresh_jwt(&token)?;
    if let Some(ttl) = remaining_ttl(decoded.claims.exp) {
        state.revoke_token(REFRESH_DENY_PREFIX, &token, ttl).await?;
    }

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(claims, req, state, body))]
pub async fn logout(
    claims: AuthClaims,
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>,
) -> Result<impl Responder, AuthError> {
    let access_token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_bearer)
        .ok_or(AuthError::MissingCredentials)?;

    if let Some(ttl) = remaining_ttl(claims.0.exp) {
        state.revoke_token(ACCESS_DENY_PREFIX, &access_token, ttl).await?;
    }

    let refresh = state
        .auth_handler
        .token_service
        .decode_refresh_jwt(&body.refresh_token);
    match refresh {
        Ok(decoded) if decoded.claims.sub == claims.0.sub => {
            if let Some(ttl) = remaining_ttl(decoded.claims.exp) {
                state.revoke_token(REFRESH_DENY_PREFIX, &body.refresh_token, ttl).await?;
            }
        }
        Ok(_) => tracing::warn!(user_id = %claims.0.sub, "Logout with a refresh token of another user"),
        // expired or malformed refresh tokens are already unusable
        Err(e) => tracing::debug!("Skipping refresh token revocation: {}", e),
    }

    tracing::info!(user_id = %claims.0.sub, "User logged out");
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}

#[instrument(skip(claims, state))]
pub async fn me(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.me(&claims.0.sub).await?;
    Ok(HttpResponse::Ok().json(user))
}
