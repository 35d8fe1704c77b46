use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, HttpResponse, ResponseError,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    constants::{ACCESS_DENY_PREFIX, ADMIN_PREFIX, API_PREFIX},
    entities::token::Claims,
    errors::AuthError,
    repositories::token::TokenServiceRepository,
    AppState,
};

/// What a request path requires from its bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

pub fn required_access(path: &str, method: &str) -> Access {
    if method == "OPTIONS" {
        return Access::Public;
    }

    if path == ADMIN_PREFIX || path.starts_with(&format!("{}/", ADMIN_PREFIX)) {
        return Access::Admin;
    }

    let auth_only = [format!("{}/auth/me", API_PREFIX), format!("{}/auth/logout", API_PREFIX)];
    if auth_only.iter().any(|p| p == path) {
        return Access::Authenticated;
    }

    Access::Public
}

pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let access = required_access(req.path(), req.method().as_str());
            if access == Access::Public {
                return service.call(req).await;
            }

            match authorize(&req, access).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), error = %e, "Request rejected by auth middleware");
                    Ok(reject(req, e.error_response()))
                }
            }
        })
    }
}

async fn authorize(req: &ServiceRequest, access: Access) -> Result<Claims, AuthError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let token = bearer_token(req).ok_or(AuthError::MissingCredentials)?;

    let revoked = state
        .is_token_revoked(ACCESS_DENY_PREFIX, &token)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Blacklist lookup failed, accepting token: {}", e);
            false
        });
    if revoked {
        return Err(AuthError::TokenRevoked);
    }

    let claims = state.auth_handler.token_service.decode_jwt(&token)?.claims;

    if access == Access::Admin && !claims.admin {
        return Err(AuthError::Forbidden("Admin access required".into()));
    }

    Ok(claims)
}

pub fn bearer_token(req: &ServiceRequest) -> Option<String> {
    parse_bearer(req.headers().get(AUTHORIZATION)?.to_str().ok()?)
}

pub fn parse_bearer(header: &str) -> Option<String> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() && !token.contains(' ') {
        Some(token.to_string())
    } else {
        None
    }
}

fn reject(req: ServiceRequest, res: HttpResponse) -> ServiceResponse<BoxBody> {
    req.into_response(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_by_path() {
        assert_eq!(required_access("/api/v1/admin/projects", "GET"), Access::Admin);
        assert_eq!(required_access("/api/v1/admin", "GET"), Access::Admin);
        assert_eq!(required_access("/api/v1/administrators", "GET"), Access::Public);
        assert_eq!(required_access("/api/v1/admin/projects", "OPTIONS"), Access::Public);
        assert_eq!(required_access("/api/v1/auth/me", "GET"), Access::Authenticated);
        assert_eq!(required_access("/api/v1/auth/logout", "POST"), Access::Authenticated);
        assert_eq!(required_access("/api/v1/auth/login", "POST"), Access::Public);
        assert_eq!(required_access("/api/v1/blog/posts", "GET"), Access::Public);
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi".into()));
        assert_eq!(parse_bearer("bearer abc"), Some("abc".into()));
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
    }
}
