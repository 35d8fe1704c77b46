use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, PublicUser, User, UserInsert};
use crate::errors::{AppError, AuthError};
use crate::password::validate_password_strength;
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::UserRepository;

/// What happened when the configured admin account was checked at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created,
    AlreadyExists,
}

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(request.email.trim())
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?;

        let Some(user) = user else {
            verify_against_dummy(&request.password);
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Stored password hash could not be checked: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(access_token, refresh_token, self.token_service.access_ttl_secs()))
    }

    /// Issues a fresh token pair for the owner of a valid refresh token.
    /// Revocation is checked by the caller.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    pub async fn me(&self, user_id: &str) -> Result<PublicUser, AppError> {
        let id = Uuid::parse_str(user_id)
            .map_err(|_| AppError::UnauthorizedAccess)?;

        self.user_repo
            .get_user_by_id(&id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Creates the admin account when no user with `email` exists yet.
    /// Existing accounts are left untouched.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<AdminBootstrap, AppError> {
        let email = email.trim().to_lowercase();
        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Ok(AdminBootstrap::AlreadyExists);
        }

        validate_password_strength(password, &[&email]).map_err(|e| {
            let message = e.message.map(|m| m.to_string()).unwrap_or_else(|| "Password is too weak".into());
            AppError::field("admin_password", &message)
        })?;

        let insert = UserInsert {
            email,
            password_hash: hash_password(password)?,
            is_admin: true,
        };
        self.user_repo.create_user(&insert).await?;

        Ok(AdminBootstrap::Created)
    }
}
