use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;

use crate::entities::token::{Claims, RefreshClaims, TokenType};
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
    refresh_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
            refresh_expiration: Duration::days(config.refresh_token_exp_days),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            admin: user.is_admin,
            exp: (now + self.access_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: (now + self.refresh_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Refresh,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Self::validation())?;
        if data.claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }

    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        let data = decode::<RefreshClaims>(token, &self.keys.refresh_decoding, &Self::validation())?;
        if data.claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken);
        }
        Ok(data)
    }

    fn access_ttl_secs(&self) -> i64 {
        self.access_expiration.num_seconds()
    }
}

/// Seconds until `exp`, or `None` once it has passed.
pub fn remaining_ttl(exp: usize) -> Option<usize> {
    let now = Utc::now().timestamp().max(0) as usize;
    exp.checked_sub(now).filter(|ttl| *ttl > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@janedoe.dev".into(),
            password_hash: String::new(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_round_trip() {
        let service = JwtService::new(&crate::test_support::config());
        let user = admin();
        let token = service.create_jwt(&user).unwrap();
        let claims = service.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.sub, user.id.to_string());
        assert!(claims.admin);
        assert_eq!(service.access_ttl_secs(), 300);
    }

    #[test]
    fn tokens_issued_together_differ() {
        let service = JwtService::new(&crate::test_support::config());
        let user = admin();
        assert_ne!(service.create_jwt(&user).unwrap(), service.create_jwt(&user).unwrap());
        assert_ne!(
            service.create_refresh_jwt(&user.id).unwrap(),
            service.create_refresh_jwt(&user.id).unwrap()
        );
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = JwtService::new(&crate::test_support::config());
        let refresh = service.create_refresh_jwt(&Uuid::new_v4()).unwrap();
        assert!(service.decode_jwt(&refresh).is_err());
        assert!(service.decode_refresh_jwt(&refresh).is_ok());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let service = JwtService::new(&crate::test_support::config());
        let mut other_config = crate::test_support::config();
        other_config.jwt_secret = "a_completely_different_secret_value_0987654321".into();
        let other = JwtService::new(&other_config);
        let token = other.create_jwt(&admin()).unwrap();
        assert!(matches!(service.decode_jwt(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn remaining_ttl_of_past_expiry_is_none() {
        assert_eq!(remaining_ttl(1), None);
        let future = (Utc::now().timestamp() + 60) as usize;
        assert!(remaining_ttl(future).is_some());
    }
}
