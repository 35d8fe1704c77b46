use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Prefix of Redis keys holding blacklisted access tokens.
pub const ACCESS_DENY_PREFIX: &str = "access_deny";
/// Prefix of Redis keys holding revoked refresh tokens.
pub const REFRESH_DENY_PREFIX: &str = "refresh_deny";

pub const API_PREFIX: &str = "/api/v1";
pub const ADMIN_PREFIX: &str = "/api/v1/admin";
