use actix_web::HttpRequest;

use crate::{
    errors::AppError,
    limiter::rate_limiter::RateDecision,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const EMAIL_LIMIT: u32 = 3;
const EMAIL_WINDOW_SECS: usize = 3600;

/// Applies the per-IP bucket and, when Redis is configured, the hourly
/// per-email counter for a public form. `form` namespaces the keys.
pub async fn enforce_form_limits(
    req: &HttpRequest,
    state: &AppState,
    form: &str,
    email: &str,
) -> Result<(), AppError> {
    let ip = get_client_ip(req, false);
    if let RateDecision::Limited { retry_after_secs } = state.form_limiter.check(&format!("{}:{}", form, ip)) {
        return Err(AppError::TooManyRequests(format!(
            "Too many submissions, retry in {}s",
            retry_after_secs
        )));
    }

    // URL-encoded so arbitrary input stays a single Redis key segment
    let email = urlencoding::encode(&email.trim().to_lowercase()).into_owned();
    let key = format!("rl:{}:email:{}", form, email);

    match state.redis_incr_with_ttl(&key, EMAIL_WINDOW_SECS).await {
        Ok(count) if count > EMAIL_LIMIT => Err(AppError::TooManyRequests(
            "Too many messages from this email address. Please try again later.".into(),
        )),
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::warn!(form, "Email rate limit unavailable: {}", e);
            Ok(())
        }
    }
}
