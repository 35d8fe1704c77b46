use anyhow::Context;
use zeroize::Zeroizing;

use crate::{repositories::user::UserRepository, use_cases::auth::AdminBootstrap, AppState};

/// Makes sure the configured admin account exists. Without credentials in the
/// configuration this only warns when the user table is empty.
pub async fn ensure_admin_user(state: &AppState) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        let users = state
            .auth_handler
            .user_repo
            .count_users()
            .await
            .context("counting users")?;
        if users == 0 {
            tracing::warn!("No users exist and APP_ADMIN_EMAIL/APP_ADMIN_PASSWORD are not set; admin endpoints are unreachable");
        }
        return Ok(());
    };

    let password = Zeroizing::new(password.clone());
    let outcome = state
        .auth_handler
        .ensure_admin(email, &password)
        .await
        .with_context(|| format!("creating admin user {}", email))?;

    match outcome {
        AdminBootstrap::Created => tracing::info!(email = %email, "Admin user created"),
        AdminBootstrap::AlreadyExists => tracing::debug!(email = %email, "Admin user already exists"),
    }

    Ok(())
}
