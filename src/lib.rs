use deadpool_redis::{Config as RedisConfig, Pool as RedisPool, Runtime};
use redis::AsyncCommands;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod bootstrap;
pub mod telemetry;

pub use domain::{entities, use_cases, listing, publishing, seo, password};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, limiter, storage, utils};

use auth::jwt::JwtService;
use errors::AuthError;
use limiter::rate_limiter::FormRateLimiter;
use repositories::sqlx_repo::{
    SqlxBlogPostRepo, SqlxCodeSnippetRepo, SqlxContactMessageRepo, SqlxProjectRepo,
    SqlxQuoteRequestRepo, SqlxServiceAreaRepo, SqlxServiceRepo, SqlxSiteSettingRepo, SqlxUserRepo,
};
use storage::local::LocalStorage;
use use_cases::{
    auth::AuthHandler, blog::BlogPostHandler, contact::ContactMessageHandler,
    projects::ProjectHandler, quotes::QuoteRequestHandler, service_areas::ServiceAreaHandler,
    services::ServiceHandler, site_settings::SiteSettingsHandler, snippets::CodeSnippetHandler,
    uploads::UploadHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;

pub struct AppState {
    pub config: settings::AppConfig,
    pub auth_handler: AppAuthHandler,
    pub project_handler: ProjectHandler<SqlxProjectRepo>,
    pub blog_handler: BlogPostHandler<SqlxBlogPostRepo>,
    pub snippet_handler: CodeSnippetHandler<SqlxCodeSnippetRepo>,
    pub contact_handler: ContactMessageHandler<SqlxContactMessageRepo>,
    pub quote_handler: QuoteRequestHandler<SqlxQuoteRequestRepo>,
    pub service_handler: ServiceHandler<SqlxServiceRepo>,
    pub service_area_handler: ServiceAreaHandler<SqlxServiceAreaRepo>,
    pub settings_handler: SiteSettingsHandler<SqlxSiteSettingRepo>,
    pub upload_handler: UploadHandler<LocalStorage>,
    pub form_limiter: FormRateLimiter,
    pub redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let redis_pool = config.redis_url.as_ref().and_then(|url| {
            RedisConfig::from_url(url)
                .create_pool(Some(Runtime::Tokio1))
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });

        Self::with_redis(config, pool, redis_pool)
    }

    pub fn with_redis(
        config: &settings::AppConfig,
        pool: sqlx::PgPool,
        redis_pool: Option<RedisPool>,
    ) -> Self {
        let storage = LocalStorage::new(&config.upload_dir, &config.media_base_url);

        AppState {
            config: config.clone(),
            auth_handler: AuthHandler::new(SqlxUserRepo::new(pool.clone()), JwtService::new(config)),
            project_handler: ProjectHandler::new(SqlxProjectRepo::new(pool.clone())),
            blog_handler: BlogPostHandler::new(SqlxBlogPostRepo::new(pool.clone())),
            snippet_handler: CodeSnippetHandler::new(SqlxCodeSnippetRepo::new(pool.clone())),
            contact_handler: ContactMessageHandler::new(SqlxContactMessageRepo::new(pool.clone())),
            quote_handler: QuoteRequestHandler::new(SqlxQuoteRequestRepo::new(pool.clone())),
            service_handler: ServiceHandler::new(SqlxServiceRepo::new(pool.clone())),
            service_area_handler: ServiceAreaHandler::new(SqlxServiceAreaRepo::new(pool.clone())),
            settings_handler: SiteSettingsHandler::new(SqlxSiteSettingRepo::new(pool)),
            upload_handler: UploadHandler::new(
                storage,
                config.max_upload_bytes,
                config.inline_fallback_max_bytes,
            ),
            form_limiter: FormRateLimiter::for_public_forms(),
            redis_pool,
        }
    }

    /// Increments `key` and sets its expiry on first use. Returns the new count,
    /// or 0 when Redis is not configured.
    pub async fn redis_incr_with_ttl(&self, key: &str, ttl_secs: usize) -> Result<u32, AuthError> {
        let Some(pool) = &self.redis_pool else {
            return Ok(0);
        };

        let mut conn = pool
            .get()
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

        let count: u32 = conn
            .incr(key, 1)
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

        if count == 1 {
            let _: () = conn
                .expire(key, ttl_secs as i64)
                .await
                .map_err(|e| AuthError::RedisOperation(e.to_string()))?;
        }

        Ok(count)
    }

    /// Stores `token` under `prefix` until it would have expired anyway.
    pub async fn revoke_token(&self, prefix: &str, token: &str, ttl_secs: usize) -> Result<(), AuthError> {
        let Some(pool) = &self.redis_pool else {
            tracing::debug!("Redis not configured, skipping {} revocation", prefix);
            return Ok(());
        };

        let mut conn = pool
            .get()
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

        let key = format!("{}:{}", prefix, token);
        let _: () = conn
            .set_ex(key, 1u8, ttl_secs as u64)
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

        Ok(())
    }

    pub async fn is_token_revoked(&self, prefix: &str, token: &str) -> Result<bool, AuthError> {
        let Some(pool) = &self.redis_pool else {
            return Ok(false);
        };

        let mut conn = pool
            .get()
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;

        conn.exists(format!("{}:{}", prefix, token))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }
}
