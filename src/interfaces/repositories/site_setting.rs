use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::site_setting::{SiteSetting, SiteSettingWrite},
    errors::AppError,
    repositories::sqlx_repo::SqlxSiteSettingRepo,
};

#[async_trait]
pub trait SiteSettingRepository: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<SiteSetting>, AppError>;
    async fn upsert_setting(&self, setting: &SiteSettingWrite) -> Result<SiteSetting, AppError>;
    async fn delete_setting(&self, key: &str) -> Result<(), AppError>;
}

impl SqlxSiteSettingRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSiteSettingRepo { pool }
    }
}

#[async_trait]
impl SiteSettingRepository for SqlxSiteSettingRepo {
    async fn list_settings(&self) -> Result<Vec<SiteSetting>, AppError> {
        sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn upsert_setting(&self, setting: &SiteSettingWrite) -> Result<SiteSetting, AppError> {
        sqlx::query_as::<_, SiteSetting>(
            r#"
            INSERT INTO site_settings (key, value, value_type, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, value_type = EXCLUDED.value_type, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(setting.value_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_setting(&self, key: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM site_settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Setting '{}' not found", key)));
        }
        Ok(())
    }
}
