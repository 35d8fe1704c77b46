use crate::{
    entities::site_setting::{SiteSetting, SiteSettingWrite, SiteSettings, UpsertSiteSetting},
    errors::AppError,
    repositories::site_setting::SiteSettingRepository,
};

pub struct SiteSettingsHandler<R>
where
    R: SiteSettingRepository,
{
    pub settings_repo: R,
}

impl<R> SiteSettingsHandler<R>
where
    R: SiteSettingRepository,
{
    pub fn new(settings_repo: R) -> Self {
        SiteSettingsHandler { settings_repo }
    }

    /// All settings as one flat typed object.
    pub async fn load(&self) -> Result<SiteSettings, AppError> {
        let rows = self.settings_repo.list_settings().await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn list_raw(&self) -> Result<Vec<SiteSetting>, AppError> {
        self.settings_repo.list_settings().await
    }

    pub async fn upsert(&self, key: String, request: UpsertSiteSetting) -> Result<SiteSetting, AppError> {
        let write = SiteSettingWrite::from_request(key, request)?;
        let saved = self.settings_repo.upsert_setting(&write).await?;
        tracing::info!(key = %saved.key, value_type = %saved.value_type, "Site setting saved");
        Ok(saved)
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.settings_repo.delete_setting(key).await
    }
}
