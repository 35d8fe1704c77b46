use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::service_area::{ServiceArea, ServiceAreaInsert},
    errors::AppError,
    repositories::sqlx_repo::{not_found, unique_conflict, SqlxServiceAreaRepo},
};

const SLUG_TAKEN: &str = "A service area with this slug already exists";

#[async_trait]
pub trait ServiceAreaRepository: Send + Sync {
    async fn list_service_areas(&self, active_only: bool) -> Result<Vec<ServiceArea>, AppError>;
    async fn get_service_area_by_id(&self, id: &Uuid) -> Result<ServiceArea, AppError>;
    async fn get_service_area_by_slug(&self, slug: &str, active_only: bool) -> Result<ServiceArea, AppError>;
    async fn create_service_area(&self, area: &ServiceAreaInsert) -> Result<ServiceArea, AppError>;
    async fn update_service_area(&self, area: &ServiceArea) -> Result<ServiceArea, AppError>;
    async fn delete_service_area(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxServiceAreaRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxServiceAreaRepo { pool }
    }
}

#[async_trait]
impl ServiceAreaRepository for SqlxServiceAreaRepo {
    async fn list_service_areas(&self, active_only: bool) -> Result<Vec<ServiceArea>, AppError> {
        sqlx::query_as::<_, ServiceArea>(
            r#"
            SELECT * FROM service_areas
            WHERE ($1 = FALSE OR active = TRUE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_service_area_by_id(&self, id: &Uuid) -> Result<ServiceArea, AppError> {
        sqlx::query_as::<_, ServiceArea>("SELECT * FROM service_areas WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Service area"))
    }

    async fn get_service_area_by_slug(&self, slug: &str, active_only: bool) -> Result<ServiceArea, AppError> {
        sqlx::query_as::<_, ServiceArea>(
            "SELECT * FROM service_areas WHERE slug = $1 AND ($2 = FALSE OR active = TRUE)",
        )
        .bind(slug)
        .bind(active_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Service area"))
    }

    async fn create_service_area(&self, area: &ServiceAreaInsert) -> Result<ServiceArea, AppError> {
        sqlx::query_as::<_, ServiceArea>(
            r#"
            INSERT INTO service_areas (
                slug, city, region, title, meta_title, meta_description, intro, faqs,
                local_expertise, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&area.slug)
        .bind(&area.city)
        .bind(&area.region)
        .bind(&area.title)
        .bind(&area.meta_title)
        .bind(&area.meta_description)
        .bind(&area.intro)
        .bind(Json(&area.faqs))
        .bind(&area.local_expertise)
        .bind(area.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, SLUG_TAKEN))
    }

    async fn update_service_area(&self, area: &ServiceArea) -> Result<ServiceArea, AppError> {
        let result = sqlx::query_as::<_, ServiceArea>(
            r#"
            UPDATE service_areas SET
                slug = $2, city = $3, region = $4, title = $5, meta_title = $6,
                meta_description = $7, intro = $8, faqs = $9, local_expertise = $10,
                active = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(area.id)
        .bind(&area.slug)
        .bind(&area.city)
        .bind(&area.region)
        .bind(&area.title)
        .bind(&area.meta_title)
        .bind(&area.meta_description)
        .bind(&area.intro)
        .bind(&area.faqs)
        .bind(&area.local_expertise)
        .bind(area.active)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Service area not found".into()),
            other => unique_conflict(other, SLUG_TAKEN),
        })
    }

    async fn delete_service_area(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM service_areas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service area not found".into()));
        }
        Ok(())
    }
}
