use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::service::{Service, ServiceInsert},
    errors::AppError,
    repositories::sqlx_repo::{not_found, SqlxServiceRepo},
};

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list_services(&self, published_only: bool) -> Result<Vec<Service>, AppError>;
    async fn get_service(&self, id: &Uuid) -> Result<Service, AppError>;
    async fn create_service(&self, service: &ServiceInsert) -> Result<Service, AppError>;
    async fn update_service(&self, service: &Service) -> Result<Service, AppError>;
    async fn delete_service(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxServiceRepo { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqlxServiceRepo {
    async fn list_services(&self, published_only: bool) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            r#"
            SELECT * FROM services
            WHERE ($1 = FALSE OR published = TRUE)
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_service(&self, id: &Uuid) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Service"))
    }

    async fn create_service(&self, service: &ServiceInsert) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (title, description, icon, features, price, order_index, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&service.features)
        .bind(&service.price)
        .bind(service.order_index)
        .bind(service.published)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_service(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services SET
                title = $2, description = $3, icon = $4, features = $5, price = $6,
                order_index = $7, published = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(service.id)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&service.features)
        .bind(&service.price)
        .bind(service.order_index)
        .bind(service.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Service"))
    }

    async fn delete_service(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Ok(())
    }
}
