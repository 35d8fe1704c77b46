use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::quote_request::{QuoteForm, QuoteRequest, QuoteStatus},
    errors::AppError,
    repositories::sqlx_repo::{not_found, SqlxQuoteRequestRepo},
};

#[async_trait]
pub trait QuoteRequestRepository: Send + Sync {
    async fn create_quote(&self, form: &QuoteForm) -> Result<QuoteRequest, AppError>;
    async fn list_quotes(&self) -> Result<Vec<QuoteRequest>, AppError>;
    async fn get_quote(&self, id: &Uuid) -> Result<QuoteRequest, AppError>;
    async fn set_quote_status(&self, id: &Uuid, status: QuoteStatus) -> Result<QuoteRequest, AppError>;
    async fn delete_quote(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxQuoteRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxQuoteRequestRepo { pool }
    }
}

#[async_trait]
impl QuoteRequestRepository for SqlxQuoteRequestRepo {
    async fn create_quote(&self, form: &QuoteForm) -> Result<QuoteRequest, AppError> {
        sqlx::query_as::<_, QuoteRequest>(
            r#"
            INSERT INTO quote_requests (
                name, email, phone, company, project_type, budget, timeline, description, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.phone)
        .bind(&form.company)
        .bind(&form.project_type)
        .bind(&form.budget)
        .bind(&form.timeline)
        .bind(&form.description)
        .bind(QuoteStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_quotes(&self) -> Result<Vec<QuoteRequest>, AppError> {
        sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quote_requests ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_quote(&self, id: &Uuid) -> Result<QuoteRequest, AppError> {
        sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quote_requests WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Quote request"))
    }

    async fn set_quote_status(&self, id: &Uuid, status: QuoteStatus) -> Result<QuoteRequest, AppError> {
        sqlx::query_as::<_, QuoteRequest>(
            "UPDATE quote_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Quote request"))
    }

    async fn delete_quote(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM quote_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Quote request not found".into()));
        }
        Ok(())
    }
}
