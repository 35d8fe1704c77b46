use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::contact_message::{ContactForm, ContactMessage, MessageStatus},
    errors::AppError,
    repositories::sqlx_repo::{not_found, SqlxContactMessageRepo},
};

#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn create_message(&self, form: &ContactForm) -> Result<ContactMessage, AppError>;
    async fn list_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn get_message(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn set_message_status(&self, id: &Uuid, status: MessageStatus) -> Result<ContactMessage, AppError>;
    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxContactMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactMessageRepo { pool }
    }
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepo {
    async fn create_message(&self, form: &ContactForm) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.phone)
        .bind(&form.subject)
        .bind(&form.message)
        .bind(MessageStatus::Unread.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_message(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Message"))
    }

    async fn set_message_status(&self, id: &Uuid, status: MessageStatus) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Message"))
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Message not found".into()));
        }
        Ok(())
    }
}
