use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::code_snippet::{CodeSnippet, CodeSnippetInsert},
    errors::AppError,
    repositories::sqlx_repo::{not_found, unique_conflict, SqlxCodeSnippetRepo},
};

const SLUG_TAKEN: &str = "A snippet with this slug already exists";

#[async_trait]
pub trait CodeSnippetRepository: Send + Sync {
    async fn list_snippets(&self, published_only: bool) -> Result<Vec<CodeSnippet>, AppError>;
    async fn get_snippet_by_id(&self, id: &Uuid) -> Result<CodeSnippet, AppError>;
    async fn get_snippet_by_slug(&self, slug: &str, published_only: bool) -> Result<CodeSnippet, AppError>;
    async fn create_snippet(&self, snippet: &CodeSnippetInsert) -> Result<CodeSnippet, AppError>;
    async fn update_snippet(&self, snippet: &CodeSnippet) -> Result<CodeSnippet, AppError>;
    async fn delete_snippet(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxCodeSnippetRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCodeSnippetRepo { pool }
    }
}

#[async_trait]
impl CodeSnippetRepository for SqlxCodeSnippetRepo {
    async fn list_snippets(&self, published_only: bool) -> Result<Vec<CodeSnippet>, AppError> {
        sqlx::query_as::<_, CodeSnippet>(
            r#"
            SELECT * FROM code_snippets
            WHERE ($1 = FALSE OR published = TRUE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_snippet_by_id(&self, id: &Uuid) -> Result<CodeSnippet, AppError> {
        sqlx::query_as::<_, CodeSnippet>("SELECT * FROM code_snippets WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Snippet"))
    }

    async fn get_snippet_by_slug(&self, slug: &str, published_only: bool) -> Result<CodeSnippet, AppError> {
        sqlx::query_as::<_, CodeSnippet>(
            "SELECT * FROM code_snippets WHERE slug = $1 AND ($2 = FALSE OR published = TRUE)",
        )
        .bind(slug)
        .bind(published_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Snippet"))
    }

    async fn create_snippet(&self, snippet: &CodeSnippetInsert) -> Result<CodeSnippet, AppError> {
        sqlx::query_as::<_, CodeSnippet>(
            r#"
            INSERT INTO code_snippets (
                title, slug, description, code, language, category, tags,
                difficulty, usage_frequency, published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&snippet.title)
        .bind(&snippet.slug)
        .bind(&snippet.description)
        .bind(&snippet.code)
        .bind(&snippet.language)
        .bind(&snippet.category)
        .bind(&snippet.tags)
        .bind(snippet.difficulty.as_str())
        .bind(snippet.usage_frequency.as_str())
        .bind(snippet.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, SLUG_TAKEN))
    }

    async fn update_snippet(&self, snippet: &CodeSnippet) -> Result<CodeSnippet, AppError> {
        let result = sqlx::query_as::<_, CodeSnippet>(
            r#"
            UPDATE code_snippets SET
                title = $2, slug = $3, description = $4, code = $5, language = $6,
                category = $7, tags = $8, difficulty = $9, usage_frequency = $10,
                published = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(snippet.id)
        .bind(&snippet.title)
        .bind(&snippet.slug)
        .bind(&snippet.description)
        .bind(&snippet.code)
        .bind(&snippet.language)
        .bind(&snippet.category)
        .bind(&snippet.tags)
        .bind(snippet.difficulty.as_str())
        .bind(snippet.usage_frequency.as_str())
        .bind(snippet.published)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Snippet not found".into()),
            other => unique_conflict(other, SLUG_TAKEN),
        })
    }

    async fn delete_snippet(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM code_snippets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Snippet not found".into()));
        }
        Ok(())
    }
}
