use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::blog_post::{BlogPost, BlogPostInsert},
    errors::AppError,
    repositories::sqlx_repo::{not_found, unique_conflict, SqlxBlogPostRepo},
};

const SLUG_TAKEN: &str = "A blog post with this slug already exists";

const LIST_BLOG_POSTS: &str = r#"
    SELECT * FROM blog_posts
    WHERE ($1 = FALSE OR published = TRUE)
    ORDER BY created_at DESC
"#;

const LIST_FEATURED_BLOG_POSTS: &str = r#"
    SELECT * FROM blog_posts
    WHERE published = TRUE AND featured = TRUE
    ORDER BY created_at DESC
    LIMIT $1
"#;

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, AppError>;
    async fn list_featured_blog_posts(&self, limit: i64) -> Result<Vec<BlogPost>, AppError>;
    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    async fn get_blog_post_by_slug(&self, slug: &str, published_only: bool) -> Result<BlogPost, AppError>;
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<BlogPost, AppError>;
    async fn update_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError>;
    async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, AppError> {
        sqlx::query_as::<_, BlogPost>(LIST_BLOG_POSTS)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_featured_blog_posts(&self, limit: i64) -> Result<Vec<BlogPost>, AppError> {
        sqlx::query_as::<_, BlogPost>(LIST_FEATURED_BLOG_POSTS)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Blog post"))
    }

    async fn get_blog_post_by_slug(&self, slug: &str, published_only: bool) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE slug = $1 AND ($2 = FALSE OR published = TRUE)",
        )
        .bind(slug)
        .bind(published_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Blog post"))
    }

    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPost>(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, image_url, category, tags, read_time,
                published, featured, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(post.read_time)
        .bind(post.published)
        .bind(post.featured)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, SLUG_TAKEN))
    }

    async fn update_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let result = sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts SET
                title = $2, slug = $3, excerpt = $4, content = $5, image_url = $6,
                category = $7, tags = $8, read_time = $9, published = $10,
                featured = $11, published_at = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(post.read_time)
        .bind(post.published)
        .bind(post.featured)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Blog post not found".into()),
            other => unique_conflict(other, SLUG_TAKEN),
        })
    }

    async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_newest_created_first() {
        for sql in [LIST_BLOG_POSTS, LIST_FEATURED_BLOG_POSTS] {
            assert!(sql.contains("ORDER BY created_at DESC"));
            assert!(!sql.contains("published_at"));
        }
    }
}
