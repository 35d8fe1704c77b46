use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectInsert},
    errors::AppError,
    repositories::sqlx_repo::{not_found, unique_conflict, SqlxProjectRepo},
};

const SLUG_TAKEN: &str = "A project with this slug already exists";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, published_only: bool) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn get_project_by_slug(&self, slug: &str, published_only: bool) -> Result<Project, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn update_project(&self, project: &Project) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, published_only: bool) -> Result<Vec<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE ($1 = FALSE OR published = TRUE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found(e, "Project"))
    }

    async fn get_project_by_slug(&self, slug: &str, published_only: bool) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE slug = $1 AND ($2 = FALSE OR published = TRUE)",
        )
        .bind(slug)
        .bind(published_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found(e, "Project"))
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, slug, description, content, image_url, technologies, category,
                subcategory, status, client, duration, live_url, github_url, highlights,
                published, featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.content)
        .bind(&project.image_url)
        .bind(&project.technologies)
        .bind(&project.category)
        .bind(&project.subcategory)
        .bind(project.status.as_str())
        .bind(&project.client)
        .bind(&project.duration)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(&project.highlights)
        .bind(project.published)
        .bind(project.featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, SLUG_TAKEN))
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let result = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = $2, slug = $3, description = $4, content = $5, image_url = $6,
                technologies = $7, category = $8, subcategory = $9, status = $10,
                client = $11, duration = $12, live_url = $13, github_url = $14,
                highlights = $15, published = $16, featured = $17, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.content)
        .bind(&project.image_url)
        .bind(&project.technologies)
        .bind(&project.category)
        .bind(&project.subcategory)
        .bind(project.status.as_str())
        .bind(&project.client)
        .bind(&project.duration)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(&project.highlights)
        .bind(project.published)
        .bind(project.featured)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Project not found".into()),
            other => unique_conflict(other, SLUG_TAKEN),
        })
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }
}
