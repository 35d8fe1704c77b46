use chrono::Utc;

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectInsert, UpdateProjectRequest},
    errors::AppError,
    listing::ListFilter,
    publishing::Publishable,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Published projects matching `filter`, newest first.
    pub async fn list_public(&self, filter: &ListFilter) -> Result<Vec<Project>, AppError> {
        let projects = self.project_repo.list_projects(true).await?;
        Ok(filter.apply(projects))
    }

    pub async fn list_all(&self, filter: &ListFilter) -> Result<Vec<Project>, AppError> {
        let projects = self.project_repo.list_projects(false).await?;
        Ok(filter.apply(projects))
    }

    pub async fn get_published(&self, slug: &str) -> Result<Project, AppError> {
        self.project_repo.get_project_by_slug(slug, true).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&id).await
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(request)?;
        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(project_id = %project.id, slug = %project.slug, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, request: UpdateProjectRequest) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;
        request.apply(&mut project)?;
        self.project_repo.update_project(&project).await
    }

    pub async fn toggle_published(&self, id: &str) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;
        project.toggle_published(Utc::now());
        self.project_repo.update_project(&project).await
    }

    pub async fn toggle_featured(&self, id: &str) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;
        project.featured = !project.featured;
        self.project_repo.update_project(&project).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.project_repo.delete_project(&id).await?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }
}
