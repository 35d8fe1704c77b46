use chrono::Utc;

use crate::{
    entities::code_snippet::{
        CodeSnippet, CodeSnippetInsert, NewCodeSnippetRequest, UpdateCodeSnippetRequest,
    },
    errors::AppError,
    listing::ListFilter,
    publishing::Publishable,
    repositories::code_snippet::CodeSnippetRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct CodeSnippetHandler<R>
where
    R: CodeSnippetRepository,
{
    pub snippet_repo: R,
}

impl<R> CodeSnippetHandler<R>
where
    R: CodeSnippetRepository,
{
    pub fn new(snippet_repo: R) -> Self {
        CodeSnippetHandler { snippet_repo }
    }

    pub async fn list_public(&self, filter: &ListFilter) -> Result<Vec<CodeSnippet>, AppError> {
        let snippets = self.snippet_repo.list_snippets(true).await?;
        Ok(filter.apply(snippets))
    }

    pub async fn list_all(&self, filter: &ListFilter) -> Result<Vec<CodeSnippet>, AppError> {
        let snippets = self.snippet_repo.list_snippets(false).await?;
        Ok(filter.apply(snippets))
    }

    pub async fn get_published(&self, slug: &str) -> Result<CodeSnippet, AppError> {
        self.snippet_repo.get_snippet_by_slug(slug, true).await
    }

    pub async fn get_snippet(&self, id: &str) -> Result<CodeSnippet, AppError> {
        let id = valid_uuid(id)?;
        self.snippet_repo.get_snippet_by_id(&id).await
    }

    pub async fn create_snippet(&self, request: NewCodeSnippetRequest) -> Result<CodeSnippet, AppError> {
        let insert = CodeSnippetInsert::try_from(request)?;
        let snippet = self.snippet_repo.create_snippet(&insert).await?;
        tracing::info!(snippet_id = %snippet.id, "Snippet created");
        Ok(snippet)
    }

    pub async fn update_snippet(&self, id: &str, request: UpdateCodeSnippetRequest) -> Result<CodeSnippet, AppError> {
        let mut snippet = self.get_snippet(id).await?;
        request.apply(&mut snippet)?;
        self.snippet_repo.update_snippet(&snippet).await
    }

    pub async fn toggle_published(&self, id: &str) -> Result<CodeSnippet, AppError> {
        let mut snippet = self.get_snippet(id).await?;
        snippet.toggle_published(Utc::now());
        self.snippet_repo.update_snippet(&snippet).await
    }

    pub async fn delete_snippet(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.snippet_repo.delete_snippet(&id).await
    }
}
