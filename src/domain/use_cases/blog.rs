use chrono::Utc;

use crate::{
    entities::blog_post::{
        BlogPost, BlogPostInsert, BlogPostSummary, NewBlogPostRequest, UpdateBlogPostRequest,
    },
    errors::AppError,
    listing::{paginate, ListFilter, Page},
    publishing::Publishable,
    repositories::blog_post::BlogPostRepository,
    utils::valid_uuid::valid_uuid,
};

pub const FEATURED_LIMIT: i64 = 3;

pub struct BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub blog_post_repo: R,
}

impl<R> BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub fn new(blog_post_repo: R) -> Self {
        BlogPostHandler { blog_post_repo }
    }

    /// Public archive: published posts, filtered, then paged in memory.
    pub async fn list_public(
        &self,
        filter: &ListFilter,
        page: usize,
        per_page: usize,
    ) -> Result<Page<BlogPostSummary>, AppError> {
        let posts = self.blog_post_repo.list_blog_posts(true).await?;
        let matching = filter.apply(posts);
        Ok(paginate(matching, page, per_page).map(BlogPostSummary::from))
    }

    pub async fn list_featured(&self) -> Result<Vec<BlogPostSummary>, AppError> {
        let posts = self.blog_post_repo.list_featured_blog_posts(FEATURED_LIMIT).await?;
        Ok(posts.into_iter().map(BlogPostSummary::from).collect())
    }

    pub async fn list_all(&self, filter: &ListFilter) -> Result<Vec<BlogPost>, AppError> {
        let posts = self.blog_post_repo.list_blog_posts(false).await?;
        Ok(filter.apply(posts))
    }

    pub async fn get_published(&self, slug: &str) -> Result<BlogPost, AppError> {
        self.blog_post_repo.get_blog_post_by_slug(slug, true).await
    }

    pub async fn get_blog_post(&self, id: &str) -> Result<BlogPost, AppError> {
        let id = valid_uuid(id)?;
        self.blog_post_repo.get_blog_post_by_id(&id).await
    }

    pub async fn create_blog_post(&self, request: NewBlogPostRequest) -> Result<BlogPost, AppError> {
        let insert = BlogPostInsert::from_request(request, Utc::now())?;
        let post = self.blog_post_repo.create_blog_post(&insert).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "Blog post created");
        Ok(post)
    }

    pub async fn update_blog_post(&self, id: &str, request: UpdateBlogPostRequest) -> Result<BlogPost, AppError> {
        let mut post = self.get_blog_post(id).await?;
        request.apply(&mut post, Utc::now())?;
        self.blog_post_repo.update_blog_post(&post).await
    }

    pub async fn toggle_published(&self, id: &str) -> Result<BlogPost, AppError> {
        let mut post = self.get_blog_post(id).await?;
        post.toggle_published(Utc::now());
        self.blog_post_repo.update_blog_post(&post).await
    }

    pub async fn toggle_featured(&self, id: &str) -> Result<BlogPost, AppError> {
        let mut post = self.get_blog_post(id).await?;
        post.featured = !post.featured;
        self.blog_post_repo.update_blog_post(&post).await
    }

    pub async fn delete_blog_post(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.blog_post_repo.delete_blog_post(&id).await?;
        tracing::info!(post_id = %id, "Blog post deleted");
        Ok(())
    }
}
