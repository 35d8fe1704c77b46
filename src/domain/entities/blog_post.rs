use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            apply_slug_patch, content_patch, normalize_list, patch_required, render_content,
            resolve_slug, validate_image_url, validate_optional_image_field,
            validate_optional_not_blank, validate_optional_slug, validate_optional_tags,
            validate_optional_title, validate_slug, validate_tags, validate_title,
            MAX_SLUG_LENGTH, MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH,
            MIN_TITLE_LENGTH,
        },
    },
    errors::AppError,
    listing::Searchable,
    publishing::Publishable,
    utils::{
        rich_text::RichTextInput,
        text::{estimate_read_time, summarize},
    },
};

const MIN_EXCERPT_LENGTH: u64 = 10;
const GENERATED_EXCERPT_CHARS: usize = 200;
const MAX_READ_TIME: i32 = 240;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time: i32,
    pub published: bool,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlogPostInsert {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time: i32,
    pub published: bool,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Publishable for BlogPost {
    fn is_published(&self) -> bool {
        self.published
    }

    /// `published_at` is stamped on every unpublished → published transition
    /// and left in place when a post is unpublished.
    fn set_published(&mut self, published: bool, now: DateTime<Utc>) {
        if published && !self.published {
            self.published_at = Some(now);
        }
        self.published = published;
    }
}

impl Searchable for BlogPost {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.excerpt.as_str(), self.category.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

// ───── API Response Models ──────────────────────────────────────────

/// Archive card: everything but the body.
#[derive(Debug, Serialize)]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time: i32,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<BlogPost> for BlogPostSummary {
    fn from(post: BlogPost) -> Self {
        BlogPostSummary {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            image_url: post.image_url,
            category: post.category,
            tags: post.tags,
            read_time: post.read_time,
            featured: post.featured,
            published_at: post.published_at,
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    /// Derived from the content when omitted.
    #[validate(length(min = MIN_EXCERPT_LENGTH, max = MAX_SUMMARY_LENGTH))]
    pub excerpt: Option<String>,

    pub content: RichTextInput,

    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 60))]
    pub category: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    /// Overrides the word-count estimate.
    #[validate(range(min = 1, max = MAX_READ_TIME))]
    pub read_time: Option<i32>,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: OptionField<String>,

    #[validate(length(min = MIN_EXCERPT_LENGTH, max = MAX_SUMMARY_LENGTH))]
    pub excerpt: OptionField<String>,

    pub content: OptionField<RichTextInput>,

    #[validate(custom(function = "validate_optional_image_field"))]
    pub image_url: OptionField<String>,

    #[validate(length(min = 1, max = 60), custom(function = "validate_optional_not_blank"))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_tags"))]
    pub tags: OptionField<Vec<String>>,

    pub read_time: OptionField<i32>,

    pub published: OptionField<bool>,

    pub featured: OptionField<bool>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl BlogPostInsert {
    pub fn from_request(value: NewBlogPostRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        value.validate()?;
        let slug = resolve_slug(value.slug, &value.title)?;
        let content = render_content(value.content)?;

        let excerpt = match value.excerpt.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
            Some(excerpt) => excerpt,
            None => summarize(&content, GENERATED_EXCERPT_CHARS),
        };
        let read_time = value.read_time.unwrap_or_else(|| estimate_read_time(&content));

        Ok(BlogPostInsert {
            title: value.title,
            slug,
            excerpt,
            content,
            image_url: value.image_url,
            category: value.category.trim().to_string(),
            tags: normalize_list(value.tags),
            read_time,
            published: value.published,
            featured: value.featured,
            published_at: value.published.then_some(now),
        })
    }
}

impl UpdateBlogPostRequest {
    /// Validates the patch and applies it to `post` in place. New content
    /// re-estimates the read time unless one is supplied alongside it.
    pub fn apply(self, post: &mut BlogPost, now: DateTime<Utc>) -> Result<(), AppError> {
        self.validate()?;

        patch_required("title", self.title, &mut post.title)?;
        apply_slug_patch(self.slug, &mut post.slug, &post.title)?;
        patch_required("excerpt", self.excerpt, &mut post.excerpt)?;
        if let Some(content) = content_patch(self.content)? {
            post.read_time = estimate_read_time(&content);
            post.content = content;
        }
        self.image_url.apply_to(&mut post.image_url);
        patch_required("category", self.category, &mut post.category)?;
        patch_required("tags", self.tags.map_value(normalize_list), &mut post.tags)?;

        match self.read_time {
            OptionField::SetToValue(minutes) if !(1..=MAX_READ_TIME).contains(&minutes) => {
                return Err(AppError::field("read_time", "Read time must be between 1 and 240 minutes"));
            }
            OptionField::SetToValue(minutes) => post.read_time = minutes,
            OptionField::SetToNull => post.read_time = estimate_read_time(&post.content),
            OptionField::Unchanged => {}
        }

        if let OptionField::SetToValue(published) = self.published {
            post.set_published(published, now);
        }
        patch_required("featured", self.featured, &mut post.featured)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub fn sample_post(title: &str, excerpt: &str) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: crate::utils::text::generate_slug(title),
            excerpt: excerpt.to_string(),
            content: "<p>Some words here</p>".into(),
            image_url: None,
            category: "engineering".into(),
            tags: vec!["rust".into()],
            read_time: 1,
            published: false,
            featured: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn each_publication_stamps_published_at() {
        let mut post = sample_post("Shipping Rust", "How we ship Rust services");
        let first = Utc::now();

        assert!(post.toggle_published(first));
        assert_eq!(post.published_at, Some(first));

        assert!(!post.toggle_published(first + Duration::hours(1)));
        assert_eq!(post.published_at, Some(first));

        let again = first + Duration::hours(2);
        assert!(post.toggle_published(again));
        assert_eq!(post.published_at, Some(again));
    }

    #[test]
    fn publishing_an_already_published_post_keeps_its_date() {
        let mut post = sample_post("Shipping Rust", "How we ship Rust services");
        let first = Utc::now();
        post.set_published(true, first);
        post.set_published(true, first + Duration::hours(1));
        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn toggle_leaves_other_fields_alone() {
        let mut post = sample_post("Shipping Rust", "How we ship Rust services");
        let before = post.clone();
        post.toggle_published(Utc::now());
        assert_eq!(post.title, before.title);
        assert_eq!(post.featured, before.featured);
        assert_eq!(post.content, before.content);
    }

    #[test]
    fn create_request_estimates_read_time_and_excerpt() {
        let words = vec!["word"; 400].join(" ");
        let request: NewBlogPostRequest = serde_json::from_value(serde_json::json!({
            "title": "Four Hundred Words",
            "content": {"format": "markdown", "body": words},
            "category": "notes",
            "tags": ["Rust", "rust"],
            "published": true
        }))
        .unwrap();

        let now = Utc::now();
        let insert = BlogPostInsert::from_request(request, now).unwrap();
        assert_eq!(insert.read_time, 2);
        assert_eq!(insert.slug, "four-hundred-words");
        assert!(insert.excerpt.starts_with("word word"));
        assert_eq!(insert.tags, vec!["Rust"]);
        assert_eq!(insert.published_at, Some(now));
    }

    #[test]
    fn content_patch_recomputes_read_time() {
        let mut post = sample_post("Shipping Rust", "How we ship Rust services");
        let words = vec!["word"; 401].join(" ");
        let patch: UpdateBlogPostRequest = serde_json::from_value(serde_json::json!({
            "content": {"format": "html", "body": format!("<p>{}</p>", words)}
        }))
        .unwrap();
        patch.apply(&mut post, Utc::now()).unwrap();
        assert_eq!(post.read_time, 3);
    }

    #[test]
    fn patch_publish_goes_through_transition() {
        let mut post = sample_post("Shipping Rust", "How we ship Rust services");
        let now = Utc::now();
        let patch: UpdateBlogPostRequest = serde_json::from_value(serde_json::json!({"published": true})).unwrap();
        patch.apply(&mut post, now).unwrap();
        assert!(post.published);
        assert_eq!(post.published_at, Some(now));
    }
}
