use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            apply_slug_patch, content_patch, normalize_list, patch_required, render_content, resolve_slug,
            validate_image_url, validate_list_items, validate_optional_image_field,
            validate_optional_list_items, validate_optional_not_blank, validate_optional_slug,
            validate_optional_tags, validate_optional_title, validate_optional_url_field,
            validate_slug, validate_tags, validate_title, validate_url, MAX_SLUG_LENGTH,
            MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH, MIN_TITLE_LENGTH,
        },
    },
    errors::AppError,
    listing::Searchable,
    publishing::impl_publishable,
    utils::rich_text::RichTextInput,
};

text_enum! {
    pub enum ProjectStatus {
        Planning => "planning",
        InProgress => "in_progress",
        Completed => "completed",
        OnHold => "on_hold",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Completed
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: Option<String>,
    pub technologies: Vec<String>,
    pub category: String,
    pub subcategory: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub client: Option<String>,
    pub duration: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub highlights: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: Option<String>,
    pub technologies: Vec<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub status: ProjectStatus,
    pub client: Option<String>,
    pub duration: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub highlights: Vec<String>,
    pub published: bool,
    pub featured: bool,
}

impl_publishable!(Project);

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str(), self.category.as_str()];
        fields.extend(self.technologies.iter().map(String::as_str));
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.technologies
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewProjectRequest {
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

    #[validate(length(min = 10, max = MAX_SUMMARY_LENGTH))]
    pub description: String,

    pub content: RichTextInput,

    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub technologies: Vec<String>,

    #[validate(length(min = 1, max = 60))]
    pub category: String,

    #[validate(length(max = 60))]
    pub subcategory: Option<String>,

    #[serde(default)]
    pub status: ProjectStatus,

    #[validate(length(max = 120))]
    pub client: Option<String>,

    #[validate(length(max = 60))]
    pub duration: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_list_items"))]
    pub highlights: Vec<String>,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: OptionField<String>,

    #[validate(length(min = 10, max = MAX_SUMMARY_LENGTH))]
    pub description: OptionField<String>,

    pub content: OptionField<RichTextInput>,

    #[validate(custom(function = "validate_optional_image_field"))]
    pub image_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_tags"))]
    pub technologies: OptionField<Vec<String>>,

    #[validate(length(min = 1, max = 60), custom(function = "validate_optional_not_blank"))]
    pub category: OptionField<String>,

    #[validate(length(max = 60))]
    pub subcategory: OptionField<String>,

    pub status: OptionField<ProjectStatus>,

    #[validate(length(max = 120))]
    pub client: OptionField<String>,

    #[validate(length(max = 60))]
    pub duration: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub github_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_list_items"))]
    pub highlights: OptionField<Vec<String>>,

    pub published: OptionField<bool>,

    pub featured: OptionField<bool>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = AppError;

    fn try_from(value: NewProjectRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let slug = resolve_slug(value.slug, &value.title)?;
        let content = render_content(value.content)?;

        Ok(ProjectInsert {
            title: value.title,
            slug,
            description: value.description.trim().to_string(),
            content,
            image_url: value.image_url,
            technologies: normalize_list(value.technologies),
            category: value.category.trim().to_string(),
            subcategory: value.subcategory,
            status: value.status,
            client: value.client,
            duration: value.duration,
            live_url: value.live_url,
            github_url: value.github_url,
            highlights: normalize_list(value.highlights),
            published: value.published,
            featured: value.featured,
        })
    }
}

impl UpdateProjectRequest {
    /// Validates the patch and applies it to `project` in place.
    pub fn apply(self, project: &mut Project) -> Result<(), AppError> {
        self.validate()?;

        patch_required("title", self.title, &mut project.title)?;
        apply_slug_patch(self.slug, &mut project.slug, &project.title)?;
        patch_required("description", self.description, &mut project.description)?;
        if let Some(content) = content_patch(self.content)? {
            project.content = content;
        }
        self.image_url.apply_to(&mut project.image_url);
        patch_required("technologies", self.technologies.map_value(normalize_list), &mut project.technologies)?;
        patch_required("category", self.category, &mut project.category)?;
        self.subcategory.apply_to(&mut project.subcategory);
        patch_required("status", self.status, &mut project.status)?;
        self.client.apply_to(&mut project.client);
        self.duration.apply_to(&mut project.duration);
        self.live_url.apply_to(&mut project.live_url);
        self.github_url.apply_to(&mut project.github_url);
        patch_required("highlights", self.highlights.map_value(normalize_list), &mut project.highlights)?;
        patch_required("published", self.published, &mut project.published)?;
        patch_required("featured", self.featured, &mut project.featured)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn sample_project(title: &str) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: crate::utils::text::generate_slug(title),
            description: "A project used in tests".into(),
            content: "<p>Body</p>".into(),
            image_url: None,
            technologies: vec!["Rust".into(), "Postgres".into()],
            category: "web".into(),
            subcategory: None,
            status: ProjectStatus::Completed,
            client: None,
            duration: None,
            live_url: None,
            github_url: None,
            highlights: vec![],
            published: false,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn create_request_generates_slug_and_sanitizes_content() {
        let request: NewProjectRequest = serde_json::from_value(serde_json::json!({
            "title": "Inventory Dashboard",
            "description": "Realtime stock tracking for a small shop",
            "content": {"format": "html", "body": "<p>Hi<script>alert(1)</script></p>"},
            "category": "web",
            "technologies": ["Rust", " rust ", "Actix"],
            "status": "in_progress"
        }))
        .unwrap();

        let insert = ProjectInsert::try_from(request).unwrap();
        assert_eq!(insert.slug, "inventory-dashboard");
        assert_eq!(insert.content, "<p>Hi</p>");
        assert_eq!(insert.technologies, vec!["Rust", "Actix"]);
        assert_eq!(insert.status, ProjectStatus::InProgress);
        assert!(!insert.published);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_value::<NewProjectRequest>(serde_json::json!({
            "title": "Inventory Dashboard",
            "description": "Realtime stock tracking for a small shop",
            "content": {"format": "html", "body": "<p>x</p>"},
            "category": "web",
            "status": "abandoned"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn patch_keeps_slug_unless_asked() {
        let mut project = sample_project("Old Name");
        let patch: UpdateProjectRequest =
            serde_json::from_value(serde_json::json!({"title": "New Name", "client": null})).unwrap();
        patch.apply(&mut project).unwrap();
        assert_eq!(project.title, "New Name");
        assert_eq!(project.slug, "old-name");

        let patch: UpdateProjectRequest = serde_json::from_value(serde_json::json!({"slug": null})).unwrap();
        patch.apply(&mut project).unwrap();
        assert_eq!(project.slug, "new-name");
    }

    #[test]
    fn patch_rejects_null_title() {
        let mut project = sample_project("Keep Me");
        let patch: UpdateProjectRequest = serde_json::from_value(serde_json::json!({"title": null})).unwrap();
        assert!(patch.apply(&mut project).is_err());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), *status);
        }
    }
}
