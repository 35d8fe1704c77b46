use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            apply_slug_patch, normalize_list, patch_required, resolve_slug,
            validate_not_blank, validate_optional_not_blank, validate_optional_slug,
            validate_optional_tags, validate_optional_title, validate_slug, validate_tags,
            validate_title, MAX_SLUG_LENGTH, MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH,
            MIN_SLUG_LENGTH, MIN_TITLE_LENGTH,
        },
    },
    errors::AppError,
    listing::Searchable,
    publishing::impl_publishable,
};

const MAX_CODE_LENGTH: u64 = 50_000;

text_enum! {
    pub enum Difficulty {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

text_enum! {
    pub enum UsageFrequency {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Rarely => "rarely",
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Intermediate
    }
}

impl Default for UsageFrequency {
    fn default() -> Self {
        UsageFrequency::Weekly
    }
}

/// A reusable piece of code. `code` is stored verbatim; clients escape it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CodeSnippet {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub category: String,
    pub tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    #[sqlx(try_from = "String")]
    pub usage_frequency: UsageFrequency,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CodeSnippetInsert {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub category: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub usage_frequency: UsageFrequency,
    pub published: bool,
}

impl_publishable!(CodeSnippet);

impl Searchable for CodeSnippet {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.language.as_str(),
            self.category.as_str(),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.difficulty.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCodeSnippetRequest {
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

    #[validate(length(min = 1, max = MAX_SUMMARY_LENGTH))]
    pub description: String,

    #[validate(length(min = 1, max = MAX_CODE_LENGTH), custom(function = "validate_not_blank"))]
    pub code: String,

    #[validate(length(min = 1, max = 40))]
    pub language: String,

    #[validate(length(min = 1, max = 60))]
    pub category: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub usage_frequency: UsageFrequency,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateCodeSnippetRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: OptionField<String>,

    #[validate(length(min = 1, max = MAX_SUMMARY_LENGTH))]
    pub description: OptionField<String>,

    #[validate(length(min = 1, max = MAX_CODE_LENGTH), custom(function = "validate_optional_not_blank"))]
    pub code: OptionField<String>,

    #[validate(length(min = 1, max = 40))]
    pub language: OptionField<String>,

    #[validate(length(min = 1, max = 60))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_tags"))]
    pub tags: OptionField<Vec<String>>,

    pub difficulty: OptionField<Difficulty>,

    pub usage_frequency: OptionField<UsageFrequency>,

    pub published: OptionField<bool>,
}

impl TryFrom<NewCodeSnippetRequest> for CodeSnippetInsert {
    type Error = AppError;

    fn try_from(value: NewCodeSnippetRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let slug = resolve_slug(value.slug, &value.title)?;

        Ok(CodeSnippetInsert {
            title: value.title,
            slug,
            description: value.description.trim().to_string(),
            code: value.code,
            language: value.language.trim().to_lowercase(),
            category: value.category.trim().to_string(),
            tags: normalize_list(value.tags),
            difficulty: value.difficulty,
            usage_frequency: value.usage_frequency,
            published: value.published,
        })
    }
}

impl UpdateCodeSnippetRequest {
    pub fn apply(self, snippet: &mut CodeSnippet) -> Result<(), AppError> {
        self.validate()?;

        patch_required("title", self.title, &mut snippet.title)?;
        apply_slug_patch(self.slug, &mut snippet.slug, &snippet.title)?;
        patch_required("description", self.description, &mut snippet.description)?;
        patch_required("code", self.code, &mut snippet.code)?;
        patch_required(
            "language",
            self.language.map_value(|l| l.trim().to_lowercase()),
            &mut snippet.language,
        )?;
        patch_required("category", self.category, &mut snippet.category)?;
        patch_required("tags", self.tags.map_value(normalize_list), &mut snippet.tags)?;
        patch_required("difficulty", self.difficulty, &mut snippet.difficulty)?;
        patch_required("usage_frequency", self.usage_frequency, &mut snippet.usage_frequency)?;
        patch_required("published", self.published, &mut snippet.published)?;

        Ok(())
    }
}
