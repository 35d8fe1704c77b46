use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::{
    entities::option_fields::OptionField,
    errors::AppError,
    utils::rich_text::RichTextInput,
};

pub const MIN_TITLE_LENGTH: u64 = 3;
pub const MAX_TITLE_LENGTH: u64 = 160;
pub const MIN_SLUG_LENGTH: u64 = 3;
pub const MAX_SLUG_LENGTH: u64 = 120;
pub const MAX_SUMMARY_LENGTH: u64 = 500;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 40;

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

/// Image fields also accept the inline `data:image/...` URLs produced when
/// object storage is unavailable during upload.
pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("data:image/") && url.contains(";base64,") {
        return Ok(());
    }
    validate_url(url)
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many entries provided"));
    }
    for tag in tags {
        if tag.trim().is_empty() || tag.len() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_tag_length", "Entries must be between 1 and 40 characters"));
        }
    }
    Ok(())
}

pub fn validate_list_items(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(new_validation_error("empty_item", "List entries cannot be empty"));
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(new_validation_error("blank", "Value cannot be blank"));
    }
    Ok(())
}

pub fn validate_optional_title(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(title) = value {
        validate_title(title)?;
    }
    Ok(())
}

pub fn validate_optional_slug(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(slug) = value {
        validate_slug(slug)?;
    }
    Ok(())
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_optional_image_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_image_url(url)?;
    }
    Ok(())
}

pub fn validate_optional_tags(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(tags) = value {
        validate_tags(tags)?;
    }
    Ok(())
}

pub fn validate_optional_list_items(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(items) = value {
        validate_list_items(items)?;
    }
    Ok(())
}

pub fn validate_optional_not_blank(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(v) = value {
        validate_not_blank(v)?;
    }
    Ok(())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

pub fn single_field_error(field: &'static str, code: &'static str, msg: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, new_validation_error(code, msg));
    errors
}

/// Uses the supplied slug, or derives one from the title when none was given.
pub fn resolve_slug(slug: Option<String>, title: &str) -> Result<String, ValidationErrors> {
    let slug = match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => crate::utils::text::generate_slug(title),
    };

    if slug.len() < MIN_SLUG_LENGTH as usize {
        return Err(single_field_error("slug", "slug_too_short", "Generated slug is too short; please provide a custom slug"));
    }
    if slug.len() > MAX_SLUG_LENGTH as usize {
        return Err(single_field_error("slug", "slug_too_long", "Slug is too long"));
    }
    validate_slug(&slug).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("slug", e);
        errors
    })?;
    Ok(slug)
}

/// Applies a slug patch: an explicit value is validated, `null` or blank
/// regenerates from `title`, absence keeps the current slug.
pub fn apply_slug_patch(patch: OptionField<String>, slug: &mut String, title: &str) -> Result<(), ValidationErrors> {
    match patch {
        OptionField::Unchanged => {}
        OptionField::SetToNull => *slug = resolve_slug(None, title)?,
        OptionField::SetToValue(value) => *slug = resolve_slug(Some(value), title)?,
    }
    Ok(())
}

/// Applies a patch to a NOT NULL column, rejecting an explicit `null`.
pub fn patch_required<T>(field: &str, patch: OptionField<T>, target: &mut T) -> Result<(), AppError> {
    if patch.apply_required(target) {
        Ok(())
    } else {
        Err(AppError::field(field, "Field cannot be null"))
    }
}

/// Renders submitted rich text to sanitized HTML, reporting failures
/// against the `content` field.
pub fn render_content(input: RichTextInput) -> Result<String, AppError> {
    input
        .into_html()
        .map_err(|e| AppError::field("content", &e.to_string()))
}

/// Renders a content patch. `None` means the content is unchanged.
pub fn content_patch(patch: OptionField<RichTextInput>) -> Result<Option<String>, AppError> {
    match patch {
        OptionField::Unchanged => Ok(None),
        OptionField::SetToNull => Err(AppError::field("content", "Field cannot be null")),
        OptionField::SetToValue(input) => render_content(input).map(Some),
    }
}

/// Trims entries and drops blanks and duplicates, keeping first occurrence order.
pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .filter(|i| seen.insert(i.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-hello").is_err());
        assert!(validate_slug("a--b").is_err());
    }

    #[test]
    fn resolve_slug_prefers_explicit_value() {
        assert_eq!(resolve_slug(Some("my-post".into()), "Ignored").unwrap(), "my-post");
        assert_eq!(resolve_slug(None, "Hello, World!  Foo").unwrap(), "hello-world-foo");
        assert_eq!(resolve_slug(Some("  ".into()), "Hello There").unwrap(), "hello-there");
        assert!(resolve_slug(None, "!!").is_err());
    }

    #[test]
    fn image_urls_accept_inline_data() {
        assert!(validate_image_url("data:image/png;base64,AAAA").is_ok());
        assert!(validate_image_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn normalize_list_dedupes_case_insensitively() {
        let out = normalize_list(vec![" Rust ".into(), "rust".into(), "".into(), "Go".into()]);
        assert_eq!(out, vec!["Rust", "Go"]);
    }
}
