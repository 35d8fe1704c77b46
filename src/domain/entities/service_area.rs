use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            apply_slug_patch, new_validation_error, normalize_list, patch_required,
            resolve_slug, validate_list_items, validate_optional_list_items,
            validate_optional_slug, validate_optional_title, validate_slug, validate_title,
            MAX_SLUG_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH, MIN_TITLE_LENGTH,
        },
    },
    errors::AppError,
    listing::Searchable,
};

const MAX_FAQS: usize = 30;
const MAX_META_DESCRIPTION: u64 = 160;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// A city landing page. Only `active` areas are public.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceArea {
    pub id: Uuid,
    pub slug: String,
    pub city: String,
    pub region: Option<String>,
    pub title: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub intro: String,
    pub faqs: Json<Vec<Faq>>,
    pub local_expertise: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ServiceAreaInsert {
    pub slug: String,
    pub city: String,
    pub region: Option<String>,
    pub title: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub intro: String,
    pub faqs: Vec<Faq>,
    pub local_expertise: Vec<String>,
    pub active: bool,
}

impl ServiceArea {
    /// Flips `active` and returns the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}

impl Searchable for ServiceArea {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.city.as_str(), self.title.as_str(), self.intro.as_str()];
        if let Some(region) = &self.region {
            fields.push(region.as_str());
        }
        fields
    }

    fn category(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn status(&self) -> Option<&str> {
        Some(if self.active { "active" } else { "inactive" })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewServiceAreaRequest {
    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 2, max = 80))]
    pub city: String,

    #[validate(length(max = 80))]
    pub region: Option<String>,

    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(max = 70))]
    pub meta_title: Option<String>,

    #[validate(length(max = MAX_META_DESCRIPTION))]
    pub meta_description: Option<String>,

    #[validate(length(min = 10, max = 5000))]
    pub intro: String,

    #[serde(default)]
    #[validate(custom(function = "validate_faqs"))]
    pub faqs: Vec<Faq>,

    #[serde(default)]
    #[validate(custom(function = "validate_list_items"))]
    pub local_expertise: Vec<String>,

    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateServiceAreaRequest {
    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: OptionField<String>,

    #[validate(length(min = 2, max = 80))]
    pub city: OptionField<String>,

    #[validate(length(max = 80))]
    pub region: OptionField<String>,

    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(length(max = 70))]
    pub meta_title: OptionField<String>,

    #[validate(length(max = MAX_META_DESCRIPTION))]
    pub meta_description: OptionField<String>,

    #[validate(length(min = 10, max = 5000))]
    pub intro: OptionField<String>,

    #[validate(custom(function = "validate_optional_faqs"))]
    pub faqs: OptionField<Vec<Faq>>,

    #[validate(custom(function = "validate_optional_list_items"))]
    pub local_expertise: OptionField<Vec<String>>,

    pub active: OptionField<bool>,
}

fn validate_faqs(faqs: &[Faq]) -> Result<(), ValidationError> {
    if faqs.len() > MAX_FAQS {
        return Err(new_validation_error("too_many_faqs", "At most 30 FAQ entries are allowed"));
    }
    if faqs.iter().any(|f| f.question.trim().is_empty() || f.answer.trim().is_empty()) {
        return Err(new_validation_error("faq_incomplete", "Every FAQ needs a question and an answer"));
    }
    Ok(())
}

fn validate_optional_faqs(value: &OptionField<Vec<Faq>>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(faqs) = value {
        validate_faqs(faqs)?;
    }
    Ok(())
}

fn trim_faqs(faqs: Vec<Faq>) -> Vec<Faq> {
    faqs.into_iter()
        .map(|f| Faq {
            question: f.question.trim().to_string(),
            answer: f.answer.trim().to_string(),
        })
        .collect()
}

impl TryFrom<NewServiceAreaRequest> for ServiceAreaInsert {
    type Error = AppError;

    fn try_from(value: NewServiceAreaRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let slug = resolve_slug(value.slug, &value.city)?;

        Ok(ServiceAreaInsert {
            slug,
            city: value.city.trim().to_string(),
            region: value.region,
            title: value.title,
            meta_title: value.meta_title,
            meta_description: value.meta_description,
            intro: value.intro.trim().to_string(),
            faqs: trim_faqs(value.faqs),
            local_expertise: normalize_list(value.local_expertise),
            active: value.active,
        })
    }
}

impl UpdateServiceAreaRequest {
    pub fn apply(self, area: &mut ServiceArea) -> Result<(), AppError> {
        self.validate()?;

        patch_required("city", self.city, &mut area.city)?;
        apply_slug_patch(self.slug, &mut area.slug, &area.city)?;
        self.region.apply_to(&mut area.region);
        patch_required("title", self.title, &mut area.title)?;
        self.meta_title.apply_to(&mut area.meta_title);
        self.meta_description.apply_to(&mut area.meta_description);
        patch_required("intro", self.intro, &mut area.intro)?;
        patch_required("faqs", self.faqs.map_value(trim_faqs), &mut area.faqs.0)?;
        patch_required(
            "local_expertise",
            self.local_expertise.map_value(normalize_list),
            &mut area.local_expertise,
        )?;
        patch_required("active", self.active, &mut area.active)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn sample_area(city: &str) -> ServiceArea {
        let now = Utc::now();
        ServiceArea {
            id: Uuid::new_v4(),
            slug: crate::utils::text::generate_slug(city),
            city: city.to_string(),
            region: Some("Lagos State".into()),
            title: format!("Web Design in {}", city),
            meta_title: None,
            meta_description: None,
            intro: "Local web design and development services".into(),
            faqs: Json(vec![Faq {
                question: "Do you work remotely?".into(),
                answer: "Yes.".into(),
            }]),
            local_expertise: vec!["E-commerce".into()],
            active: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn toggle_active_flips_flag() {
        let mut area = sample_area("Ikeja");
        assert!(area.toggle_active());
        assert!(!area.toggle_active());
    }

    #[test]
    fn slug_defaults_to_city() {
        let request: NewServiceAreaRequest = serde_json::from_value(serde_json::json!({
            "city": "Port Harcourt",
            "title": "Web Design in Port Harcourt",
            "intro": "We build websites for local businesses",
            "faqs": [{"question": " Cost? ", "answer": " It depends. "}]
        }))
        .unwrap();
        let insert = ServiceAreaInsert::try_from(request).unwrap();
        assert_eq!(insert.slug, "port-harcourt");
        assert_eq!(insert.faqs[0].question, "Cost?");
        assert!(!insert.active);
    }

    #[test]
    fn incomplete_faq_is_rejected() {
        let request: NewServiceAreaRequest = serde_json::from_value(serde_json::json!({
            "city": "Abuja",
            "title": "Web Design in Abuja",
            "intro": "We build websites for local businesses",
            "faqs": [{"question": "Cost?", "answer": "  "}]
        }))
        .unwrap();
        assert!(ServiceAreaInsert::try_from(request).is_err());
    }

    #[test]
    fn faqs_serialize_as_plain_array() {
        let json = serde_json::to_value(sample_area("Ikeja")).unwrap();
        assert_eq!(json["faqs"][0]["answer"], "Yes.");
    }
}
