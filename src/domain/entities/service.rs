use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        validation::{
            normalize_list, patch_required, validate_list_items, validate_optional_list_items,
            validate_optional_not_blank, validate_optional_title, validate_title,
            MAX_SUMMARY_LENGTH, MAX_TITLE_LENGTH, MIN_TITLE_LENGTH,
        },
    },
    errors::AppError,
    listing::Searchable,
    publishing::impl_publishable,
};

/// An offered service. Public listings sort by `order_index`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    pub price: Option<String>,
    pub order_index: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ServiceInsert {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    pub price: Option<String>,
    pub order_index: i32,
    pub published: bool,
}

impl_publishable!(Service);

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.features.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewServiceRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(min = 10, max = MAX_SUMMARY_LENGTH))]
    pub description: String,

    /// Usually a single emoji.
    #[validate(length(min = 1, max = 16))]
    pub icon: String,

    #[serde(default)]
    #[validate(length(max = 20), custom(function = "validate_list_items"))]
    pub features: Vec<String>,

    #[validate(length(max = 60))]
    pub price: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, max = 10_000))]
    pub order_index: i32,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateServiceRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(length(min = 10, max = MAX_SUMMARY_LENGTH))]
    pub description: OptionField<String>,

    #[validate(length(min = 1, max = 16), custom(function = "validate_optional_not_blank"))]
    pub icon: OptionField<String>,

    #[validate(length(max = 20), custom(function = "validate_optional_list_items"))]
    pub features: OptionField<Vec<String>>,

    #[validate(length(max = 60))]
    pub price: OptionField<String>,

    pub order_index: OptionField<i32>,

    pub published: OptionField<bool>,
}

impl TryFrom<NewServiceRequest> for ServiceInsert {
    type Error = AppError;

    fn try_from(value: NewServiceRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(ServiceInsert {
            title: value.title,
            description: value.description.trim().to_string(),
            icon: value.icon.trim().to_string(),
            features: normalize_list(value.features),
            price: value.price.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            order_index: value.order_index,
            published: value.published,
        })
    }
}

impl UpdateServiceRequest {
    pub fn apply(self, service: &mut Service) -> Result<(), AppError> {
        self.validate()?;

        if let OptionField::SetToValue(index) = &self.order_index {
            if !(0..=10_000).contains(index) {
                return Err(AppError::field("order_index", "Order must be between 0 and 10000"));
            }
        }

        patch_required("title", self.title, &mut service.title)?;
        patch_required("description", self.description, &mut service.description)?;
        patch_required("icon", self.icon, &mut service.icon)?;
        patch_required("features", self.features.map_value(normalize_list), &mut service.features)?;
        self.price.apply_to(&mut service.price);
        patch_required("order_index", self.order_index, &mut service.order_index)?;
        patch_required("published", self.published, &mut service.published)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publishing::Publishable;

    fn sample() -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            title: "Web Design".into(),
            description: "Fast, accessible websites".into(),
            icon: "🎨".into(),
            features: vec!["Responsive".into()],
            price: Some("From $1,500".into()),
            order_index: 1,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn toggle_flips_only_published() {
        let mut service = sample();
        assert!(!service.toggle_published(Utc::now()));
        assert_eq!(service.order_index, 1);
        assert_eq!(service.title, "Web Design");
    }

    #[test]
    fn patch_clears_price_and_reorders() {
        let mut service = sample();
        let patch: UpdateServiceRequest =
            serde_json::from_value(serde_json::json!({"price": null, "order_index": 5})).unwrap();
        patch.apply(&mut service).unwrap();
        assert_eq!(service.price, None);
        assert_eq!(service.order_index, 5);
    }

    #[test]
    fn negative_order_is_rejected() {
        let mut service = sample();
        let patch: UpdateServiceRequest = serde_json::from_value(serde_json::json!({"order_index": -1})).unwrap();
        assert!(patch.apply(&mut service).is_err());
    }
}
