use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::{entities::validation::new_validation_error, errors::AppError};

text_enum! {
    pub enum SettingType {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Json => "json",
    }
}

/// Raw key/value row. `value` is always text; `value_type` says how to read it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    #[sqlx(try_from = "String")]
    pub value_type: SettingType,
    pub updated_at: DateTime<Utc>,
}

impl SiteSetting {
    /// Reads the stored text as its declared type. Values that do not parse
    /// fall back to the raw string.
    pub fn typed_value(&self) -> Value {
        let parsed = match self.value_type {
            SettingType::String => Some(Value::String(self.value.clone())),
            SettingType::Number => self
                .value
                .trim()
                .parse::<serde_json::Number>()
                .ok()
                .map(Value::Number),
            SettingType::Boolean => match self.value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(Value::Bool(true)),
                "false" | "0" | "no" => Some(Value::Bool(false)),
                _ => None,
            },
            SettingType::Json => serde_json::from_str(&self.value).ok(),
        };

        parsed.unwrap_or_else(|| {
            tracing::warn!(
                key = %self.key,
                value_type = %self.value_type,
                "Site setting does not match its declared type, using raw string"
            );
            Value::String(self.value.clone())
        })
    }
}

/// Flat `{key: typed value}` map served to the site.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct SiteSettings(pub BTreeMap<String, Value>);

impl SiteSettings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl FromIterator<SiteSetting> for SiteSettings {
    fn from_iter<I: IntoIterator<Item = SiteSetting>>(iter: I) -> Self {
        SiteSettings(
            iter.into_iter()
                .map(|setting| {
                    let value = setting.typed_value();
                    (setting.key, value)
                })
                .collect(),
        )
    }
}

/// Admin upsert payload. `value_type` is inferred from the JSON value when
/// omitted.
#[derive(Debug, Deserialize)]
pub struct UpsertSiteSetting {
    pub value: Value,
    pub value_type: Option<SettingType>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SiteSettingWrite {
    #[validate(length(min = 1, max = 100), custom(function = "validate_setting_key"))]
    pub key: String,
    #[validate(length(max = 20_000))]
    pub value: String,
    pub value_type: SettingType,
}

fn validate_setting_key(key: &str) -> Result<(), ValidationError> {
    if key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.' || c == '-')
    {
        Ok(())
    } else {
        Err(new_validation_error(
            "invalid_key",
            "Keys may contain lowercase letters, digits, '_', '.' or '-'",
        ))
    }
}

impl SiteSettingWrite {
    pub fn from_request(key: String, request: UpsertSiteSetting) -> Result<Self, AppError> {
        let value_type = request.value_type.unwrap_or_else(|| infer_type(&request.value));

        let value = match (value_type, request.value) {
            (SettingType::String, Value::String(s)) => s,
            (SettingType::Number, Value::Number(n)) => n.to_string(),
            (SettingType::Number, Value::String(s)) if s.trim().parse::<serde_json::Number>().is_ok() => {
                s.trim().to_string()
            }
            (SettingType::Boolean, Value::Bool(b)) => b.to_string(),
            (SettingType::Json, value) => value.to_string(),
            (expected, _) => {
                return Err(AppError::field(
                    "value",
                    &format!("Value does not match declared type '{}'", expected),
                ));
            }
        };

        let write = SiteSettingWrite { key: key.trim().to_string(), value, value_type };
        write.validate()?;
        Ok(write)
    }
}

fn infer_type(value: &Value) -> SettingType {
    match value {
        Value::String(_) => SettingType::String,
        Value::Number(_) => SettingType::Number,
        Value::Bool(_) => SettingType::Boolean,
        _ => SettingType::Json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(key: &str, value: &str, value_type: SettingType) -> SiteSetting {
        SiteSetting {
            key: key.into(),
            value: value.into(),
            value_type,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn typed_values_are_parsed_by_declared_type() {
        let settings: SiteSettings = vec![
            setting("site_title", "Jane Doe", SettingType::String),
            setting("projects_per_page", "12", SettingType::Number),
            setting("show_blog", "true", SettingType::Boolean),
            setting("socials", r#"{"github":"janedoe"}"#, SettingType::Json),
        ]
        .into_iter()
        .collect();

        assert_eq!(settings.get("site_title"), Some(&json!("Jane Doe")));
        assert_eq!(settings.get("projects_per_page"), Some(&json!(12)));
        assert_eq!(settings.get("show_blog"), Some(&json!(true)));
        assert_eq!(settings.get("socials"), Some(&json!({"github": "janedoe"})));
    }

    #[test]
    fn unparsable_values_fall_back_to_string() {
        let s = setting("max_items", "lots", SettingType::Number);
        assert_eq!(s.typed_value(), json!("lots"));
        let s = setting("config", "{broken", SettingType::Json);
        assert_eq!(s.typed_value(), json!("{broken"));
    }

    #[test]
    fn upsert_infers_type_and_rejects_mismatch() {
        let write = SiteSettingWrite::from_request(
            "show_blog".into(),
            UpsertSiteSetting { value: json!(false), value_type: None },
        )
        .unwrap();
        assert_eq!(write.value, "false");
        assert_eq!(write.value_type, SettingType::Boolean);

        let write = SiteSettingWrite::from_request(
            "socials".into(),
            UpsertSiteSetting { value: json!(["a", "b"]), value_type: None },
        )
        .unwrap();
        assert_eq!(write.value_type, SettingType::Json);
        assert_eq!(write.value, r#"["a","b"]"#);

        let mismatch = SiteSettingWrite::from_request(
            "show_blog".into(),
            UpsertSiteSetting { value: json!("maybe"), value_type: Some(SettingType::Boolean) },
        );
        assert!(mismatch.is_err());
    }

    #[test]
    fn keys_are_restricted() {
        let bad = SiteSettingWrite::from_request(
            "Site Title".into(),
            UpsertSiteSetting { value: json!("x"), value_type: None },
        );
        assert!(bad.is_err());
    }
}
