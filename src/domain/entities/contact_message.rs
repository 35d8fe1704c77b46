use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::validation::validate_not_blank, listing::Searchable};

text_enum! {
    pub enum MessageStatus {
        Unread => "unread",
        Read => "read",
        Replied => "replied",
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for ContactMessage {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str(), self.message.as_str()];
        if let Some(subject) = &self.subject {
            fields.push(subject.as_str());
        }
        fields
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

/// Public contact form payload.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 40))]
    pub phone: Option<String>,

    #[validate(length(max = 150))]
    pub subject: Option<String>,

    #[validate(length(min = 5, max = 5000), custom(function = "validate_not_blank"))]
    pub message: String,
}

impl ContactForm {
    /// Trims fields and drops blank optionals before insert.
    pub fn normalized(self) -> Self {
        ContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: blank_to_none(self.phone),
            subject: blank_to_none(self.subject),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageStatus {
    pub status: MessageStatus,
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_validation_rejects_bad_email() {
        let form = ContactForm {
            name: "Ada".into(),
            email: "not-an-email".into(),
            phone: None,
            subject: None,
            message: "Hello there".into(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn normalized_drops_blank_optionals() {
        let form = ContactForm {
            name: " Ada ".into(),
            email: "Ada@Example.COM ".into(),
            phone: Some("  ".into()),
            subject: Some(" Hi ".into()),
            message: " Hello there ".into(),
        }
        .normalized();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.phone, None);
        assert_eq!(form.subject.as_deref(), Some("Hi"));
    }

    #[test]
    fn status_parses_from_json() {
        let update: UpdateMessageStatus = serde_json::from_str(r#"{"status":"replied"}"#).unwrap();
        assert_eq!(update.status, MessageStatus::Replied);
        assert!(serde_json::from_str::<UpdateMessageStatus>(r#"{"status":"archived"}"#).is_err());
    }
}
