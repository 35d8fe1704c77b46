use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{contact_message::blank_to_none, validation::validate_not_blank},
    listing::Searchable,
};

text_enum! {
    pub enum QuoteStatus {
        Pending => "pending",
        Reviewed => "reviewed",
        Quoted => "quoted",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_type: String,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for QuoteRequest {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.email.as_str(),
            self.project_type.as_str(),
            self.description.as_str(),
        ];
        if let Some(company) = &self.company {
            fields.push(company.as_str());
        }
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.project_type.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

/// Quote as shown to the admin, with the budget code spelled out.
#[derive(Debug, Serialize)]
pub struct QuoteRequestResponse {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    pub budget_label: Option<String>,
}

impl From<QuoteRequest> for QuoteRequestResponse {
    fn from(quote: QuoteRequest) -> Self {
        let budget_label = quote.budget.as_deref().map(format_budget_label);
        QuoteRequestResponse { quote, budget_label }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuoteForm {
    #[validate(length(min = 2, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 40))]
    pub phone: Option<String>,

    #[validate(length(max = 120))]
    pub company: Option<String>,

    #[validate(length(min = 2, max = 80), custom(function = "validate_not_blank"))]
    pub project_type: String,

    #[validate(length(max = 40))]
    pub budget: Option<String>,

    #[validate(length(max = 80))]
    pub timeline: Option<String>,

    #[validate(length(min = 10, max = 5000), custom(function = "validate_not_blank"))]
    pub description: String,
}

impl QuoteForm {
    pub fn normalized(self) -> Self {
        QuoteForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: blank_to_none(self.phone),
            company: blank_to_none(self.company),
            project_type: self.project_type.trim().to_string(),
            budget: blank_to_none(self.budget).map(|b| b.to_lowercase()),
            timeline: blank_to_none(self.timeline),
            description: self.description.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteStatus {
    pub status: QuoteStatus,
}

/// Turns a budget range code into a display label.
///
/// Codes look like `under-5k`, `25k-50k`, `50k-plus` or `over-50k`.
/// Anything else is returned unchanged.
pub fn format_budget_label(code: &str) -> String {
    let label = if let Some(upper) = code.strip_prefix("under-") {
        thousands(upper).map(|amount| format!("Under {}", amount))
    } else if let Some(lower) = code.strip_prefix("over-") {
        thousands(lower).map(|amount| format!("{}+", amount))
    } else if let Some(lower) = code.strip_suffix("-plus").or_else(|| code.strip_suffix('+')) {
        thousands(lower).map(|amount| format!("{}+", amount))
    } else if let Some((low, high)) = code.split_once('-') {
        thousands(low)
            .zip(thousands(high))
            .map(|(low, high)| format!("{} - {}", low, high))
    } else {
        None
    };

    label.unwrap_or_else(|| code.to_string())
}

/// `"25k"` → `"$25,000"`.
fn thousands(amount: &str) -> Option<String> {
    let digits = amount.strip_suffix('k')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    Some(format!("${}", group_digits(value.checked_mul(1000)?)))
}

fn group_digits(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_labels() {
        assert_eq!(format_budget_label("under-5k"), "Under $5,000");
        assert_eq!(format_budget_label("5k-10k"), "$5,000 - $10,000");
        assert_eq!(format_budget_label("25k-50k"), "$25,000 - $50,000");
        assert_eq!(format_budget_label("50k-plus"), "$50,000+");
        assert_eq!(format_budget_label("over-1000k"), "$1,000,000+");
    }

    #[test]
    fn unknown_budget_codes_pass_through() {
        assert_eq!(format_budget_label("flexible"), "flexible");
        assert_eq!(format_budget_label("a-b"), "a-b");
        assert_eq!(format_budget_label(""), "");
    }

    #[test]
    fn oversized_budget_codes_pass_through() {
        assert_eq!(format_budget_label("under-99999999999999999k"), "under-99999999999999999k");
        assert_eq!(format_budget_label("1k-99999999999999999k"), "1k-99999999999999999k");
        assert_eq!(
            format_budget_label("over-999999999999999999999999k"),
            "over-999999999999999999999999k"
        );
    }

    #[test]
    fn response_carries_budget_label() {
        let now = Utc::now();
        let quote = QuoteRequest {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            company: None,
            project_type: "website".into(),
            budget: Some("under-5k".into()),
            timeline: None,
            description: "A small brochure site".into(),
            status: QuoteStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(QuoteRequestResponse::from(quote)).unwrap();
        assert_eq!(json["budget_label"], "Under $5,000");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["name"], "Ada");
    }
}
