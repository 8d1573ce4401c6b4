use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::fields;
use crate::utils::error::AppError;

pub const DEFAULT_ORGANIZER_NAME: &str = "Anonymous";
pub const DEFAULT_ORGANIZER_EMAIL: &str = "no-email@provided.com";

/// A stored event row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub location: String,
    pub image_url: Option<String>,
    pub category: String,
    pub max_attendees: i32,
    pub organizer_name: String,
    pub organizer_email: String,
    pub ticket_price: Decimal,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub color_code: &'static str,
}

#[rustfmt::skip]
pub const CATEGORIES: [Category; 8] = [
    Category { name: "Conference", color_code: "#4A90E2" },
    Category { name: "Workshop", color_code: "#50E3C2" },
    Category { name: "Seminar", color_code: "#F5A623" },
    Category { name: "Networking", color_code: "#7ED321" },
    Category { name: "Social", color_code: "#D0021B" },
    Category { name: "Concert", color_code: "#9013FE" },
    Category { name: "Exhibition", color_code: "#4A4A4A" },
    Category { name: "Sports", color_code: "#F8E71C" },
];

pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.iter().any(|category| category.name == name)
}

/// Request body for creating or updating an event. Accepts both JSON and
/// urlencoded form submissions, so numeric and boolean fields tolerate
/// their string renditions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_int")]
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub organizer_email: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_decimal")]
    pub ticket_price: Option<Decimal>,
    #[serde(default, deserialize_with = "fields::checkbox")]
    pub is_featured: bool,
}

impl EventPayload {
    /// Required-field and category checks, shared by create and update.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        if is_blank(&self.title) {
            missing.push("title");
        }
        if is_blank(&self.description) {
            missing.push("description");
        }
        if self.event_date.is_none() {
            missing.push("event_date");
        }
        if is_blank(&self.event_time) {
            missing.push("event_time");
        }
        if is_blank(&self.location) {
            missing.push("location");
        }
        if is_blank(&self.category) {
            missing.push("category");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let category = self.category.as_deref().unwrap_or_default();
        if !is_known_category(category) {
            return Err(AppError::Validation(format!(
                "Unknown category '{category}'"
            )));
        }

        Ok(())
    }

    /// Image field with untouched form inputs treated as absent.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn max_attendees(&self) -> i32 {
        self.max_attendees.unwrap_or(0)
    }

    pub fn organizer_name(&self) -> &str {
        present_or(&self.organizer_name, DEFAULT_ORGANIZER_NAME)
    }

    pub fn organizer_email(&self) -> &str {
        present_or(&self.organizer_email, DEFAULT_ORGANIZER_EMAIL)
    }

    pub fn ticket_price(&self) -> Decimal {
        self.ticket_price.unwrap_or_default()
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |value| value.trim().is_empty())
}

fn present_or<'a>(field: &'a Option<String>, default: &'static str) -> &'a str {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> EventPayload {
        serde_json::from_value(json!({
            "title": "Tech Talk",
            "description": "AI talk",
            "event_date": "2025-06-01",
            "event_time": "18:00",
            "location": "Hall A",
            "category": "Seminar"
        }))
        .unwrap()
    }

    #[test]
    fn valid_payload_passes() {
        valid_payload().validate().unwrap();
    }

    #[test]
    fn missing_fields_are_listed() {
        let payload: EventPayload =
            serde_json::from_value(json!({ "title": "Tech Talk" })).unwrap();
        let err = payload.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Missing required fields:"), "{message}");
        for field in ["description", "event_date", "event_time", "location", "category"] {
            assert!(message.contains(field), "missing {field} in {message}");
        }
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut payload = valid_payload();
        payload.title = Some("   ".to_string());
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut payload = valid_payload();
        payload.category = Some("Rave".to_string());
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("Rave"));
    }

    #[test]
    fn defaults_for_omitted_optionals() {
        let payload = valid_payload();
        assert_eq!(payload.max_attendees(), 0);
        assert_eq!(payload.organizer_name(), DEFAULT_ORGANIZER_NAME);
        assert_eq!(payload.organizer_email(), DEFAULT_ORGANIZER_EMAIL);
        assert_eq!(payload.ticket_price(), Decimal::ZERO);
        assert!(!payload.is_featured);
        assert!(payload.image().is_none());
    }

    #[test]
    fn form_submission_coerces_string_fields() {
        let payload: EventPayload = serde_urlencoded::from_str(
            "title=Tech+Talk&description=AI+talk&event_date=2025-06-01&event_time=18%3A00\
             &location=Hall+A&category=Seminar&max_attendees=25&ticket_price=10.50\
             &is_featured=on&organizer_name=&organizer_email=",
        )
        .unwrap();

        payload.validate().unwrap();
        assert_eq!(payload.max_attendees(), 25);
        assert_eq!(payload.ticket_price(), "10.50".parse().unwrap());
        assert!(payload.is_featured);
        // empty form inputs fall back to the documented defaults
        assert_eq!(payload.organizer_name(), DEFAULT_ORGANIZER_NAME);
        assert_eq!(payload.organizer_email(), DEFAULT_ORGANIZER_EMAIL);
    }

    #[test]
    fn empty_image_field_counts_as_absent() {
        let mut payload = valid_payload();
        payload.image_url = Some(String::new());
        assert!(payload.image().is_none());

        payload.image_url = Some("/uploads/abc.png".to_string());
        assert_eq!(payload.image(), Some("/uploads/abc.png"));
    }

    #[test]
    fn category_table_is_fixed() {
        assert_eq!(CATEGORIES.len(), 8);
        assert!(is_known_category("Conference"));
        assert!(is_known_category("Sports"));
        assert!(!is_known_category("conference"));
        assert_eq!(CATEGORIES[0].color_code, "#4A90E2");
    }
}
