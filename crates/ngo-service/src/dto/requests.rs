//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`. Required text
//! fields default to empty so a missing field is reported by validation rather
//! than by the JSON decoder.

use std::borrow::Cow;

use ngo_core::entities::{
    parse_event_date, DonationKind, DonationNotes, DonationStatus, DonationType, EventDetails,
    EventStatus, EventType, Role,
};
use ngo_core::{DomainError, Snowflake};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

// Numeric body fields arrive as JSON numbers or numeric strings. Values that do
// not parse come out of range so the field's own rule reports them.

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::Number(n) => n.as_i64().unwrap_or(i64::MIN),
        Value::String(s) => s.trim().parse().unwrap_or(i64::MIN),
        _ => i64::MIN,
    }))
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Self-registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = "validate_registrable_role"))]
    pub role: String,

    pub school_name: Option<String>,
}

fn default_role() -> String {
    Role::Volunteer.as_str().to_string()
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if blank(name) {
        return Err(error("required", "Name is required"));
    }
    Ok(())
}

fn validate_registrable_role(role: &str) -> Result<(), ValidationError> {
    match role.parse::<Role>() {
        Ok(role) if role.is_self_registrable() => Ok(()),
        _ => Err(error("role", "Invalid role")),
    }
}

impl RegisterRequest {
    /// Role after validation
    pub fn role(&self) -> Result<Role, DomainError> {
        Ok(self.role.parse::<Role>()?)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request; without a token every session of the caller is revoked
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// Event Requests
// ============================================================================

/// Event fields shared by a school's request and an admin's direct creation
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_description"))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_event_type"))]
    pub event_type: String,

    #[serde(default)]
    #[validate(custom(function = "validate_event_date"))]
    pub date: String,

    #[serde(default)]
    #[validate(custom(function = "validate_location"))]
    pub location: String,

    pub target_audience: Option<String>,

    #[validate(range(
        min = 0,
        max = 100_000,
        message = "Number of students must be a positive integer"
    ))]
    #[serde(default, deserialize_with = "lenient_i64")]
    pub number_of_students: Option<i64>,

    pub notes: Option<String>,
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    if blank(value) {
        return Err(error("required", "Event title is required"));
    }
    Ok(())
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    if blank(value) {
        return Err(error("required", "Description is required"));
    }
    Ok(())
}

fn validate_location(value: &str) -> Result<(), ValidationError> {
    if blank(value) {
        return Err(error("required", "Location is required"));
    }
    Ok(())
}

fn validate_event_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<EventType>()
        .map(|_| ())
        .map_err(|_| error("event_type", "Invalid event type"))
}

fn validate_event_date(value: &str) -> Result<(), ValidationError> {
    parse_event_date(value)
        .map(|_| ())
        .ok_or_else(|| error("date", "Valid date is required"))
}

/// Trim and drop empty optional text
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EventRequest {
    /// Convert validated input into entity fields
    pub fn into_details(self) -> Result<EventDetails, DomainError> {
        let event_type = self.event_type.parse::<EventType>()?;
        let date = parse_event_date(&self.date)
            .ok_or_else(|| DomainError::validation("Valid date is required"))?;
        let number_of_students = i32::try_from(self.number_of_students.unwrap_or(0))
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| DomainError::validation("Number of students must be a positive integer"))?;

        Ok(EventDetails {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            event_type,
            date,
            location: self.location.trim().to_string(),
            target_audience: optional_text(self.target_audience),
            number_of_students,
            notes: optional_text(self.notes),
        })
    }
}

/// Admin status decision
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventStatusRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_admin_status"))]
    pub status: String,

    pub notes: Option<String>,
}

fn validate_admin_status(value: &str) -> Result<(), ValidationError> {
    match value.parse::<EventStatus>() {
        Ok(status) if status.is_admin_target() => Ok(()),
        _ => Err(error("status", "Invalid status")),
    }
}

impl UpdateEventStatusRequest {
    pub fn status(&self) -> Result<EventStatus, DomainError> {
        Ok(self.status.parse::<EventStatus>()?)
    }
}

/// Replace the assigned volunteer set
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignVolunteersRequest {
    #[validate(required(message = "volunteerIds must be an array"))]
    pub volunteer_ids: Option<Vec<Snowflake>>,
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusRequest {
    #[validate(required(message = "isActive must be a boolean"))]
    pub is_active: Option<bool>,
}

// ============================================================================
// Donation Requests
// ============================================================================

/// Donation as recorded by a donor
///
/// Which fields are required depends on `type`, so validation is written by hand.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[serde(rename = "type", default)]
    pub donation_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub transaction_ref: Option<String>,
    pub dropoff_details: Option<String>,
}

impl Validate for CreateDonationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.donation_type.parse::<DonationType>() {
            Ok(DonationType::Monetary) => {
                if !self.amount.is_some_and(|a| a.is_finite() && a > 0.0) {
                    errors.add("amount", error("amount", "Amount must be greater than 0"));
                }
            }
            Ok(DonationType::Physical) => {
                if self.category.as_deref().is_none_or(blank) {
                    errors.add(
                        "category",
                        error("category", "Category is required for physical donations"),
                    );
                }
                if !self.quantity.is_some_and(|q| q > 0 && q <= i64::from(i32::MAX)) {
                    errors.add("quantity", error("quantity", "Quantity must be greater than 0"));
                }
            }
            Err(_) => errors.add("type", error("type", "Invalid donation type")),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl CreateDonationRequest {
    /// Split into the type-selected shape and the free-form notes
    pub fn into_parts(self) -> Result<(DonationKind, DonationNotes), DomainError> {
        let kind = match self.donation_type.parse::<DonationType>()? {
            DonationType::Monetary => DonationKind::monetary(self.amount.unwrap_or(0.0))?,
            DonationType::Physical => {
                let quantity = self
                    .quantity
                    .and_then(|q| i32::try_from(q).ok())
                    .unwrap_or(0);
                DonationKind::physical(
                    self.category.as_deref().unwrap_or_default(),
                    quantity,
                    self.unit.as_deref(),
                )?
            }
        };

        let notes = DonationNotes {
            currency: optional_text(self.currency),
            description: optional_text(self.description),
            purpose: optional_text(self.purpose),
            transaction_ref: optional_text(self.transaction_ref),
            dropoff_details: optional_text(self.dropoff_details),
        };
        Ok((kind, notes))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyDonationRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_verification_status"))]
    pub status: String,
}

fn validate_verification_status(value: &str) -> Result<(), ValidationError> {
    match value.parse::<DonationStatus>() {
        Ok(status) if status.is_verification_target() => Ok(()),
        _ => Err(error("status", "Status must be verified or cancelled")),
    }
}

impl VerifyDonationRequest {
    pub fn status(&self) -> Result<DonationStatus, DomainError> {
        Ok(self.status.parse::<DonationStatus>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    (
                        field.to_string(),
                        e.message.as_deref().unwrap_or_default().to_string(),
                    )
                })
            })
            .collect();
        out.sort();
        out
    }

    fn event_json(value: serde_json::Value) -> EventRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_event_request_reports_every_missing_field() {
        let request = event_json(serde_json::json!({}));
        let errors = request.validate().unwrap_err();
        let messages = field_messages(&errors);

        assert!(messages.contains(&("title".into(), "Event title is required".into())));
        assert!(messages.contains(&("description".into(), "Description is required".into())));
        assert!(messages.contains(&("event_type".into(), "Invalid event type".into())));
        assert!(messages.contains(&("date".into(), "Valid date is required".into())));
        assert!(messages.contains(&("location".into(), "Location is required".into())));
    }

    #[test]
    fn test_event_request_into_details() {
        let request = event_json(serde_json::json!({
            "title": "  Puberty talk ",
            "description": "Open session",
            "eventType": "awareness",
            "date": "2030-04-01",
            "location": "Pokhara",
            "targetAudience": "",
            "numberOfStudents": 60
        }));
        request.validate().unwrap();

        let details = request.into_details().unwrap();
        assert_eq!(details.title, "Puberty talk");
        assert_eq!(details.event_type, EventType::Awareness);
        assert_eq!(details.target_audience, None);
        assert_eq!(details.number_of_students, 60);
    }

    #[test]
    fn test_negative_student_count_rejected() {
        let request = event_json(serde_json::json!({
            "title": "t", "description": "d", "eventType": "other",
            "date": "2030-04-01", "location": "l", "numberOfStudents": -1
        }));
        let messages = field_messages(&request.validate().unwrap_err());
        assert_eq!(
            messages,
            vec![(
                "number_of_students".to_string(),
                "Number of students must be a positive integer".to_string()
            )]
        );
    }

    #[test]
    fn test_admin_status_targets() {
        for (status, ok) in [
            ("approved", true),
            ("rejected", true),
            ("completed", true),
            ("cancelled", true),
            ("pending", false),
            ("archived", false),
        ] {
            let request = UpdateEventStatusRequest {
                status: status.into(),
                notes: None,
            };
            assert_eq!(request.validate().is_ok(), ok, "status {status}");
        }
    }

    #[test]
    fn test_monetary_amount_boundary() {
        let zero = CreateDonationRequest {
            donation_type: "monetary".into(),
            amount: Some(0.0),
            ..Default::default()
        };
        let messages = field_messages(&zero.validate().unwrap_err());
        assert_eq!(
            messages,
            vec![("amount".to_string(), "Amount must be greater than 0".to_string())]
        );

        let cent = CreateDonationRequest {
            donation_type: "monetary".into(),
            amount: Some(0.01),
            ..Default::default()
        };
        assert!(cent.validate().is_ok());
        let (kind, notes) = cent.into_parts().unwrap();
        assert_eq!(kind.amount(), Some(0.01));
        assert_eq!(notes.currency, None);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let request: CreateDonationRequest = serde_json::from_value(serde_json::json!({
            "type": "monetary", "amount": "50"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.amount, Some(50.0));

        let request = event_json(serde_json::json!({
            "title": "t", "description": "d", "eventType": "other",
            "date": "2030-04-01", "location": "l", "numberOfStudents": " 40 "
        }));
        assert!(request.validate().is_ok());
        assert_eq!(request.number_of_students, Some(40));
    }

    #[test]
    fn test_malformed_numbers_report_the_field() {
        let request: CreateDonationRequest = serde_json::from_value(serde_json::json!({
            "type": "physical", "category": "books", "quantity": 2.5
        }))
        .unwrap();
        assert_eq!(
            field_messages(&request.validate().unwrap_err()),
            vec![("quantity".to_string(), "Quantity must be greater than 0".to_string())]
        );

        let request: CreateDonationRequest = serde_json::from_value(serde_json::json!({
            "type": "monetary", "amount": { "value": 5 }
        }))
        .unwrap();
        assert_eq!(
            field_messages(&request.validate().unwrap_err()),
            vec![("amount".to_string(), "Amount must be greater than 0".to_string())]
        );

        let request = event_json(serde_json::json!({
            "title": "t", "description": "d", "eventType": "other",
            "date": "2030-04-01", "location": "l", "numberOfStudents": "many"
        }));
        assert_eq!(
            field_messages(&request.validate().unwrap_err()),
            vec![(
                "number_of_students".to_string(),
                "Number of students must be a positive integer".to_string()
            )]
        );
    }

    #[test]
    fn test_physical_shape_rules() {
        let zero = CreateDonationRequest {
            donation_type: "physical".into(),
            category: Some("Pads".into()),
            quantity: Some(0),
            ..Default::default()
        };
        assert_eq!(
            field_messages(&zero.validate().unwrap_err()),
            vec![("quantity".to_string(), "Quantity must be greater than 0".to_string())]
        );

        let blank_category = CreateDonationRequest {
            donation_type: "physical".into(),
            category: Some("   ".into()),
            quantity: Some(1),
            ..Default::default()
        };
        assert_eq!(
            field_messages(&blank_category.validate().unwrap_err()),
            vec![(
                "category".to_string(),
                "Category is required for physical donations".to_string()
            )]
        );

        let one = CreateDonationRequest {
            donation_type: "physical".into(),
            category: Some("Pads".into()),
            quantity: Some(1),
            ..Default::default()
        };
        assert!(one.validate().is_ok());
    }

    #[test]
    fn test_unknown_donation_type() {
        let request = CreateDonationRequest {
            donation_type: "crypto".into(),
            ..Default::default()
        };
        assert_eq!(
            field_messages(&request.validate().unwrap_err()),
            vec![("type".to_string(), "Invalid donation type".to_string())]
        );
    }

    #[test]
    fn test_register_rejects_admin_role() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Mallory",
            "email": "mallory@example.org",
            "password": "secret1",
            "role": "admin"
        }))
        .unwrap();
        let messages = field_messages(&request.validate().unwrap_err());
        assert_eq!(messages, vec![("role".to_string(), "Invalid role".to_string())]);
    }

    #[test]
    fn test_register_defaults_to_volunteer() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.org",
            "password": "secret1"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.role().unwrap(), Role::Volunteer);
    }

    #[test]
    fn test_assign_volunteers_requires_array() {
        let missing: AssignVolunteersRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(missing.validate().is_err());

        let ids: AssignVolunteersRequest =
            serde_json::from_value(serde_json::json!({ "volunteerIds": ["12", 13] })).unwrap();
        assert!(ids.validate().is_ok());
        assert_eq!(
            ids.volunteer_ids.unwrap(),
            vec![Snowflake::new(12), Snowflake::new(13)]
        );
    }
}
