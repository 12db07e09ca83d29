//! Test fixtures and data generators
//!
//! Request bodies the tests send and the slices of responses they read.

use chrono::{Duration, Utc};
use ngo_core::entities::Role;
use serde::{Deserialize, Serialize};

/// Email that is unique across test runs against the same database
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.example.org", uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
}

impl RegisterRequest {
    pub fn unique(role: Role) -> Self {
        Self {
            name: format!("Test {}", role.as_str()),
            email: unique_email(role.as_str()),
            password: "secret123".to_string(),
            role,
            school_name: (role == Role::School).then(|| "Shree Test School".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

/// Event body accepted by both the school request and admin creation routes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub date: String,
    pub location: String,
    pub number_of_students: i64,
}

impl EventRequest {
    /// An event `days` from now; negative values are in the past
    pub fn in_days(days: i64) -> Self {
        Self {
            title: format!("Awareness session {}", uuid::Uuid::new_v4().simple()),
            description: "Menstrual health awareness for grades 6 to 8".to_string(),
            event_type: "awareness".to_string(),
            date: (Utc::now() + Duration::days(days)).to_rfc3339(),
            location: "Kathmandu".to_string(),
            number_of_students: 40,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}
