//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` with camelCase keys.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use ngo_core::entities::{
    DonationStatus, DonationType, EventStatus, EventType, ParticipationStatus, Role,
};
use ngo_core::query::{
    DonationSummary, EventStatusCounts, PageMeta, ParticipationStatusCounts, RoleCounts,
};
use ngo_core::Snowflake;
use serde::Serialize;

// ============================================================================
// User Responses
// ============================================================================

/// Full user record, never including the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Related user expanded inside another record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct UserStatusResponse {
    pub message: String,
    pub user: UserResponse,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Session issued on register, login and refresh
///
/// `token` carries the access token for clients that only read that key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Event Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub target_audience: Option<String>,
    pub number_of_students: i32,
    pub status: EventStatus,
    pub requested_by: Option<UserRef>,
    pub approved_by: Option<UserRef>,
    pub assigned_volunteers: Vec<UserRef>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event as seen in volunteer discovery
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub is_registered: bool,
    pub registration_status: Option<ParticipationStatus>,
}

/// Short event summary embedded in participation records
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
    pub id: Snowflake,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub event_type: EventType,
    pub status: EventStatus,
}

#[derive(Debug, Serialize)]
pub struct EventEnvelope {
    pub message: String,
    pub event: EventResponse,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EventStatusCounts>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct VolunteerEventListResponse {
    pub events: Vec<VolunteerEventResponse>,
    pub pagination: PageMeta,
}

// ============================================================================
// Participation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationResponse {
    pub id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<UserRef>,
    pub event: Option<EventRef>,
    pub status: ParticipationStatus,
    pub registered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub attended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ParticipationEnvelope {
    pub message: String,
    pub participation: ParticipationResponse,
}

#[derive(Debug, Serialize)]
pub struct ParticipationListResponse {
    pub participations: Vec<ParticipationResponse>,
    pub summary: ParticipationStatusCounts,
    pub pagination: PageMeta,
}

/// Per-volunteer participation rollup in the admin volunteer list
#[derive(Debug, Serialize)]
pub struct ParticipationRollup {
    pub total: i64,
    pub attended: i64,
    pub confirmed: i64,
    pub recent: Vec<ParticipationResponse>,
}

#[derive(Debug, Serialize)]
pub struct VolunteerWithParticipation {
    #[serde(flatten)]
    pub volunteer: UserResponse,
    pub participation: ParticipationRollup,
}

#[derive(Debug, Serialize)]
pub struct VolunteerListResponse {
    pub volunteers: Vec<VolunteerWithParticipation>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct VolunteerParticipationResponse {
    pub volunteer: UserResponse,
    pub participations: Vec<ParticipationResponse>,
    pub summary: ParticipationStatusCounts,
    pub pagination: PageMeta,
}

// ============================================================================
// Donation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: Snowflake,
    pub donor: Option<UserRef>,
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub transaction_ref: Option<String>,
    pub dropoff_details: Option<String>,
    pub status: DonationStatus,
    pub verified_by: Option<UserRef>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DonationEnvelope {
    pub message: String,
    pub donation: DonationResponse,
}

#[derive(Debug, Serialize)]
pub struct DonationListResponse {
    pub donations: Vec<DonationResponse>,
    pub pagination: PageMeta,
}

/// A donor's full history with totals
#[derive(Debug, Serialize)]
pub struct DonorDonationsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor: Option<UserResponse>,
    pub donations: Vec<DonationResponse>,
    pub summary: DonationSummary,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: DashboardMetrics,
    pub recent: RecentActivity,
}

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub users: UserMetrics,
    pub events: EventMetrics,
    pub donations: DonationMetrics,
    pub volunteers: VolunteerMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub total: i64,
    pub active: i64,
    pub by_role: RoleCounts,
}

#[derive(Debug, Serialize)]
pub struct EventMetrics {
    pub pending: i64,
    pub upcoming: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct DonationMetrics {
    pub monetary: MonetaryMetrics,
    pub physical: PhysicalMetrics,
}

#[derive(Debug, Serialize)]
pub struct MonetaryMetrics {
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct PhysicalMetrics {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct VolunteerMetrics {
    pub active: i64,
    pub total: i64,
}

/// Latest records on the dashboard. Only the requester or donor is expanded.
#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub events: Vec<RecentEvent>,
    pub donations: Vec<RecentDonation>,
}

/// Name and email of a related user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContact {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvent {
    pub id: Snowflake,
    pub title: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: EventStatus,
    pub requested_by: Option<UserContact>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDonation {
    pub id: Snowflake,
    pub donor: Option<UserContact>,
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "OK",
            message: "Server is running",
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: bool,
    pub cache: bool,
}

impl ReadinessResponse {
    pub fn ready(database: bool, cache: bool) -> Self {
        Self {
            status: if database && cache { "ready" } else { "degraded" },
            checks: HealthChecks { database, cache },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.checks.database && self.checks.cache
    }
}
