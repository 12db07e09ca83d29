//! Administrator handlers
//!
//! Every route here is restricted to the admin role.

use axum::{extract::State, Json};
use ngo_core::entities::{DonationStatus, DonationType, Role};
use ngo_core::query::{DonationFilter, EventFilter, UserFilter};
use ngo_core::Snowflake;
use ngo_service::dto::{
    AssignVolunteersRequest, DashboardResponse, DonationEnvelope, DonationListResponse,
    DonorDonationsResponse, EventEnvelope, EventListResponse, EventRequest,
    UpdateEventStatusRequest, UpdateUserStatusRequest, UserListResponse, UserStatusResponse,
    VerifyDonationRequest, VolunteerListResponse, VolunteerParticipationResponse,
};
use ngo_service::{
    DashboardService, DonationService, EventService, ParticipationService, UserService,
};
use serde::Deserialize;

use super::schools::EventStatusQuery;
use super::volunteers::ParticipationStatusQuery;
use crate::extractors::{AuthUser, IdPath, ListQuery, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

const ADMIN: &[Role] = &[Role::Admin];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DonationQuery {
    #[serde(rename = "type")]
    pub donation_type: Option<DonationType>,
    pub status: Option<DonationStatus>,
    pub donor: Option<Snowflake>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    auth.require(ADMIN)?;

    let response = DashboardService::new(state.service_context()).dashboard().await?;
    Ok(Json(response))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery<UserQuery>, ApiError>,
) -> ApiResult<Json<UserListResponse>> {
    auth.require(ADMIN)?;
    let ListQuery { filters: query, page } = query?;

    let filter = UserFilter {
        role: query.role,
        is_active: query.is_active,
    };
    let response = UserService::new(state.service_context())
        .list_users(filter, page)
        .await?;
    Ok(Json(response))
}

/// PATCH /api/admin/users/:userId/status
pub async fn update_user_status(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
    body: Result<ValidatedJson<UpdateUserStatusRequest>, ApiError>,
) -> ApiResult<Json<UserStatusResponse>> {
    auth.require(ADMIN)?;
    let ValidatedJson(request) = body?;
    let Some(is_active) = request.is_active else {
        return Err(ApiError::invalid_body("isActive must be a boolean"));
    };

    let response = UserService::new(state.service_context())
        .set_status(auth.id(), user_id, is_active)
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Events
// ============================================================================

/// GET /api/admin/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery<EventStatusQuery>, ApiError>,
) -> ApiResult<Json<EventListResponse>> {
    auth.require(ADMIN)?;
    let ListQuery { filters: query, page } = query?;

    let filter = EventFilter {
        status: query.status,
        ..Default::default()
    };
    let response = EventService::new(state.service_context())
        .list_events(filter, page)
        .await?;
    Ok(Json(response))
}

/// Create an event that is approved from the start
///
/// POST /api/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ValidatedJson<EventRequest>, ApiError>,
) -> ApiResult<Created<Json<EventEnvelope>>> {
    auth.require(ADMIN)?;
    let ValidatedJson(request) = body?;

    let response = EventService::new(state.service_context())
        .create_event(auth.id(), request)
        .await?;
    Ok(Created(Json(response)))
}

/// PATCH /api/admin/events/:eventId/status
pub async fn update_event_status(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath,
    body: Result<ValidatedJson<UpdateEventStatusRequest>, ApiError>,
) -> ApiResult<Json<EventEnvelope>> {
    auth.require(ADMIN)?;
    let ValidatedJson(request) = body?;
    let status = request.status()?;

    let response = EventService::new(state.service_context())
        .set_status(auth.id(), event_id, status, request.notes)
        .await?;
    Ok(Json(response))
}

/// Replace the event's assigned volunteers with the given set
///
/// PATCH /api/admin/events/:eventId/volunteers
pub async fn assign_volunteers(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath,
    body: Result<ValidatedJson<AssignVolunteersRequest>, ApiError>,
) -> ApiResult<Json<EventEnvelope>> {
    auth.require(ADMIN)?;
    let ValidatedJson(request) = body?;
    let volunteer_ids = request.volunteer_ids.unwrap_or_default();

    let response = EventService::new(state.service_context())
        .assign_volunteers(event_id, &volunteer_ids)
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Donations
// ============================================================================

/// GET /api/admin/donations
pub async fn list_donations(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery<DonationQuery>, ApiError>,
) -> ApiResult<Json<DonationListResponse>> {
    auth.require(ADMIN)?;
    let ListQuery { filters: query, page } = query?;

    let filter = DonationFilter {
        donation_type: query.donation_type,
        status: query.status,
        donor_id: query.donor,
    };
    let response = DonationService::new(state.service_context())
        .list_donations(filter, page)
        .await?;
    Ok(Json(response))
}

/// PATCH /api/admin/donations/:donationId/verify
pub async fn verify_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(donation_id): IdPath,
    body: Result<ValidatedJson<VerifyDonationRequest>, ApiError>,
) -> ApiResult<Json<DonationEnvelope>> {
    auth.require(ADMIN)?;
    let ValidatedJson(request) = body?;
    let status = request.status()?;

    let response = DonationService::new(state.service_context())
        .verify_donation(auth.id(), donation_id, status)
        .await?;
    Ok(Json(response))
}

/// GET /api/admin/donors/:donorId/donations
pub async fn donor_donations(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(donor_id): IdPath,
) -> ApiResult<Json<DonorDonationsResponse>> {
    auth.require(ADMIN)?;

    let response = DonationService::new(state.service_context())
        .donor_donations(donor_id)
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Volunteers
// ============================================================================

/// Volunteers with their participation counts and most recent participations
///
/// GET /api/admin/volunteers
pub async fn list_volunteers(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery, ApiError>,
) -> ApiResult<Json<VolunteerListResponse>> {
    auth.require(ADMIN)?;
    let ListQuery { page, .. } = query?;

    let response = ParticipationService::new(state.service_context())
        .list_volunteers(page)
        .await?;
    Ok(Json(response))
}

/// GET /api/admin/volunteers/:volunteerId/participation
pub async fn volunteer_participation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(volunteer_id): IdPath,
    query: Result<ListQuery<ParticipationStatusQuery>, ApiError>,
) -> ApiResult<Json<VolunteerParticipationResponse>> {
    auth.require(ADMIN)?;
    let ListQuery { filters: query, page } = query?;

    let response = ParticipationService::new(state.service_context())
        .volunteer_participations(volunteer_id, query.status, page)
        .await?;
    Ok(Json(response))
}
