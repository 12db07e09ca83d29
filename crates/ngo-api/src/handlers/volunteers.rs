//! Volunteer handlers

use axum::{extract::State, Json};
use ngo_core::entities::{ParticipationStatus, Role};
use ngo_service::dto::{ParticipationEnvelope, ParticipationListResponse, VolunteerEventListResponse};
use ngo_service::ParticipationService;
use serde::Deserialize;

use crate::extractors::{AuthUser, IdPath, ListQuery};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ParticipationStatusQuery {
    pub status: Option<ParticipationStatus>,
}

/// Upcoming approved events, each marked with the caller's registration state
///
/// GET /api/volunteers/events
pub async fn available_events(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery, ApiError>,
) -> ApiResult<Json<VolunteerEventListResponse>> {
    auth.require(&[Role::Volunteer])?;
    let ListQuery { page, .. } = query?;

    let service = ParticipationService::new(state.service_context());
    let response = service.available_events(auth.id(), page).await?;
    Ok(Json(response))
}

/// POST /api/volunteers/events/:eventId/register
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(event_id): IdPath,
) -> ApiResult<Created<Json<ParticipationEnvelope>>> {
    auth.require(&[Role::Volunteer])?;

    let service = ParticipationService::new(state.service_context());
    let response = service.register(&auth.user, event_id).await?;
    Ok(Created(Json(response)))
}

/// GET /api/volunteers/participations
pub async fn my_participations(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery<ParticipationStatusQuery>, ApiError>,
) -> ApiResult<Json<ParticipationListResponse>> {
    auth.require(&[Role::Volunteer])?;
    let ListQuery { filters: query, page } = query?;

    let service = ParticipationService::new(state.service_context());
    let response = service
        .my_participations(auth.id(), query.status, page)
        .await?;
    Ok(Json(response))
}
