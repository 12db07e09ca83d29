//! School handlers

use axum::{extract::State, Json};
use ngo_core::entities::{EventStatus, Role};
use ngo_service::dto::{EventEnvelope, EventListResponse, EventRequest};
use ngo_service::EventService;
use serde::Deserialize;

use crate::extractors::{AuthUser, ListQuery, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventStatusQuery {
    pub status: Option<EventStatus>,
}

/// Submit an event request for admin review
///
/// POST /api/schools/events/request
pub async fn request_event(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ValidatedJson<EventRequest>, ApiError>,
) -> ApiResult<Created<Json<EventEnvelope>>> {
    auth.require(&[Role::School])?;
    let ValidatedJson(request) = body?;

    let service = EventService::new(state.service_context());
    let response = service.request_event(auth.id(), request).await?;
    Ok(Created(Json(response)))
}

/// The school's own events with a per-status summary
///
/// GET /api/schools/events
pub async fn my_events(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<ListQuery<EventStatusQuery>, ApiError>,
) -> ApiResult<Json<EventListResponse>> {
    auth.require(&[Role::School])?;
    let ListQuery { filters: query, page } = query?;

    let service = EventService::new(state.service_context());
    let response = service.list_school_events(auth.id(), query.status, page).await?;
    Ok(Json(response))
}
