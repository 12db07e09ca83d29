//! Donor handlers

use axum::{extract::State, Json};
use ngo_core::entities::Role;
use ngo_service::dto::{CreateDonationRequest, DonationEnvelope, DonorDonationsResponse};
use ngo_service::DonationService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// POST /api/donations
pub async fn create_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<ValidatedJson<CreateDonationRequest>, ApiError>,
) -> ApiResult<Created<Json<DonationEnvelope>>> {
    auth.require(&[Role::Donor])?;
    let ValidatedJson(request) = body?;

    let service = DonationService::new(state.service_context());
    let response = service.create_donation(auth.id(), request).await?;
    Ok(Created(Json(response)))
}

/// The caller's donations with monetary and physical totals
///
/// GET /api/donations/me
pub async fn my_donations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DonorDonationsResponse>> {
    auth.require(&[Role::Donor])?;

    let service = DonationService::new(state.service_context());
    let response = service.my_donations(auth.id()).await?;
    Ok(Json(response))
}
