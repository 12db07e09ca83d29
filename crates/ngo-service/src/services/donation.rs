//! Donation service

use chrono::Utc;
use ngo_core::entities::{Donation, DonationStatus, Role};
use ngo_core::query::{DonationFilter, DonationSummary, PageRequest};
use ngo_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateDonationRequest, DonationEnvelope, DonationListResponse, DonationResponse,
    DonorDonationsResponse, UserResponse,
};

use super::context::ServiceContext;
use super::directory;
use super::error::{ServiceError, ServiceResult};

/// Donation service
pub struct DonationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DonationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a donation. It stays `pending` until an administrator reviews it.
    #[instrument(skip(self, request), fields(donation_type = %request.donation_type))]
    pub async fn create_donation(
        &self,
        donor_id: Snowflake,
        request: CreateDonationRequest,
    ) -> ServiceResult<DonationEnvelope> {
        let (kind, notes) = request.into_parts()?;
        let donation = Donation::new(self.ctx.generate_id(), donor_id, kind, notes);

        self.ctx.donation_repo().create(&donation).await?;

        info!(
            donation_id = %donation.id,
            donor_id = %donor_id,
            donation_type = donation.donation_type().as_str(),
            "Donation recorded"
        );

        Ok(DonationEnvelope {
            message: "Donation recorded successfully".to_string(),
            donation: self.render_one(donation).await?,
        })
    }

    /// The caller's donations, newest first, with totals over all of them
    #[instrument(skip(self))]
    pub async fn my_donations(&self, donor_id: Snowflake) -> ServiceResult<DonorDonationsResponse> {
        let donations = self.ctx.donation_repo().list_by_donor(donor_id).await?;
        let summary = DonationSummary::from_donations(&donations);

        Ok(DonorDonationsResponse {
            donor: None,
            donations: self.render(donations).await?,
            summary,
        })
    }

    /// One donor's donations as seen by an administrator
    #[instrument(skip(self))]
    pub async fn donor_donations(&self, donor_id: Snowflake) -> ServiceResult<DonorDonationsResponse> {
        let donor = self
            .ctx
            .user_repo()
            .find_by_id(donor_id)
            .await?
            .filter(|u| u.has_role(Role::Donor))
            .ok_or_else(|| ServiceError::not_found("Donor", donor_id.to_string()))?;

        let mut response = self.my_donations(donor.id).await?;
        response.donor = Some(UserResponse::from(donor));
        Ok(response)
    }

    /// Every donation, newest first
    #[instrument(skip(self))]
    pub async fn list_donations(
        &self,
        filter: DonationFilter,
        page: PageRequest,
    ) -> ServiceResult<DonationListResponse> {
        let result = self.ctx.donation_repo().list(&filter, page).await?;

        Ok(DonationListResponse {
            donations: self.render(result.items).await?,
            pagination: page.meta(result.total),
        })
    }

    /// Record a review outcome. Re-reviewing overwrites the previous outcome.
    #[instrument(skip(self))]
    pub async fn verify_donation(
        &self,
        admin_id: Snowflake,
        donation_id: Snowflake,
        status: DonationStatus,
    ) -> ServiceResult<DonationEnvelope> {
        self.ctx
            .donation_repo()
            .verify(donation_id, status, admin_id, Utc::now())
            .await?;

        let donation = self
            .ctx
            .donation_repo()
            .find_by_id(donation_id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::DonationNotFound(donation_id)))?;

        info!(
            donation_id = %donation_id,
            admin_id = %admin_id,
            status = status.as_str(),
            "Donation reviewed"
        );

        let message = match status {
            DonationStatus::Cancelled => "Donation cancelled successfully",
            _ => "Donation verified successfully",
        };

        Ok(DonationEnvelope {
            message: message.to_string(),
            donation: self.render_one(donation).await?,
        })
    }

    pub(crate) async fn render(
        &self,
        donations: Vec<Donation>,
    ) -> ServiceResult<Vec<DonationResponse>> {
        let dir = directory::for_donations(self.ctx, &donations).await?;
        Ok(donations.into_iter().map(|d| dir.donation(d)).collect())
    }

    async fn render_one(&self, donation: Donation) -> ServiceResult<DonationResponse> {
        self.render(vec![donation])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::internal("donation vanished while rendering"))
    }
}
