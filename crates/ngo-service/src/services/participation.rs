//! Participation service
//!
//! Volunteer event discovery, self-registration and participation history,
//! plus the administrator's per-volunteer views.

use std::collections::HashMap;

use chrono::Utc;
use futures::future::try_join_all;
use ngo_core::entities::{Participation, ParticipationStatus, Role, User};
use ngo_core::query::{PageRequest, ParticipationFilter, UserFilter};
use ngo_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    Directory, ParticipationEnvelope, ParticipationListResponse, ParticipationRollup,
    UserResponse, VolunteerEventListResponse, VolunteerEventResponse, VolunteerListResponse,
    VolunteerParticipationResponse, VolunteerWithParticipation,
};

use super::context::ServiceContext;
use super::directory;
use super::error::{ServiceError, ServiceResult};
use super::event::EventService;

/// Recent participations shown per volunteer in the admin overview
const ROLLUP_RECENT: u32 = 5;

/// Participation service
pub struct ParticipationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ParticipationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Approved events that have not happened yet, soonest first, each marked
    /// with the caller's registration state
    #[instrument(skip(self))]
    pub async fn available_events(
        &self,
        volunteer_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<VolunteerEventListResponse> {
        let result = self
            .ctx
            .event_repo()
            .list_upcoming(Utc::now(), page)
            .await?;

        let event_ids: Vec<Snowflake> = result.items.iter().map(|e| e.id).collect();
        let registrations: HashMap<Snowflake, ParticipationStatus> = self
            .ctx
            .participation_repo()
            .find_for_events(volunteer_id, &event_ids)
            .await?
            .into_iter()
            .map(|p| (p.event_id, p.status))
            .collect();

        let events = EventService::new(self.ctx)
            .render(result.items)
            .await?
            .into_iter()
            .map(|event| {
                let registration_status = registrations.get(&event.id).copied();
                VolunteerEventResponse {
                    event,
                    is_registered: registration_status.is_some(),
                    registration_status,
                }
            })
            .collect();

        Ok(VolunteerEventListResponse {
            events,
            pagination: page.meta(result.total),
        })
    }

    /// Register the caller for an approved event.
    ///
    /// The event date is not checked; any approved event accepts registrations.
    #[instrument(skip(self, volunteer), fields(volunteer_id = %volunteer.id))]
    pub async fn register(
        &self,
        volunteer: &User,
        event_id: Snowflake,
    ) -> ServiceResult<ParticipationEnvelope> {
        let event = EventService::new(self.ctx).get_event(event_id).await?;

        if !event.is_open_for_registration() {
            return Err(DomainError::EventNotOpenForRegistration.into());
        }

        if self
            .ctx
            .participation_repo()
            .find(volunteer.id, event_id)
            .await?
            .is_some()
        {
            warn!(volunteer_id = %volunteer.id, event_id = %event_id, "Duplicate registration");
            return Err(DomainError::AlreadyRegistered.into());
        }

        // A concurrent duplicate is caught by the unique pair constraint
        let participation = Participation::register(self.ctx.generate_id(), volunteer.id, event_id);
        self.ctx.participation_repo().create(&participation).await?;

        info!(
            participation_id = %participation.id,
            volunteer_id = %volunteer.id,
            event_id = %event_id,
            "Volunteer registered for event"
        );

        let dir = Directory::new()
            .with_users([volunteer.clone()])
            .with_events([event]);

        Ok(ParticipationEnvelope {
            message: "Successfully registered for event".to_string(),
            participation: dir.participation(participation, true),
        })
    }

    /// The caller's own history, most recent first, with a per-status summary
    #[instrument(skip(self))]
    pub async fn my_participations(
        &self,
        volunteer_id: Snowflake,
        status: Option<ParticipationStatus>,
        page: PageRequest,
    ) -> ServiceResult<ParticipationListResponse> {
        let filter = ParticipationFilter {
            volunteer_id,
            status,
        };
        let result = self.ctx.participation_repo().list(&filter, page).await?;
        let summary = self.ctx.participation_repo().status_counts(volunteer_id).await?;

        let dir = directory::for_participations(self.ctx, &result.items).await?;

        Ok(ParticipationListResponse {
            participations: result
                .items
                .into_iter()
                .map(|p| dir.participation(p, false))
                .collect(),
            summary,
            pagination: page.meta(result.total),
        })
    }

    /// Volunteers, newest accounts first, each with counts and recent history
    #[instrument(skip(self))]
    pub async fn list_volunteers(&self, page: PageRequest) -> ServiceResult<VolunteerListResponse> {
        let filter = UserFilter {
            role: Some(Role::Volunteer),
            is_active: None,
        };
        let result = self.ctx.user_repo().list(&filter, page).await?;

        let repo = self.ctx.participation_repo();
        let per_volunteer = try_join_all(result.items.iter().map(|volunteer| async move {
            let counts = repo.status_counts(volunteer.id).await?;
            let recent = repo
                .list(
                    &ParticipationFilter::for_volunteer(volunteer.id),
                    PageRequest::first(ROLLUP_RECENT),
                )
                .await?;
            Ok::<_, DomainError>((counts, recent.items))
        }))
        .await?;

        let recent: Vec<Participation> = per_volunteer
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect();
        let dir = directory::for_participations(self.ctx, &recent).await?;

        let volunteers = result
            .items
            .into_iter()
            .zip(per_volunteer)
            .map(|(volunteer, (counts, recent))| VolunteerWithParticipation {
                volunteer: volunteer.into(),
                participation: ParticipationRollup {
                    total: counts.total,
                    attended: counts.attended,
                    confirmed: counts.confirmed,
                    recent: recent
                        .into_iter()
                        .map(|p| dir.participation(p, false))
                        .collect(),
                },
            })
            .collect();

        Ok(VolunteerListResponse {
            volunteers,
            pagination: page.meta(result.total),
        })
    }

    /// One volunteer's full participation history
    #[instrument(skip(self))]
    pub async fn volunteer_participations(
        &self,
        volunteer_id: Snowflake,
        status: Option<ParticipationStatus>,
        page: PageRequest,
    ) -> ServiceResult<VolunteerParticipationResponse> {
        let volunteer = self
            .ctx
            .user_repo()
            .find_by_id(volunteer_id)
            .await?
            .filter(|u| u.has_role(Role::Volunteer))
            .ok_or(ServiceError::Domain(DomainError::VolunteerNotFound(
                volunteer_id,
            )))?;

        let history = self.my_participations(volunteer.id, status, page).await?;

        Ok(VolunteerParticipationResponse {
            volunteer: UserResponse::from(volunteer),
            participations: history.participations,
            summary: history.summary,
            pagination: history.pagination,
        })
    }
}
