//! Event service
//!
//! School requests, administrator review and volunteer assignment.

use ngo_core::entities::{dedup_ids, Event, EventStatus};
use ngo_core::query::{EventFilter, PageRequest};
use ngo_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{EventEnvelope, EventListResponse, EventRequest, EventResponse};

use super::context::ServiceContext;
use super::directory;
use super::error::{ServiceError, ServiceResult};

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: Snowflake) -> ServiceResult<Event> {
        self.ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id).into())
    }

    /// A school asks for an event. It waits in `pending` for review.
    #[instrument(skip(self, request))]
    pub async fn request_event(
        &self,
        school_id: Snowflake,
        request: EventRequest,
    ) -> ServiceResult<EventEnvelope> {
        let details = request.into_details()?;
        let event = Event::requested(self.ctx.generate_id(), school_id, details);

        self.ctx.event_repo().create(&event).await?;

        info!(event_id = %event.id, school_id = %school_id, "Event requested");

        self.envelope(event, "Event request submitted successfully".to_string())
            .await
    }

    /// An administrator creates an event that is approved from the start
    #[instrument(skip(self, request))]
    pub async fn create_event(
        &self,
        admin_id: Snowflake,
        request: EventRequest,
    ) -> ServiceResult<EventEnvelope> {
        let details = request.into_details()?;
        let event = Event::approved_by_admin(self.ctx.generate_id(), admin_id, details);

        self.ctx.event_repo().create(&event).await?;

        info!(event_id = %event.id, admin_id = %admin_id, "Event created");

        self.envelope(event, "Event created successfully".to_string())
            .await
    }

    /// Apply an administrator's status decision.
    ///
    /// The current status is not checked. Moves outside the lifecycle graph
    /// are applied and logged.
    #[instrument(skip(self, notes))]
    pub async fn set_status(
        &self,
        admin_id: Snowflake,
        event_id: Snowflake,
        status: EventStatus,
        notes: Option<String>,
    ) -> ServiceResult<EventEnvelope> {
        let mut event = self.get_event(event_id).await?;
        let previous = event.status;

        if !event.apply_status(status, admin_id, notes) {
            warn!(
                event_id = %event_id,
                from = previous.as_str(),
                to = status.as_str(),
                "Status change outside the event lifecycle"
            );
        }

        self.ctx.event_repo().update_status(&event).await?;

        info!(event_id = %event_id, status = status.as_str(), "Event status updated");

        self.envelope(event, format!("Event {} successfully", status.as_str()))
            .await
    }

    /// Replace the assigned volunteer set.
    ///
    /// Every id must name an active volunteer. Duplicates are dropped.
    #[instrument(skip(self, volunteer_ids), fields(count = volunteer_ids.len()))]
    pub async fn assign_volunteers(
        &self,
        event_id: Snowflake,
        volunteer_ids: &[Snowflake],
    ) -> ServiceResult<EventEnvelope> {
        let ids = dedup_ids(volunteer_ids);

        if !ids.is_empty() {
            let users = self.ctx.user_repo().find_by_ids(&ids).await?;
            let valid = users.len() == ids.len() && users.iter().all(|u| u.is_assignable_volunteer());
            if !valid {
                warn!(event_id = %event_id, "Assignment rejected: invalid volunteer ids");
                return Err(DomainError::InvalidVolunteerIds.into());
            }
        }

        self.ctx.event_repo().replace_volunteers(event_id, &ids).await?;

        info!(event_id = %event_id, count = ids.len(), "Volunteers assigned");

        let event = self.get_event(event_id).await?;
        self.envelope(event, "Volunteers assigned successfully".to_string())
            .await
    }

    /// A school's own requests, newest first, with a per-status summary
    #[instrument(skip(self))]
    pub async fn list_school_events(
        &self,
        school_id: Snowflake,
        status: Option<EventStatus>,
        page: PageRequest,
    ) -> ServiceResult<EventListResponse> {
        let filter = EventFilter {
            status,
            requested_by: Some(school_id),
        };
        let result = self.ctx.event_repo().list(&filter, page).await?;
        let summary = self.ctx.event_repo().status_counts(school_id).await?;

        Ok(EventListResponse {
            events: self.render(result.items).await?,
            summary: Some(summary),
            pagination: page.meta(result.total),
        })
    }

    /// Every event, newest first
    #[instrument(skip(self))]
    pub async fn list_events(
        &self,
        filter: EventFilter,
        page: PageRequest,
    ) -> ServiceResult<EventListResponse> {
        let result = self.ctx.event_repo().list(&filter, page).await?;

        Ok(EventListResponse {
            events: self.render(result.items).await?,
            summary: None,
            pagination: page.meta(result.total),
        })
    }

    pub(crate) async fn render(&self, events: Vec<Event>) -> ServiceResult<Vec<EventResponse>> {
        let dir = directory::for_events(self.ctx, &events).await?;
        Ok(events.into_iter().map(|e| dir.event(e)).collect())
    }

    async fn envelope(&self, event: Event, message: String) -> ServiceResult<EventEnvelope> {
        let event = self
            .render(vec![event])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::internal("event vanished while rendering"))?;
        Ok(EventEnvelope { message, event })
    }
}
