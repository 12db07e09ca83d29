//! Entity to DTO mappers
//!
//! Single-entity conversions are `From` impls. Records that expand related
//! users or events go through a [`Directory`] loaded once per request.

use std::collections::HashMap;

use ngo_core::entities::{Donation, DonationKind, Event, Participation, User};
use ngo_core::Snowflake;

use super::responses::{
    DonationResponse, EventRef, EventResponse, ParticipationResponse, RecentDonation,
    RecentEvent, UserContact, UserRef, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            school_name: user.school_name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            school_name: user.school_name.clone(),
        }
    }
}

// ============================================================================
// Event Mappers
// ============================================================================

impl From<&Event> for EventRef {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            date: event.date,
            location: event.location.clone(),
            event_type: event.event_type,
            status: event.status,
        }
    }
}

// ============================================================================
// Directory
// ============================================================================

/// Related users and events keyed by id, used to expand references
#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<Snowflake, User>,
    events: HashMap<Snowflake, Event>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users.into_iter().map(|u| (u.id, u)));
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events.into_iter().map(|e| (e.id, e)));
        self
    }

    pub fn user_ref(&self, id: Snowflake) -> Option<UserRef> {
        self.users.get(&id).map(UserRef::from)
    }

    pub fn contact(&self, id: Snowflake) -> Option<UserContact> {
        self.users.get(&id).map(|user| UserContact {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        })
    }

    pub fn event_ref(&self, id: Snowflake) -> Option<EventRef> {
        self.events.get(&id).map(EventRef::from)
    }

    pub fn event(&self, event: Event) -> EventResponse {
        EventResponse {
            requested_by: self.user_ref(event.requested_by),
            approved_by: event.approved_by.and_then(|id| self.user_ref(id)),
            assigned_volunteers: event
                .assigned_volunteers
                .iter()
                .filter_map(|id| self.user_ref(*id))
                .collect(),
            id: event.id,
            title: event.title,
            description: event.description,
            event_type: event.event_type,
            date: event.date,
            location: event.location,
            target_audience: event.target_audience,
            number_of_students: event.number_of_students,
            status: event.status,
            notes: event.notes,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }

    /// `with_volunteer` expands the volunteer; history views omit it
    pub fn participation(
        &self,
        participation: Participation,
        with_volunteer: bool,
    ) -> ParticipationResponse {
        ParticipationResponse {
            id: participation.id,
            volunteer: with_volunteer
                .then(|| self.user_ref(participation.volunteer_id))
                .flatten(),
            event: self.event_ref(participation.event_id),
            status: participation.status,
            registered_at: participation.registered_at,
            confirmed_at: participation.confirmed_at,
            attended_at: participation.attended_at,
            notes: participation.notes,
            created_at: participation.created_at,
        }
    }

    pub fn donation(&self, donation: Donation) -> DonationResponse {
        let donation_type = donation.donation_type();
        let (amount, category, quantity, unit) = match donation.kind {
            DonationKind::Monetary { amount } => (Some(amount), None, None, None),
            DonationKind::Physical {
                category,
                quantity,
                unit,
            } => (None, Some(category), Some(quantity), Some(unit)),
        };

        DonationResponse {
            id: donation.id,
            donor: self.user_ref(donation.donor_id),
            donation_type,
            amount,
            currency: donation.currency,
            category,
            quantity,
            unit,
            description: donation.description,
            purpose: donation.purpose,
            transaction_ref: donation.transaction_ref,
            dropoff_details: donation.dropoff_details,
            status: donation.status,
            verified_by: donation.verified_by.and_then(|id| self.user_ref(id)),
            verified_at: donation.verified_at,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }

    /// Dashboard rows expand only the requester or donor
    pub fn recent_event(&self, event: Event) -> RecentEvent {
        RecentEvent {
            requested_by: self.contact(event.requested_by),
            id: event.id,
            title: event.title,
            event_type: event.event_type,
            date: event.date,
            location: event.location,
            status: event.status,
            created_at: event.created_at,
        }
    }

    pub fn recent_donation(&self, donation: Donation) -> RecentDonation {
        let donation_type = donation.donation_type();
        let (amount, category, quantity) = match donation.kind {
            DonationKind::Monetary { amount } => (Some(amount), None, None),
            DonationKind::Physical {
                category, quantity, ..
            } => (None, Some(category), Some(quantity)),
        };

        RecentDonation {
            id: donation.id,
            donor: self.contact(donation.donor_id),
            donation_type,
            amount,
            currency: donation.currency,
            category,
            quantity,
            status: donation.status,
            created_at: donation.created_at,
        }
    }
}
