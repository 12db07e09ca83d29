//! Optional equality filters for list queries

use crate::entities::{DonationStatus, DonationType, EventStatus, ParticipationStatus, Role};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub requested_by: Option<Snowflake>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonationFilter {
    pub donation_type: Option<DonationType>,
    pub status: Option<DonationStatus>,
    pub donor_id: Option<Snowflake>,
}

/// Participations are always scoped to one volunteer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationFilter {
    pub volunteer_id: Snowflake,
    pub status: Option<ParticipationStatus>,
}

impl ParticipationFilter {
    pub fn for_volunteer(volunteer_id: Snowflake) -> Self {
        Self {
            volunteer_id,
            status: None,
        }
    }
}
