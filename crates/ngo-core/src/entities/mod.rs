//! Domain entities

mod donation;
mod event;
mod participation;
mod user;

pub use donation::{
    Donation, DonationKind, DonationNotes, DonationStatus, DonationType, DEFAULT_CURRENCY,
    DEFAULT_UNIT,
};
pub use event::{dedup_ids, parse_event_date, Event, EventDetails, EventStatus, EventType};
pub use participation::{Participation, ParticipationStatus};
pub use user::{normalize_email, Role, User};
