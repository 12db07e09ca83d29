//! Database models - SQLx-compatible structs for PostgreSQL tables

mod donation;
mod event;
mod participation;
mod user;

pub use donation::{DonationModel, DonationStatsModel};
pub use event::{EventModel, EventStatsModel};
pub use participation::{ParticipationModel, StatusCountModel};
pub use user::{RoleActivityCountModel, UserModel};
