//! # ngo-core
//!
//! Domain layer: entities, the event lifecycle, query types, and repository traits.
//! This crate has no dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod query;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    dedup_ids, normalize_email, parse_event_date, Donation, DonationKind, DonationNotes,
    DonationStatus, DonationType, Event, EventDetails, EventStatus, EventType, Participation,
    ParticipationStatus, Role, User, DEFAULT_CURRENCY, DEFAULT_UNIT,
};
pub use error::{DomainError, UnknownVariant};
pub use query::{
    DonationFilter, DonationStats, DonationSummary, EventFilter, EventStats, EventStatusCounts,
    Page, PageMeta, PageRequest, ParticipationFilter, ParticipationStatusCounts, RoleCounts,
    UserFilter, UserStats,
};
pub use traits::{
    DonationRepository, EventRepository, ParticipationRepository, RepoResult, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError, MAX_WORKER_ID};
