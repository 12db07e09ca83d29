//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in ngo-core.

mod donation;
mod error;
mod event;
mod participation;
mod user;

pub use donation::PgDonationRepository;
pub use event::PgEventRepository;
pub use participation::PgParticipationRepository;
pub use user::PgUserRepository;
