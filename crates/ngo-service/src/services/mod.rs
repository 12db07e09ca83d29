//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and orchestrates repository calls for one area of the API.

pub mod auth;
pub mod context;
pub mod dashboard;
mod directory;
pub mod donation;
pub mod error;
pub mod event;
pub mod participation;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use donation::DonationService;
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use participation::ParticipationService;
pub use user::UserService;
