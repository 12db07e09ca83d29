//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Donation, DonationStatus, Event, Participation, User};
use crate::error::DomainError;
use crate::query::{
    DonationFilter, DonationStats, EventFilter, EventStats, EventStatusCounts, Page, PageRequest,
    ParticipationFilter, ParticipationStatusCounts, UserFilter, UserStats,
};
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Fetch every user whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user. Fails with `EmailAlreadyExists` on a duplicate email.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Set the active flag
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()>;

    /// Page through users, newest first
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> RepoResult<Page<User>>;

    /// Counts for the admin dashboard
    async fn stats(&self) -> RepoResult<UserStats>;
}

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>>;

    /// Batch lookup; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>>;

    async fn create(&self, event: &Event) -> RepoResult<()>;

    /// Persist status, approver and notes
    async fn update_status(&self, event: &Event) -> RepoResult<()>;

    /// Overwrite the assigned volunteer set in a single write
    async fn replace_volunteers(&self, id: Snowflake, volunteer_ids: &[Snowflake])
        -> RepoResult<()>;

    /// Page through events, newest first
    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepoResult<Page<Event>>;

    /// Approved events dated at or after `now`, soonest first
    async fn list_upcoming(&self, now: DateTime<Utc>, page: PageRequest)
        -> RepoResult<Page<Event>>;

    /// Per-status counts of events raised by one requester
    async fn status_counts(&self, requested_by: Snowflake) -> RepoResult<EventStatusCounts>;

    async fn stats(&self, now: DateTime<Utc>) -> RepoResult<EventStats>;

    /// Most recently created events
    async fn recent(&self, limit: u32) -> RepoResult<Vec<Event>>;
}

// ============================================================================
// Participation Repository
// ============================================================================

#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    /// The registration for a (volunteer, event) pair, if any
    async fn find(
        &self,
        volunteer_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<Participation>>;

    /// Insert a registration. Fails with `AlreadyRegistered` when the pair exists.
    async fn create(&self, participation: &Participation) -> RepoResult<()>;

    /// A volunteer's registrations among the given events
    async fn find_for_events(
        &self,
        volunteer_id: Snowflake,
        event_ids: &[Snowflake],
    ) -> RepoResult<Vec<Participation>>;

    /// Page through a volunteer's registrations, most recent first
    async fn list(
        &self,
        filter: &ParticipationFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Participation>>;

    async fn status_counts(&self, volunteer_id: Snowflake)
        -> RepoResult<ParticipationStatusCounts>;
}

// ============================================================================
// Donation Repository
// ============================================================================

#[async_trait]
pub trait DonationRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Donation>>;

    async fn create(&self, donation: &Donation) -> RepoResult<()>;

    /// All of one donor's donations, newest first
    async fn list_by_donor(&self, donor_id: Snowflake) -> RepoResult<Vec<Donation>>;

    /// Page through donations, newest first
    async fn list(&self, filter: &DonationFilter, page: PageRequest)
        -> RepoResult<Page<Donation>>;

    /// Record a review outcome
    async fn verify(
        &self,
        id: Snowflake,
        status: DonationStatus,
        verified_by: Snowflake,
        verified_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    async fn stats(&self) -> RepoResult<DonationStats>;

    /// Most recently created donations
    async fn recent(&self, limit: u32) -> RepoResult<Vec<Donation>>;
}
