//! In-memory repositories for service tests

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use ngo_cache::{RedisPool, RedisPoolConfig};
use ngo_common::JwtService;
use ngo_core::entities::{
    Donation, DonationKind, DonationStatus, Event, EventStatus, Participation,
    ParticipationStatus, Role, User,
};
use ngo_core::query::{
    DonationFilter, DonationStats, EventFilter, EventStats, EventStatusCounts, Page, PageRequest,
    ParticipationFilter, ParticipationStatusCounts, UserFilter, UserStats,
};
use ngo_core::traits::{
    DonationRepository, EventRepository, ParticipationRepository, RepoResult, UserRepository,
};
use ngo_core::{DomainError, Snowflake, SnowflakeGenerator};
use parking_lot::Mutex;
use sqlx::postgres::PgPoolOptions;

use crate::dto::EventRequest;

use super::context::{ServiceContext, ServiceContextBuilder};

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<(User, String)>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.rows.lock().iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|(u, _)| ids.contains(&u.id))
            .map(|(u, _)| u.clone())
            .collect())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.rows.lock().iter().any(|(u, _)| u.email == email))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        rows.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, h)| h.clone()))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        row.1 = password_hash.to_string();
        Ok(())
    }

    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        row.0.set_active(active);
        Ok(())
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> RepoResult<Page<User>> {
        let mut users: Vec<User> = self
            .rows
            .lock()
            .iter()
            .map(|(u, _)| u.clone())
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.is_active.is_none_or(|a| u.is_active == a))
            .collect();
        users.sort_by_key(|u| Reverse((u.created_at, u.id)));
        Ok(Page::from_slice(&users, page))
    }

    async fn stats(&self) -> RepoResult<UserStats> {
        let rows = self.rows.lock();
        let mut stats = UserStats::default();
        for (user, _) in rows.iter() {
            stats.total += 1;
            stats.by_role.add(user.role, 1);
            if user.is_active {
                stats.active += 1;
                if user.role == Role::Volunteer {
                    stats.active_volunteers += 1;
                }
            }
        }
        Ok(stats)
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Default)]
pub struct MemoryEvents {
    rows: Mutex<Vec<Event>>,
}

impl MemoryEvents {
    fn sorted_newest_first(&self) -> Vec<Event> {
        let mut events = self.rows.lock().clone();
        events.sort_by_key(|e| Reverse((e.created_at, e.id)));
        events
    }
}

#[async_trait]
impl EventRepository for MemoryEvents {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        Ok(self.rows.lock().iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn create(&self, event: &Event) -> RepoResult<()> {
        self.rows.lock().push(event.clone());
        Ok(())
    }

    async fn update_status(&self, event: &Event) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(DomainError::EventNotFound(event.id))?;
        row.status = event.status;
        row.approved_by = event.approved_by;
        row.notes = event.notes.clone();
        row.updated_at = event.updated_at;
        Ok(())
    }

    async fn replace_volunteers(
        &self,
        id: Snowflake,
        volunteer_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DomainError::EventNotFound(id))?;
        row.replace_volunteers(volunteer_ids);
        Ok(())
    }

    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepoResult<Page<Event>> {
        let events: Vec<Event> = self
            .sorted_newest_first()
            .into_iter()
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| filter.requested_by.is_none_or(|r| e.requested_by == r))
            .collect();
        Ok(Page::from_slice(&events, page))
    }

    async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> RepoResult<Page<Event>> {
        let mut events: Vec<Event> = self
            .rows
            .lock()
            .iter()
            .filter(|e| e.is_upcoming(now))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.date, e.id));
        Ok(Page::from_slice(&events, page))
    }

    async fn status_counts(&self, requested_by: Snowflake) -> RepoResult<EventStatusCounts> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|e| e.requested_by == requested_by)
            .map(|e| e.status)
            .collect())
    }

    async fn stats(&self, now: DateTime<Utc>) -> RepoResult<EventStats> {
        let rows = self.rows.lock();
        Ok(EventStats {
            pending: rows.iter().filter(|e| e.status == EventStatus::Pending).count() as i64,
            upcoming: rows.iter().filter(|e| e.is_upcoming(now)).count() as i64,
            total: rows.len() as i64,
        })
    }

    async fn recent(&self, limit: u32) -> RepoResult<Vec<Event>> {
        Ok(self
            .sorted_newest_first()
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

// ============================================================================
// Participations
// ============================================================================

#[derive(Default)]
pub struct MemoryParticipations {
    rows: Mutex<Vec<Participation>>,
}

#[async_trait]
impl ParticipationRepository for MemoryParticipations {
    async fn find(
        &self,
        volunteer_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<Participation>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|p| p.volunteer_id == volunteer_id && p.event_id == event_id)
            .cloned())
    }

    async fn create(&self, participation: &Participation) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|p| {
            p.volunteer_id == participation.volunteer_id && p.event_id == participation.event_id
        }) {
            return Err(DomainError::AlreadyRegistered);
        }
        rows.push(participation.clone());
        Ok(())
    }

    async fn find_for_events(
        &self,
        volunteer_id: Snowflake,
        event_ids: &[Snowflake],
    ) -> RepoResult<Vec<Participation>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|p| p.volunteer_id == volunteer_id && event_ids.contains(&p.event_id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: &ParticipationFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Participation>> {
        let mut items: Vec<Participation> = self
            .rows
            .lock()
            .iter()
            .filter(|p| p.volunteer_id == filter.volunteer_id)
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        items.sort_by_key(|p| Reverse((p.registered_at, p.id)));
        Ok(Page::from_slice(&items, page))
    }

    async fn status_counts(&self, volunteer_id: Snowflake) -> RepoResult<ParticipationStatusCounts> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|p| p.volunteer_id == volunteer_id)
            .map(|p| p.status)
            .collect())
    }
}

// ============================================================================
// Donations
// ============================================================================

#[derive(Default)]
pub struct MemoryDonations {
    rows: Mutex<Vec<Donation>>,
}

impl MemoryDonations {
    fn sorted_newest_first(&self) -> Vec<Donation> {
        let mut donations = self.rows.lock().clone();
        donations.sort_by_key(|d| Reverse((d.created_at, d.id)));
        donations
    }
}

#[async_trait]
impl DonationRepository for MemoryDonations {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Donation>> {
        Ok(self.rows.lock().iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, donation: &Donation) -> RepoResult<()> {
        self.rows.lock().push(donation.clone());
        Ok(())
    }

    async fn list_by_donor(&self, donor_id: Snowflake) -> RepoResult<Vec<Donation>> {
        Ok(self
            .sorted_newest_first()
            .into_iter()
            .filter(|d| d.donor_id == donor_id)
            .collect())
    }

    async fn list(
        &self,
        filter: &DonationFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Donation>> {
        let items: Vec<Donation> = self
            .sorted_newest_first()
            .into_iter()
            .filter(|d| filter.donation_type.is_none_or(|t| d.donation_type() == t))
            .filter(|d| filter.status.is_none_or(|s| d.status == s))
            .filter(|d| filter.donor_id.is_none_or(|id| d.donor_id == id))
            .collect();
        Ok(Page::from_slice(&items, page))
    }

    async fn verify(
        &self,
        id: Snowflake,
        status: DonationStatus,
        verified_by: Snowflake,
        verified_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DomainError::DonationNotFound(id))?;
        row.verify(status, verified_by, verified_at);
        Ok(())
    }

    async fn stats(&self) -> RepoResult<DonationStats> {
        let mut stats = DonationStats::default();
        for donation in self.rows.lock().iter() {
            match donation.kind {
                DonationKind::Monetary { amount } => {
                    stats.monetary_total += amount;
                    stats.monetary_count += 1;
                }
                DonationKind::Physical { .. } => stats.physical_count += 1,
            }
        }
        Ok(stats)
    }

    async fn recent(&self, limit: u32) -> RepoResult<Vec<Donation>> {
        Ok(self
            .sorted_newest_first()
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

// ============================================================================
// Context
// ============================================================================

/// A service context over in-memory repositories.
///
/// The Postgres pool is lazy and the Redis pool points at a closed port, so
/// neither is ever reached successfully.
pub struct TestContext {
    pub ctx: ServiceContext,
    pub users: Arc<MemoryUsers>,
    pub events: Arc<MemoryEvents>,
    pub participations: Arc<MemoryParticipations>,
    ids: Arc<SnowflakeGenerator>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUsers::default());
        let events = Arc::new(MemoryEvents::default());
        let participations = Arc::new(MemoryParticipations::default());
        let donations = Arc::new(MemoryDonations::default());
        let ids = Arc::new(SnowflakeGenerator::new(1));

        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/ngo_test")
            .unwrap();
        let redis = RedisPool::new(RedisPoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_connections: 1,
        })
        .unwrap();

        let ctx = ServiceContextBuilder::new()
            .pool(pool)
            .redis_pool(Arc::new(redis))
            .user_repo(users.clone())
            .event_repo(events.clone())
            .participation_repo(participations.clone())
            .donation_repo(donations)
            .jwt_service(Arc::new(JwtService::new("test-secret", 900, 3600)))
            .snowflake_generator(ids.clone())
            .build()
            .unwrap();

        Self {
            ctx,
            users,
            events,
            participations,
            ids,
        }
    }

    pub fn seed_user(&self, role: Role) -> User {
        let id = self.ids.generate();
        let user = User::new(id, format!("{} {id}", role.as_str()), format!("{id}@example.org"), role)
            .with_school_name((role == Role::School).then(|| format!("School {id}")));
        self.users.rows.lock().push((user.clone(), String::new()));
        user
    }

    pub fn user(&self, id: Snowflake) -> User {
        self.users
            .rows
            .lock()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone())
            .unwrap()
    }

    pub fn deactivate(&self, id: Snowflake) {
        if let Some((user, _)) = self.users.rows.lock().iter_mut().find(|(u, _)| u.id == id) {
            user.set_active(false);
        }
    }

    pub fn event(&self, id: Snowflake) -> Event {
        self.events
            .rows
            .lock()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .unwrap()
    }

    /// Oldest registration first
    pub fn participations_of(&self, volunteer_id: Snowflake) -> Vec<Participation> {
        self.participations
            .rows
            .lock()
            .iter()
            .filter(|p| p.volunteer_id == volunteer_id)
            .cloned()
            .collect()
    }

    pub fn set_participation_status(&self, id: Snowflake, status: ParticipationStatus) {
        if let Some(p) = self.participations.rows.lock().iter_mut().find(|p| p.id == id) {
            p.status = status;
        }
    }
}

/// A valid event request dated `days` from now
pub fn event_request(days: i64) -> EventRequest {
    EventRequest {
        title: "Digital safety workshop".to_string(),
        description: "Staying safe online".to_string(),
        event_type: "workshop".to_string(),
        date: (Utc::now() + Duration::days(days)).to_rfc3339(),
        location: "Main hall".to_string(),
        target_audience: Some("Grade 8".to_string()),
        number_of_students: Some(40),
        notes: None,
    }
}
