//! Service context - dependency container for services
//!
//! Holds the repositories, the session store and the token/id generators.

use std::sync::Arc;

use ngo_cache::{RefreshTokenStore, SharedRedisPool};
use ngo_common::JwtService;
use ngo_core::traits::{
    DonationRepository, EventRepository, ParticipationRepository, UserRepository,
};
use ngo_core::{Snowflake, SnowflakeGenerator};
use ngo_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloned into every request through the application state. Repositories are
/// trait objects so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: SharedRedisPool,

    user_repo: Arc<dyn UserRepository>,
    event_repo: Arc<dyn EventRepository>,
    participation_repo: Arc<dyn ParticipationRepository>,
    donation_repo: Arc<dyn DonationRepository>,

    refresh_token_store: RefreshTokenStore,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        participation_repo: Arc<dyn ParticipationRepository>,
        donation_repo: Arc<dyn DonationRepository>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        // Session lifetime follows the refresh token lifetime
        let ttl = u64::try_from(jwt_service.refresh_token_expiry()).unwrap_or(0);
        let refresh_token_store = RefreshTokenStore::with_ttl((*redis_pool).clone(), ttl);

        Self {
            pool,
            redis_pool,
            user_repo,
            event_repo,
            participation_repo,
            donation_repo,
            refresh_token_store,
            jwt_service,
            snowflake_generator,
        }
    }

    // === Pools ===

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    pub fn participation_repo(&self) -> &dyn ParticipationRepository {
        self.participation_repo.as_ref()
    }

    pub fn donation_repo(&self) -> &dyn DonationRepository {
        self.donation_repo.as_ref()
    }

    // === Sessions ===

    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    // === Ids ===

    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &self.redis_pool)
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    event_repo: Option<Arc<dyn EventRepository>>,
    participation_repo: Option<Arc<dyn ParticipationRepository>>,
    donation_repo: Option<Arc<dyn DonationRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn participation_repo(mut self, repo: Arc<dyn ParticipationRepository>) -> Self {
        self.participation_repo = Some(repo);
        self
    }

    pub fn donation_repo(mut self, repo: Arc<dyn DonationRepository>) -> Self {
        self.donation_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext::new(
            required(self.pool, "pool")?,
            required(self.redis_pool, "redis_pool")?,
            required(self.user_repo, "user_repo")?,
            required(self.event_repo, "event_repo")?,
            required(self.participation_repo, "participation_repo")?,
            required(self.donation_repo, "donation_repo")?,
            required(self.jwt_service, "jwt_service")?,
            required(self.snowflake_generator, "snowflake_generator")?,
        ))
    }
}
