//! # ngo-db
//!
//! Database layer implementing the ngo-core repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and migrations
//! - Row models with SQLx `FromRow` derives
//! - Row -> entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use ngo_db::{create_pool, run_migrations, PgEventRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::new(database_url)).await?;
//! run_migrations(&pool, migrations_dir).await?;
//! let events = PgEventRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgDonationRepository, PgEventRepository, PgParticipationRepository, PgUserRepository,
};
