//! # ngo-cache
//!
//! Redis layer backing authentication sessions.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Session Storage**: Refresh tokens indexed per user, so a logout or a
//!   deactivation can revoke every session at once
//!
//! ## Example
//!
//! ```ignore
//! use ngo_cache::{RedisPool, RefreshTokenData, RefreshTokenStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let store = RefreshTokenStore::with_ttl(pool, 7 * 24 * 60 * 60);
//!
//! store.store(&refresh_token, &RefreshTokenData::new(user_id, session_id)).await?;
//! store.revoke_all_for_user(user_id).await?;
//! ```

pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export session types
pub use session::{RefreshTokenData, RefreshTokenStore};
