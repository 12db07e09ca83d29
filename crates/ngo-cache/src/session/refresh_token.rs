//! Refresh token storage in Redis.
//!
//! Each token lives under `refresh_token:{token}` with the session TTL. A
//! per-user set `user_tokens:{user_id}` indexes them for bulk revocation.

use ngo_core::Snowflake;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisPoolError, RedisResult};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const USER_TOKENS_PREFIX: &str = "user_tokens:";

/// Stored refresh token data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub user_id: Snowflake,
    /// Matches the `sid` claim of both tokens in the pair
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
}

impl RefreshTokenData {
    #[must_use]
    pub fn new(user_id: Snowflake, session_id: String) -> Self {
        Self {
            user_id,
            session_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Refresh token store for managing authentication sessions
#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_TOKENS_PREFIX}{user_id}")
    }

    pub async fn store(&self, token: &str, data: &RefreshTokenData) -> RedisResult<()> {
        self.pool
            .set_json(&Self::key(token), data, self.ttl_seconds)
            .await?;

        let ttl = i64::try_from(self.ttl_seconds)
            .map_err(|_| RedisPoolError::InvalidTtl(self.ttl_seconds))?;
        let user_key = Self::user_key(data.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, token).await?;
        conn.expire::<_, ()>(&user_key, ttl).await?;

        tracing::debug!(
            user_id = %data.user_id,
            session_id = %data.session_id,
            "Stored refresh token"
        );
        Ok(())
    }

    /// Session data for a live token; `None` once expired or revoked
    pub async fn get(&self, token: &str) -> RedisResult<Option<RefreshTokenData>> {
        self.pool.get_json(&Self::key(token)).await
    }

    pub async fn revoke(&self, token: &str) -> RedisResult<bool> {
        if let Some(data) = self.get(token).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(data.user_id), token)
                .await?;
        }

        let deleted = self.pool.delete(&Self::key(token)).await?;
        if deleted {
            tracing::debug!("Revoked refresh token");
        }
        Ok(deleted)
    }

    /// Revoke every session of a user
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<usize> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let tokens: Vec<String> = conn.smembers(&user_key).await?;
        let keys: Vec<String> = tokens.iter().map(|t| Self::key(t)).collect();
        self.pool.delete_many(&keys).await?;
        conn.del::<_, ()>(&user_key).await?;

        tracing::info!(user_id = %user_id, count = tokens.len(), "Revoked all refresh tokens for user");
        Ok(tokens.len())
    }
}
