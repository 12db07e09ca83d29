//! User service
//!
//! Account administration: listing users and toggling the active flag.

use ngo_core::entities::User;
use ngo_core::query::{PageRequest, UserFilter};
use ngo_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{UserListResponse, UserResponse, UserStatusResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    /// Newest accounts first, optionally filtered by role and active flag
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> ServiceResult<UserListResponse> {
        let result = self.ctx.user_repo().list(&filter, page).await?;

        Ok(UserListResponse {
            pagination: page.meta(result.total),
            users: result.items.into_iter().map(UserResponse::from).collect(),
        })
    }

    /// Activate or deactivate an account.
    ///
    /// Deactivation also ends every session the user holds.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        actor_id: Snowflake,
        user_id: Snowflake,
        is_active: bool,
    ) -> ServiceResult<UserStatusResponse> {
        if actor_id == user_id && !is_active {
            return Err(DomainError::CannotDeactivateSelf.into());
        }

        self.ctx.user_repo().set_active(user_id, is_active).await?;

        if !is_active {
            // The active flag is re-checked on every request, so a failed
            // revocation only leaves tokens that can no longer be used
            match self
                .ctx
                .refresh_token_store()
                .revoke_all_for_user(user_id)
                .await
            {
                Ok(revoked) => info!(user_id = %user_id, revoked, "Sessions revoked"),
                Err(e) => warn!(user_id = %user_id, error = %e, "Failed to revoke sessions"),
            }
        }

        let user = self.get_user(user_id).await?;
        let verb = if is_active { "activated" } else { "deactivated" };

        info!(actor_id = %actor_id, user_id = %user_id, "User {verb}");

        Ok(UserStatusResponse {
            message: format!("User {verb} successfully"),
            user: user.into(),
        })
    }
}
