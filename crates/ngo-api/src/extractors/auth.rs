//! Authentication extractor
//!
//! Resolves the bearer token in the Authorization header to an active user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use ngo_core::entities::{Role, User};
use ngo_core::Snowflake;
use ngo_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// The caller behind a valid access token
///
/// The user is re-read from the store on every request, so a deactivated
/// account is rejected even while its token has not expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    #[inline]
    pub fn id(&self) -> Snowflake {
        self.user.id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Reject the request unless the caller holds one of `roles`
    pub fn require(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user.id,
                role = self.user.role.as_str(),
                "Role not permitted for route"
            );
            Err(ApiError::forbidden())
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::missing_auth())?;

        let app_state = AppState::from_ref(state);

        let user = AuthService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                ApiError::from(e)
            })?;

        Ok(AuthUser { user })
    }
}
