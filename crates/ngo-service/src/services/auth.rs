//! Authentication service
//!
//! Handles registration, login, token refresh, logout and resolving the
//! caller behind an access token.

use ngo_cache::RefreshTokenData;
use ngo_common::auth::{hash_password, validate_password_strength, verify_password};
use ngo_common::AppError;
use ngo_core::entities::{normalize_email, Role, User};
use ngo_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and open a session for it
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let role = request.role()?;
        if !role.is_self_registrable() {
            return Err(DomainError::validation("Invalid role").into());
        }
        let school_name = request
            .school_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if role == Role::School && school_name.is_none() {
            return Err(DomainError::SchoolNameRequired.into());
        }

        let email = normalize_email(&request.email);
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let user = User::new(
            self.ctx.generate_id(),
            request.name.trim().to_string(),
            email,
            role,
        )
        .with_school_name(if role == Role::School { school_name } else { None });

        // The unique index still catches a concurrent registration
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, role = %user.role.as_str(), "User registered");

        self.open_session(user, "User registered successfully").await
    }

    /// Exchange email and password for a session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: account deactivated");
            return Err(DomainError::AccountDeactivated.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.open_session(user, "Login successful").await
    }

    /// Rotate a refresh token. The presented token is revoked either way.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self.ctx.jwt_service().verify_refresh(&request.refresh_token)?;

        let store = self.ctx.refresh_token_store();
        let data = store
            .get(&request.refresh_token)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        if claims.user_id()? != data.user_id || claims.sid != data.session_id {
            warn!(user_id = %data.user_id, "Refresh token does not match its session");
            store.revoke(&request.refresh_token).await?;
            return Err(AppError::InvalidToken.into());
        }

        store.revoke(&request.refresh_token).await?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(data.user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;
        if !user.is_active {
            return Err(DomainError::AccountDeactivated.into());
        }

        info!(user_id = %user.id, session_id = %data.session_id, "Session refreshed");

        self.issue(user, data.session_id, "Token refreshed").await
    }

    /// End one session, or every session of the user when no token is given
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        user_id: Snowflake,
        refresh_token: Option<&str>,
    ) -> ServiceResult<MessageResponse> {
        let store = self.ctx.refresh_token_store();

        match refresh_token {
            Some(token) => {
                // Tokens belonging to someone else are left alone
                if let Some(data) = store.get(token).await? {
                    if data.user_id == user_id {
                        store.revoke(token).await?;
                    }
                }
                info!(user_id = %user_id, "User logged out");
            }
            None => {
                let revoked = store.revoke_all_for_user(user_id).await?;
                info!(user_id = %user_id, revoked, "User logged out of all sessions");
            }
        }

        Ok(MessageResponse::new("Logged out successfully"))
    }

    pub fn me(&self, user: &User) -> CurrentUserResponse {
        CurrentUserResponse {
            user: user.into(),
        }
    }

    /// Resolve the caller behind an access token.
    ///
    /// The user record is re-read on every call so deactivation takes effect
    /// immediately. Missing and deactivated users are both unauthenticated.
    pub async fn authenticate(&self, access_token: &str) -> ServiceResult<User> {
        let claims = self.ctx.jwt_service().verify_access(access_token)?;
        let user_id = claims.user_id()?;

        match self.ctx.user_repo().find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => {
                warn!(user_id = %user_id, "Token presented for deactivated account");
                Err(AppError::InvalidToken.into())
            }
            None => Err(AppError::InvalidToken.into()),
        }
    }

    async fn open_session(&self, user: User, message: &str) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        self.issue(user, session_id, message).await
    }

    async fn issue(
        &self,
        user: User,
        session_id: String,
        message: &str,
    ) -> ServiceResult<AuthResponse> {
        let pair = self.ctx.jwt_service().issue(user.id, user.role, &session_id)?;

        let data = RefreshTokenData::new(user.id, session_id);
        self.ctx
            .refresh_token_store()
            .store(&pair.refresh_token, &data)
            .await?;

        Ok(AuthResponse {
            message: message.to_string(),
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user: user.into(),
        })
    }
}
