//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
///
/// The `Display` text of client-facing variants is sent to API callers as-is.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotFound(Snowflake),

    #[error("Event not found")]
    EventNotFound(Snowflake),

    #[error("Donation not found")]
    DonationNotFound(Snowflake),

    #[error("Volunteer not found")]
    VolunteerNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("{0}")]
    ValidationError(String),

    #[error("Some volunteer IDs are invalid")]
    InvalidVolunteerIds,

    #[error("School name is required for school accounts")]
    SchoolNameRequired,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Access denied for this role")]
    RoleNotPermitted,

    // =========================================================================
    // Invalid State Errors
    // =========================================================================
    #[error("Event is not available for registration")]
    EventNotOpenForRegistration,

    #[error("Cannot deactivate your own account")]
    CannotDeactivateSelf,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User already exists with this email")]
    EmailAlreadyExists,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::DonationNotFound(_) => "UNKNOWN_DONATION",
            Self::VolunteerNotFound(_) => "UNKNOWN_VOLUNTEER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidVolunteerIds => "INVALID_VOLUNTEER_IDS",
            Self::SchoolNameRequired => "SCHOOL_NAME_REQUIRED",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            Self::RoleNotPermitted => "ROLE_NOT_PERMITTED",

            // Invalid state
            Self::EventNotOpenForRegistration => "EVENT_NOT_OPEN",
            Self::CannotDeactivateSelf => "CANNOT_DEACTIVATE_SELF",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::EventNotFound(_)
                | Self::DonationNotFound(_)
                | Self::VolunteerNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidVolunteerIds
                | Self::SchoolNameRequired
                | Self::WeakPassword(_)
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccountDeactivated | Self::RoleNotPermitted)
    }

    /// The operation is well-formed but the target record is in the wrong state
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::EventNotOpenForRegistration | Self::CannotDeactivateSelf
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::AlreadyRegistered)
    }

    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_)
        )
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

/// A stored or submitted string that does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<UnknownVariant> for DomainError {
    fn from(err: UnknownVariant) -> Self {
        Self::ValidationError(err.to_string())
    }
}
