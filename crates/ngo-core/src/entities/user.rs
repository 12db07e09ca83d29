//! User entity and account roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;
use crate::value_objects::Snowflake;

/// Account role. Every endpoint declares which of these it admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Donor,
    Volunteer,
    School,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Donor, Role::Volunteer, Role::School];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Donor => "donor",
            Self::Volunteer => "volunteer",
            Self::School => "school",
        }
    }

    /// Roles a visitor may pick for themselves at sign-up
    #[inline]
    pub fn is_self_registrable(&self) -> bool {
        !matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "donor" => Ok(Self::Donor),
            "volunteer" => Ok(Self::Volunteer),
            "school" => Ok(Self::School),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// A registered account. Users are deactivated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    /// Present exactly for `Role::School`
    pub school_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, name: String, email: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email: normalize_email(&email),
            role,
            is_active: true,
            school_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_school_name(mut self, school_name: Option<String>) -> Self {
        self.school_name = school_name;
        self
    }

    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Active volunteer accounts are the only valid assignment targets
    #[inline]
    pub fn is_assignable_volunteer(&self) -> bool {
        self.is_active && self.role == Role::Volunteer
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
