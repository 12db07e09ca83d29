//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `users` table, without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub school_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `SELECT ... GROUP BY role, is_active` row
#[derive(Debug, Clone, FromRow)]
pub struct RoleActivityCountModel {
    pub role: String,
    pub is_active: bool,
    pub count: i64,
}
