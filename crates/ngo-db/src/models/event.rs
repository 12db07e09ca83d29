//! Event database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub target_audience: Option<String>,
    pub number_of_students: i32,
    pub status: String,
    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub assigned_volunteers: Vec<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregates for the admin dashboard
#[derive(Debug, Clone, FromRow)]
pub struct EventStatsModel {
    pub pending: i64,
    pub upcoming: i64,
    pub total: i64,
}
