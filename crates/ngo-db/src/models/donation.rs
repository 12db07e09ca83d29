//! Donation database model
//!
//! The two donation shapes share one table; unused columns are NULL.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DonationModel {
    pub id: i64,
    pub donor_id: i64,
    pub donation_type: String,
    pub amount: Option<f64>,
    pub currency: String,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub transaction_ref: Option<String>,
    pub dropoff_details: Option<String>,
    pub status: String,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DonationStatsModel {
    pub monetary_total: f64,
    pub monetary_count: i64,
    pub physical_count: i64,
}
