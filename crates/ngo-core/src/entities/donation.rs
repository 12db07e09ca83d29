//! Donation entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, UnknownVariant};
use crate::value_objects::Snowflake;

pub const DEFAULT_CURRENCY: &str = "NPR";
pub const DEFAULT_UNIT: &str = "pieces";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    Monetary,
    Physical,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monetary => "monetary",
            Self::Physical => "physical",
        }
    }
}

impl fmt::Display for DonationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monetary" => Ok(Self::Monetary),
            "physical" => Ok(Self::Physical),
            other => Err(UnknownVariant::new("donation type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Verified,
    Cancelled,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Cancelled => "cancelled",
        }
    }

    /// Outcomes an administrator may record when reviewing a donation
    #[inline]
    pub fn is_verification_target(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("donation status", other)),
        }
    }
}

/// What was given. Exactly one shape exists per donation.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationKind {
    Monetary {
        amount: f64,
    },
    Physical {
        category: String,
        quantity: i32,
        unit: String,
    },
}

impl DonationKind {
    pub fn monetary(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }
        Ok(Self::Monetary { amount })
    }

    pub fn physical(
        category: &str,
        quantity: i32,
        unit: Option<&str>,
    ) -> Result<Self, DomainError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(DomainError::validation(
                "Category is required for physical donations",
            ));
        }
        if quantity <= 0 {
            return Err(DomainError::validation("Quantity must be greater than 0"));
        }
        let unit = unit
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT);
        Ok(Self::Physical {
            category: category.to_string(),
            quantity,
            unit: unit.to_string(),
        })
    }

    pub fn donation_type(&self) -> DonationType {
        match self {
            Self::Monetary { .. } => DonationType::Monetary,
            Self::Physical { .. } => DonationType::Physical,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Monetary { amount } => Some(*amount),
            Self::Physical { .. } => None,
        }
    }

    pub fn quantity(&self) -> Option<i32> {
        match self {
            Self::Physical { quantity, .. } => Some(*quantity),
            Self::Monetary { .. } => None,
        }
    }
}

/// Free-text fields a donor may attach to a donation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationNotes {
    pub currency: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub transaction_ref: Option<String>,
    pub dropoff_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: Snowflake,
    pub donor_id: Snowflake,
    pub kind: DonationKind,
    pub currency: String,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub transaction_ref: Option<String>,
    pub dropoff_details: Option<String>,
    pub status: DonationStatus,
    pub verified_by: Option<Snowflake>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// A newly recorded donation, pending review
    pub fn new(id: Snowflake, donor_id: Snowflake, kind: DonationKind, notes: DonationNotes) -> Self {
        let now = Utc::now();
        let currency = notes
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string();
        Self {
            id,
            donor_id,
            kind,
            currency,
            description: notes.description,
            purpose: notes.purpose,
            transaction_ref: notes.transaction_ref,
            dropoff_details: notes.dropoff_details,
            status: DonationStatus::Pending,
            verified_by: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn donation_type(&self) -> DonationType {
        self.kind.donation_type()
    }

    /// Record an administrator's review
    pub fn verify(&mut self, status: DonationStatus, admin: Snowflake, at: DateTime<Utc>) {
        self.status = status;
        self.verified_by = Some(admin);
        self.verified_at = Some(at);
        self.updated_at = at;
    }
}
