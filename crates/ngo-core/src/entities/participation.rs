//! Volunteer participation in an event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    #[default]
    Registered,
    Confirmed,
    Attended,
    Absent,
    Cancelled,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Confirmed => "confirmed",
            Self::Attended => "attended",
            Self::Absent => "absent",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "confirmed" => Ok(Self::Confirmed),
            "attended" => Ok(Self::Attended),
            "absent" => Ok(Self::Absent),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("participation status", other)),
        }
    }
}

/// Links one volunteer to one event. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub id: Snowflake,
    pub volunteer_id: Snowflake,
    pub event_id: Snowflake,
    pub status: ParticipationStatus,
    pub registered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub attended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participation {
    /// Fresh self-registration
    pub fn register(id: Snowflake, volunteer_id: Snowflake, event_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            volunteer_id,
            event_id,
            status: ParticipationStatus::Registered,
            registered_at: now,
            confirmed_at: None,
            attended_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
