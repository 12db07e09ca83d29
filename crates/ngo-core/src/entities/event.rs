//! Event entity and its lifecycle
//!
//! ```text
//! pending ──► approved ──► completed
//!    │            │
//!    ▼            ▼
//! rejected    cancelled
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Workshop,
    Awareness,
    Training,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workshop => "workshop",
            Self::Awareness => "awareness",
            Self::Training => "training",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workshop" => Ok(Self::Workshop),
            "awareness" => Ok(Self::Awareness),
            "training" => Ok(Self::Training),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant::new("event type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Pending,
        EventStatus::Approved,
        EventStatus::Rejected,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    /// Whether `next` is an edge of the lifecycle graph
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Completed | Self::Cancelled)
        )
    }

    /// Statuses an administrator may set explicitly. `Pending` is only ever
    /// the initial state.
    #[inline]
    pub fn is_admin_target(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("event status", other)),
        }
    }
}

/// Caller-supplied fields shared by school requests and admin-created events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub target_audience: Option<String>,
    pub number_of_students: i32,
    pub notes: Option<String>,
}

/// A workshop, awareness session or training hosted for a school
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Snowflake,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    pub target_audience: Option<String>,
    pub number_of_students: i32,
    pub status: EventStatus,
    pub requested_by: Snowflake,
    pub approved_by: Option<Snowflake>,
    pub assigned_volunteers: Vec<Snowflake>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    fn from_details(id: Snowflake, requested_by: Snowflake, details: EventDetails) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: details.title,
            description: details.description,
            event_type: details.event_type,
            date: details.date,
            location: details.location,
            target_audience: details.target_audience,
            number_of_students: details.number_of_students.max(0),
            status: EventStatus::Pending,
            requested_by,
            approved_by: None,
            assigned_volunteers: Vec::new(),
            notes: details.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// A school's request awaiting review
    pub fn requested(id: Snowflake, requester: Snowflake, details: EventDetails) -> Self {
        Self::from_details(id, requester, details)
    }

    /// An event an administrator creates on their own authority
    pub fn approved_by_admin(id: Snowflake, admin: Snowflake, details: EventDetails) -> Self {
        let mut event = Self::from_details(id, admin, details);
        event.status = EventStatus::Approved;
        event.approved_by = Some(admin);
        event
    }

    /// Apply an administrator's status decision.
    ///
    /// The current state is not checked: any admin target is applied and the
    /// acting admin is recorded as approver every time. Returns whether the move
    /// followed the lifecycle graph.
    pub fn apply_status(
        &mut self,
        status: EventStatus,
        admin: Snowflake,
        notes: Option<String>,
    ) -> bool {
        let on_graph = self.status.can_transition_to(status);
        self.status = status;
        self.approved_by = Some(admin);
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = Utc::now();
        on_graph
    }

    /// Replace the assigned set, dropping duplicate ids
    pub fn replace_volunteers(&mut self, volunteer_ids: &[Snowflake]) {
        self.assigned_volunteers = dedup_ids(volunteer_ids);
        self.updated_at = Utc::now();
    }

    #[inline]
    pub fn is_open_for_registration(&self) -> bool {
        self.status == EventStatus::Approved
    }

    /// Listed in volunteer discovery
    #[inline]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status == EventStatus::Approved && self.date >= now
    }
}

/// Order-preserving de-duplication
pub fn dedup_ids(ids: &[Snowflake]) -> Vec<Snowflake> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

/// Parse a client-supplied ISO 8601 date.
///
/// Accepts a full RFC 3339 timestamp, a local date-time without offset
/// (taken as UTC), or a bare calendar date (midnight UTC).
pub fn parse_event_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
