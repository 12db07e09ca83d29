//! Aggregate counts used by summaries and the admin dashboard

use serde::Serialize;

use crate::entities::{Donation, DonationKind, EventStatus, ParticipationStatus, Role};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub admin: i64,
    pub donor: i64,
    pub volunteer: i64,
    pub school: i64,
}

impl RoleCounts {
    pub fn add(&mut self, role: Role, n: i64) {
        match role {
            Role::Admin => self.admin += n,
            Role::Donor => self.donor += n,
            Role::Volunteer => self.volunteer += n,
            Role::School => self.school += n,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub by_role: RoleCounts,
    pub active_volunteers: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    pub pending: i64,
    /// Approved with a date not in the past
    pub upcoming: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DonationStats {
    pub monetary_total: f64,
    pub monetary_count: i64,
    pub physical_count: i64,
}

/// Per-status breakdown of a school's events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl EventStatusCounts {
    pub fn add(&mut self, status: EventStatus, n: i64) {
        self.total += n;
        match status {
            EventStatus::Pending => self.pending += n,
            EventStatus::Approved => self.approved += n,
            EventStatus::Rejected => self.rejected += n,
            EventStatus::Completed => self.completed += n,
            EventStatus::Cancelled => self.cancelled += n,
        }
    }
}

impl FromIterator<EventStatus> for EventStatusCounts {
    fn from_iter<I: IntoIterator<Item = EventStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.add(status, 1);
        }
        counts
    }
}

/// Per-status breakdown of one volunteer's participations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParticipationStatusCounts {
    pub total: i64,
    pub registered: i64,
    pub confirmed: i64,
    pub attended: i64,
    pub absent: i64,
    pub cancelled: i64,
}

impl ParticipationStatusCounts {
    pub fn add(&mut self, status: ParticipationStatus, n: i64) {
        self.total += n;
        match status {
            ParticipationStatus::Registered => self.registered += n,
            ParticipationStatus::Confirmed => self.confirmed += n,
            ParticipationStatus::Attended => self.attended += n,
            ParticipationStatus::Absent => self.absent += n,
            ParticipationStatus::Cancelled => self.cancelled += n,
        }
    }
}

impl FromIterator<ParticipationStatus> for ParticipationStatusCounts {
    fn from_iter<I: IntoIterator<Item = ParticipationStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.add(status, 1);
        }
        counts
    }
}

/// Totals over a donor's donations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total_monetary: f64,
    pub total_items: i64,
    pub monetary_count: i64,
    pub physical_count: i64,
}

impl DonationSummary {
    pub fn from_donations<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> Self {
        donations
            .into_iter()
            .fold(Self::default(), |mut acc, donation| {
                match &donation.kind {
                    DonationKind::Monetary { amount } => {
                        acc.total_monetary += amount;
                        acc.monetary_count += 1;
                    }
                    DonationKind::Physical { quantity, .. } => {
                        acc.total_items += i64::from(*quantity);
                        acc.physical_count += 1;
                    }
                }
                acc
            })
    }
}
