//! Admin dashboard aggregation

use chrono::Utc;
use tracing::instrument;

use crate::dto::{
    DashboardMetrics, DashboardResponse, DonationMetrics, EventMetrics, MonetaryMetrics,
    PhysicalMetrics, RecentActivity, UserMetrics, VolunteerMetrics,
};

use super::context::ServiceContext;
use super::directory;
use super::error::ServiceResult;

const RECENT_ITEMS: u32 = 5;

pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Headline counts plus the latest events and donations
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> ServiceResult<DashboardResponse> {
        let (users, events, donations, recent_events, recent_donations) = tokio::try_join!(
            self.ctx.user_repo().stats(),
            self.ctx.event_repo().stats(Utc::now()),
            self.ctx.donation_repo().stats(),
            self.ctx.event_repo().recent(RECENT_ITEMS),
            self.ctx.donation_repo().recent(RECENT_ITEMS),
        )?;

        let metrics = DashboardMetrics {
            users: UserMetrics {
                total: users.total,
                active: users.active,
                by_role: users.by_role,
            },
            events: EventMetrics {
                pending: events.pending,
                upcoming: events.upcoming,
                total: events.total,
            },
            donations: DonationMetrics {
                monetary: MonetaryMetrics {
                    total: donations.monetary_total,
                    count: donations.monetary_count,
                },
                physical: PhysicalMetrics {
                    count: donations.physical_count,
                },
            },
            volunteers: VolunteerMetrics {
                active: users.active_volunteers,
                total: users.by_role.volunteer,
            },
        };

        let dir = directory::for_recent(self.ctx, &recent_events, &recent_donations).await?;

        Ok(DashboardResponse {
            metrics,
            recent: RecentActivity {
                events: recent_events.into_iter().map(|e| dir.recent_event(e)).collect(),
                donations: recent_donations
                    .into_iter()
                    .map(|d| dir.recent_donation(d))
                    .collect(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CreateDonationRequest;
    use crate::services::donation::DonationService;
    use crate::services::event::EventService;
    use crate::services::testing::{event_request, TestContext};
    use ngo_core::entities::{DonationStatus, EventStatus, Role};

    #[tokio::test]
    async fn test_dashboard_counts() {
        let t = TestContext::new();
        let admin = t.seed_user(Role::Admin);
        let school = t.seed_user(Role::School);
        let donor = t.seed_user(Role::Donor);
        t.seed_user(Role::Volunteer);
        let inactive = t.seed_user(Role::Volunteer);
        t.deactivate(inactive.id);

        let events = EventService::new(&t.ctx);
        events.request_event(school.id, event_request(3)).await.unwrap();
        events.create_event(admin.id, event_request(3)).await.unwrap();
        events.create_event(admin.id, event_request(-3)).await.unwrap();
        let cancelled = events
            .create_event(admin.id, event_request(6))
            .await
            .unwrap()
            .event;
        events
            .set_status(admin.id, cancelled.id, EventStatus::Cancelled, None)
            .await
            .unwrap();

        let donations = DonationService::new(&t.ctx);
        for amount in [100.0, 250.0] {
            donations
                .create_donation(
                    donor.id,
                    CreateDonationRequest {
                        donation_type: "monetary".into(),
                        amount: Some(amount),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
        donations
            .create_donation(
                donor.id,
                CreateDonationRequest {
                    donation_type: "physical".into(),
                    category: Some("books".into()),
                    quantity: Some(12),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let resp = DashboardService::new(&t.ctx).dashboard().await.unwrap();
        let m = resp.metrics;

        assert_eq!(m.users.total, 5);
        assert_eq!(m.users.active, 4);
        assert_eq!(m.users.by_role.volunteer, 2);
        assert_eq!(m.volunteers.total, 2);
        assert_eq!(m.volunteers.active, 1);

        assert_eq!(m.events.total, 4);
        assert_eq!(m.events.pending, 1);
        assert_eq!(m.events.upcoming, 1);

        assert!((m.donations.monetary.total - 350.0).abs() < f64::EPSILON);
        assert_eq!(m.donations.monetary.count, 2);
        assert_eq!(m.donations.physical.count, 1);

        assert_eq!(resp.recent.events.len(), 4);
        assert_eq!(resp.recent.donations.len(), 3);
    }

    #[tokio::test]
    async fn test_recent_activity_expands_only_requester_and_donor() {
        let t = TestContext::new();
        let admin = t.seed_user(Role::Admin);
        let school = t.seed_user(Role::School);
        let donor = t.seed_user(Role::Donor);
        let volunteer = t.seed_user(Role::Volunteer);

        let events = EventService::new(&t.ctx);
        let requested = events
            .request_event(school.id, event_request(5))
            .await
            .unwrap()
            .event;
        events
            .set_status(admin.id, requested.id, EventStatus::Approved, None)
            .await
            .unwrap();
        events
            .assign_volunteers(requested.id, &[volunteer.id])
            .await
            .unwrap();

        let donations = DonationService::new(&t.ctx);
        let donation = donations
            .create_donation(
                donor.id,
                CreateDonationRequest {
                    donation_type: "monetary".into(),
                    amount: Some(75.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .donation;
        donations
            .verify_donation(admin.id, donation.id, DonationStatus::Verified)
            .await
            .unwrap();

        let resp = DashboardService::new(&t.ctx).dashboard().await.unwrap();
        let recent = serde_json::to_value(&resp.recent).unwrap();

        let event = &recent["events"][0];
        assert_eq!(event["status"], "approved");
        assert_eq!(
            event["requestedBy"],
            serde_json::json!({ "id": school.id, "name": school.name, "email": school.email })
        );
        for hidden in ["approvedBy", "assignedVolunteers", "description", "notes"] {
            assert!(event.get(hidden).is_none(), "{hidden} should not be expanded");
        }

        let donation = &recent["donations"][0];
        assert_eq!(donation["status"], "verified");
        assert_eq!(donation["donor"]["email"], donor.email.as_str());
        assert!(donation.get("verifiedBy").is_none());
        assert!(donation["donor"].get("schoolName").is_none());
    }
}
