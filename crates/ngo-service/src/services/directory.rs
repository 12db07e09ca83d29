//! Batch loading of related records for response expansion

use ngo_core::entities::{dedup_ids, Donation, Event, Participation};
use ngo_core::Snowflake;

use crate::dto::Directory;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Users referenced by a set of events: requesters, approvers and assignees
pub(crate) fn event_user_ids(events: &[Event]) -> Vec<Snowflake> {
    let ids: Vec<Snowflake> = events
        .iter()
        .flat_map(|e| {
            std::iter::once(e.requested_by)
                .chain(e.approved_by)
                .chain(e.assigned_volunteers.iter().copied())
        })
        .collect();
    dedup_ids(&ids)
}

pub(crate) fn donation_user_ids(donations: &[Donation]) -> Vec<Snowflake> {
    let ids: Vec<Snowflake> = donations
        .iter()
        .flat_map(|d| std::iter::once(d.donor_id).chain(d.verified_by))
        .collect();
    dedup_ids(&ids)
}

pub(crate) async fn with_users(
    ctx: &ServiceContext,
    directory: Directory,
    ids: &[Snowflake],
) -> ServiceResult<Directory> {
    if ids.is_empty() {
        return Ok(directory);
    }
    let users = ctx.user_repo().find_by_ids(ids).await?;
    Ok(directory.with_users(users))
}

pub(crate) async fn for_events(ctx: &ServiceContext, events: &[Event]) -> ServiceResult<Directory> {
    with_users(ctx, Directory::new(), &event_user_ids(events)).await
}

pub(crate) async fn for_donations(
    ctx: &ServiceContext,
    donations: &[Donation],
) -> ServiceResult<Directory> {
    with_users(ctx, Directory::new(), &donation_user_ids(donations)).await
}

/// Requesters of `events` and donors of `donations`
pub(crate) async fn for_recent(
    ctx: &ServiceContext,
    events: &[Event],
    donations: &[Donation],
) -> ServiceResult<Directory> {
    let ids: Vec<Snowflake> = events
        .iter()
        .map(|e| e.requested_by)
        .chain(donations.iter().map(|d| d.donor_id))
        .collect();
    with_users(ctx, Directory::new(), &dedup_ids(&ids)).await
}

/// Events referenced by participations, without their users
pub(crate) async fn for_participations(
    ctx: &ServiceContext,
    participations: &[Participation],
) -> ServiceResult<Directory> {
    let ids: Vec<Snowflake> = participations.iter().map(|p| p.event_id).collect();
    let ids = dedup_ids(&ids);
    if ids.is_empty() {
        return Ok(Directory::new());
    }
    let events = ctx.event_repo().find_by_ids(&ids).await?;
    Ok(Directory::new().with_events(events))
}
