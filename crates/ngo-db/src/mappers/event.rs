//! Event entity <-> model mapper

use ngo_core::{DomainError, Event, Snowflake};

use crate::models::EventModel;

use super::decode_enum;

impl TryFrom<EventModel> for Event {
    type Error = DomainError;

    fn try_from(model: EventModel) -> Result<Self, Self::Error> {
        Ok(Event {
            id: Snowflake::new(model.id),
            title: model.title,
            description: model.description,
            event_type: decode_enum(&model.event_type)?,
            date: model.date,
            location: model.location,
            target_audience: model.target_audience,
            number_of_students: model.number_of_students,
            status: decode_enum(&model.status)?,
            requested_by: Snowflake::new(model.requested_by),
            approved_by: model.approved_by.map(Snowflake::new),
            assigned_volunteers: model
                .assigned_volunteers
                .into_iter()
                .map(Snowflake::new)
                .collect(),
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Raw ids for a `BIGINT[]` bind
pub fn ids_to_i64(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}
