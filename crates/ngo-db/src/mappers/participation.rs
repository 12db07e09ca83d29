//! Participation entity <-> model mapper

use ngo_core::{DomainError, Participation, Snowflake};

use crate::models::ParticipationModel;

use super::decode_enum;

impl TryFrom<ParticipationModel> for Participation {
    type Error = DomainError;

    fn try_from(model: ParticipationModel) -> Result<Self, Self::Error> {
        Ok(Participation {
            id: Snowflake::new(model.id),
            volunteer_id: Snowflake::new(model.volunteer_id),
            event_id: Snowflake::new(model.event_id),
            status: decode_enum(&model.status)?,
            registered_at: model.registered_at,
            confirmed_at: model.confirmed_at,
            attended_at: model.attended_at,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
