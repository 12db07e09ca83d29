//! User entity <-> model mapper

use ngo_core::{DomainError, Snowflake, User};

use crate::models::UserModel;

use super::decode_enum;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: Snowflake::new(model.id),
            name: model.name,
            email: model.email,
            role: decode_enum(&model.role)?,
            is_active: model.is_active,
            school_name: model.school_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ngo_core::Role;

    fn model(role: &str) -> UserModel {
        UserModel {
            id: 7,
            name: "Sita".into(),
            email: "sita@example.org".into(),
            role: role.into(),
            is_active: true,
            school_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_role() {
        let user = User::try_from(model("volunteer")).unwrap();
        assert_eq!(user.role, Role::Volunteer);
        assert_eq!(user.id, Snowflake::new(7));
    }

    #[test]
    fn test_unknown_role_is_database_error() {
        let err = User::try_from(model("moderator")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
