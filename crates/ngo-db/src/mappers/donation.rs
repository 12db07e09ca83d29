//! Donation entity <-> model mapper

use ngo_core::{
    Donation, DonationKind, DonationType, DomainError, Snowflake, DEFAULT_UNIT,
};

use crate::models::DonationModel;

use super::decode_enum;

impl TryFrom<DonationModel> for Donation {
    type Error = DomainError;

    fn try_from(model: DonationModel) -> Result<Self, Self::Error> {
        let kind = match decode_enum::<DonationType>(&model.donation_type)? {
            DonationType::Monetary => DonationKind::Monetary {
                amount: model.amount.ok_or_else(|| corrupt(model.id, "amount"))?,
            },
            DonationType::Physical => DonationKind::Physical {
                category: model.category.ok_or_else(|| corrupt(model.id, "category"))?,
                quantity: model.quantity.ok_or_else(|| corrupt(model.id, "quantity"))?,
                unit: model.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            },
        };

        Ok(Donation {
            id: Snowflake::new(model.id),
            donor_id: Snowflake::new(model.donor_id),
            kind,
            currency: model.currency,
            description: model.description,
            purpose: model.purpose,
            transaction_ref: model.transaction_ref,
            dropoff_details: model.dropoff_details,
            status: decode_enum(&model.status)?,
            verified_by: model.verified_by.map(Snowflake::new),
            verified_at: model.verified_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn corrupt(id: i64, column: &str) -> DomainError {
    DomainError::DatabaseError(format!("donation {id} is missing {column}"))
}

/// Shape-specific columns of a donation, flattened for binding
pub struct DonationColumns<'a> {
    pub donation_type: &'static str,
    pub amount: Option<f64>,
    pub category: Option<&'a str>,
    pub quantity: Option<i32>,
    pub unit: Option<&'a str>,
}

impl<'a> DonationColumns<'a> {
    pub fn new(donation: &'a Donation) -> Self {
        match &donation.kind {
            DonationKind::Monetary { amount } => Self {
                donation_type: DonationType::Monetary.as_str(),
                amount: Some(*amount),
                category: None,
                quantity: None,
                unit: None,
            },
            DonationKind::Physical {
                category,
                quantity,
                unit,
            } => Self {
                donation_type: DonationType::Physical.as_str(),
                amount: None,
                category: Some(category),
                quantity: Some(*quantity),
                unit: Some(unit),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ngo_core::DonationStatus;

    fn model() -> DonationModel {
        DonationModel {
            id: 1,
            donor_id: 2,
            donation_type: "physical".into(),
            amount: None,
            currency: "NPR".into(),
            category: Some("books".into()),
            quantity: Some(30),
            unit: None,
            description: None,
            purpose: None,
            transaction_ref: None,
            dropoff_details: None,
            status: "verified".into(),
            verified_by: Some(9),
            verified_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_physical_row_defaults_unit() {
        let donation = Donation::try_from(model()).unwrap();
        assert_eq!(donation.status, DonationStatus::Verified);
        assert_eq!(
            donation.kind,
            DonationKind::Physical {
                category: "books".into(),
                quantity: 30,
                unit: DEFAULT_UNIT.into(),
            }
        );
    }

    #[test]
    fn test_monetary_row_without_amount_is_rejected() {
        let mut m = model();
        m.donation_type = "monetary".into();
        assert!(matches!(
            Donation::try_from(m),
            Err(DomainError::DatabaseError(_))
        ));
    }

    #[test]
    fn test_columns_flatten_monetary() {
        let donation = Donation::new(
            Snowflake::new(1),
            Snowflake::new(2),
            DonationKind::monetary(99.5).unwrap(),
            ngo_core::DonationNotes::default(),
        );
        let cols = DonationColumns::new(&donation);
        assert_eq!(cols.donation_type, "monetary");
        assert_eq!(cols.amount, Some(99.5));
        assert!(cols.category.is_none());
        assert!(cols.unit.is_none());
    }
}
