//! Model to entity mappers
//!
//! - `TryFrom<Model> for Entity`: decode rows; enum columns are TEXT and an
//!   unknown value surfaces as `DomainError::DatabaseError`
//! - `*Columns` helpers: flatten entities for binding

mod donation;
mod event;
mod participation;
mod user;

use std::str::FromStr;

use ngo_core::{DomainError, UnknownVariant};

pub use donation::DonationColumns;
pub use event::ids_to_i64;

/// Parse a TEXT enum column
pub(crate) fn decode_enum<T>(raw: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.parse()
        .map_err(|e: UnknownVariant| DomainError::DatabaseError(e.to_string()))
}
