//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, list queries and ids.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::AuthUser;
pub use pagination::{ListQuery, NoFilters, Pagination, PaginationParams};
pub use path::IdPath;
pub use validated::ValidatedJson;
