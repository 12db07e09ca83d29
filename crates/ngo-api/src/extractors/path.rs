//! Path parameter extractor
//!
//! Parses the single id segment of a route such as `/events/:eventId/register`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use ngo_core::Snowflake;

use crate::response::ApiError;

/// The route's one path parameter, parsed as a Snowflake
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

fn parse_param(params: &[(String, String)]) -> Result<Snowflake, ApiError> {
    match params {
        [(name, value)] => value
            .parse()
            .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format"))),
        _ => Err(ApiError::invalid_path("Expected a single id in the path")),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        parse_param(&params).map(IdPath)
    }
}
