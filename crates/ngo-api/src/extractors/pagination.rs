//! List query extractor
//!
//! Reads typed filters plus `page` and `limit` from the query string. Out of
//! range or non-numeric values are field errors on `page` or `limit`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use ngo_core::PageRequest;
use serde::{de::DeserializeOwned, Deserialize};
use validator::ValidationErrors;

use super::validated::{decode_query, push_field_error};
use crate::response::ApiError;

const PAGE_MESSAGE: &str = "Page must be a positive integer";
const LIMIT_MESSAGE: &str = "Limit must be between 1 and 100";

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Validated page request. `page` defaults to 1 and `limit` to 20.
///
/// Decoded as part of [`ListQuery`].
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageRequest);

impl TryFrom<PaginationParams> for Pagination {
    type Error = ValidationErrors;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let page = match params.page.as_deref() {
            None => Some(PageRequest::DEFAULT_PAGE),
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|p| *p >= 1),
        };
        let limit = match params.limit.as_deref() {
            None => Some(PageRequest::DEFAULT_LIMIT),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=PageRequest::MAX_LIMIT).contains(l)),
        };

        let mut errors = ValidationErrors::new();
        if page.is_none() {
            push_field_error(&mut errors, "page", PAGE_MESSAGE);
        }
        if limit.is_none() {
            push_field_error(&mut errors, "limit", LIMIT_MESSAGE);
        }

        match (page, limit) {
            (Some(page), Some(limit)) => PageRequest::new(page, limit).map(Pagination).map_err(|e| {
                let mut errors = ValidationErrors::new();
                push_field_error(&mut errors, "page", e.to_string());
                errors
            }),
            _ => Err(errors),
        }
    }
}

/// Placeholder for list routes without filters
#[derive(Debug, Default, Deserialize)]
pub struct NoFilters {}

/// Filters and page of a list route, decoded together so a request with
/// both a bad filter and a bad limit reports both.
///
/// Handlers take `Result<ListQuery<F>, ApiError>` and unwrap it after the
/// role check, so a caller outside the allow-list always gets 403.
#[derive(Debug)]
pub struct ListQuery<F = NoFilters> {
    pub filters: F,
    pub page: PageRequest,
}

#[async_trait]
impl<S, F> FromRequestParts<S> for ListQuery<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let filters = decode_query::<F>(&parts.uri);
        let page = decode_query::<PaginationParams>(&parts.uri).and_then(Pagination::try_from);

        match (filters, page) {
            (Ok(filters), Ok(Pagination(page))) => Ok(ListQuery { filters, page }),
            (Err(mut errors), Err(more)) => {
                errors.errors_mut().extend(more.into_errors());
                Err(ApiError::Validation(errors))
            }
            (Err(errors), _) | (_, Err(errors)) => Err(ApiError::Validation(errors)),
        }
    }
}
