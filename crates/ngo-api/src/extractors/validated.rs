//! Validated JSON extractor and query string decoding
//!
//! Bad input is reported as field errors, so a client sees
//! `{ "errors": [{ "field", "message" }] }` rather than serde's own text.

use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Query, Request},
    http::Uri,
    Json,
};
use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::response::ApiError;

const INVALID_VALUE: &str = "Invalid value";

/// Append a message under `field`
pub(crate) fn push_field_error(
    errors: &mut ValidationErrors,
    field: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
) {
    let error = ValidationError::new("invalid").with_message(message.into());
    let entry = errors
        .errors_mut()
        .entry(field.into())
        .or_insert_with(|| ValidationErrorsKind::Field(Vec::new()));
    if let ValidationErrorsKind::Field(list) = entry {
        list.push(error);
    }
}

/// Validated JSON extractor
///
/// Extracts a JSON body and validates it using the `validator` crate.
/// The inner type must implement both `Deserialize` and `Validate`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|e| match e {
                JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::BytesRejection(e) => ApiError::invalid_body(e.body_text()),
                _ => ApiError::invalid_body("Invalid JSON body"),
            })?;

        let value: T = serde_path_to_error::deserialize(raw).map_err(|e| {
            match top_level_field(e.path()) {
                Some(field) => {
                    let mut errors = ValidationErrors::new();
                    push_field_error(&mut errors, field, INVALID_VALUE);
                    ApiError::Validation(errors)
                }
                None => ApiError::invalid_body("Invalid JSON body"),
            }
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Name of the body property a decode error happened under
fn top_level_field(path: &serde_path_to_error::Path) -> Option<String> {
    match path.iter().next()? {
        Segment::Map { key } => Some(key.clone()),
        _ => None,
    }
}

/// Decode `T` from the query string. On failure each `key=value` pair is
/// retried alone to find the parameters that were rejected.
pub(crate) fn decode_query<T: DeserializeOwned>(uri: &Uri) -> Result<T, ValidationErrors> {
    if let Ok(Query(value)) = Query::<T>::try_from_uri(uri) {
        return Ok(value);
    }

    let mut errors = ValidationErrors::new();
    let pairs = uri.query().unwrap_or_default().split('&').filter(|p| !p.is_empty());
    for pair in pairs {
        let Ok(single) = format!("/?{pair}").parse::<Uri>() else {
            continue;
        };
        if Query::<T>::try_from_uri(&single).is_ok() {
            continue;
        }
        if let Ok(Query(decoded)) = Query::<Vec<(String, String)>>::try_from_uri(&single) {
            for (key, _) in decoded {
                push_field_error(&mut errors, key, INVALID_VALUE);
            }
        }
    }

    if errors.is_empty() {
        push_field_error(&mut errors, "query", INVALID_VALUE);
    }
    Err(errors)
}
