//! Custom Axum extractors
//!
//! Both report failures as envelope errors instead of axum's plain-text
//! rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;

use crate::models::ValidationError;
use super::error::ApiError;

/// JSON body extractor with envelope-shaped rejections
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}

/// Respondent id from the path, kept as the raw string.
///
/// Not parsed as a UUID here: a malformed id is reported as "not found"
/// by the repository, same as a well-formed id with no respondent.
pub struct RespondentIdParam(pub String);

impl<S> FromRequestParts<S> for RespondentIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "respondentId" }))?;

        if id.trim().is_empty() {
            return Err(ApiError::Validation(ValidationError::Empty {
                field: "respondentId",
            }));
        }

        Ok(Self(id))
    }
}
