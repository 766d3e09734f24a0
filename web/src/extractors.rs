//! Custom Axum extractors.
//!
//! - `BearerToken`: the credential from `Authorization: Bearer <token>`
//! - `JsonBody`: a JSON body whose rejections render as a 400 envelope
//! - `QueryParams`: a query string whose rejections render as a 400 envelope
//!
//! # Examples
//!
//! ```ignore
//! use event_manager_web::extractors::{BearerToken, JsonBody, QueryParams};
//!
//! async fn handler(
//!     token: BearerToken,
//!     JsonBody(draft): JsonBody<EventDraft>,
//! ) -> Result<Json<Event>, AppError> {
//!     ...
//! }
//! ```

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing, uses another scheme, or
/// carries an empty token. Whether the token is *valid* is for the identity
/// provider to decide.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Authentication credentials were not provided"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// JSON request body.
///
/// Same as [`axum::Json`], except that a missing content type, malformed JSON
/// or a body that does not match `T` is reported through [`AppError`] as a
/// 400 with the usual envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}

/// Query string parameters.
///
/// Same as [`axum::extract::Query`], except that a query string that does
/// not deserialize into `T` is reported through [`AppError`] as a 400 with
/// the usual envelope.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}
