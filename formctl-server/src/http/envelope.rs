//! Uniform JSON response envelope
//!
//! Every response body, success or failure, has the shape
//! `{status, statusCode, data, message}` where `data` is always a list.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Response body wrapper. `status_code` doubles as the HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: bool,
    pub status_code: u16,
    pub data: Vec<T>,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn success(code: StatusCode, message: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            status: true,
            status_code: code.as_u16(),
            data,
            message: message.into(),
        }
    }

    /// 200 with data
    pub fn ok(message: impl Into<String>, data: Vec<T>) -> Self {
        Self::success(StatusCode::OK, message, data)
    }

    /// 201 with data
    pub fn created(message: impl Into<String>, data: Vec<T>) -> Self {
        Self::success(StatusCode::CREATED, message, data)
    }

    /// Error envelope; `data` is always empty.
    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: false,
            status_code: code.as_u16(),
            data: Vec::new(),
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, Json(self)).into_response()
    }
}
