use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::error::Error;

use super::{LOGIN_PATH, pages};

/// Error returned by JSON endpoints as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Error returned by browser facing routes as an HTML page.
#[derive(Debug)]
pub struct PageError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

fn status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        Error::ConstraintViolation(_) => StatusCode::CONFLICT,
        Error::Unauthorized(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            Error::StorageFailure(report) => {
                log::error!("Storage failure: {report:#}");
                "internal server error".to_string()
            }
            err => err.to_string(),
        };
        (status(&self.0), Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::NotFound(_) => {
                (StatusCode::NOT_FOUND, Html(pages::NOT_FOUND_PAGE)).into_response()
            }
            Error::Unauthorized(_) => Redirect::to(LOGIN_PATH).into_response(),
            Error::StorageFailure(report) => {
                log::error!("Storage failure: {report:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::ERROR_PAGE)).into_response()
            }
            err => (status(&err), Html(pages::ERROR_PAGE)).into_response(),
        }
    }
}
