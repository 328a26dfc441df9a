use super::error::Error;
use crate::json_map;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
    Json,
};
use std::fmt::{Display, Formatter};
use validator::ValidationErrors;

/// A failed request as the client sees it: a status and a JSON body.
#[derive(Debug)]
pub struct ErrorResponse {
    status: StatusCode,
    body: serde_json::Value,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: serde_json::Value::Object(json_map!("message" => message)),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn not_found_with_str(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized_with_str(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden_with_str(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn unprocessable_with_str(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn server_error_default() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> AxumResponse {
        (self.status, Json(self.body)).into_response()
    }
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.body)
    }
}

impl From<Error> for ErrorResponse {
    fn from(e: Error) -> Self {
        let message = e.to_string();
        match e {
            Error::NoPost | Error::NoComment => Self::not_found_with_str(&message),
            Error::NoAccess => Self::forbidden_with_str(&message),
            Error::NoUser | Error::BadPass | Error::NoAuth => Self::unauthorized_with_str(&message),
            Error::AlreadyExist => Self::unprocessable_with_str(&message),
            Error::Store(cause) => {
                tracing::error!("store failure: {:#}", cause);
                Self::server_error_default()
            }
        }
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(e: ValidationErrors) -> Self {
        let errors = crate::service::forms::from_validation_errors(e);
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: serde_json::Value::Object(json_map!("errors" => errors)),
        }
    }
}
