use crate::types::error_response::ErrorResponse;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Turns a panicking handler into a plain 500.
pub fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "<unknown>".into()
    };
    tracing::error!("handler panicked: {}", detail);
    ErrorResponse::server_error_default().into_response()
}
