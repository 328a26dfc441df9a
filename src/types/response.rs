use axum::{
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
    Json as AxumJson,
};
use serde::Serialize;

/// Successful reply: a status code and a JSON payload.
#[derive(Debug)]
pub struct Response<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T> Response<T>
where
    T: Serialize,
{
    pub fn from(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl Response<serde_json::Value> {
    pub fn from_msg(msg: &str) -> Self {
        Self::from(serde_json::Value::Object(crate::json_map!("message" => msg)))
    }
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> AxumResponse {
        (self.status, AxumJson(self.data)).into_response()
    }
}
