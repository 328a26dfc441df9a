use super::error_response::ErrorResponse;

pub type ResponseResult = Result<axum::response::Response, ErrorResponse>;
