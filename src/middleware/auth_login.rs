use crate::model::session::Session;
use crate::types::error_response::ErrorResponse;
use axum::{extract::Request, middleware::Next, response::Response};

pub async fn auth_login(req: Request, next: Next) -> Result<Response, ErrorResponse> {
    if req.extensions().get::<Session>().is_none() {
        return Err(ErrorResponse::unauthorized_with_str("no session found"));
    }
    Ok(next.run(req).await)
}
