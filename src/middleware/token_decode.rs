use crate::config::init::AppState;
use crate::constants;
use crate::types::error_response::ErrorResponse;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Resolves a `Bearer` token into a `Session` request extension. Requests
/// without a valid session pass through untouched; `auth_login` decides
/// whether that is acceptable. A session lookup that fails for
/// infrastructure reasons ends the request with a 500.
pub async fn token_decode(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(constants::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    if let Some(token) = token {
        match state.sessions.get_session(&token).await {
            Ok(session) => {
                req.extensions_mut().insert(session);
            }
            Err(e) if e.is_business() => tracing::debug!("request token rejected: {}", e),
            Err(e) => return ErrorResponse::from(e).into_response(),
        }
    }
    next.run(req).await
}

fn bearer_token(header: &str) -> Option<&str> {
    let token = constants::BEARER_PREFIXES
        .iter()
        .find_map(|prefix| header.strip_prefix(prefix))?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn either_case_of_the_scheme_is_accepted() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc.def "), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }
}
