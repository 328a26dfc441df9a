use super::init::AppState;
use crate::{
    middleware::{auth_login::auth_login, panic::catch_panic, token_decode::token_decode},
    service::{account_service, post_service},
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(account_service::register))
        .route("/login", post(account_service::login))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/", get(post_service::list))
        .route(
            "/posts",
            post(post_service::new_post).route_layer(from_fn(auth_login)),
        )
        .route("/posts/:category", get(post_service::list_by_category))
        .route(
            "/post/:post_id",
            get(post_service::get_post).merge(
                post(post_service::new_comment)
                    .delete(post_service::delete_post)
                    .route_layer(from_fn(auth_login)),
            ),
        )
        // the second segment is a vote action on GET and a comment id on DELETE
        .route(
            "/post/:post_id/:target",
            get(post_service::vote)
                .merge(delete(post_service::delete_comment))
                .route_layer(from_fn(auth_login)),
        )
        .route("/user/:username", get(post_service::list_by_user))
}

pub fn config_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api", Router::new().merge(account_routes()).merge(post_routes()))
        .layer(from_fn_with_state(state.clone(), token_decode))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(catch_panic))
        .with_state(state)
}
