use crate::config::init::AppState;
use crate::model::session::Session;
use crate::service::forms::{CommentForm, PostForm};
use crate::types::{error_response::ErrorResponse, links::ResponseResult, response::Response};
use axum::{
    extract::{Extension, Json, Path, State},
    response::IntoResponse,
};
use validator::Validate;

pub async fn list(State(state): State<AppState>) -> ResponseResult {
    let posts = state.posts.get_all().await?;
    Ok(Response::from(posts).into_response())
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ResponseResult {
    let posts = state.posts.get_post_by_category(&category).await?;
    Ok(Response::from(posts).into_response())
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ResponseResult {
    let posts = state.posts.get_posts_by_user_id(&username).await?;
    Ok(Response::from(posts).into_response())
}

pub async fn new_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(form): Json<PostForm>,
) -> ResponseResult {
    form.validate()?;
    let post = state.posts.add_post(form.into_draft(), session.user).await?;
    Ok(Response::created(post).into_response())
}

pub async fn get_post(State(state): State<AppState>, Path(post_id): Path<String>) -> ResponseResult {
    let post = state.posts.get_post_by_id(&post_id).await?;
    Ok(Response::from(post).into_response())
}

pub async fn new_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<String>,
    Json(form): Json<CommentForm>,
) -> ResponseResult {
    form.validate()?;
    let post = state.posts.add_comment(form.body, session.user, &post_id).await?;
    Ok(Response::created(post).into_response())
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> ResponseResult {
    let post = state
        .posts
        .delete_comment(&session.user.id, &post_id, &comment_id)
        .await?;
    Ok(Response::from(post).into_response())
}

/// `upvote`, `downvote` and `unvote` share one path segment.
pub async fn vote(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((post_id, action)): Path<(String, String)>,
) -> ResponseResult {
    let user_id = session.user.id.as_str();
    let post = match action.as_str() {
        "upvote" => state.posts.up_vote(&post_id, user_id).await?,
        "downvote" => state.posts.down_vote(&post_id, user_id).await?,
        "unvote" => state.posts.un_vote(&post_id, user_id).await?,
        _ => return Err(ErrorResponse::not_found_with_str("unknown vote action")),
    };
    Ok(Response::from(post).into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<String>,
) -> ResponseResult {
    if state.posts.delete_post(&session.user.id, &post_id).await? {
        return Ok(Response::from_msg("success").into_response());
    }
    Err(ErrorResponse::unprocessable_with_str("fail"))
}
