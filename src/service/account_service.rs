use crate::config::init::AppState;
use crate::service::forms::CredentialsForm;
use crate::types::{links::ResponseResult, response::Response};
use crate::json_map;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use validator::Validate;

pub async fn register(State(state): State<AppState>, Json(form): Json<CredentialsForm>) -> ResponseResult {
    form.validate()?;
    let user = state.users.register(&form.username, &form.password).await?;
    let token = state.sessions.create_new_session(&user.to_ref()).await?;
    Ok(Response::from(json_map!("token" => token)).into_response())
}

pub async fn login(State(state): State<AppState>, Json(form): Json<CredentialsForm>) -> ResponseResult {
    form.validate()?;
    let user = state.users.login(&form.username, &form.password).await?;
    let token = state.sessions.create_new_session(&user.to_ref()).await?;
    tracing::info!(user = %user.username, "logged in");
    Ok(Response::from(json_map!("token" => token)).into_response())
}
