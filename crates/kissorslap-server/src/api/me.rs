//! Own user, username and onboarding.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use kissorslap_store::{ProfileUpdate, User};

use super::AppState;
use crate::error::ServerError;

pub(super) async fn get_me(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(state.current_user(&headers).await?))
}

#[derive(Deserialize)]
pub(super) struct UsernameRequest {
    username: String,
}

pub(super) async fn set_username(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<User>, ServerError> {
    let user = state.current_user(&headers).await?;
    let Json(req) = payload?;

    let updated = state
        .with_db(move |db| db.set_username(user.id, &req.username))
        .await?;
    info!(user = %updated.id, username = ?updated.username, "username set");
    Ok(Json(updated))
}

pub(super) async fn update_profile(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<User>, ServerError> {
    let user = state.current_user(&headers).await?;
    let Json(update) = payload?;
    let today = Utc::now().date_naive();

    let updated = state
        .with_db(move |db| db.update_profile(user.id, &update, today))
        .await?;
    Ok(Json(updated))
}

pub(super) async fn complete_onboarding(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<User>, ServerError> {
    let user = state.current_user(&headers).await?;
    let updated = state
        .with_db(move |db| db.complete_onboarding(user.id))
        .await?;
    Ok(Json(updated))
}
