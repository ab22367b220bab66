use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use kissorslap_shared::ChatId;
use kissorslap_store::{ChatSummary, Message};

use super::AppState;
use crate::error::ServerError;

const DEFAULT_PAGE: u32 = 50;
const MAX_PAGE: u32 = 200;

pub(super) async fn list_chats(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatSummary>>, ServerError> {
    let user = state.current_user(&headers).await?;
    let chats = state.with_db(move |db| db.list_chats(user.id)).await?;
    Ok(Json(chats))
}

#[derive(Deserialize)]
pub(super) struct MessagesQuery {
    limit: Option<u32>,
    /// Only messages with a smaller `seq`.
    before: Option<i64>,
}

pub(super) async fn list_messages(
    headers: HeaderMap,
    State(state): State<AppState>,
    chat: Result<Path<ChatId>, PathRejection>,
    query: Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<Vec<Message>>, ServerError> {
    let user = state.current_user(&headers).await?;
    let Path(chat) = chat?;
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);

    let messages = state
        .with_db(move |db| db.list_messages(chat, user.id, limit, query.before))
        .await?;
    Ok(Json(messages))
}

#[derive(Deserialize)]
pub(super) struct SendRequest {
    content: String,
}

pub(super) async fn send_message(
    headers: HeaderMap,
    State(state): State<AppState>,
    chat: Result<Path<ChatId>, PathRejection>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<Message>, ServerError> {
    let user = state.current_user(&headers).await?;
    let Path(chat) = chat?;
    let Json(req) = payload?;

    let message = state
        .with_db(move |db| db.append_message(chat, user.id, &req.content))
        .await?;
    Ok(Json(message))
}
