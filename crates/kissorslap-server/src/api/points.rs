//! Leaderboard and the user-facing side of the point ledger.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use kissorslap_store::LeaderboardPage;

use super::AppState;
use crate::error::ServerError;

#[derive(Deserialize)]
pub(super) struct LeaderboardQuery {
    page: Option<u32>,
}

pub(super) async fn leaderboard(
    headers: HeaderMap,
    State(state): State<AppState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<LeaderboardPage>, ServerError> {
    let viewer = state.current_user(&headers).await?;
    let Query(query) = query?;
    let page = query.page.unwrap_or(1);
    let page_size = state.config.leaderboard_page_size;

    let board = state
        .with_db(move |db| db.leaderboard(viewer.id, page, page_size))
        .await?;
    Ok(Json(board))
}

#[derive(Deserialize)]
pub(super) struct WithdrawRequest {
    amount: i64,
}

#[derive(Serialize)]
pub(super) struct BalanceResponse {
    pub(super) points: i64,
}

pub(super) async fn withdraw(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let user = state.current_user(&headers).await?;
    let Json(req) = payload?;

    let points = state
        .with_db(move |db| db.withdraw_points(user.id, req.amount))
        .await?;
    Ok(Json(BalanceResponse { points }))
}
