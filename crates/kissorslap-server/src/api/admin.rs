//! Operator endpoints: the payment on-ramp's point credit and score edits.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::info;

use kissorslap_store::User;

use super::points::BalanceResponse;
use super::AppState;
use crate::config::ServerConfig;
use crate::error::ServerError;

fn verify_admin_token(headers: &HeaderMap, config: &ServerConfig) -> Result<(), ServerError> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Err(ServerError::Forbidden(
            "Admin API is disabled (no ADMIN_TOKEN configured)".into(),
        ));
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    // ct_eq on slices of different length is already false.
    if token.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() != 1 {
        return Err(ServerError::Forbidden("Invalid admin token".into()));
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreditRequest {
    outside_id: String,
    points: i64,
}

pub(super) async fn credit_points(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<CreditRequest>, JsonRejection>,
) -> Result<Json<BalanceResponse>, ServerError> {
    verify_admin_token(&headers, &state.config)?;
    let Json(CreditRequest { outside_id, points }) = payload?;

    let (user, balance) = state
        .with_db(move |db| {
            let user = db.get_user_by_outside_id(&outside_id)?;
            Ok((user.id, db.credit_points(user.id, points)?))
        })
        .await?;

    info!(user = %user, credited = points, balance, "Admin credited points");
    Ok(Json(BalanceResponse { points: balance }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AdjustScoresRequest {
    outside_id: String,
    #[serde(default)]
    hot_delta: i64,
    #[serde(default)]
    karma_delta: i64,
}

pub(super) async fn adjust_scores(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<AdjustScoresRequest>, JsonRejection>,
) -> Result<Json<User>, ServerError> {
    verify_admin_token(&headers, &state.config)?;
    let Json(req) = payload?;

    let user = state
        .with_db(move |db| {
            let user = db.get_user_by_outside_id(&req.outside_id)?;
            db.adjust_scores(user.id, req.hot_delta, req.karma_delta)
        })
        .await?;

    info!(
        user = %user.id,
        hot = user.hot_score,
        karma = user.karma_score,
        "Admin adjusted scores"
    );
    Ok(Json(user))
}
