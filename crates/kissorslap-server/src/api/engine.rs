//! Candidate stack and action submission.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kissorslap_shared::{Action, ChatId, InteractionId, Side, UserId};
use kissorslap_store::{Candidate, Interaction, InteractionHistoryEntry};

use super::AppState;
use crate::error::ServerError;

#[derive(Deserialize)]
pub(super) struct CandidatesQuery {
    limit: Option<u32>,
}

pub(super) async fn list_candidates(
    headers: HeaderMap,
    State(state): State<AppState>,
    query: Result<Query<CandidatesQuery>, QueryRejection>,
) -> Result<Json<Vec<Candidate>>, ServerError> {
    let viewer = state.current_user(&headers).await?;
    let Query(query) = query?;
    let cap = state.config.candidate_limit;
    let limit = query.limit.unwrap_or(cap).clamp(1, cap.max(1));

    let candidates = state
        .with_db(move |db| db.list_candidates(viewer.id, limit))
        .await?;
    Ok(Json(candidates))
}

#[derive(Serialize)]
pub(super) struct PassResponse {
    seen: bool,
}

pub(super) async fn pass_candidate(
    headers: HeaderMap,
    State(state): State<AppState>,
    target: Result<Path<UserId>, PathRejection>,
) -> Result<Json<PassResponse>, ServerError> {
    let viewer = state.current_user(&headers).await?;
    let Path(target) = target?;

    state
        .with_db(move |db| db.mark_seen(viewer.id, target))
        .await?;
    debug!(user = %viewer.id, target = %target, "candidate passed");
    Ok(Json(PassResponse { seen: true }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitRequest {
    target_user_id: UserId,
    action: Action,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitResponse {
    /// `PENDING` until both sides have acted, then the terminal result.
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_id: Option<ChatId>,
    new_points: i64,
    interaction_id: InteractionId,
    side: Side,
}

pub(super) async fn submit_interaction(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ServerError> {
    let actor = state.current_user(&headers).await?;
    let Json(req) = payload?;
    let fee = state.config.action_fee;

    let outcome = state
        .with_db(move |db| db.submit_action(actor.id, req.target_user_id, req.action, fee))
        .await?;

    Ok(Json(SubmitResponse {
        result: outcome.result.map_or("PENDING", |r| r.as_str()),
        chat_id: outcome.chat_id,
        new_points: outcome.new_points,
        interaction_id: outcome.interaction.id,
        side: outcome.side,
    }))
}

pub(super) async fn get_interaction(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<InteractionId>, PathRejection>,
) -> Result<Json<Interaction>, ServerError> {
    let viewer = state.current_user(&headers).await?;
    let Path(id) = id?;

    let interaction = state.with_db(move |db| db.get_interaction(id)).await?;
    // Non-participants get the same answer as for a missing record.
    if interaction.side_of(viewer.id).is_none() {
        return Err(ServerError::NotFound("interaction".into()));
    }
    Ok(Json(interaction.redacted_for(viewer.id)))
}

pub(super) async fn list_interactions(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<InteractionHistoryEntry>>, ServerError> {
    let viewer = state.current_user(&headers).await?;
    let history = state
        .with_db(move |db| db.list_interactions(viewer.id))
        .await?;
    Ok(Json(history))
}
