//! Handlers for the like flow and `/matches` endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use nestmate_core::{
  Error,
  record::{LikeOutcome, MatchRecord},
  store::{Directory, MatchStore, MessageStore},
  transition::StatusRequest,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Like ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LikeBody {
  pub liker_id: Uuid,
  pub liked_id: Uuid,
}

/// `POST /likes` — body: `{"liker_id":"...","liked_id":"..."}`
///
/// Returns the outcome-tagged record: `pending`, `matched`, or
/// `already_matched`.
pub async fn like<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LikeBody>,
) -> Result<Json<LikeOutcome>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let outcome = state.engine.like(body.liker_id, body.liked_id).await?;
  Ok(Json(outcome))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id: Uuid,
}

/// A match record annotated with the counterpart of the requesting user —
/// the conversation-list view never cares which side initiated.
#[derive(Debug, Serialize)]
pub struct MatchSummary {
  #[serde(flatten)]
  pub record:     MatchRecord,
  pub other_user: Uuid,
}

/// `GET /matches?user_id=<id>` — matched records, most recent activity
/// first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MatchSummary>>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let records = state
    .store
    .list_matched_for(params.user_id)
    .await
    .map_err(Error::store)?;

  let summaries = records
    .into_iter()
    .filter_map(|record| {
      let other_user = record.other_participant(params.user_id)?;
      Some(MatchSummary { record, other_user })
    })
    .collect();

  Ok(Json(summaries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /matches/{id}?user_id=<id>` — 403 unless the requester is a
/// participant.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<MatchRecord>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let record = state
    .store
    .get_match(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| ApiError::NotFound(format!("match {id} not found")))?;

  if !record.is_participant(params.user_id) {
    return Err(
      Error::NotAParticipant { user: params.user_id, match_id: id }.into(),
    );
  }

  Ok(Json(record))
}

// ─── Status change ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
  pub acting_user_id: Uuid,
  pub status:         StatusRequest,
}

/// `PUT /matches/{id}/status` — body:
/// `{"acting_user_id":"...","status":"unmatched"|"blocked"}`
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SetStatusBody>,
) -> Result<Json<MatchRecord>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let record = state
    .engine
    .set_status(id, body.acting_user_id, body.status)
    .await?;
  Ok(Json(record))
}
