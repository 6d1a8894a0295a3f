//! Handlers for `/users` endpoints.
//!
//! Identities are thin envelopes; profile content lives in an external
//! system. This surface exists so deployments (and tests) can register the
//! ids that the like flow validates against.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use nestmate_core::{
  identity::Identity,
  store::{Directory, MatchStore, MessageStore, StoreError as _},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  /// Optional caller-supplied id, for deployments where the profile system
  /// mints ids.
  pub user_id: Option<Uuid>,
}

/// `POST /users` — body: `{}` or `{"user_id":"..."}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Option<Json<CreateBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let requested = body.and_then(|Json(b)| b.user_id);

  let result = match requested {
    Some(id) => state.store.add_user_with_id(id).await,
    None => state.store.add_user().await,
  };

  let identity = result.map_err(|e| {
    if e.is_duplicate() {
      ApiError::Conflict("user id already registered".into())
    } else {
      ApiError::Core(nestmate_core::Error::store(e))
    }
  })?;

  Ok((StatusCode::CREATED, Json(identity)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Identity>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let identity = state
    .store
    .get_user(id)
    .await
    .map_err(nestmate_core::Error::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(identity))
}
