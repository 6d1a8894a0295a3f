//! Handlers for `/messages` endpoints.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use nestmate_core::{
  gate::ConversationPage,
  message::{Message, MessageBody},
  store::{Directory, MatchStore, MessageStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const DEFAULT_PAGE_SIZE: usize = 20;

// ─── Send ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub conversation_id: Uuid,
  pub sender_id:       Uuid,
  pub text:            Option<String>,
  pub attachment_url:  Option<String>,
}

/// `POST /messages` — body:
/// `{"conversation_id":"...","sender_id":"...","text":"..."}`
pub async fn send<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SendBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let message = state
    .gate
    .send(
      body.conversation_id,
      body.sender_id,
      MessageBody { text: body.text, attachment_url: body.attachment_url },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(message)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub conversation_id: Uuid,
  pub requester_id:    Uuid,
  pub page:            Option<usize>,
  pub page_size:       Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
  pub page:       usize,
  pub page_size:  usize,
  pub total:      u64,
  pub page_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub messages:   Vec<Message>,
  pub pagination: Pagination,
}

impl From<ConversationPage> for ListResponse {
  fn from(page: ConversationPage) -> Self {
    let pagination = Pagination {
      page:       page.page,
      page_size:  page.page_size,
      total:      page.total,
      page_count: page.page_count(),
    };
    Self { messages: page.messages, pagination }
  }
}

/// `GET /messages?conversation_id=<id>&requester_id=<id>[&page=1][&page_size=20]`
///
/// Messages arrive oldest-first; page 1 is the most recent end of the
/// conversation.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  let page = state
    .gate
    .list_conversation(
      params.conversation_id,
      params.requester_id,
      params.page.unwrap_or(1),
      params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
  Ok(Json(page.into()))
}

// ─── Read receipts ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
  pub conversation_id: Uuid,
  pub user_id:         Uuid,
  pub message_ids:     Vec<Uuid>,
}

/// `POST /messages/read` — body:
/// `{"conversation_id":"...","user_id":"...","message_ids":[...]}`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<MarkReadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  state
    .gate
    .mark_read(body.conversation_id, body.user_id, body.message_ids)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
