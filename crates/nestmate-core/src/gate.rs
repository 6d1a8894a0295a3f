//! [`ConversationGate`] — admits message traffic only for participants of a
//! `matched` record.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::Clock,
  event::{DomainEvent, EventSink},
  message::{Message, MessageBody},
  record::{MatchRecord, MatchStatus},
  store::{MatchStore, MessageStore},
};

/// Attempts at the recency-marker update before the send is failed. The
/// update is monotone, so a retry after a transient store error is safe.
const TOUCH_RETRIES: u32 = 3;

/// One page of a conversation, oldest-first, plus the totals the caller
/// needs to paginate.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationPage {
  pub messages:  Vec<Message>,
  pub page:      usize,
  pub page_size: usize,
  pub total:     u64,
}

impl ConversationPage {
  pub fn page_count(&self) -> u64 {
    self.total.div_ceil(self.page_size as u64)
  }
}

/// Gates message sends and reads on the match state.
pub struct ConversationGate<S> {
  store:  Arc<S>,
  clock:  Arc<dyn Clock>,
  events: Arc<dyn EventSink>,
}

// Derived `Clone` would demand `S: Clone`; the fields are all handles.
impl<S> Clone for ConversationGate<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      clock:  self.clock.clone(),
      events: self.events.clone(),
    }
  }
}

impl<S> ConversationGate<S>
where
  S: MatchStore + MessageStore,
{
  pub fn new(
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    Self { store, clock, events }
  }

  /// True iff the record exists, is `matched`, and `user` is a participant.
  pub async fn can_exchange(&self, match_id: Uuid, user: Uuid) -> Result<bool> {
    let record = self.store.get_match(match_id).await.map_err(Error::store)?;
    Ok(match record {
      Some(r) => r.status == MatchStatus::Matched && r.is_participant(user),
      None => false,
    })
  }

  /// The gated lookup behind every operation here: the conversation for
  /// `match_id`, or `NotExchangeable` if `user` may not exchange in it.
  async fn open_conversation(
    &self,
    match_id: Uuid,
    user: Uuid,
  ) -> Result<MatchRecord> {
    self
      .store
      .get_match(match_id)
      .await
      .map_err(Error::store)?
      .filter(|r| r.status == MatchStatus::Matched && r.is_participant(user))
      .ok_or(Error::NotExchangeable { match_id, user })
  }

  // ── Send ──────────────────────────────────────────────────────────────────

  /// Append a message to the conversation and advance the match's recency
  /// marker. The two writes behave as one unit: the marker update is
  /// retried until it lands or the send is reported failed.
  pub async fn send(
    &self,
    match_id: Uuid,
    sender: Uuid,
    body: MessageBody,
  ) -> Result<Message> {
    self.open_conversation(match_id, sender).await?;
    body.validate()?;

    let now = self.clock.now();
    let message = Message {
      message_id:      Uuid::new_v4(),
      conversation_id: match_id,
      sender,
      body,
      read_by:         vec![sender],
      created_at:      now,
    };

    self.store.append_message(&message).await.map_err(Error::store)?;
    self.touch_with_retry(match_id, &message).await?;

    tracing::debug!(%match_id, message_id = %message.message_id, "message sent");
    self.events.emit(DomainEvent::MessageSent {
      conversation_id: match_id,
      message_id:      message.message_id,
      sender,
    });
    Ok(message)
  }

  async fn touch_with_retry(
    &self,
    match_id: Uuid,
    message: &Message,
  ) -> Result<()> {
    let mut attempt = 0;
    loop {
      match self.store.touch_activity(match_id, message.created_at).await {
        Ok(()) => return Ok(()),
        Err(e) => {
          attempt += 1;
          if attempt == TOUCH_RETRIES {
            return Err(Error::store(e));
          }
          tracing::warn!(
            %match_id,
            attempt,
            "recency update failed, retrying"
          );
        }
      }
    }
  }

  // ── Read ──────────────────────────────────────────────────────────────────

  /// Record that `user` has read each of `message_ids`. Idempotent.
  pub async fn mark_read(
    &self,
    match_id: Uuid,
    user: Uuid,
    message_ids: Vec<Uuid>,
  ) -> Result<()> {
    self.open_conversation(match_id, user).await?;
    if message_ids.is_empty() {
      return Ok(());
    }
    self
      .store
      .mark_read(match_id, user, message_ids, self.clock.now())
      .await
      .map_err(Error::store)
  }

  /// One page of the conversation, oldest-first. Reads are gated exactly
  /// like sends.
  pub async fn list_conversation(
    &self,
    match_id: Uuid,
    requester: Uuid,
    page: usize,
    page_size: usize,
  ) -> Result<ConversationPage> {
    if page == 0 || page_size == 0 {
      return Err(Error::BadPagination);
    }
    self.open_conversation(match_id, requester).await?;

    let messages = self
      .store
      .list_for_conversation(match_id, page, page_size)
      .await
      .map_err(Error::store)?;
    let total = self
      .store
      .count_for_conversation(match_id)
      .await
      .map_err(Error::store)?;

    Ok(ConversationPage { messages, page, page_size, total })
  }
}
