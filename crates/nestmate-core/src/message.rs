//! Messages — the append-only content of a conversation.
//!
//! A message is immutable once written; the only thing that grows afterwards
//! is its set of readers, tracked in a separate append-only table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Upper bound on message text length, matching the profile the mobile
/// clients were built against.
pub const MAX_TEXT_LEN: usize = 2000;

// ─── Body ────────────────────────────────────────────────────────────────────

/// Message content: text, an attachment reference, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
  pub text:           Option<String>,
  pub attachment_url: Option<String>,
}

impl MessageBody {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()), attachment_url: None }
  }

  /// At least one content part is required; text is length-capped.
  pub fn validate(&self) -> Result<()> {
    if self.text.is_none() && self.attachment_url.is_none() {
      return Err(Error::EmptyMessage);
    }
    if self.text.as_ref().is_some_and(|t| t.chars().count() > MAX_TEXT_LEN) {
      return Err(Error::MessageTooLong);
    }
    Ok(())
  }
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// One entry in a conversation's ordered log.
///
/// `conversation_id` is the id of the match record the conversation belongs
/// to; a message is only ever created while that record is `matched`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub message_id:      Uuid,
  pub conversation_id: Uuid,
  pub sender:          Uuid,
  #[serde(flatten)]
  pub body:            MessageBody,
  /// Users who have read this message. Grows monotonically and always
  /// contains the sender.
  pub read_by:         Vec<Uuid>,
  pub created_at:      DateTime<Utc>,
}
