//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. Timestamps are stored
//! as fixed-width RFC 3339 (nanosecond precision, `Z` suffix) so that the
//! lexicographic comparison SQLite performs on TEXT columns agrees with
//! time order — the monotone recency update relies on this.

use chrono::{DateTime, SecondsFormat, Utc};
use nestmate_core::{
  identity::Identity,
  message::{Message, MessageBody},
  record::{MatchRecord, MatchStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MatchStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: MatchStatus) -> &'static str {
  match s {
    MatchStatus::Pending => "pending",
    MatchStatus::Matched => "matched",
    MatchStatus::BlockedByInitiator => "blocked_by_initiator",
    MatchStatus::BlockedByTarget => "blocked_by_target",
    MatchStatus::Unmatched => "unmatched",
  }
}

pub fn decode_status(s: &str) -> Result<MatchStatus> {
  match s {
    "pending" => Ok(MatchStatus::Pending),
    "matched" => Ok(MatchStatus::Matched),
    "blocked_by_initiator" => Ok(MatchStatus::BlockedByInitiator),
    "blocked_by_target" => Ok(MatchStatus::BlockedByTarget),
    "unmatched" => Ok(MatchStatus::Unmatched),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawIdentity {
  pub user_id:    String,
  pub created_at: String,
}

impl RawIdentity {
  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `matches` row.
pub struct RawMatchRecord {
  pub match_id:         String,
  pub initiator:        String,
  pub target:           String,
  pub status:           String,
  pub matched_at:       Option<String>,
  pub last_activity_at: String,
  pub created_at:       String,
}

impl RawMatchRecord {
  pub fn into_record(self) -> Result<MatchRecord> {
    Ok(MatchRecord {
      match_id:         decode_uuid(&self.match_id)?,
      initiator:        decode_uuid(&self.initiator)?,
      target:           decode_uuid(&self.target)?,
      status:           decode_status(&self.status)?,
      matched_at:       self.matched_at.as_deref().map(decode_dt).transpose()?,
      last_activity_at: decode_dt(&self.last_activity_at)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `messages` row joined with its read receipts
/// (readers arrive as a comma-joined group_concat, or NULL when none).
pub struct RawMessage {
  pub message_id:      String,
  pub conversation_id: String,
  pub sender:          String,
  pub text_body:       Option<String>,
  pub attachment_url:  Option<String>,
  pub created_at:      String,
  pub readers:         Option<String>,
}

impl RawMessage {
  pub fn into_message(self) -> Result<Message> {
    let sender = decode_uuid(&self.sender)?;

    // read_by always contains the sender; stored receipts are everyone else.
    let mut read_by = vec![sender];
    if let Some(joined) = &self.readers {
      for part in joined.split(',').filter(|p| !p.is_empty()) {
        let reader = decode_uuid(part)?;
        if reader != sender {
          read_by.push(reader);
        }
      }
    }

    Ok(Message {
      message_id:      decode_uuid(&self.message_id)?,
      conversation_id: decode_uuid(&self.conversation_id)?,
      sender,
      body:            MessageBody {
        text:           self.text_body,
        attachment_url: self.attachment_url,
      },
      read_by,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
