//! Storage trait definitions.
//!
//! The traits are implemented by storage backends (e.g.
//! `nestmate-store-sqlite`). The engine and gate depend on these
//! abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{identity::Identity, message::Message, record::MatchRecord};

// ─── Error classification ────────────────────────────────────────────────────

/// Backend errors the engine needs to tell apart without knowing the
/// backend. A duplicate from `create_match` means a concurrent writer won
/// the ordered pair; the engine restarts its read-evaluate-write sequence.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// True if the error is a uniqueness-constraint violation.
  fn is_duplicate(&self) -> bool;
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// Identity resolution. Profile storage is an external collaborator; the
/// engine only validates that a liked user exists before creating records.
pub trait Directory: Send + Sync {
  type Error: StoreError;

  /// Create and persist a new identity.
  fn add_user(
    &self,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Create an identity with a caller-supplied UUID.
  ///
  /// Used when ids are minted by the external profile system. Returns a
  /// duplicate error if the UUID is already taken.
  fn add_user_with_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Retrieve an identity by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  fn user_exists(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Match records ───────────────────────────────────────────────────────────

/// Durable table of pairwise interaction records.
///
/// Uniqueness per ordered `(initiator, target)` pair is enforced here, not
/// in the engine; a violation must surface as a duplicate error, never be
/// swallowed.
pub trait MatchStore: Send + Sync {
  type Error: StoreError;

  /// The record created by `initiator` liking `target`, if any.
  fn find_by_ordered_pair(
    &self,
    initiator: Uuid,
    target: Uuid,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  /// The record between `a` and `b` in either direction. When both
  /// directions exist (possible after an unmatch reopened the reverse), the
  /// `(a, b)` record wins.
  fn find_by_either_order(
    &self,
    a: Uuid,
    b: Uuid,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  fn get_match(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  /// Persist a new record. Fails with a duplicate error if a record for the
  /// same ordered pair already exists.
  fn create_match(
    &self,
    record: &MatchRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically update one record's status, matched_at, and
  /// last_activity_at.
  fn save_match(
    &self,
    record: &MatchRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Advance `last_activity_at` to `at` if `at` is later than the stored
  /// value. Last-writer-by-timestamp: concurrent touches converge on the
  /// maximum, not on arrival order.
  fn touch_activity(
    &self,
    id: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All `matched` records involving `user`, most recent activity first.
  fn list_matched_for(
    &self,
    user: Uuid,
  ) -> impl Future<Output = Result<Vec<MatchRecord>, Self::Error>> + Send + '_;
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// Append-only ordered log of messages per conversation.
pub trait MessageStore: Send + Sync {
  type Error: StoreError;

  /// Persist a fully-built message. No UPDATE is ever issued against the
  /// message log; read receipts live in their own append-only table.
  fn append_message(
    &self,
    message: &Message,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// One page of a conversation, oldest-first for display. `page` is
  /// 1-based and counts from the most recent messages: internally the log
  /// is read newest-first and each page is reversed, so page 1 is always
  /// the current tail of the conversation.
  fn list_for_conversation(
    &self,
    conversation_id: Uuid,
    page: usize,
    page_size: usize,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  fn count_for_conversation(
    &self,
    conversation_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Record that `reader` has read each of `message_ids`. Idempotent
  /// set-union; ids not belonging to `conversation_id` are ignored.
  fn mark_read(
    &self,
    conversation_id: Uuid,
    reader: Uuid,
    message_ids: Vec<Uuid>,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
