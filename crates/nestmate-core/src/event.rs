//! Domain events emitted on state transitions.
//!
//! Delivery (push, toast, conversation-list refresh) is an external
//! concern; the engine only guarantees the persisted state change and hands
//! the event to a fire-and-forget sink.

use serde::Serialize;
use uuid::Uuid;

use crate::record::MatchRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
  /// A mutual match formed; both participants' conversation views are stale.
  Matched { record: MatchRecord },
  Unmatched { record: MatchRecord },
  Blocked { record: MatchRecord, by: Uuid },
  MessageSent {
    conversation_id: Uuid,
    message_id:      Uuid,
    sender:          Uuid,
  },
}

/// Fire-and-forget consumer of domain events. Implementations must not
/// block; anything slow belongs behind a queue.
pub trait EventSink: Send + Sync {
  fn emit(&self, event: DomainEvent);
}

/// Sink that drops every event. The default when no delivery is wired.
pub struct NullSink;

impl EventSink for NullSink {
  fn emit(&self, _event: DomainEvent) {}
}
