//! Match records and their status vocabulary.
//!
//! A record is directional: `initiator` is the user whose like created it.
//! At most one record exists per ordered `(initiator, target)` pair,
//! enforced by a UNIQUE constraint at the store level. Records are never
//! deleted; terminal states are retained for audit and re-like prevention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle state of a pairwise interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
  /// The initiator has liked the target; waiting for a like back.
  Pending,
  /// Both directions confirmed. Unlocks messaging.
  Matched,
  BlockedByInitiator,
  BlockedByTarget,
  /// A previously matched pair that one participant dissolved.
  Unmatched,
}

impl MatchStatus {
  pub fn is_blocked(self) -> bool {
    matches!(self, Self::BlockedByInitiator | Self::BlockedByTarget)
  }
}

// ─── Participant role ────────────────────────────────────────────────────────

/// Which side of the directional record a participant sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Initiator,
  Target,
}

impl Role {
  /// The blocked status tagged to this role.
  pub fn blocked_status(self) -> MatchStatus {
    match self {
      Self::Initiator => MatchStatus::BlockedByInitiator,
      Self::Target => MatchStatus::BlockedByTarget,
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One pairwise interaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
  pub match_id:  Uuid,
  /// The user whose like created this record.
  pub initiator: Uuid,
  pub target:    Uuid,
  pub status:    MatchStatus,
  /// Set exactly once, the first time `status` enters `matched`.
  pub matched_at: Option<DateTime<Utc>>,
  /// Advanced on creation and on every accepted message send; orders
  /// conversations by recency.
  pub last_activity_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl MatchRecord {
  pub fn is_participant(&self, user: Uuid) -> bool {
    self.initiator == user || self.target == user
  }

  pub fn role_of(&self, user: Uuid) -> Option<Role> {
    if self.initiator == user {
      Some(Role::Initiator)
    } else if self.target == user {
      Some(Role::Target)
    } else {
      None
    }
  }

  /// The counterpart of `user`, or `None` if `user` is not a participant.
  pub fn other_participant(&self, user: Uuid) -> Option<Uuid> {
    match self.role_of(user)? {
      Role::Initiator => Some(self.target),
      Role::Target => Some(self.initiator),
    }
  }
}

// ─── Like outcome ────────────────────────────────────────────────────────────

/// The result of a like, tagged for the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LikeOutcome {
  /// A one-directional like is registered; waiting for the counterpart.
  Pending { record: MatchRecord },
  /// This like completed a mutual match.
  Matched { record: MatchRecord },
  /// The pair was already matched; nothing changed.
  AlreadyMatched { record: MatchRecord },
}

impl LikeOutcome {
  pub fn record(&self) -> &MatchRecord {
    match self {
      Self::Pending { record }
      | Self::Matched { record }
      | Self::AlreadyMatched { record } => record,
    }
  }
}
