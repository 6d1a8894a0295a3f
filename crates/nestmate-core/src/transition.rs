//! Pure state-transition functions for the match lifecycle.
//!
//! The engine's branching lives here as a transition table over
//! `(status, event, actor role)`, so the correctness logic is testable
//! without any storage dependency.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  record::{MatchStatus, Role},
};

// ─── Like events ─────────────────────────────────────────────────────────────

/// What a like means when a record already exists in the *reverse*
/// direction (the liked user had previously liked the liker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseLike {
  /// Mutual like — promote the reverse record to matched.
  Promote,
  AlreadyMatched,
  Blocked,
  /// The reverse record is unmatched; treat it as absent and evaluate the
  /// forward direction instead.
  NoActiveRecord,
}

pub fn on_reverse_like(status: MatchStatus) -> ReverseLike {
  match status {
    MatchStatus::Pending => ReverseLike::Promote,
    MatchStatus::Matched => ReverseLike::AlreadyMatched,
    MatchStatus::BlockedByInitiator | MatchStatus::BlockedByTarget => {
      ReverseLike::Blocked
    }
    MatchStatus::Unmatched => ReverseLike::NoActiveRecord,
  }
}

/// What a like means when a record already exists in the *forward*
/// direction (the liker had previously liked this user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardLike {
  /// Idempotent re-like; no mutation.
  StillPending,
  AlreadyMatched,
  Blocked,
  /// A prior unmatch closed this direction; re-liking through this
  /// operation is not permitted.
  DirectionClosed,
}

pub fn on_forward_like(status: MatchStatus) -> ForwardLike {
  match status {
    MatchStatus::Pending => ForwardLike::StillPending,
    MatchStatus::Matched => ForwardLike::AlreadyMatched,
    MatchStatus::BlockedByInitiator | MatchStatus::BlockedByTarget => {
      ForwardLike::Blocked
    }
    MatchStatus::Unmatched => ForwardLike::DirectionClosed,
  }
}

// ─── Status-change requests ──────────────────────────────────────────────────

/// The status a participant may request for an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRequest {
  Unmatched,
  Blocked,
}

/// Outcome of a legal status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
  Apply(MatchStatus),
  /// The record is already in the requested state (idempotent re-block).
  Noop,
}

/// Decide the transition for `request` issued by the participant holding
/// `actor` role, given the record's current status.
///
/// - `Unmatched` is only legal from `Matched`; either participant may
///   trigger it.
/// - `Blocked` resolves to the variant tagged to the actor's identity and is
///   legal from any non-blocked state, including `Matched` (where it also
///   implies loss of conversation access). Re-blocking by the same actor is
///   a no-op; blocking over the counterpart's existing block is rejected.
pub fn on_status_request(
  status: MatchStatus,
  request: StatusRequest,
  actor: Role,
) -> Result<StatusChange> {
  match request {
    StatusRequest::Unmatched => match status {
      MatchStatus::Matched => Ok(StatusChange::Apply(MatchStatus::Unmatched)),
      _ => Err(Error::NotMatched),
    },
    StatusRequest::Blocked => {
      let own = actor.blocked_status();
      match status {
        s if s == own => Ok(StatusChange::Noop),
        s if s.is_blocked() => Err(Error::CrossBlocked),
        _ => Ok(StatusChange::Apply(own)),
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
