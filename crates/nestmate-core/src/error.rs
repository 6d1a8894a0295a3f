//! Error types for `nestmate-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::message::MAX_TEXT_LEN;

/// The stable failure category of an [`Error`].
///
/// Calling layers map each kind to a distinct response; kinds are never
/// collapsed (a blocked interaction and a missing record are materially
/// different outcomes for the user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Forbidden,
  Blocked,
  InvalidOperation,
  InvalidArgument,
  Conflict,
  Dependency,
}

impl ErrorKind {
  /// Wire tag carried in error response bodies.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::NotFound => "not_found",
      Self::Forbidden => "forbidden",
      Self::Blocked => "blocked",
      Self::InvalidOperation => "invalid_operation",
      Self::InvalidArgument => "invalid_argument",
      Self::Conflict => "conflict",
      Self::Dependency => "dependency",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("match not found: {0}")]
  MatchNotFound(Uuid),

  #[error("user {user} is not a participant in match {match_id}")]
  NotAParticipant { user: Uuid, match_id: Uuid },

  /// The conversation gate refused a send or read: the record is missing,
  /// not in the matched state, or the user is not a participant.
  #[error("messaging is only available to participants of a matched conversation")]
  NotExchangeable { match_id: Uuid, user: Uuid },

  #[error("interaction between these users is blocked")]
  Blocked,

  #[error("cannot like yourself")]
  SelfLike,

  #[error("only a matched interaction can be unmatched")]
  NotMatched,

  /// Re-liking a counterpart after an explicit unmatch is rejected until the
  /// re-match flow exists; see DESIGN.md.
  #[error("this direction was closed by a previous unmatch")]
  LikeAfterUnmatch,

  #[error("already blocked by the other participant")]
  CrossBlocked,

  #[error("message must carry text or an attachment")]
  EmptyMessage,

  #[error("message text exceeds {MAX_TEXT_LEN} characters")]
  MessageTooLong,

  #[error("page and page_size must be at least 1")]
  BadPagination,

  #[error("storage conflict persisted after {attempts} attempts")]
  Conflict { attempts: u32 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error without losing its source chain.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UserNotFound(_) | Self::MatchNotFound(_) => ErrorKind::NotFound,
      Self::NotAParticipant { .. } | Self::NotExchangeable { .. } => {
        ErrorKind::Forbidden
      }
      Self::Blocked => ErrorKind::Blocked,
      Self::SelfLike
      | Self::NotMatched
      | Self::LikeAfterUnmatch
      | Self::CrossBlocked => ErrorKind::InvalidOperation,
      Self::EmptyMessage | Self::MessageTooLong | Self::BadPagination => {
        ErrorKind::InvalidArgument
      }
      Self::Conflict { .. } => ErrorKind::Conflict,
      Self::Store(_) => ErrorKind::Dependency,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
