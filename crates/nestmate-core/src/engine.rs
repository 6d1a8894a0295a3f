//! [`MatchEngine`] — converts one-directional likes into mutual matches and
//! executes unmatch/block transitions.
//!
//! The engine's check-then-act sequence runs under a per-pair mutex, with
//! the store's ordered-pair UNIQUE constraint as backstop: a duplicate from
//! `create_match` means a concurrent writer won the pair, so the operation
//! restarts as a read.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::Clock,
  event::{DomainEvent, EventSink},
  record::{LikeOutcome, MatchRecord, MatchStatus},
  store::{Directory, MatchStore, StoreError as _},
  transition::{
    self, ForwardLike, ReverseLike, StatusChange, StatusRequest,
  },
};

/// Attempts at the read-evaluate-write sequence before a persistent
/// uniqueness conflict is surfaced to the caller.
const CREATE_RETRIES: u32 = 3;

// ─── Pair locks ──────────────────────────────────────────────────────────────

/// Keyed mutexes serialising engine operations per unordered user pair.
/// No cross-pair locking: operations on distinct pairs never contend.
#[derive(Clone, Default)]
struct PairLocks {
  inner: Arc<Mutex<HashMap<(Uuid, Uuid), Arc<AsyncMutex<()>>>>>,
}

impl PairLocks {
  async fn lock(&self, a: Uuid, b: Uuid) -> OwnedMutexGuard<()> {
    let key = if a < b { (a, b) } else { (b, a) };
    let pair = self
      .inner
      .lock()
      .expect("pair lock table poisoned")
      .entry(key)
      .or_insert_with(|| Arc::new(AsyncMutex::new(())))
      .clone();
    pair.lock_owned().await
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// The mutual-match formation engine.
///
/// Cloning is cheap; clones share the store handle and the pair-lock table.
pub struct MatchEngine<S> {
  store:  Arc<S>,
  clock:  Arc<dyn Clock>,
  events: Arc<dyn EventSink>,
  locks:  PairLocks,
}

// Derived `Clone` would demand `S: Clone`; the fields are all handles.
impl<S> Clone for MatchEngine<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      clock:  self.clock.clone(),
      events: self.events.clone(),
      locks:  self.locks.clone(),
    }
  }
}

impl<S> MatchEngine<S>
where
  S: MatchStore + Directory,
{
  pub fn new(
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    Self { store, clock, events, locks: PairLocks::default() }
  }

  // ── Like ──────────────────────────────────────────────────────────────────

  /// Register a like from `liker` toward `liked`.
  ///
  /// Evaluates the reverse direction first (a pending reverse like makes
  /// this a mutual match), then the forward direction, and only then
  /// creates a fresh pending record.
  pub async fn like(&self, liker: Uuid, liked: Uuid) -> Result<LikeOutcome> {
    if liker == liked {
      return Err(Error::SelfLike);
    }
    if !self.store.user_exists(liked).await.map_err(Error::store)? {
      return Err(Error::UserNotFound(liked));
    }

    let _guard = self.locks.lock(liker, liked).await;

    for _ in 0..CREATE_RETRIES {
      // Reverse direction: did `liked` already like `liker`?
      if let Some(mut reverse) = self
        .store
        .find_by_ordered_pair(liked, liker)
        .await
        .map_err(Error::store)?
      {
        match transition::on_reverse_like(reverse.status) {
          ReverseLike::Promote => {
            let now = self.clock.now();
            reverse.status = MatchStatus::Matched;
            if reverse.matched_at.is_none() {
              reverse.matched_at = Some(now);
            }
            reverse.last_activity_at = now;
            self.store.save_match(&reverse).await.map_err(Error::store)?;

            tracing::info!(match_id = %reverse.match_id, "match formed");
            self.events.emit(DomainEvent::Matched { record: reverse.clone() });
            return Ok(LikeOutcome::Matched { record: reverse });
          }
          ReverseLike::AlreadyMatched => {
            return Ok(LikeOutcome::AlreadyMatched { record: reverse });
          }
          ReverseLike::Blocked => return Err(Error::Blocked),
          // An unmatched reverse record does not reopen; evaluate the
          // forward direction as if it were absent.
          ReverseLike::NoActiveRecord => {}
        }
      }

      // Forward direction: has `liker` already liked `liked`?
      if let Some(forward) = self
        .store
        .find_by_ordered_pair(liker, liked)
        .await
        .map_err(Error::store)?
      {
        match transition::on_forward_like(forward.status) {
          ForwardLike::StillPending => {
            return Ok(LikeOutcome::Pending { record: forward });
          }
          ForwardLike::AlreadyMatched => {
            return Ok(LikeOutcome::AlreadyMatched { record: forward });
          }
          ForwardLike::Blocked => return Err(Error::Blocked),
          ForwardLike::DirectionClosed => return Err(Error::LikeAfterUnmatch),
        }
      }

      // Neither direction holds an active record: register the like.
      let now = self.clock.now();
      let record = MatchRecord {
        match_id:         Uuid::new_v4(),
        initiator:        liker,
        target:           liked,
        status:           MatchStatus::Pending,
        matched_at:       None,
        last_activity_at: now,
        created_at:       now,
      };

      match self.store.create_match(&record).await {
        Ok(()) => return Ok(LikeOutcome::Pending { record }),
        Err(e) if e.is_duplicate() => {
          // A concurrent writer created a record for this pair between our
          // read and write; restart from the reverse lookup.
          tracing::debug!(%liker, %liked, "pair conflict, re-reading");
          continue;
        }
        Err(e) => return Err(Error::store(e)),
      }
    }

    Err(Error::Conflict { attempts: CREATE_RETRIES })
  }

  // ── Status changes ────────────────────────────────────────────────────────

  /// Unmatch or block on behalf of `acting_user`.
  ///
  /// Idempotent for re-blocks by the same actor. Emits the corresponding
  /// domain event on every applied transition.
  pub async fn set_status(
    &self,
    match_id: Uuid,
    acting_user: Uuid,
    request: StatusRequest,
  ) -> Result<MatchRecord> {
    // First read resolves the pair for the lock key; the authoritative read
    // happens under the lock.
    let probe = self
      .store
      .get_match(match_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchNotFound(match_id))?;

    let _guard = self.locks.lock(probe.initiator, probe.target).await;

    let mut record = self
      .store
      .get_match(match_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchNotFound(match_id))?;

    let role = record
      .role_of(acting_user)
      .ok_or(Error::NotAParticipant { user: acting_user, match_id })?;

    match transition::on_status_request(record.status, request, role)? {
      StatusChange::Noop => Ok(record),
      StatusChange::Apply(next) => {
        record.status = next;
        self.store.save_match(&record).await.map_err(Error::store)?;

        tracing::info!(%match_id, status = ?next, "match status changed");
        match next {
          MatchStatus::Unmatched => {
            self.events.emit(DomainEvent::Unmatched { record: record.clone() });
          }
          _ => {
            self.events.emit(DomainEvent::Blocked {
              record: record.clone(),
              by:     acting_user,
            });
          }
        }
        Ok(record)
      }
    }
  }
}
