//! Integration tests for `SqliteStore` with the engine and gate layered on
//! top, against an in-memory database.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use nestmate_core::{
  Error, ErrorKind,
  clock::{FixedClock, SystemClock},
  engine::MatchEngine,
  event::NullSink,
  gate::ConversationGate,
  message::MessageBody,
  record::{LikeOutcome, MatchRecord, MatchStatus},
  store::{Directory, MatchStore, StoreError as _},
  transition::StatusRequest,
};

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"))
}

fn engine(store: &Arc<SqliteStore>) -> MatchEngine<SqliteStore> {
  MatchEngine::new(store.clone(), Arc::new(SystemClock), Arc::new(NullSink))
}

fn gate(store: &Arc<SqliteStore>) -> ConversationGate<SqliteStore> {
  ConversationGate::new(store.clone(), Arc::new(SystemClock), Arc::new(NullSink))
}

fn gate_at(
  store: &Arc<SqliteStore>,
  at: chrono::DateTime<Utc>,
) -> ConversationGate<SqliteStore> {
  ConversationGate::new(store.clone(), Arc::new(FixedClock(at)), Arc::new(NullSink))
}

async fn two_users(store: &Arc<SqliteStore>) -> (Uuid, Uuid) {
  let a = store.add_user().await.unwrap().user_id;
  let b = store.add_user().await.unwrap().user_id;
  (a, b)
}

/// Drive two users to `matched` and return their ids and the record.
async fn matched_pair(store: &Arc<SqliteStore>) -> (Uuid, Uuid, MatchRecord) {
  let e = engine(store);
  let (a, b) = two_users(store).await;
  e.like(a, b).await.unwrap();
  let outcome = e.like(b, a).await.unwrap();
  (a, b, outcome.record().clone())
}

// ─── Directory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let identity = s.add_user().await.unwrap();
  let fetched = s.get_user(identity.user_id).await.unwrap();
  assert!(fetched.is_some());
  assert_eq!(fetched.unwrap().user_id, identity.user_id);

  assert!(s.user_exists(identity.user_id).await.unwrap());
  assert!(!s.user_exists(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn add_user_with_taken_id_is_duplicate() {
  let s = store().await;

  let identity = s.add_user().await.unwrap();
  let err = s.add_user_with_id(identity.user_id).await.unwrap_err();
  assert!(err.is_duplicate());
}

// ─── Like flow ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_like_creates_pending() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let outcome = e.like(a, b).await.unwrap();
  assert!(matches!(outcome, LikeOutcome::Pending { .. }));

  let record = outcome.record();
  assert_eq!(record.initiator, a);
  assert_eq!(record.target, b);
  assert_eq!(record.status, MatchStatus::Pending);
  assert!(record.matched_at.is_none());

  // Exactly one directional record exists.
  assert!(s.find_by_ordered_pair(a, b).await.unwrap().is_some());
  assert!(s.find_by_ordered_pair(b, a).await.unwrap().is_none());
}

#[tokio::test]
async fn relike_is_idempotent() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let first = e.like(a, b).await.unwrap();
  let second = e.like(a, b).await.unwrap();

  assert!(matches!(second, LikeOutcome::Pending { .. }));
  assert_eq!(first.record().match_id, second.record().match_id);
}

#[tokio::test]
async fn mutual_like_promotes_to_matched() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let first = e.like(a, b).await.unwrap();
  let second = e.like(b, a).await.unwrap();

  // The same record transitions; no second record is created.
  assert!(matches!(second, LikeOutcome::Matched { .. }));
  assert_eq!(second.record().match_id, first.record().match_id);
  assert_eq!(second.record().status, MatchStatus::Matched);
  assert!(second.record().matched_at.is_some());

  assert!(s.find_by_ordered_pair(b, a).await.unwrap().is_none());
  let stored = s.find_by_either_order(a, b).await.unwrap().unwrap();
  assert_eq!(stored.status, MatchStatus::Matched);
}

#[tokio::test]
async fn like_after_match_is_idempotent_and_keeps_matched_at() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;

  let from_a = e.like(a, b).await.unwrap();
  let from_b = e.like(b, a).await.unwrap();

  assert!(matches!(from_a, LikeOutcome::AlreadyMatched { .. }));
  assert!(matches!(from_b, LikeOutcome::AlreadyMatched { .. }));
  // matched_at is set exactly once.
  assert_eq!(from_a.record().matched_at, record.matched_at);
  assert_eq!(from_b.record().matched_at, record.matched_at);
}

#[tokio::test]
async fn like_yourself_is_rejected() {
  let s = store().await;
  let e = engine(&s);
  let a = s.add_user().await.unwrap().user_id;

  let err = e.like(a, a).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn like_unknown_user_is_rejected() {
  let s = store().await;
  let e = engine(&s);
  let a = s.add_user().await.unwrap().user_id;

  let err = e.like(a, Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Blocking ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn block_from_matched_tags_the_actor() {
  let s = store().await;
  let e = engine(&s);
  // a liked first, so a is the record's initiator.
  let (a, b, record) = matched_pair(&s).await;

  let blocked = e
    .set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();
  assert_eq!(blocked.status, MatchStatus::BlockedByInitiator);

  // Blocking dissolves conversation access for both sides.
  let g = gate(&s);
  for user in [a, b] {
    let err = g
      .send(record.match_id, user, MessageBody::text("hi"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
  }
}

#[tokio::test]
async fn block_by_target_resolves_by_identity() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  // b is the target of the record even though b acts here.
  let outcome = e.like(a, b).await.unwrap();
  let blocked = e
    .set_status(outcome.record().match_id, b, StatusRequest::Blocked)
    .await
    .unwrap();
  assert_eq!(blocked.status, MatchStatus::BlockedByTarget);
}

#[tokio::test]
async fn reblock_by_same_actor_is_noop_success() {
  let s = store().await;
  let e = engine(&s);
  let (a, _b, record) = matched_pair(&s).await;

  let first = e
    .set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();
  let second = e
    .set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();
  assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn block_over_counterpart_block_is_rejected() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;

  e.set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();
  let err = e
    .set_status(record.match_id, b, StatusRequest::Blocked)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn blocked_pair_rejects_likes_in_both_directions() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;

  e.set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();

  let from_a = e.like(a, b).await.unwrap_err();
  let from_b = e.like(b, a).await.unwrap_err();
  assert_eq!(from_a.kind(), ErrorKind::Blocked);
  assert_eq!(from_b.kind(), ErrorKind::Blocked);

  // No new record appeared in either direction.
  assert!(s.find_by_ordered_pair(b, a).await.unwrap().is_none());
  let stored = s.find_by_ordered_pair(a, b).await.unwrap().unwrap();
  assert_eq!(stored.match_id, record.match_id);
}

// ─── Unmatch ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unmatch_requires_matched() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let outcome = e.like(a, b).await.unwrap();
  let err = e
    .set_status(outcome.record().match_id, a, StatusRequest::Unmatched)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn either_participant_may_unmatch() {
  let s = store().await;
  let e = engine(&s);
  let (_a, b, record) = matched_pair(&s).await;

  // The record's target dissolves the match.
  let unmatched = e
    .set_status(record.match_id, b, StatusRequest::Unmatched)
    .await
    .unwrap();
  assert_eq!(unmatched.status, MatchStatus::Unmatched);
}

#[tokio::test]
async fn relike_after_unmatch_is_rejected() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;

  e.set_status(record.match_id, a, StatusRequest::Unmatched)
    .await
    .unwrap();

  // Re-liking through the original direction stays closed until a
  // dedicated re-match flow exists.
  let err = e.like(a, b).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn reverse_like_after_unmatch_opens_a_fresh_record() {
  let s = store().await;
  let e = engine(&s);
  // a liked first: the dissolved record is (a → b).
  let (a, b, record) = matched_pair(&s).await;

  e.set_status(record.match_id, b, StatusRequest::Unmatched)
    .await
    .unwrap();

  // The counterpart's like is a new courtship, not a reopening.
  let outcome = e.like(b, a).await.unwrap();
  assert!(matches!(outcome, LikeOutcome::Pending { .. }));
  assert_ne!(outcome.record().match_id, record.match_id);
  assert_eq!(outcome.record().initiator, b);

  // And it can complete into a fresh match.
  let matched = e.like(a, b).await.unwrap();
  assert!(matches!(matched, LikeOutcome::Matched { .. }));
  assert_eq!(matched.record().match_id, outcome.record().match_id);
}

// ─── setStatus authorisation ─────────────────────────────────────────────────

#[tokio::test]
async fn set_status_requires_participant() {
  let s = store().await;
  let e = engine(&s);
  let (_a, _b, record) = matched_pair(&s).await;
  let stranger = s.add_user().await.unwrap().user_id;

  let err = e
    .set_status(record.match_id, stranger, StatusRequest::Blocked)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn set_status_on_unknown_match_is_not_found() {
  let s = store().await;
  let e = engine(&s);
  let a = s.add_user().await.unwrap().user_id;

  let err = e
    .set_status(Uuid::new_v4(), a, StatusRequest::Unmatched)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Conversation gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn gate_admits_only_matched_participants() {
  let s = store().await;
  let e = engine(&s);
  let g = gate(&s);
  let (a, b) = two_users(&s).await;

  // Pending: no exchange.
  let pending = e.like(a, b).await.unwrap();
  let match_id = pending.record().match_id;
  assert!(!g.can_exchange(match_id, a).await.unwrap());
  let err = g.send(match_id, a, MessageBody::text("hi")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  // Matched: both participants may exchange, strangers may not.
  e.like(b, a).await.unwrap();
  assert!(g.can_exchange(match_id, a).await.unwrap());
  assert!(g.can_exchange(match_id, b).await.unwrap());
  let stranger = s.add_user().await.unwrap().user_id;
  assert!(!g.can_exchange(match_id, stranger).await.unwrap());

  // Unmatched: access is gone again.
  e.set_status(match_id, a, StatusRequest::Unmatched).await.unwrap();
  let err = g.send(match_id, b, MessageBody::text("hi")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn can_exchange_is_false_for_unknown_match() {
  let s = store().await;
  let g = gate(&s);
  let a = s.add_user().await.unwrap().user_id;
  assert!(!g.can_exchange(Uuid::new_v4(), a).await.unwrap());
}

#[tokio::test]
async fn send_and_mark_read() {
  let s = store().await;
  let g = gate(&s);
  let (a, b, record) = matched_pair(&s).await;

  let message = g
    .send(record.match_id, a, MessageBody::text("hi"))
    .await
    .unwrap();
  assert_eq!(message.sender, a);
  assert_eq!(message.read_by, vec![a]);

  g.mark_read(record.match_id, b, vec![message.message_id])
    .await
    .unwrap();

  let page = g
    .list_conversation(record.match_id, b, 1, 20)
    .await
    .unwrap();
  assert_eq!(page.messages.len(), 1);
  let read_by = &page.messages[0].read_by;
  assert_eq!(read_by.len(), 2);
  assert!(read_by.contains(&a) && read_by.contains(&b));
}

#[tokio::test]
async fn mark_read_is_idempotent() {
  let s = store().await;
  let g = gate(&s);
  let (a, b, record) = matched_pair(&s).await;

  let message = g
    .send(record.match_id, a, MessageBody::text("hi"))
    .await
    .unwrap();

  for _ in 0..2 {
    g.mark_read(record.match_id, b, vec![message.message_id])
      .await
      .unwrap();
  }

  let page = g.list_conversation(record.match_id, a, 1, 20).await.unwrap();
  assert_eq!(page.messages[0].read_by.len(), 2);
}

#[tokio::test]
async fn mark_read_ignores_foreign_messages() {
  let s = store().await;
  let g = gate(&s);
  let (_a1, b1, first) = matched_pair(&s).await;
  let (_a2, b2, second) = matched_pair(&s).await;

  let foreign = g
    .send(second.match_id, b2, MessageBody::text("other room"))
    .await
    .unwrap();

  // b1 targets a message that lives in someone else's conversation.
  g.mark_read(first.match_id, b1, vec![foreign.message_id])
    .await
    .unwrap();

  let page = g
    .list_conversation(second.match_id, b2, 1, 20)
    .await
    .unwrap();
  assert_eq!(page.messages[0].read_by, vec![b2]);
}

#[tokio::test]
async fn empty_body_is_rejected() {
  let s = store().await;
  let g = gate(&s);
  let (a, _b, record) = matched_pair(&s).await;

  let err = g
    .send(record.match_id, a, MessageBody::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn overlong_text_is_rejected() {
  let s = store().await;
  let g = gate(&s);
  let (a, _b, record) = matched_pair(&s).await;

  let err = g
    .send(record.match_id, a, MessageBody::text("x".repeat(2001)))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn attachment_only_message_is_accepted() {
  let s = store().await;
  let g = gate(&s);
  let (a, _b, record) = matched_pair(&s).await;

  let body = MessageBody {
    text:           None,
    attachment_url: Some("uploads/kitchen.jpg".into()),
  };
  let message = g.send(record.match_id, a, body).await.unwrap();
  assert_eq!(
    message.body.attachment_url.as_deref(),
    Some("uploads/kitchen.jpg")
  );
}

#[tokio::test]
async fn list_conversation_requires_participant() {
  let s = store().await;
  let g = gate(&s);
  let (_a, _b, record) = matched_pair(&s).await;
  let stranger = s.add_user().await.unwrap().user_id;

  let err = g
    .list_conversation(record.match_id, stranger, 1, 20)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

// ─── Ordering and pagination ─────────────────────────────────────────────────

#[tokio::test]
async fn conversation_reads_oldest_first() {
  let s = store().await;
  let (a, _b, record) = matched_pair(&s).await;

  let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
  for i in 0..3 {
    let g = gate_at(&s, base + Duration::seconds(i));
    g.send(record.match_id, a, MessageBody::text(format!("m{i}")))
      .await
      .unwrap();
  }

  let page = gate(&s)
    .list_conversation(record.match_id, a, 1, 20)
    .await
    .unwrap();
  let texts: Vec<_> = page
    .messages
    .iter()
    .map(|m| m.body.text.clone().unwrap())
    .collect();
  assert_eq!(texts, ["m0", "m1", "m2"]);
}

#[tokio::test]
async fn pagination_counts_from_the_most_recent_page() {
  let s = store().await;
  let (a, _b, record) = matched_pair(&s).await;

  let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
  for i in 0..5 {
    let g = gate_at(&s, base + Duration::seconds(i));
    g.send(record.match_id, a, MessageBody::text(format!("m{i}")))
      .await
      .unwrap();
  }

  let g = gate(&s);
  let texts = |page: &nestmate_core::gate::ConversationPage| {
    page
      .messages
      .iter()
      .map(|m| m.body.text.clone().unwrap())
      .collect::<Vec<_>>()
  };

  // Page 1 is the tail of the conversation, each page oldest-first.
  let p1 = g.list_conversation(record.match_id, a, 1, 2).await.unwrap();
  assert_eq!(texts(&p1), ["m3", "m4"]);
  assert_eq!(p1.total, 5);
  assert_eq!(p1.page_count(), 3);

  let p2 = g.list_conversation(record.match_id, a, 2, 2).await.unwrap();
  assert_eq!(texts(&p2), ["m1", "m2"]);

  let p3 = g.list_conversation(record.match_id, a, 3, 2).await.unwrap();
  assert_eq!(texts(&p3), ["m0"]);
}

#[tokio::test]
async fn zero_page_inputs_are_rejected() {
  let s = store().await;
  let g = gate(&s);
  let (a, _b, record) = matched_pair(&s).await;

  for (page, page_size) in [(0, 20), (1, 0)] {
    let err = g
      .list_conversation(record.match_id, a, page, page_size)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
  }
}

// ─── Recency ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_advances_the_recency_marker() {
  let s = store().await;
  let g = gate(&s);
  let (a, _b, record) = matched_pair(&s).await;

  let message = g
    .send(record.match_id, a, MessageBody::text("hi"))
    .await
    .unwrap();

  let stored = s.get_match(record.match_id).await.unwrap().unwrap();
  assert!(stored.last_activity_at >= message.created_at);
}

#[tokio::test]
async fn recency_marker_never_moves_backwards() {
  let s = store().await;
  let (_a, _b, record) = matched_pair(&s).await;

  let before = s.get_match(record.match_id).await.unwrap().unwrap();
  let earlier = before.last_activity_at - Duration::hours(1);
  s.touch_activity(record.match_id, earlier).await.unwrap();

  let after = s.get_match(record.match_id).await.unwrap().unwrap();
  assert_eq!(after.last_activity_at, before.last_activity_at);

  let later = before.last_activity_at + Duration::hours(1);
  s.touch_activity(record.match_id, later).await.unwrap();
  let after = s.get_match(record.match_id).await.unwrap().unwrap();
  assert_eq!(after.last_activity_at, later);
}

#[tokio::test]
async fn active_conversation_rises_to_the_top() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;
  let c = s.add_user().await.unwrap().user_id;

  e.like(a, b).await.unwrap();
  let with_b = e.like(b, a).await.unwrap().record().clone();
  e.like(a, c).await.unwrap();
  let with_c = e.like(c, a).await.unwrap().record().clone();

  // The later match leads until the older conversation sees traffic.
  let listed = s.list_matched_for(a).await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].match_id, with_c.match_id);

  let g = gate_at(&s, Utc::now() + Duration::hours(1));
  g.send(with_b.match_id, a, MessageBody::text("still looking?"))
    .await
    .unwrap();

  let listed = s.list_matched_for(a).await.unwrap();
  assert_eq!(listed[0].match_id, with_b.match_id);
  assert_eq!(listed[1].match_id, with_c.match_id);
}

#[tokio::test]
async fn list_matched_excludes_other_statuses() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;
  let c = s.add_user().await.unwrap().user_id;

  // A pending like toward c must not appear among a's matches.
  e.like(a, c).await.unwrap();
  let listed = s.list_matched_for(a).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].match_id, record.match_id);

  e.set_status(record.match_id, b, StatusRequest::Unmatched)
    .await
    .unwrap();
  assert!(s.list_matched_for(a).await.unwrap().is_empty());
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn simultaneous_mutual_likes_promote_exactly_once() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let (from_a, from_b) = tokio::join!(e.like(a, b), e.like(b, a));
  let from_a = from_a.unwrap();
  let from_b = from_b.unwrap();

  // Whoever ran second completed the match; the other registered the like.
  let outcomes = [&from_a, &from_b];
  assert_eq!(
    outcomes
      .iter()
      .filter(|o| matches!(o, LikeOutcome::Matched { .. }))
      .count(),
    1
  );
  assert_eq!(
    outcomes
      .iter()
      .filter(|o| matches!(o, LikeOutcome::Pending { .. }))
      .count(),
    1
  );

  // Exactly one record exists and it is matched, with matched_at set once.
  let record = s.find_by_either_order(a, b).await.unwrap().unwrap();
  assert_eq!(record.status, MatchStatus::Matched);
  assert!(record.matched_at.is_some());
  let reverse =
    s.find_by_ordered_pair(record.target, record.initiator).await.unwrap();
  assert!(reverse.is_none());
}

#[tokio::test]
async fn simultaneous_same_direction_likes_create_one_record() {
  let s = store().await;
  let e = engine(&s);
  let (a, b) = two_users(&s).await;

  let (first, second) = tokio::join!(e.like(a, b), e.like(a, b));
  let first = first.unwrap();
  let second = second.unwrap();

  assert!(matches!(first, LikeOutcome::Pending { .. }));
  assert!(matches!(second, LikeOutcome::Pending { .. }));
  assert_eq!(first.record().match_id, second.record().match_id);
}

#[tokio::test]
async fn create_match_surfaces_ordered_pair_duplicates() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  let now = Utc::now();
  let record = MatchRecord {
    match_id:         Uuid::new_v4(),
    initiator:        a,
    target:           b,
    status:           MatchStatus::Pending,
    matched_at:       None,
    last_activity_at: now,
    created_at:       now,
  };
  s.create_match(&record).await.unwrap();

  let rival = MatchRecord { match_id: Uuid::new_v4(), ..record.clone() };
  let err = s.create_match(&rival).await.unwrap_err();
  assert!(err.is_duplicate());
}

// ─── Error surfacing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn distinct_failure_kinds_stay_distinct() {
  let s = store().await;
  let e = engine(&s);
  let (a, b, record) = matched_pair(&s).await;

  e.set_status(record.match_id, a, StatusRequest::Blocked)
    .await
    .unwrap();

  // A blocked like and a missing target are different categories.
  let blocked = e.like(a, b).await.unwrap_err();
  let missing = e.like(a, Uuid::new_v4()).await.unwrap_err();
  assert_eq!(blocked.kind(), ErrorKind::Blocked);
  assert_eq!(missing.kind(), ErrorKind::NotFound);
  assert!(matches!(blocked, Error::Blocked));
  assert!(matches!(missing, Error::UserNotFound(_)));
}
