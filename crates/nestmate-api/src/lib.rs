//! JSON REST API for the nestmate match engine.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits. Auth, TLS, and transport concerns are the caller's
//! responsibility: handlers trust the acting-user ids they are given, the
//! way an upstream session layer would supply them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", nestmate_api::api_router(state))
//! ```

pub mod error;
pub mod matches;
pub mod messages;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use nestmate_core::{
  clock::Clock,
  engine::MatchEngine,
  event::EventSink,
  gate::ConversationGate,
  store::{Directory, MatchStore, MessageStore},
};

pub use error::ApiError;

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub engine: MatchEngine<S>,
  pub gate:   ConversationGate<S>,
}

// Derived `Clone` would demand `S: Clone`; the fields are all handles.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      engine: self.engine.clone(),
      gate:   self.gate.clone(),
    }
  }
}

impl<S> AppState<S>
where
  S: MatchStore + MessageStore + Directory,
{
  /// Wire an engine and gate over `store` with the given clock and event
  /// sink.
  pub fn new(
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    let engine = MatchEngine::new(store.clone(), clock.clone(), events.clone());
    let gate = ConversationGate::new(store.clone(), clock, events);
    Self { store, engine, gate }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// | Method | Path | Notes |
/// |--------|------|-------|
/// | `POST` | `/users` | Create an identity; optional caller-supplied id |
/// | `GET`  | `/users/{id}` | 404 if unknown |
/// | `POST` | `/likes` | Register a like; returns the outcome-tagged record |
/// | `GET`  | `/matches` | `?user_id=` — active conversations, newest first |
/// | `GET`  | `/matches/{id}` | `?user_id=` — participant-gated fetch |
/// | `PUT`  | `/matches/{id}/status` | Unmatch or block |
/// | `POST` | `/messages` | Send a message into a matched conversation |
/// | `GET`  | `/messages` | One page of a conversation, oldest-first |
/// | `POST` | `/messages/read` | Record read receipts |
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MatchStore + MessageStore + Directory + Send + Sync + 'static,
{
  Router::new()
    // Identities
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Likes and matches
    .route("/likes", post(matches::like::<S>))
    .route("/matches", get(matches::list::<S>))
    .route("/matches/{id}", get(matches::get_one::<S>))
    .route("/matches/{id}/status", put(matches::set_status::<S>))
    // Messages
    .route("/messages", post(messages::send::<S>).get(messages::list::<S>))
    .route("/messages/read", post(messages::mark_read::<S>))
    .with_state(state)
}
