//! Identity — the thin envelope the engine knows a user by.
//!
//! Profile data (name, photos, listing preferences) lives in an external
//! system. The engine only needs a stable id it can validate for existence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque user identity known to the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
}
