//! [`SqliteStore`] — the SQLite implementation of the nestmate store traits.

use std::future::Future;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use nestmate_core::{
  identity::Identity,
  message::Message,
  record::MatchRecord,
  store::{Directory, MatchStore, MessageStore},
};

use crate::{
  Error, Result,
  encode::{
    RawIdentity, RawMatchRecord, RawMessage, encode_dt, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

fn match_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMatchRecord> {
  Ok(RawMatchRecord {
    match_id:         row.get(0)?,
    initiator:        row.get(1)?,
    target:           row.get(2)?,
    status:           row.get(3)?,
    matched_at:       row.get(4)?,
    last_activity_at: row.get(5)?,
    created_at:       row.get(6)?,
  })
}

fn message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMessage> {
  Ok(RawMessage {
    message_id:      row.get(0)?,
    conversation_id: row.get(1)?,
    sender:          row.get(2)?,
    text_body:       row.get(3)?,
    attachment_url:  row.get(4)?,
    created_at:      row.get(5)?,
    readers:         row.get(6)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A nestmate store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row match query with string params.
  async fn find_match_where(
    &self,
    sql: &'static str,
    params: Vec<String>,
  ) -> Result<Option<MatchRecord>> {
    let raw: Option<RawMatchRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params_from_iter(params), match_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatchRecord::into_record).transpose()
  }
}

// ─── Directory impl ──────────────────────────────────────────────────────────

impl Directory for SqliteStore {
  type Error = Error;

  async fn add_user(&self) -> Result<Identity> {
    self.add_user_with_id(Uuid::new_v4()).await
  }

  async fn add_user_with_id(&self, id: Uuid) -> Result<Identity> {
    let identity = Identity { user_id: id, created_at: Utc::now() };

    let id_str = encode_uuid(identity.user_id);
    let at_str = encode_dt(identity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, created_at) VALUES (?1, ?2)",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(identity)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<Identity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, created_at FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawIdentity {
                  user_id:    row.get(0)?,
                  created_at: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn user_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  async fn find_by_ordered_pair(
    &self,
    initiator: Uuid,
    target: Uuid,
  ) -> Result<Option<MatchRecord>> {
    self
      .find_match_where(
        "SELECT match_id, initiator, target, status, matched_at, last_activity_at, created_at
         FROM matches WHERE initiator = ?1 AND target = ?2",
        vec![encode_uuid(initiator), encode_uuid(target)],
      )
      .await
  }

  async fn find_by_either_order(
    &self,
    a: Uuid,
    b: Uuid,
  ) -> Result<Option<MatchRecord>> {
    if let Some(record) = self.find_by_ordered_pair(a, b).await? {
      return Ok(Some(record));
    }
    self.find_by_ordered_pair(b, a).await
  }

  async fn get_match(&self, id: Uuid) -> Result<Option<MatchRecord>> {
    self
      .find_match_where(
        "SELECT match_id, initiator, target, status, matched_at, last_activity_at, created_at
         FROM matches WHERE match_id = ?1",
        vec![encode_uuid(id)],
      )
      .await
  }

  fn create_match(
    &self,
    record: &MatchRecord,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let match_id_str   = encode_uuid(record.match_id);
    let initiator_str  = encode_uuid(record.initiator);
    let target_str     = encode_uuid(record.target);
    let status_str     = encode_status(record.status).to_owned();
    let matched_at_str = record.matched_at.map(encode_dt);
    let activity_str   = encode_dt(record.last_activity_at);
    let created_str    = encode_dt(record.created_at);

    async move {
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO matches (
               match_id, initiator, target, status,
               matched_at, last_activity_at, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              match_id_str,
              initiator_str,
              target_str,
              status_str,
              matched_at_str,
              activity_str,
              created_str,
            ],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  fn save_match(
    &self,
    record: &MatchRecord,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let match_id_str   = encode_uuid(record.match_id);
    let status_str     = encode_status(record.status).to_owned();
    let matched_at_str = record.matched_at.map(encode_dt);
    let activity_str   = encode_dt(record.last_activity_at);

    async move {
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "UPDATE matches
             SET status = ?2, matched_at = ?3, last_activity_at = ?4
             WHERE match_id = ?1",
            rusqlite::params![
              match_id_str,
              status_str,
              matched_at_str,
              activity_str
            ],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(at);

    // Conditional write: timestamps are fixed-width text, so the string
    // comparison is a time comparison. Concurrent touches converge on the
    // maximum regardless of arrival order.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE matches
           SET last_activity_at = ?2
           WHERE match_id = ?1 AND last_activity_at < ?2",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_matched_for(&self, user: Uuid) -> Result<Vec<MatchRecord>> {
    let user_str = encode_uuid(user);

    let raws: Vec<RawMatchRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT match_id, initiator, target, status, matched_at, last_activity_at, created_at
           FROM matches
           WHERE status = 'matched' AND (initiator = ?1 OR target = ?1)
           ORDER BY last_activity_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], match_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatchRecord::into_record).collect()
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = Error;

  fn append_message(
    &self,
    message: &Message,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let message_id_str = encode_uuid(message.message_id);
    let conv_str       = encode_uuid(message.conversation_id);
    let sender_str     = encode_uuid(message.sender);
    let text           = message.body.text.clone();
    let attachment     = message.body.attachment_url.clone();
    let created_str    = encode_dt(message.created_at);

    async move {
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO messages (
               message_id, conversation_id, sender,
               text_body, attachment_url, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              message_id_str,
              conv_str,
              sender_str,
              text,
              attachment,
              created_str,
            ],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn list_for_conversation(
    &self,
    conversation_id: Uuid,
    page: usize,
    page_size: usize,
  ) -> Result<Vec<Message>> {
    let conv_str = encode_uuid(conversation_id);
    let limit    = page_size as i64;
    let offset   = (page.saturating_sub(1) * page_size) as i64;

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             m.message_id, m.conversation_id, m.sender,
             m.text_body, m.attachment_url, m.created_at,
             group_concat(r.user_id) AS readers
           FROM messages m
           LEFT JOIN message_reads r ON r.message_id = m.message_id
           WHERE m.conversation_id = ?1
           GROUP BY m.message_id
           ORDER BY m.created_at DESC, m.message_id DESC
           LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![conv_str, limit, offset], message_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Retrieved newest-first for stable pagination from the tail of the
    // conversation; reversed here so each page reads oldest-first.
    let mut messages: Vec<Message> = raws
      .into_iter()
      .map(RawMessage::into_message)
      .collect::<Result<_>>()?;
    messages.reverse();
    Ok(messages)
  }

  async fn count_for_conversation(&self, conversation_id: Uuid) -> Result<u64> {
    let conv_str = encode_uuid(conversation_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
          rusqlite::params![conv_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn mark_read(
    &self,
    conversation_id: Uuid,
    reader: Uuid,
    message_ids: Vec<Uuid>,
    at: DateTime<Utc>,
  ) -> Result<()> {
    let conv_str   = encode_uuid(conversation_id);
    let reader_str = encode_uuid(reader);
    let at_str     = encode_dt(at);
    let id_strs: Vec<String> =
      message_ids.into_iter().map(encode_uuid).collect();

    // INSERT OR IGNORE makes each receipt idempotent; the SELECT scopes the
    // write to messages that actually belong to this conversation, so
    // foreign ids fall through silently.
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "INSERT OR IGNORE INTO message_reads (message_id, user_id, recorded_at)
           SELECT message_id, ?2, ?3 FROM messages
           WHERE message_id = ?1 AND conversation_id = ?4",
        )?;
        for id in &id_strs {
          stmt.execute(rusqlite::params![id, reader_str, at_str, conv_str])?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }
}
