//! SQL schema for the nestmate SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL
);

-- One row per directional like. The UNIQUE constraint on the ordered pair
-- is what resolves concurrent check-then-act races: the losing writer gets
-- a constraint violation and re-reads. Rows are never deleted; terminal
-- statuses are kept for audit and re-like prevention.
CREATE TABLE IF NOT EXISTS matches (
    match_id          TEXT PRIMARY KEY,
    initiator         TEXT NOT NULL REFERENCES users(user_id),
    target            TEXT NOT NULL REFERENCES users(user_id),
    status            TEXT NOT NULL,   -- pending | matched | blocked_by_initiator | blocked_by_target | unmatched
    matched_at        TEXT,            -- set exactly once, on first promotion
    last_activity_at  TEXT NOT NULL,
    created_at        TEXT NOT NULL,
    UNIQUE (initiator, target),
    CHECK  (initiator != target)
);

-- Messages are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS messages (
    message_id       TEXT PRIMARY KEY,
    conversation_id  TEXT NOT NULL REFERENCES matches(match_id),
    sender           TEXT NOT NULL REFERENCES users(user_id),
    text_body        TEXT,
    attachment_url   TEXT,
    created_at       TEXT NOT NULL,
    CHECK (text_body IS NOT NULL OR attachment_url IS NOT NULL)
);

-- Read receipts, one row per (message, reader). Append-only; the UNIQUE
-- constraint makes re-reads a no-op, so read_by only ever grows. The
-- sender's implicit receipt is not stored; it is added at query time.
CREATE TABLE IF NOT EXISTS message_reads (
    message_id   TEXT NOT NULL REFERENCES messages(message_id),
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    recorded_at  TEXT NOT NULL,
    UNIQUE (message_id, user_id)
);

CREATE INDEX IF NOT EXISTS matches_initiator_status_idx ON matches(initiator, status);
CREATE INDEX IF NOT EXISTS matches_target_status_idx    ON matches(target, status);
CREATE INDEX IF NOT EXISTS matches_activity_idx         ON matches(last_activity_at);
CREATE INDEX IF NOT EXISTS messages_conversation_idx    ON messages(conversation_id, created_at);

PRAGMA user_version = 1;
";
