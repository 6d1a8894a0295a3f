//! nestmate server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the match/messaging API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use nestmate_api::AppState;
use nestmate_core::{
  clock::SystemClock,
  event::{DomainEvent, EventSink},
};
use nestmate_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `NESTMATE_`-prefixed environment overrides.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".into()
}

fn default_port() -> u16 {
  4000
}

fn default_store_path() -> PathBuf {
  PathBuf::from("nestmate.db")
}

// ─── Event sink ──────────────────────────────────────────────────────────────

/// Logs domain events. Stands in for the notification dispatcher until one
/// is wired; delivery failures here can never fail the originating request.
struct LogSink;

impl EventSink for LogSink {
  fn emit(&self, event: DomainEvent) {
    match &event {
      DomainEvent::Matched { record } => {
        tracing::info!(match_id = %record.match_id, "event: matched");
      }
      DomainEvent::Unmatched { record } => {
        tracing::info!(match_id = %record.match_id, "event: unmatched");
      }
      DomainEvent::Blocked { record, by } => {
        tracing::info!(match_id = %record.match_id, %by, "event: blocked");
      }
      DomainEvent::MessageSent { conversation_id, message_id, .. } => {
        tracing::debug!(%conversation_id, %message_id, "event: message sent");
      }
    }
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "nestmate match/messaging server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("NESTMATE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(
    Arc::new(store),
    Arc::new(SystemClock),
    Arc::new(LogSink),
  );

  let app = nestmate_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
