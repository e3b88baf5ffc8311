//! Configuration module for the Obras backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// How concurrent edits against the same checklist are resolved.
///
/// The original behavior is last-write-wins: both edits succeed and each
/// leaves its own version, with the later commit becoming current. The
/// stricter policy rejects an edit whose load-time token no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditConflictPolicy {
    LastWriteWins,
    RejectStale,
}

impl EditConflictPolicy {
    fn from_env_value(s: &str) -> Self {
        match s {
            "reject-stale" => EditConflictPolicy::RejectStale,
            _ => EditConflictPolicy::LastWriteWins,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Concurrent-edit resolution policy
    pub edit_conflict_policy: EditConflictPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("OBRAS_API_PSK").ok();

        let db_path = env::var("OBRAS_DB_PATH")
            .unwrap_or_else(|_| "./data/obras.sqlite".to_string())
            .into();

        let bind_addr = env::var("OBRAS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid OBRAS_BIND_ADDR format");

        let log_level = env::var("OBRAS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let edit_conflict_policy = env::var("OBRAS_EDIT_CONFLICT_POLICY")
            .map(|s| EditConflictPolicy::from_env_value(&s))
            .unwrap_or(EditConflictPolicy::LastWriteWins);

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            edit_conflict_policy,
        }
    }
}
