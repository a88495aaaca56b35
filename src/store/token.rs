// Single-row persistence of the client-credentials token

use chrono::Utc;
use rusqlite::OptionalExtension;
use serde::Serialize;

use super::Database;
use crate::error::StoreError;

/// Seconds shaved off the upstream lifetime to absorb clock skew and latency
pub const SAFETY_MARGIN_SECS: i64 = 10;

/// App-level bearer token with its absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Epoch seconds
    pub expires_at: i64,
}

impl StoredToken {
    /// Build a token that expires `expires_in` seconds after `now`, minus the safety margin
    pub fn issued_at(access_token: impl Into<String>, expires_in: u64, now: i64) -> Self {
        let lifetime = i64::try_from(expires_in).unwrap_or(i64::MAX);
        Self {
            access_token: access_token.into(),
            expires_at: now
                .saturating_add(lifetime)
                .saturating_sub(SAFETY_MARGIN_SECS),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Durable storage for the client-credentials token
///
/// Exactly one logical row exists; `save` replaces it wholesale.
pub trait CredentialStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<StoredToken>, StoreError>;

    /// Persist a freshly issued token and return what was written
    fn save(&self, access_token: &str, expires_in: u64) -> Result<StoredToken, StoreError>;
}

/// `CredentialStore` backed by the `spotify_token` table
#[derive(Clone, Debug)]
pub struct SqliteCredentialStore {
    db: Database,
}

impl SqliteCredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn load(&self) -> Result<Option<StoredToken>, StoreError> {
        let conn = self.db.connect()?;

        let token = conn
            .query_row(
                "SELECT access_token, expires_at FROM spotify_token WHERE id = 1",
                [],
                |row| {
                    Ok(StoredToken {
                        access_token: row.get(0)?,
                        expires_at: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(token)
    }

    fn save(&self, access_token: &str, expires_in: u64) -> Result<StoredToken, StoreError> {
        let token = StoredToken::issued_at(access_token, expires_in, Utc::now().timestamp());

        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM spotify_token", [])?;
        tx.execute(
            "INSERT INTO spotify_token (id, access_token, expires_at) VALUES (1, ?1, ?2)",
            rusqlite::params![token.access_token, token.expires_at],
        )?;
        tx.commit()?;

        tracing::debug!(expires_at = token.expires_at, "Persisted client-credentials token");
        Ok(token)
    }
}
