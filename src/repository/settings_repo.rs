//! Settings Repository
//!
//! Keyed boolean flags persisted across process restarts, e.g. the
//! one-time "seed already performed" launch flag.

use std::sync::Arc;

use libsql::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Key for the one-time launch flag; true means the seed step already ran
pub const HAS_LAUNCHED_BEFORE: &str = "has_launched_before";

pub struct SettingsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Read a flag; missing keys default to false
    pub async fn flag(&self, key: &str) -> DomainResult<bool> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE key = ?",
                libsql::params![key],
            )
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?;

        match rows
            .next()
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?
        {
            Some(row) => {
                let value = row
                    .get::<String>(0)
                    .map_err(|e| DomainError::StoreRead(e.to_string()))?;
                Ok(value == "true")
            }
            None => Ok(false),
        }
    }

    /// Set a flag, creating or replacing the row
    pub async fn set_flag(&self, key: &str, value: bool) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            libsql::params![key, if value { "true" } else { "false" }],
        )
        .await
        .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        Ok(())
    }
}
