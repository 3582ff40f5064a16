// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use answerkit_core::AnswerkitError;

use crate::migrations;

/// Convert tokio-rusqlite errors into `AnswerkitError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> AnswerkitError {
    AnswerkitError::Storage {
        source: Box::new(e),
    }
}

/// Owned handle to the SQLite database.
///
/// Opening runs pending migrations and configures pragmas before the handle
/// is returned, so every `Database` value is ready for queries.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at `path` and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AnswerkitError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| AnswerkitError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        // tokio-rusqlite surfaces open failures as plain rusqlite errors.
        let conn = Connection::open(path).await.map_err(|e| AnswerkitError::Storage {
            source: Box::new(e),
        })?;
        Self::configure(&conn, wal_mode).await?;
        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (tests and ephemeral tooling).
    pub async fn open_in_memory() -> Result<Self, AnswerkitError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| AnswerkitError::Storage {
                source: Box::new(e),
            })?;
        Self::configure(&conn, false).await?;
        Ok(Self { conn })
    }

    async fn configure(conn: &Connection, wal_mode: bool) -> Result<(), AnswerkitError> {
        conn.call(move |conn| {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the handle.
    pub async fn close(&self) -> Result<(), AnswerkitError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
