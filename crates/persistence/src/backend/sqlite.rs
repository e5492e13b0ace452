// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Every connection gets foreign keys switched on and the embedded migrations
//! applied before it is handed out. File databases additionally run in WAL
//! mode with a busy timeout so a second process waits instead of failing.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a writer waits on a locked file database.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where a connection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// A named shared-cache in-memory database.
    Memory(String),
    /// A database file path.
    File(String),
}

impl DatabaseTarget {
    fn url(&self) -> String {
        match self {
            Self::Memory(name) => format!("file:{name}?mode=memory&cache=shared"),
            Self::File(path) => path.clone(),
        }
    }
}

#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns `last_insert_rowid()` for this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read or enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: PragmaRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(statement)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))?;
    Ok(())
}

/// Opens `target`, configures it and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the connection, configuration, migrations or the
/// foreign key check fail.
pub fn connect(target: &DatabaseTarget) -> Result<SqliteConnection, PersistenceError> {
    let url: String = target.url();
    info!(database = %url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(&url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    if matches!(target, DatabaseTarget::File(_)) {
        pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
        pragma(&mut conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(count = applied.len(), "Applied pending migrations");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
