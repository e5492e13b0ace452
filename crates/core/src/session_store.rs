// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable storage of the booking draft.
//!
//! Drafts are written as a versioned JSON envelope. A draft written by a
//! different schema version is rejected on load rather than partially read.

use crate::error::SessionStoreError;
use crate::session::BookingSession;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Schema version of the stored draft.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// The stored form of a booking draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub schema_version: u32,
    pub session: BookingSession,
}

impl SessionSnapshot {
    /// Wraps a session in the current schema version.
    #[must_use]
    pub fn new(session: BookingSession) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            session,
        }
    }

    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, SessionStoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot and unwraps its session.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the schema version differs.
    pub fn decode(raw: &str) -> Result<BookingSession, SessionStoreError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        if snapshot.schema_version != SESSION_SCHEMA_VERSION {
            return Err(SessionStoreError::SchemaMismatch {
                found: snapshot.schema_version,
                expected: SESSION_SCHEMA_VERSION,
            });
        }
        Ok(snapshot.session)
    }
}

/// Load/save/clear boundary for the booking draft.
pub trait SessionStore {
    /// Loads the stored draft, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft exists but cannot be read.
    fn load(&self) -> Result<Option<BookingSession>, SessionStoreError>;

    /// Replaces the stored draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be written.
    fn save(&self, session: &BookingSession) -> Result<(), SessionStoreError>;

    /// Removes the stored draft. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be removed.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Keeps the encoded draft in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    encoded: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<BookingSession>, SessionStoreError> {
        let guard = self
            .encoded
            .lock()
            .map_err(|_| SessionStoreError::Poisoned)?;
        guard.as_deref().map(SessionSnapshot::decode).transpose()
    }

    fn save(&self, session: &BookingSession) -> Result<(), SessionStoreError> {
        let encoded: String = SessionSnapshot::new(session.clone()).encode()?;
        let mut guard = self
            .encoded
            .lock()
            .map_err(|_| SessionStoreError::Poisoned)?;
        *guard = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut guard = self
            .encoded
            .lock()
            .map_err(|_| SessionStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Keeps the encoded draft in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<BookingSession>, SessionStoreError> {
        let raw: String = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %self.path.display(), "Loaded booking draft");
        SessionSnapshot::decode(&raw).map(Some)
    }

    fn save(&self, session: &BookingSession) -> Result<(), SessionStoreError> {
        let encoded: String = SessionSnapshot::new(session.clone()).encode()?;
        let staging: PathBuf = self.path.with_extension("tmp");
        std::fs::write(&staging, encoded)?;
        std::fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "Saved booking draft");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared booking draft");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
