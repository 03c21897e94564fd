//! Ordered session list persisted to a key-value store
//!
//! Every mutating operation stages its change on a copy of the list,
//! writes that copy to the store, and only then adopts it. A failed
//! write leaves the in-memory list as it was, so it always matches the
//! persisted document.

use super::types::{compare_sessions, Message, Session, DEFAULT_SESSION_NAME};
use crate::error::{ChatkeepError, Result};
use crate::storage::KeyValueStore;
use std::collections::HashSet;
use ulid::Generator;

/// Key under which the session list is stored
pub const SESSIONS_KEY: &str = "chatSessions";

/// Session list manager
///
/// # Examples
///
/// ```
/// use chatkeep::session::SessionStore;
/// use chatkeep::storage::MemoryStore;
///
/// # fn main() -> chatkeep::error::Result<()> {
/// let mut store = SessionStore::open(MemoryStore::new())?;
/// let id = store.create()?;
/// store.rename(&id, "Trip planning")?;
/// assert_eq!(store.filter("trip").len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SessionStore<S: KeyValueStore> {
    kv: S,
    sessions: Vec<Session>,
    id_gen: Generator,
    default_name: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Load the session list from `kv`
    ///
    /// A missing key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the stored value is not a
    /// JSON array of sessions
    pub fn open(kv: S) -> Result<Self> {
        let sessions = match kv.get(SESSIONS_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<Session>>(&raw).map_err(|e| {
                ChatkeepError::Storage(format!("Stored session list is corrupt: {}", e))
            })?,
            None => Vec::new(),
        };
        tracing::debug!("Loaded {} sessions", sessions.len());

        Ok(Self {
            kv,
            sessions,
            id_gen: Generator::new(),
            default_name: DEFAULT_SESSION_NAME.to_string(),
        })
    }

    /// Use `name` as the placeholder for new sessions
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Placeholder name given to new sessions
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Sessions in display order
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Underlying key-value store
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Create an empty session at the front of the list
    ///
    /// # Returns
    ///
    /// The new session id
    pub fn create(&mut self) -> Result<String> {
        let id = self.next_id()?;
        let session = Session::new(id.clone(), self.default_name.clone());
        self.commit(|sessions| {
            sessions.insert(0, session);
            Ok(())
        })?;
        tracing::info!("Created session {}", id);
        Ok(id)
    }

    /// Look up a session by exact id
    pub fn load(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Resolve an exact id or a unique id prefix to a full id
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::SessionNotFound` if nothing matches or
    /// the prefix is ambiguous
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<String> {
        if self.load(id_or_prefix).is_some() {
            return Ok(id_or_prefix.to_string());
        }

        let mut matches = self
            .sessions
            .iter()
            .filter(|s| !id_or_prefix.is_empty() && s.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(session), None) => Ok(session.id.clone()),
            (Some(_), Some(_)) => Err(ChatkeepError::SessionNotFound(format!(
                "{} (prefix is ambiguous)",
                id_or_prefix
            ))
            .into()),
            _ => Err(ChatkeepError::SessionNotFound(id_or_prefix.to_string()).into()),
        }
    }

    /// Remove a session
    ///
    /// # Returns
    ///
    /// `true` if a session was removed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.load(id).is_none() {
            return Ok(false);
        }
        self.commit(|sessions| {
            sessions.retain(|s| s.id != id);
            Ok(())
        })?;
        tracing::info!("Deleted session {}", id);
        Ok(true)
    }

    /// Rename a session
    ///
    /// Blank names are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the name was replaced, `false` if `new_name` was blank
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::SessionNotFound` for an unknown id
    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<bool> {
        let name = new_name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring blank rename for session {}", id);
            return Ok(false);
        }

        self.commit(|sessions| {
            find_mut(sessions, id)?.name = name.to_string();
            Ok(true)
        })
    }

    /// Flip the pinned flag and re-sort
    ///
    /// # Returns
    ///
    /// The new pinned state
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        self.commit(|sessions| {
            let session = find_mut(sessions, id)?;
            session.pinned = !session.pinned;
            let pinned = session.pinned;
            sessions.sort_by(compare_sessions);
            Ok(pinned)
        })
    }

    /// Append a message to a session
    pub fn append_message(&mut self, id: &str, message: Message) -> Result<()> {
        self.commit(|sessions| {
            find_mut(sessions, id)?.messages.push(message);
            Ok(())
        })
    }

    /// Serialize the full list as a JSON document
    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.sessions)?)
    }

    /// Merge sessions from a JSON document
    ///
    /// Sessions whose id is already present are skipped. The merged list
    /// is re-sorted.
    ///
    /// # Returns
    ///
    /// Number of sessions added
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::InvalidImportFormat` if the document is
    /// not a JSON array of sessions; the list is left untouched
    pub fn import(&mut self, document: &str) -> Result<usize> {
        let value: serde_json::Value =
            serde_json::from_str(document).map_err(|_| ChatkeepError::InvalidImportFormat)?;
        if !value.is_array() {
            return Err(ChatkeepError::InvalidImportFormat.into());
        }
        let incoming: Vec<Session> =
            serde_json::from_value(value).map_err(|_| ChatkeepError::InvalidImportFormat)?;

        let added = self.commit(|sessions| {
            let mut seen: HashSet<String> = sessions.iter().map(|s| s.id.clone()).collect();
            let mut added = 0;
            for session in incoming {
                if seen.insert(session.id.clone()) {
                    sessions.push(session);
                    added += 1;
                } else {
                    tracing::debug!("Skipping imported session {}: id already present", session.id);
                }
            }
            sessions.sort_by(compare_sessions);
            Ok(added)
        })?;
        tracing::info!("Imported {} sessions", added);
        Ok(added)
    }

    /// Sessions whose name contains `term`, ignoring case
    pub fn filter(&self, term: &str) -> Vec<&Session> {
        let needle = term.to_lowercase();
        self.sessions
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }


    fn next_id(&mut self) -> Result<String> {
        loop {
            let id = self
                .id_gen
                .generate()
                .map_err(|e| ChatkeepError::Storage(format!("Failed to generate id: {}", e)))?
                .to_string();
            if self.load(&id).is_none() {
                return Ok(id);
            }
        }
    }

    /// Apply `change` to a copy of the list, persist it, then adopt it
    fn commit<T>(&mut self, change: impl FnOnce(&mut Vec<Session>) -> Result<T>) -> Result<T> {
        let mut staged = self.sessions.clone();
        let out = change(&mut staged)?;
        let document = serde_json::to_string(&staged)?;
        self.kv.set(SESSIONS_KEY, &document)?;
        self.sessions = staged;
        Ok(out)
    }
}

fn find_mut<'a>(sessions: &'a mut [Session], id: &str) -> Result<&'a mut Session> {
    sessions
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ChatkeepError::SessionNotFound(id.to_string()).into())
}
