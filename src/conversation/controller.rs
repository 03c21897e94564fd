//! Conversation controller
//!
//! Owns the active-session selection and the Idle/AwaitingReply state,
//! and routes each user message through the provider into the session
//! store.

use super::reply::{derive_session_name, split_reply};
use crate::config::ChatConfig;
use crate::error::{ChatkeepError, Result};
use crate::providers::Provider;
use crate::session::{Message, Session, SessionStore};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether a reply is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No request in flight
    Idle,
    /// At least one request is waiting for its reply
    AwaitingReply,
}

/// A user message that has been recorded and still needs a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    session_id: String,
    prompt: String,
}

impl PendingReply {
    /// Session the reply will be appended to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Raw text sent to the provider
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Drives a chat over a [`SessionStore`]
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use chatkeep::config::ChatConfig;
/// use chatkeep::conversation::ChatController;
/// use chatkeep::providers::Provider;
/// use chatkeep::session::SessionStore;
/// use chatkeep::storage::MemoryStore;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Provider for Canned {
///     async fn generate(&self, _prompt: &str) -> chatkeep::error::Result<String> {
///         Ok("* one* two".to_string())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> chatkeep::error::Result<()> {
/// let store = SessionStore::open(MemoryStore::new())?;
/// let mut chat = ChatController::new(Canned, store, ChatConfig::default());
/// chat.send("List two things").await?;
/// assert_eq!(chat.active_messages().len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ChatController<S: KeyValueStore> {
    provider: Arc<dyn Provider>,
    store: SessionStore<S>,
    config: ChatConfig,
    active: Option<String>,
    outstanding: usize,
}

impl<S: KeyValueStore> ChatController<S> {
    /// Creates a controller with the first listed session active
    pub fn new(
        provider: impl Provider + 'static,
        store: SessionStore<S>,
        config: ChatConfig,
    ) -> Self {
        Self::from_arc(Arc::new(provider), store, config)
    }

    /// Creates a controller with a boxed provider
    ///
    /// Useful when the provider type is chosen at runtime.
    pub fn new_boxed(
        provider: Box<dyn Provider>,
        store: SessionStore<S>,
        config: ChatConfig,
    ) -> Self {
        Self::from_arc(Arc::from(provider), store, config)
    }

    fn from_arc(provider: Arc<dyn Provider>, store: SessionStore<S>, config: ChatConfig) -> Self {
        let active = store.sessions().first().map(|s| s.id.clone());
        Self {
            provider,
            store,
            config,
            active,
            outstanding: 0,
        }
    }

    /// Read access to the session list
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Current request state
    pub fn state(&self) -> ControllerState {
        if self.outstanding > 0 {
            ControllerState::AwaitingReply
        } else {
            ControllerState::Idle
        }
    }

    /// Id of the active session
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active session
    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_deref().and_then(|id| self.store.load(id))
    }

    /// Messages of the active session, empty when none is active
    pub fn active_messages(&self) -> &[Message] {
        self.active_session()
            .map(|s| s.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Create a session and make it active
    pub fn create_session(&mut self) -> Result<String> {
        let id = self.store.create()?;
        self.active = Some(id.clone());
        Ok(id)
    }

    /// Make `id` the active session
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::SessionNotFound` for an unknown id
    pub fn select_session(&mut self, id: &str) -> Result<()> {
        if self.store.load(id).is_none() {
            return Err(ChatkeepError::SessionNotFound(id.to_string()).into());
        }
        debug!("Selected session {}", id);
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Delete a session
    ///
    /// Deleting the active session selects the first remaining one, or
    /// none when the list is empty.
    pub fn delete_session(&mut self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed && self.active.as_deref() == Some(id) {
            self.active = self.store.sessions().first().map(|s| s.id.clone());
            debug!("Active session fell back to {:?}", self.active);
        }
        Ok(removed)
    }

    /// Rename a session; blank names are ignored
    pub fn rename_session(&mut self, id: &str, new_name: &str) -> Result<bool> {
        self.store.rename(id, new_name)
    }

    /// Flip a session's pinned flag
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        self.store.toggle_pin(id)
    }

    /// Merge sessions from an exported document
    pub fn import_sessions(&mut self, document: &str) -> Result<usize> {
        let added = self.store.import(document)?;
        if self.active.is_none() {
            self.active = self.store.sessions().first().map(|s| s.id.clone());
        }
        Ok(added)
    }

    /// Record a user message and prepare the outbound request
    ///
    /// Blank text is ignored. Without an active session a new one is
    /// created. A session still carrying the placeholder name is renamed
    /// after the first words of `text`.
    ///
    /// # Returns
    ///
    /// The pending request, or `None` if `text` was blank
    pub fn begin_send(&mut self, text: &str) -> Result<Option<PendingReply>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let session_id = match self.active.clone() {
            Some(id) if self.store.load(&id).is_some() => id,
            _ => self.create_session()?,
        };

        self.store.append_message(&session_id, Message::user(text))?;

        let needs_name = self
            .store
            .load(&session_id)
            .map(|s| s.name == self.store.default_name())
            .unwrap_or(false);
        if needs_name {
            let name = derive_session_name(text, self.config.name_word_count);
            self.store.rename(&session_id, &name)?;
            debug!("Named session {} '{}'", session_id, name);
        }

        self.outstanding += 1;
        Ok(Some(PendingReply {
            session_id,
            prompt: text.to_string(),
        }))
    }

    /// Append the bot reply for `pending`
    ///
    /// A successful reply is split into bullet lines; a failure becomes
    /// the configured error message. The reply goes to the session the
    /// request came from, whichever session is active now.
    ///
    /// # Returns
    ///
    /// The appended message, or `None` if the session was deleted in
    /// the meantime
    pub fn complete(
        &mut self,
        pending: PendingReply,
        outcome: Result<String>,
    ) -> Result<Option<Message>> {
        self.outstanding = self.outstanding.saturating_sub(1);

        let message = match outcome {
            Ok(reply) => Message::bot(split_reply(&reply)),
            Err(e) => {
                warn!("Request for session {} failed: {}", pending.session_id, e);
                Message::bot(self.config.error_reply.clone())
            }
        };

        if self.store.load(&pending.session_id).is_none() {
            warn!(
                "Session {} was deleted before its reply arrived; dropping reply",
                pending.session_id
            );
            return Ok(None);
        }

        self.store.append_message(&pending.session_id, message.clone())?;
        Ok(Some(message))
    }

    /// Send `text` and append the reply
    ///
    /// # Returns
    ///
    /// The bot message, or `None` if `text` was blank
    pub async fn send(&mut self, text: &str) -> Result<Option<Message>> {
        let Some(pending) = self.begin_send(text)? else {
            return Ok(None);
        };

        info!("Sending message in session {}", pending.session_id);
        let provider = Arc::clone(&self.provider);
        let outcome = provider.generate(pending.prompt()).await;
        self.complete(pending, outcome)
    }
}
