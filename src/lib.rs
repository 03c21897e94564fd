//! Chatkeep - a terminal chat client that keeps every conversation
//!
//! This library provides the pieces behind the `chatkeep` binary: a
//! persisted list of chat sessions, a controller that routes messages
//! through a text-generation provider, and the CLI command handlers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: string key-value persistence (sled on disk, in-memory for tests)
//! - `session`: session and message model, ordered session store, import/export
//! - `providers`: provider abstraction and the Gemini implementation
//! - `conversation`: chat controller, reply splitting and session naming
//! - `commands`: interactive chat loop and CLI command handlers
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatkeep::config::ProviderConfig;
//! use chatkeep::conversation::ChatController;
//! use chatkeep::providers::GeminiProvider;
//! use chatkeep::session::SessionStore;
//! use chatkeep::storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SessionStore::open(MemoryStore::new())?;
//!     let provider = GeminiProvider::new(ProviderConfig::default())?;
//!     let mut chat = ChatController::new(provider, store, Default::default());
//!     chat.send("Plan a weekend in Lisbon").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use conversation::ChatController;
pub use error::{ChatkeepError, Result};
pub use session::{Message, Session, SessionStore};

#[cfg(test)]
pub mod test_utils;
