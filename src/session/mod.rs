//! Chat sessions and their persisted, ordered list
//!
//! - `types`: session and message data model, ordering comparator
//! - `store`: [`SessionStore`], the CRUD/merge/filter layer over a
//!   [`KeyValueStore`](crate::storage::KeyValueStore)

pub mod store;
pub mod types;

pub use store::{SessionStore, SESSIONS_KEY};
pub use types::{compare_sessions, Message, MessageText, Sender, Session, DEFAULT_SESSION_NAME};
