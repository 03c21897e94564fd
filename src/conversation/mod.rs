//! Conversation control for Chatkeep
//!
//! This module provides:
//! - [`ChatController`]: sends user messages through a provider and
//!   records both sides in the session store
//! - Reply and naming transforms (`split_reply`, `derive_session_name`)

pub mod controller;
pub mod reply;

pub use controller::{ChatController, ControllerState, PendingReply};
pub use reply::{derive_session_name, split_reply, BULLET_DELIMITER};
