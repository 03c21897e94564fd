//! Provider module for Chatkeep
//!
//! This module contains the text-generation provider abstraction and
//! the Gemini `generateContent` implementation.

pub mod base;
pub mod gemini;

pub use base::Provider;
pub use gemini::{GeminiProvider, NO_RESPONSE_TEXT};

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    Ok(Box::new(GeminiProvider::new(config.clone())?))
}
