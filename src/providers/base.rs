//! Base provider trait for Chatkeep
//!
//! A provider turns one prompt string into one reply string. Everything
//! about the wire format lives in the implementation.

use crate::error::Result;
use async_trait::async_trait;

/// Text-generation backend
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use chatkeep::providers::Provider;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     async fn generate(&self, prompt: &str) -> chatkeep::error::Result<String> {
///         Ok(prompt.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `prompt` and return the reply text
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or an
    /// unparseable response body
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model answering requests
    ///
    /// # Default Implementation
    ///
    /// Returns `"unknown"`.
    fn model(&self) -> String {
        "unknown".to_string()
    }
}
