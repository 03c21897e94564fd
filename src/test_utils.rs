//! Test utilities for Chatkeep
//!
//! Temporary directories, a scripted provider, and assertion helpers
//! shared by unit tests.

use crate::config::Config;
use crate::error::{ChatkeepError, Result};
use crate::providers::Provider;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error containing '{}', got Ok({:?})", expected, value),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(expected),
                "Expected error containing '{}', got '{}'",
                expected,
                message
            );
        }
    }
}

/// Create a configuration whose session store lives in `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.path = Some(dir.path().join("sessions.db"));
    config
}

/// Provider returning canned outcomes in order and recording prompts
///
/// `Err` entries become provider failures. Once the script runs out
/// every call answers `"Done"`.
pub struct ScriptedProvider {
    replies: Mutex<Vec<std::result::Result<String, String>>>,
    /// Every prompt received, in call order
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(ChatkeepError::Provider(e).into()),
            None => Ok("Done".to_string()),
        }
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "hello");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_test_config_points_into_dir() {
        let dir = temp_dir();
        let config = test_config(&dir);
        assert!(config.storage.path.unwrap().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_scripted_provider_replays_then_defaults() {
        let provider = ScriptedProvider::new(vec![Ok("a".into()), Err("boom".into())]);
        assert_eq!(provider.generate("1").await.unwrap(), "a");
        assert_error_contains(provider.generate("2").await, "boom");
        assert_eq!(provider.generate("3").await.unwrap(), "Done");
        assert_eq!(provider.prompts.lock().unwrap().len(), 3);
    }
}
