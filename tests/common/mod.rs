use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use chatkeep::session::SessionStore;
use chatkeep::storage::SledStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (SessionStore<SledStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let kv = SledStore::open(tmp.path().join("sessions.db")).expect("failed to open sled store");
    let store = SessionStore::open(kv).expect("failed to load session list");
    (store, tmp)
}

#[allow(dead_code)]
pub fn reopen_store(dir: &TempDir) -> SessionStore<SledStore> {
    let kv = SledStore::open(dir.path().join("sessions.db")).expect("failed to reopen sled store");
    SessionStore::open(kv).expect("failed to reload session list")
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// `chatkeep` binary with its store in `dir` and no ambient overrides
#[allow(dead_code)]
pub fn chatkeep_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("chatkeep").expect("binary should build");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("GEMINI_API_KEY")
        .env_remove("CHATKEEP_API_KEY")
        .env_remove("CHATKEEP_API_BASE")
        .env_remove("CHATKEEP_MODEL")
        .env_remove("CHATKEEP_STORE_PATH")
        .env_remove("CHATKEEP_TIMEOUT_SECONDS")
        .arg("--config")
        .arg(dir.join("missing-config.yaml"))
        .arg("--store-path")
        .arg(dir.join("sessions.db"));
    cmd
}
