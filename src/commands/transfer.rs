//! Export and import of the full session list
//!
//! The exported file is the persisted session document verbatim, so an
//! export from one store imports cleanly into another.

use crate::commands::open_store;
use crate::config::Config;
use crate::error::{ChatkeepError, Result};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Write every session in `store` to `path`; `-` writes to stdout
///
/// # Returns
///
/// The number of sessions written
pub fn export_to<S: KeyValueStore>(store: &SessionStore<S>, path: &Path) -> Result<usize> {
    let document = store.export()?;

    if path == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(path, document)?;
        tracing::info!("Exported {} sessions to {}", store.len(), path.display());
    }

    Ok(store.len())
}

/// Read an import document from `path`
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ChatkeepError::Storage(format!("Failed to read {}: {}", path.display(), e)).into()
    })
}

/// Handle `export`
pub fn run_export(config: &Config, output: &Path) -> Result<()> {
    let store = open_store(config)?;
    let count = export_to(&store, output)?;
    if output != Path::new("-") {
        println!(
            "{}",
            format!("Exported {} sessions to {}", count, output.display()).green()
        );
    }
    Ok(())
}

/// Handle `import`
///
/// # Errors
///
/// Returns `ChatkeepError::InvalidImportFormat` when the file is not an
/// exported session list; the store is left untouched in that case.
pub fn run_import(config: &Config, path: &Path) -> Result<()> {
    let mut store = open_store(config)?;
    let document = read_document(path)?;
    let added = store.import(&document)?;
    println!("{}", format!("Imported {} sessions", added).green());
    Ok(())
}
