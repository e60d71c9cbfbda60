//! Session store backed by the CLI's session file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use authgate_file::FileStorage;
use authgate_http::SessionStore;

use crate::cli::Cli;
use crate::config;

/// Everything a command needs.
pub struct App {
    pub store: SessionStore,
    pub storage: Arc<FileStorage>,
}

/// Get the session file path.
fn session_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.session_file {
        return Ok(path.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "authgate").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join("session.json"))
}

/// Resolve configuration and hydrate the session from disk.
pub fn open(cli: &Cli) -> Result<App> {
    let config = config::resolve(cli)?;
    let storage = Arc::new(FileStorage::new(session_path(cli)?));
    tracing::debug!(path = %storage.path().display(), "Using session file");

    let store =
        SessionStore::new(config, storage.clone()).context("Failed to initialise session")?;

    Ok(App { store, storage })
}
