//! Global initialization utilities for the application

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the application environment
///
/// Loads a `.env` file from the current directory or any parent so that
/// `SOLRDEX_*` settings can live next to the deployment instead of the shell.
///
/// Safe to call multiple times - will only run once
pub fn initialize_environment() {
    INIT.call_once(|| match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable environment file: {e}"),
    });
}
