//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::PathBuf;

use tracing::info;

/// File path behind a `sqlite:` URL, or `None` for in-memory and non-sqlite URLs.
pub fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    let path = path.strip_prefix("file:").unwrap_or(path);
    Some(PathBuf::from(path))
}

/// Ensure the directory holding a sqlite database file exists.
pub async fn ensure_db_dir(db_url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(db_url) else {
        return Ok(());
    };
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_err() {
        info!(dir = %parent.display(), "creating sqlite data directory");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
