// ABOUTME: Loads a local .env file into the process environment.
// ABOUTME: Existing variables win; a missing file is not an error.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DOTENV_FILENAME: &str = ".env";

/// Load `dir/.env` if present. Returns the path that was loaded.
///
/// Variables already set in the environment are left untouched, so the
/// file only fills gaps such as `SSL_CERT_ARN` or `AWS_REGION` during local
/// runs.
pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>> {
    let path = dir.join(DOTENV_FILENAME);
    if !path.is_file() {
        return Ok(None);
    }

    dotenvy::from_path(&path)?;
    tracing::debug!(path = %path.display(), "loaded environment file");
    Ok(Some(path))
}
