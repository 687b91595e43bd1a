// Saving a checked result where the user can find it.

use std::path::{Path, PathBuf};

/// Name used when the server-side name is unusable.
const FALLBACK_NAME: &str = "checked_result.xlsx";

/// Write `bytes` as `filename` inside `dir`, creating `dir` if needed.
///
/// Only the final path component of `filename` is used, so a name coming
/// back from the session can never escape `dir`.
pub fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, String> {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| FALLBACK_NAME.into());

    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    let path = dir.join(name);
    std::fs::write(&path, bytes)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    log::info!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
