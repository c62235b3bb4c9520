//! Token file persistence
//!
//! The token is serialized in full before anything touches the disk, written
//! with one call to a sibling temp file created 0600, synced, then renamed
//! over the destination. A failure at any point leaves the destination
//! either absent or holding its previous contents.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::token::Token;

/// Write `token` to `path` as indented JSON, readable by the owner only.
pub async fn save_token(path: &Path, token: &Token) -> Result<()> {
    let mut json = serde_json::to_string_pretty(token)
        .map_err(|e| Error::FilePersist(format!("serializing token: {e}")))?;
    json.push('\n');

    let tmp_path = temp_path(path)?;
    if let Err(e) = write_synced(&tmp_path, json.as_bytes()).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(Error::FilePersist(format!(
            "replacing {}: {e}",
            path.display()
        )));
    }

    info!(path = %path.display(), "token saved");
    Ok(())
}

/// Read a token previously written by [`save_token`].
pub async fn load_token(path: &Path) -> Result<Token> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::FilePersist(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::FilePersist(format!("parsing {}: {e}", path.display())))
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::FilePersist(format!("invalid token path {}", path.display())))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(format!(".tmp.{}", std::process::id()));
    Ok(path.with_file_name(tmp_name))
}

async fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .map_err(|e| Error::FilePersist(format!("creating {}: {e}", path.display())))?;

    // A stale temp file from an earlier crash keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| Error::FilePersist(format!("setting token file permissions: {e}")))?;
    }

    file.write_all(data)
        .await
        .map_err(|e| Error::FilePersist(format!("writing {}: {e}", path.display())))?;
    file.sync_all()
        .await
        .map_err(|e| Error::FilePersist(format!("syncing {}: {e}", path.display())))?;

    debug!(path = %path.display(), bytes = data.len(), "wrote temp token file");
    Ok(())
}
