use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Read and parse a JSON document. A missing file yields `Ok(None)`; an
/// unreadable or malformed one is an error so callers never silently start
/// from an empty document.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ServiceError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ServiceError::Storage(format!("read {}: {e}", path.display()))),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ServiceError::Storage(format!("parse {}: {e}", path.display())))
}

/// Serialize `value` and replace `path` atomically: write a sibling temp
/// file, fsync it, rename over the target, then fsync the directory so the
/// rename itself survives a crash.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(value).map_err(ServiceError::storage)?;
    let tmp = temp_path(path);

    let written: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!(tmp = %tmp.display(), error = %cleanup, "failed to remove temp file");
            }
        }
        return Err(ServiceError::Storage(format!("write {}: {e}", path.display())));
    }

    // The new document is already in place; a failed directory sync only
    // weakens durability.
    if let Err(e) = sync_dir(parent_dir(path)).await {
        warn!(path = %path.display(), error = %e, "failed to sync parent directory");
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        items: Vec<String>,
    }

    fn tmp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("json_file_{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        let got: Option<Doc> = read_json(&dir.join("absent.json")).await?;
        assert!(got.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn atomic_write_replaces_and_leaves_no_temp_files() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        fs::create_dir_all(&dir).await?;
        let path = dir.join("doc.json");

        write_json_atomic(&path, &Doc { items: vec!["a".into()] }).await?;
        write_json_atomic(&path, &Doc { items: vec!["b".into(), "c".into()] }).await?;

        let got: Option<Doc> = read_json(&path).await?;
        assert_eq!(got, Some(Doc { items: vec!["b".into(), "c".into()] }));

        let mut entries = fs::read_dir(&dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["doc.json".to_string()]);

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        fs::create_dir_all(&dir).await?;
        let path = dir.join("broken.json");
        fs::write(&path, b"{not json").await?;

        let res: Result<Option<Doc>, _> = read_json(&path).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[test]
    fn parent_dir_of_bare_file_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("keys.json")), Path::new("."));
        assert_eq!(parent_dir(Path::new("data/keys.json")), Path::new("data"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn directory_sync_succeeds_on_existing_dir() -> Result<(), anyhow::Error> {
        let dir = tmp_dir();
        fs::create_dir_all(&dir).await?;
        sync_dir(&dir).await?;
        assert!(sync_dir(&dir.join("missing")).await.is_err());
        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails_cleanly() {
        let path = tmp_dir().join("nope/doc.json");
        let res = write_json_atomic(&path, &Doc { items: vec![] }).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
    }
}
