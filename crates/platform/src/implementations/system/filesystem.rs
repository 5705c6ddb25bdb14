//! Filesystem operations on the host system

use async_trait::async_trait;
use pyvenv_errors::PlatformError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::core::PlatformContext;
use crate::filesystem::{FilesystemOperations, PathKind};

/// Host implementation of filesystem operations
pub struct SystemFilesystemOperations;

impl SystemFilesystemOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemFilesystemOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn fs_error(operation: &str, path: &Path, err: &std::io::Error) -> PlatformError {
    PlatformError::FilesystemOperationFailed {
        operation: operation.to_string(),
        message: format!("{}: {err}", path.display()),
    }
}

/// Give the owner write permission on `root` and everything below it.
fn make_tree_writable(root: &Path) -> std::io::Result<()> {
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];
    while let Some(path) = pending.pop() {
        let metadata = std::fs::symlink_metadata(&path)?;
        if metadata.file_type().is_symlink() {
            continue;
        }
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            std::fs::set_permissions(&path, permissions)?;
        }
        if metadata.is_dir() {
            for entry in std::fs::read_dir(&path)? {
                pending.push(entry?.path());
            }
        }
    }
    Ok(())
}

#[async_trait]
impl FilesystemOperations for SystemFilesystemOperations {
    async fn path_kind(&self, _ctx: &PlatformContext, path: &Path) -> PathKind {
        match fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => PathKind::Directory,
            Ok(_) => PathKind::Other,
            // A dangling symlink still occupies the path
            Err(_) => match fs::symlink_metadata(path).await {
                Ok(_) => PathKind::Other,
                Err(_) => PathKind::Missing,
            },
        }
    }

    async fn is_file(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    async fn read_to_string(
        &self,
        _ctx: &PlatformContext,
        path: &Path,
    ) -> Result<String, PlatformError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| fs_error("read_to_string", path, &e))
    }

    async fn remove_dir_all(
        &self,
        _ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                debug!(path = %path.display(), "retrying removal after clearing read-only bits");
                let root = path.to_path_buf();
                tokio::task::spawn_blocking(move || make_tree_writable(&root))
                    .await
                    .map_err(|join| PlatformError::FilesystemOperationFailed {
                        operation: "remove_dir_all".to_string(),
                        message: join.to_string(),
                    })?
                    .map_err(|e| fs_error("remove_dir_all", path, &e))?;
                fs::remove_dir_all(path)
                    .await
                    .map_err(|e| fs_error("remove_dir_all", path, &e))
            }
            Err(e) => Err(fs_error("remove_dir_all", path, &e)),
        }
    }
}
