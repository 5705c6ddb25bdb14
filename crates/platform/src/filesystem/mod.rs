//! Filesystem operations used to inspect and delete directory environments

use async_trait::async_trait;
use pyvenv_errors::PlatformError;
use std::path::Path;

use crate::core::PlatformContext;

/// What currently occupies a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    Directory,
    /// A file, symlink to a file, socket or anything else that is not a directory
    Other,
}

/// Trait for filesystem operations
#[async_trait]
pub trait FilesystemOperations: Send + Sync {
    /// Classify what is at `path` (following symlinks)
    async fn path_kind(&self, ctx: &PlatformContext, path: &Path) -> PathKind;

    /// Check whether a regular file exists
    async fn is_file(&self, ctx: &PlatformContext, path: &Path) -> bool;

    /// Read a text file
    async fn read_to_string(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<String, PlatformError>;

    /// Remove a directory and everything under it, including read-only entries
    async fn remove_dir_all(&self, ctx: &PlatformContext, path: &Path)
        -> Result<(), PlatformError>;
}
