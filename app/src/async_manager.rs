//! Async wrapper around [`FileManager`].
//!
//! Each call is moved onto tokio's blocking pool so filesystem work does not
//! stall the runtime. Results and errors are exactly those of the
//! synchronous methods.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::{AuditReport, FolderOptions, Mode, PermissionInfo};
use crate::manager::FileManager;
use crate::tree::{TreeOptions, TreeRender};

/// Boxed post-processing hook that can cross into a worker thread.
pub type PostProcess = Box<dyn Fn(&str) -> String + Send + 'static>;

#[derive(Debug, Clone)]
pub struct AsyncFileManager {
    inner: Arc<FileManager>,
}

impl From<FileManager> for AsyncFileManager {
    fn from(fm: FileManager) -> Self {
        AsyncFileManager { inner: Arc::new(fm) }
    }
}

impl AsyncFileManager {
    pub async fn new(root: PathBuf) -> Result<Self> {
        offload(move || FileManager::new(root)).await.map(Self::from)
    }

    pub fn root(&self) -> &Path {
        self.inner.root()
    }

    pub async fn create_folder(&self, name: PathBuf, opts: FolderOptions) -> Result<()> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.create_folder(name, &opts)).await
    }

    pub async fn create_file(&self, file: PathBuf, sub_folder: Option<PathBuf>) -> Result<()> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.create_file(file, sub_folder.as_deref())).await
    }

    pub async fn list_files(&self, dir: PathBuf, extension: Option<String>, recursive: bool) -> Result<Vec<PathBuf>> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.list_files(dir, extension.as_deref(), recursive)).await
    }

    pub async fn get_permissions(&self, path: PathBuf) -> Result<Mode> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.get_permissions(path)).await
    }

    pub async fn inspect_permissions(&self, path: PathBuf) -> Result<PermissionInfo> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.inspect_permissions(path)).await
    }

    pub async fn audit_permissions(&self, dir: PathBuf, target: Mode, follow_symlinks: bool) -> Result<AuditReport> {
        let fm = Arc::clone(&self.inner);
        offload(move || fm.audit_permissions(dir, target, follow_symlinks)).await
    }

    pub async fn render_tree(
        &self,
        dir: PathBuf,
        opts: TreeOptions,
        post_process: Option<PostProcess>,
    ) -> Result<TreeRender> {
        let fm = Arc::clone(&self.inner);
        offload(move || {
            let hook = post_process.as_deref().map(|f| f as &dyn Fn(&str) -> String);
            fm.render_tree(dir, &opts, hook)
        })
        .await
    }
}

async fn offload<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| FsOpError::FileSystem(format!("blocking worker failed: {e}")))?
}
