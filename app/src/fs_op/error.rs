use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the filesystem helpers and the `FileManager` facade.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// Expanding, absolutizing or resolving a path failed.
    #[error("Error normalizing path '{path}': {reason}")]
    PathNormalize { path: String, reason: String },

    /// A listing target is missing or is not a directory.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A permission lookup targeted a path that does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Reading or rewriting permission bits failed during an audit.
    #[error("Permission error: '{}': {source}", .path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic filesystem misuse, e.g. overwriting a file with a directory.
    #[error("Filesystem operation failed: {0}")]
    FileSystem(String),

    /// Permission value outside `0..=0o777`.
    #[error("invalid permission value {0:#o}: only the low nine bits are allowed")]
    InvalidPermissions(u32),

    /// Malformed symbolic (`rwxr-xr-x`) or octal (`755`) permission string.
    #[error("invalid permission string: {0:?}")]
    InvalidSymbolic(String),

    /// Wrapper for underlying IO errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<String> for FsOpError {
    fn from(s: String) -> Self {
        FsOpError::FileSystem(s)
    }
}

pub type Result<T> = std::result::Result<T, FsOpError>;
