//! Filesystem primitives: path normalization, creation, listing and
//! permission handling.

pub mod audit;
pub mod create;
pub mod error;
pub mod files;
pub mod path;
pub mod permissions;

pub use audit::{audit_permissions, AuditReport, Correction};
pub use create::{create_file, create_folder, FolderOptions, Subfolders};
pub use error::FsOpError;
pub use files::list_files;
pub use path::{normalize_path, resolve_under};
pub use permissions::{
    change_permissions, digit_to_symbol, get_permissions, inspect_permissions,
    symbol_to_value, value_to_symbol, Mode, PermissionInfo,
};
