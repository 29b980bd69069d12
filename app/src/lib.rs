//! pathwiz: a convenience layer over filesystem calls for scripts and small
//! tools. Creates folders and files, lists files, inspects and normalizes
//! permission bits, and renders a project's layout as a tree.

#[cfg(feature = "async")]
pub mod async_manager;
pub mod fs_op;
pub mod logging;
pub mod manager;
pub mod settings;
pub mod tree;

#[cfg(feature = "async")]
pub use crate::async_manager::AsyncFileManager;
pub use crate::fs_op::FsOpError;
pub use crate::manager::FileManager;
pub use crate::tree::{render_tree, ModuleMap, ModuleNode, RenderMode, TreeOptions, TreeRender};
