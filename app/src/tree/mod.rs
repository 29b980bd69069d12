//! Directory structure rendering.
//!
//! Two independent passes over the live filesystem:
//! - [`text`] draws a markdown-fenced box-drawing tree of directories and
//!   source files;
//! - [`mapping`] builds a nested name -> dotted module path map, nesting
//!   only at package directories (those holding [`PACKAGE_MARKER`]).
//!
//! When both are requested the directory is walked twice, so the outputs
//! can disagree if the tree changes in between.

pub mod mapping;
pub mod text;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fs_op::error::{FsOpError, Result};

/// Extension of the files both renderers index.
pub const SOURCE_EXTENSION: &str = "py";
/// File whose presence turns a directory into a package.
pub const PACKAGE_MARKER: &str = "__init__.py";
/// Names starting with this character count as hidden.
pub const HIDDEN_PREFIX: char = '.';
/// Directory names skipped when the caller supplies no exclusion set.
pub const DEFAULT_EXCLUDED: [&str; 3] = [".venv", "__pycache__", "tests"];

/// Which outputs [`render_tree`] should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[value(alias = "markdown")]
    Text,
    #[value(alias = "dict")]
    Mapping,
    #[default]
    Both,
}

impl RenderMode {
    pub fn wants_text(self) -> bool {
        matches!(self, RenderMode::Text | RenderMode::Both)
    }

    pub fn wants_mapping(self) -> bool {
        matches!(self, RenderMode::Mapping | RenderMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    pub excluded: BTreeSet<String>,
    pub exclude_hidden: bool,
    pub mode: RenderMode,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            exclude_hidden: true,
            mode: RenderMode::Both,
        }
    }
}

impl TreeOptions {
    /// True when `name` is in the exclusion set or is hidden while hidden
    /// names are filtered.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name) || (self.exclude_hidden && name.starts_with(HIDDEN_PREFIX))
    }
}

/// One level of the module mapping.
pub type ModuleMap = BTreeMap<String, ModuleNode>;

/// A value in the module mapping: either a dotted module path or a nested
/// package level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleNode {
    Module(String),
    Package(ModuleMap),
}

/// Result of [`render_tree`]. Each field is `None` when its mode was not
/// requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeRender {
    pub text: Option<String>,
    pub mapping: Option<ModuleMap>,
}

/// Render `root` according to `opts`.
///
/// `post_process`, when given, receives the assembled text and its return
/// value replaces it.
pub fn render_tree(
    root: &Path,
    opts: &TreeOptions,
    post_process: Option<&dyn Fn(&str) -> String>,
) -> Result<TreeRender> {
    if !root.is_dir() {
        return Err(FsOpError::DirectoryNotFound(root.to_path_buf()));
    }
    debug!("Rendering {} as {:?}", root.display(), opts.mode);

    let text = if opts.mode.wants_text() {
        let raw = text::render_text(root, opts)?;
        Some(match post_process {
            Some(f) => f(&raw),
            None => raw,
        })
    } else {
        None
    };
    let mapping = if opts.mode.wants_mapping() {
        Some(mapping::build_mapping(root, opts)?)
    } else {
        None
    };
    Ok(TreeRender { text, mapping })
}

/// A directory child as seen by the renderers. `is_dir` follows symlinks.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

pub(crate) fn read_entries(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        let path = item.path();
        entries.push(Entry {
            name: item.file_name().to_string_lossy().into_owned(),
            is_dir: path.is_dir(),
            path,
        });
    }
    Ok(entries)
}

/// Stem of `name` when it carries the source extension.
pub(crate) fn source_stem(name: &str) -> Option<&str> {
    let p = Path::new(name);
    if p.extension()? != SOURCE_EXTENSION {
        return None;
    }
    p.file_stem()?.to_str()
}

pub(crate) fn is_package(dir: &Path) -> bool {
    dir.join(PACKAGE_MARKER).exists()
}

pub(crate) fn root_name(root: &Path) -> String {
    match root.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => root.display().to_string(),
    }
}

/// Extend the chain of resolved ancestors with `dir`, or return `None` when
/// `dir` resolves to one of them (a symlink loop).
pub(crate) fn descend(dir: &Path, ancestors: &[PathBuf]) -> Result<Option<Vec<PathBuf>>> {
    let resolved = fs::canonicalize(dir)?;
    if ancestors.contains(&resolved) {
        debug!("Not descending into {}: symlink loop", dir.display());
        return Ok(None);
    }
    let mut chain = ancestors.to_vec();
    chain.push(resolved);
    Ok(Some(chain))
}
