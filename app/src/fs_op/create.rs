use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::permissions::Mode;

/// Nested folder layout created beneath a new directory.
///
/// Deserializes from either a list of names (`["src", "docs"]`) or a map
/// whose values describe the next level (`{src = ["bin"], docs = {}}`).
/// Map values may be omitted/`null` for leaf folders in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subfolders {
    Names(Vec<String>),
    Tree(BTreeMap<String, Option<Subfolders>>),
}

/// Options for [`create_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOptions {
    /// Remove an existing directory before creating it again.
    pub overwrite: bool,
    /// Mode requested for every directory created (umask still applies).
    pub permissions: Mode,
    pub subfolders: Option<Subfolders>,
}

impl Default for FolderOptions {
    fn default() -> Self {
        FolderOptions {
            overwrite: false,
            permissions: Mode::DIR_DEFAULT,
            subfolders: None,
        }
    }
}

/// Create the directory `path` (and its parents), then any subfolders
/// described by `opts.subfolders` beneath it.
///
/// With `overwrite`, an existing directory is removed first; an existing
/// non-directory is an error.
pub fn create_folder<P: AsRef<Path>>(path: P, opts: &FolderOptions) -> Result<()> {
    let p = path.as_ref();
    if opts.overwrite && p.exists() {
        if !p.is_dir() {
            return Err(FsOpError::FileSystem(format!("Cannot overwrite file: {}", p.display())));
        }
        fs::remove_dir_all(p)?;
        info!("Removed existing directory: {}", p.display());
    }

    make_dir(p, opts.permissions)?;
    info!("Created directory: {}", p.display());

    match &opts.subfolders {
        Some(Subfolders::Tree(children)) => {
            for (name, nested) in children {
                let child_opts = FolderOptions {
                    subfolders: nested.clone(),
                    ..opts.clone()
                };
                create_folder(p.join(name), &child_opts)?;
            }
        }
        Some(Subfolders::Names(names)) => {
            let child_opts = FolderOptions {
                subfolders: None,
                ..opts.clone()
            };
            for name in names {
                create_folder(p.join(name), &child_opts)?;
            }
        }
        None => {}
    }
    Ok(())
}

/// Create an empty file at `path`, creating missing parent directories.
/// An existing file is truncated.
pub fn create_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let p = path.as_ref();
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::File::create(p)?;
    info!("Created file: {}", p.display());
    Ok(())
}

fn make_dir(path: &Path, mode: Mode) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode.bits());
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_file_and_dir() {
        let td = tempdir().unwrap();
        let dir = td.path().join("a/b");
        let file = dir.join("f.py");
        create_folder(&dir, &FolderOptions::default()).unwrap();
        create_file(&file).unwrap();
        assert!(dir.is_dir());
        assert!(file.is_file());
    }

    #[test]
    fn create_file_makes_parents_and_truncates() {
        let td = tempdir().unwrap();
        let file = td.path().join("deep/er/notes.txt");
        create_file(&file).unwrap();
        fs::write(&file, b"content").unwrap();
        create_file(&file).unwrap();
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);
    }

    #[test]
    fn nested_layout_is_created() {
        let td = tempdir().unwrap();
        let layout: Subfolders = serde_json::from_str(
            r#"{"src": {"core": null, "cli": ["args"]}, "docs": ["api", "guide"]}"#,
        )
        .unwrap();
        let root = td.path().join("proj");
        let opts = FolderOptions {
            subfolders: Some(layout),
            ..FolderOptions::default()
        };
        create_folder(&root, &opts).unwrap();
        for rel in ["src/core", "src/cli/args", "docs/api", "docs/guide"] {
            assert!(root.join(rel).is_dir(), "missing {rel}");
        }
    }

    #[test]
    fn existing_dir_without_overwrite_keeps_contents() {
        let td = tempdir().unwrap();
        let dir = td.path().join("keep");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x.py"), b"").unwrap();
        create_folder(&dir, &FolderOptions::default()).unwrap();
        assert!(dir.join("x.py").exists());
    }

    #[test]
    fn overwrite_replaces_directory() {
        let td = tempdir().unwrap();
        let dir = td.path().join("fresh");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("old.py"), b"").unwrap();
        let opts = FolderOptions {
            overwrite: true,
            ..FolderOptions::default()
        };
        create_folder(&dir, &opts).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join("old.py").exists());
    }

    #[test]
    fn overwrite_refuses_files() {
        let td = tempdir().unwrap();
        let f = td.path().join("plain.txt");
        fs::write(&f, b"x").unwrap();
        let opts = FolderOptions {
            overwrite: true,
            ..FolderOptions::default()
        };
        let err = create_folder(&f, &opts).unwrap_err();
        assert!(matches!(err, FsOpError::FileSystem(ref m) if m.contains("Cannot overwrite file")));
        assert!(f.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn requested_mode_is_applied_under_umask() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let dir = td.path().join("private");
        let opts = FolderOptions {
            permissions: Mode::new(0o700).unwrap(),
            ..FolderOptions::default()
        };
        create_folder(&dir, &opts).unwrap();
        // umask can only clear bits, never add group/other ones back.
        assert_eq!(fs::metadata(&dir).unwrap().permissions().mode() & 0o077, 0);
    }
}
