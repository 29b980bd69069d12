use std::path::{Path, PathBuf};

use crate::fs_op::error::Result;
use crate::tree::{descend, is_package, read_entries, root_name, source_stem, ModuleMap, ModuleNode, TreeOptions};

/// Build the module mapping for `root`.
///
/// A root that is itself a package becomes a single top-level entry named
/// after it; otherwise its contents form the top level directly.
pub fn build_mapping(root: &Path, opts: &TreeOptions) -> Result<ModuleMap> {
    let Some(chain) = descend(root, &[])? else {
        return Ok(ModuleMap::new());
    };
    if !is_package(root) {
        return module_entries(root, "", opts, &chain);
    }
    let name = root_name(root);
    let inner = module_entries(root, &format!("{name}."), opts, &chain)?;
    Ok(ModuleMap::from([(name, ModuleNode::Package(inner))]))
}

/// Entries contributed by `dir` to the level it belongs to. Plain
/// directories merge their entries into that level; packages get their own.
fn module_entries(dir: &Path, prefix: &str, opts: &TreeOptions, ancestors: &[PathBuf]) -> Result<ModuleMap> {
    let mut entries = read_entries(dir)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut level = ModuleMap::new();
    for entry in entries {
        if opts.is_excluded(&entry.name) {
            continue;
        }
        if entry.is_dir {
            let Some(chain) = descend(&entry.path, ancestors)? else {
                continue;
            };
            let child_prefix = format!("{prefix}{}.", entry.name);
            let children = module_entries(&entry.path, &child_prefix, opts, &chain)?;
            if is_package(&entry.path) {
                level.insert(entry.name, ModuleNode::Package(children));
            } else {
                level.extend(children);
            }
        } else if let Some(stem) = source_stem(&entry.name) {
            level.insert(stem.to_string(), ModuleNode::Module(format!("{prefix}{stem}")));
        }
    }
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use serde_json::json;

    fn as_json(map: &ModuleMap) -> serde_json::Value {
        serde_json::to_value(map).unwrap()
    }

    #[test]
    fn package_directory_nests() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("pkg/__init__.py").touch().unwrap();
        temp.child("pkg/m.py").touch().unwrap();
        let map = build_mapping(temp.path(), &TreeOptions::default()).unwrap();
        assert_eq!(as_json(&map), json!({"pkg": {"__init__": "pkg.__init__", "m": "pkg.m"}}));
    }

    #[test]
    fn plain_directory_flattens() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("plain/m.py").touch().unwrap();
        let map = build_mapping(temp.path(), &TreeOptions::default()).unwrap();
        assert_eq!(as_json(&map), json!({"m": "plain.m"}));
    }

    #[test]
    fn package_root_wraps_everything() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.child("app");
        root.child("__init__.py").touch().unwrap();
        root.child("run.py").touch().unwrap();
        root.child("util/helpers.py").touch().unwrap();
        let map = build_mapping(root.path(), &TreeOptions::default()).unwrap();
        assert_eq!(
            as_json(&map),
            json!({"app": {"__init__": "app.__init__", "run": "app.run", "helpers": "app.util.helpers"}})
        );
    }

    #[test]
    fn excluded_hidden_and_foreign_entries_are_skipped() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("keep.py").touch().unwrap();
        temp.child("notes.txt").touch().unwrap();
        temp.child(".hidden.py").touch().unwrap();
        temp.child("tests/test_x.py").touch().unwrap();
        temp.child("__pycache__/keep.cpython-312.py").touch().unwrap();
        let map = build_mapping(temp.path(), &TreeOptions::default()).unwrap();
        assert_eq!(as_json(&map), json!({"keep": "keep"}));
    }

    #[test]
    fn nested_packages_under_plain_dirs() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/lib/__init__.py").touch().unwrap();
        temp.child("src/lib/io.py").touch().unwrap();
        temp.child("src/cli.py").touch().unwrap();
        let map = build_mapping(temp.path(), &TreeOptions::default()).unwrap();
        assert_eq!(
            as_json(&map),
            json!({
                "cli": "src.cli",
                "lib": {"__init__": "src.lib.__init__", "io": "src.lib.io"}
            })
        );
    }
}
