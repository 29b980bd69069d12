use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use serde_json::json;

use pathwiz::fs_op::{FolderOptions, FsOpError, Subfolders};
use pathwiz::{FileManager, RenderMode, TreeOptions};

fn project() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.py").touch().unwrap();
    temp.child("skip/inside.py").touch().unwrap();
    temp.child(".hidden/inside_hidden.py").touch().unwrap();
    temp.child("pkg/__init__.py").touch().unwrap();
    temp.child("pkg/m.py").touch().unwrap();
    temp.child("plain/n.py").touch().unwrap();
    temp.child("plain/data.csv").touch().unwrap();
    temp
}

#[test]
fn text_tree_drops_excluded_and_hidden_subtrees() {
    let temp = project();
    let fm = FileManager::new(temp.path()).unwrap();
    let opts = TreeOptions {
        excluded: ["skip".to_string()].into_iter().collect(),
        mode: RenderMode::Text,
        ..TreeOptions::default()
    };
    let render = fm.render_tree(".", &opts, None).unwrap();
    let text = render.text.expect("text requested");
    assert!(render.mapping.is_none());

    assert!(text.contains("a.py"));
    for gone in ["skip/", "inside.py", ".hidden", "inside_hidden.py", "data.csv"] {
        assert!(!text.contains(gone), "{gone} should not appear in:\n{text}");
    }
    assert!(text.starts_with("# Project Structure: "));
    assert!(text.ends_with("```"));
}

#[test]
fn mapping_nests_packages_and_flattens_plain_dirs() {
    let temp = project();
    let fm = FileManager::new(temp.path()).unwrap();
    let opts = TreeOptions {
        mode: RenderMode::Mapping,
        ..TreeOptions::default()
    };
    let mapping = fm.render_tree(".", &opts, None).unwrap().mapping.unwrap();
    let value = serde_json::to_value(&mapping).unwrap();

    assert_eq!(value["pkg"]["m"], json!("pkg.m"));
    assert_eq!(value["n"], json!("plain.n"));
    assert!(value.get("plain").is_none());
    assert_eq!(value["a"], json!("a"));
    assert_eq!(value["inside"], json!("skip.inside"));
    assert!(value.get("inside_hidden").is_none());
}

#[test]
fn both_modes_come_from_one_call() {
    let temp = project();
    let fm = FileManager::new(temp.path()).unwrap();
    let render = fm.render_tree(".", &TreeOptions::default(), None).unwrap();
    assert!(render.text.is_some());
    assert!(render.mapping.is_some());
}

#[test]
fn listing_respects_recursion_flag() {
    let temp = project();
    let fm = FileManager::new(temp.path()).unwrap();

    let flat = fm.list_files(".", Some("py"), false).unwrap();
    assert_eq!(flat, vec![fm.root().join("a.py")]);

    let deep = fm.list_files(".", Some("py"), true).unwrap();
    let names: Vec<_> = deep
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    for expected in ["a.py", "inside.py", "inside_hidden.py", "__init__.py", "m.py", "n.py"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected} in {names:?}");
    }
    assert!(!names.iter().any(|n| n == "data.csv"));
}

#[test]
fn listing_missing_directory_is_directory_not_found() {
    let temp = assert_fs::TempDir::new().unwrap();
    let fm = FileManager::new(temp.path()).unwrap();
    let err = fm.list_files("absent", None, true).unwrap_err();
    assert!(matches!(err, FsOpError::DirectoryNotFound(_)), "{err:?}");
}

#[test]
fn folder_layout_and_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    let fm = FileManager::new(temp.path()).unwrap();
    let layout: Subfolders = toml::from_str("src = [\"core\", \"cli\"]\n[docs]\n").unwrap();
    let opts = FolderOptions {
        subfolders: Some(layout),
        ..FolderOptions::default()
    };
    fm.create_folder("proj", &opts).unwrap();
    fm.create_file("main.py", Some(Path::new("proj/src/cli"))).unwrap();

    temp.child("proj/src/core").assert(predicates::path::is_dir());
    temp.child("proj/docs").assert(predicates::path::is_dir());
    let created = temp.child("proj/src/cli/main.py");
    created.assert(predicates::path::is_file());
    assert_eq!(fs::metadata(created.path()).unwrap().len(), 0);
}

#[cfg(unix)]
#[test]
fn audit_corrects_only_mismatched_directories() {
    use pathwiz::fs_op::Mode;
    use std::os::unix::fs::PermissionsExt;

    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("parent/d").create_dir_all().unwrap();
    temp.child("parent/ok").create_dir_all().unwrap();
    let set = |rel: &str, bits: u32| {
        fs::set_permissions(temp.child(rel).path(), fs::Permissions::from_mode(bits)).unwrap()
    };
    set("parent", 0o755);
    set("parent/ok", 0o755);
    set("parent/d", 0o700);

    let fm = FileManager::new(temp.path()).unwrap();
    let target = Mode::new(0o755).unwrap();

    let first = fm.audit_permissions("parent", target, false).unwrap();
    assert_eq!(first.corrected.len(), 1);
    assert_eq!(fm.get_permissions("parent/d").unwrap().bits(), 0o755);
    assert_eq!(fm.get_permissions("parent/ok").unwrap().bits(), 0o755);

    let second = fm.audit_permissions("parent", target, false).unwrap();
    assert!(second.is_clean(), "second audit should not write: {second:?}");
}
