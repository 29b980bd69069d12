use std::path::{Path, PathBuf};

use crate::fs_op::error::Result;
use crate::tree::{descend, read_entries, root_name, source_stem, TreeOptions};

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";
const FENCE: &str = "```";

/// Render `root` as a fenced markdown tree.
///
/// Directories come before files at every level. Excluded and hidden
/// directories vanish with their subtree; files other than source files are
/// dropped before connectors are chosen.
pub fn render_text(root: &Path, opts: &TreeOptions) -> Result<String> {
    let name = root_name(root);
    let mut lines = vec![
        format!("# Project Structure: {name}"),
        FENCE.to_string(),
        format!("{name}/"),
    ];
    if let Some(chain) = descend(root, &[])? {
        lines.extend(tree_lines(root, "", opts, &chain)?);
    }
    lines.push(FENCE.to_string());
    Ok(lines.join("\n"))
}

fn tree_lines(dir: &Path, prefix: &str, opts: &TreeOptions, ancestors: &[PathBuf]) -> Result<Vec<String>> {
    let mut entries = read_entries(dir)?;
    entries.sort_by(|a, b| (!a.is_dir, &a.name).cmp(&(!b.is_dir, &b.name)));
    let visible: Vec<_> = entries
        .into_iter()
        .filter(|e| {
            if e.is_dir {
                !opts.is_excluded(&e.name)
            } else {
                source_stem(&e.name).is_some()
            }
        })
        .collect();

    let mut lines = Vec::new();
    for (i, entry) in visible.iter().enumerate() {
        let last = i + 1 == visible.len();
        let connector = if last { CORNER } else { TEE };
        if !entry.is_dir {
            lines.push(format!("{prefix}{connector}{}", entry.name));
            continue;
        }
        lines.push(format!("{prefix}{connector}{}/", entry.name));
        if let Some(chain) = descend(&entry.path, ancestors)? {
            let child_prefix = format!("{prefix}{}", if last { BLANK } else { PIPE });
            lines.extend(tree_lines(&entry.path, &child_prefix, opts, &chain)?);
        }
    }
    Ok(lines)
}
