// pathwiz: command-line front end for the pathwiz library.
// Usage: pathwiz [--root DIR] <mkdir|touch|ls|perms|audit|tree> ...

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pathwiz::fs_op::{FolderOptions, Mode, Subfolders};
use pathwiz::settings::load_settings;
use pathwiz::{logging, FileManager, RenderMode};

#[derive(Parser, Debug)]
#[command(name = "pathwiz", version, about = "Create, list, audit and render project directories")]
struct Cli {
    /// Directory every relative path is resolved against.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Settings file (defaults to the per-user settings.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a folder, optionally with a nested layout.
    Mkdir {
        name: PathBuf,
        /// Remove an existing folder first.
        #[arg(long)]
        overwrite: bool,
        /// Mode for created folders, octal or symbolic.
        #[arg(long)]
        mode: Option<Mode>,
        /// JSON or TOML file describing subfolders.
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Create an empty file.
    Touch {
        file: PathBuf,
        /// Subfolder (under the root) to place the file in.
        #[arg(long = "in")]
        sub_folder: Option<PathBuf>,
    },
    /// List files in a directory.
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Only files with this extension.
        #[arg(long)]
        ext: Option<String>,
        #[arg(short, long)]
        recursive: bool,
    },
    /// Show the permission bits of a path.
    Perms { path: PathBuf },
    /// Set every directory under DIR to MODE.
    Audit {
        dir: PathBuf,
        #[arg(long)]
        mode: Mode,
        #[arg(long)]
        follow_symlinks: bool,
    },
    /// Render the directory tree and module mapping.
    Tree {
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[arg(long, value_enum, default_value_t = RenderMode::Both)]
        format: RenderMode,
        /// Directory names to skip (replaces the configured list).
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Show hidden directories too.
        #[arg(long)]
        include_hidden: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    let fm = FileManager::new(&cli.root).with_context(|| format!("opening root {}", cli.root.display()))?;

    match cli.command {
        Command::Mkdir {
            name,
            overwrite,
            mode,
            layout,
        } => {
            let permissions = match mode {
                Some(m) => m,
                None => settings.default_mode()?,
            };
            let subfolders = layout.as_deref().map(read_layout).transpose()?;
            let opts = FolderOptions {
                overwrite,
                permissions,
                subfolders,
            };
            fm.create_folder(&name, &opts)
                .with_context(|| format!("creating folder {}", name.display()))?;
        }
        Command::Touch { file, sub_folder } => {
            fm.create_file(&file, sub_folder.as_deref())
                .with_context(|| format!("creating file {}", file.display()))?;
        }
        Command::Ls { dir, ext, recursive } => {
            for path in fm.list_files(&dir, ext.as_deref(), recursive)? {
                println!("{}", path.display());
            }
        }
        Command::Perms { path } => {
            let info = fm.inspect_permissions(&path)?;
            println!("{:o} {} {}", info.mode, info.symbolic, info.path.display());
        }
        Command::Audit {
            dir,
            mode,
            follow_symlinks,
        } => {
            let report = fm
                .audit_permissions(&dir, mode, follow_symlinks)
                .with_context(|| format!("auditing {}", dir.display()))?;
            for fix in &report.corrected {
                println!("{:o} -> {:o} {}", fix.previous, mode, fix.path.display());
            }
        }
        Command::Tree {
            dir,
            format,
            exclude,
            include_hidden,
        } => {
            let mut opts = settings.tree_options();
            opts.mode = format;
            if !exclude.is_empty() {
                opts.excluded = exclude.into_iter().collect();
            }
            if include_hidden {
                opts.exclude_hidden = false;
            }
            let render = fm.render_tree(&dir, &opts, None)?;
            if let Some(text) = render.text {
                println!("{text}");
            }
            if let Some(mapping) = render.mapping {
                println!("{}", serde_json::to_string_pretty(&mapping)?);
            }
        }
    }
    Ok(())
}

fn read_layout(path: &Path) -> Result<Subfolders> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading layout {}", path.display()))?;
    let layout = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&raw).with_context(|| format!("parsing layout {}", path.display()))?,
        _ => serde_json::from_str(&raw).with_context(|| format!("parsing layout {}", path.display()))?,
    };
    Ok(layout)
}
