use anyhow::Result;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub respect_ignore: bool,
}

impl ScanOptions {
    pub fn new(respect_ignore: bool) -> Self {
        Self { respect_ignore }
    }
}

static SOURCE_EXTENSIONS: &[&str] = &["cs"];

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Discover every source file below `root`, sorted by relative path.
pub fn scan_dir(root: &Path, options: ScanOptions) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    if options.respect_ignore {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    } else {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if !is_source_file(path) {
            continue;
        }
        let rel_path = crate::util::normalize_rel_path(root, path)?;
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    entry.file_name() == OsStr::new(".git")
}

/// A single file, relative to its parent directory.
pub fn scan_file(path: &Path) -> Option<ScannedFile> {
    if !path.is_file() || !is_source_file(path) {
        return None;
    }
    let rel_path = match path.file_name() {
        Some(name) => crate::util::normalize_path(Path::new(name)),
        None => return None,
    };
    Some(ScannedFile {
        rel_path,
        abs_path: path.to_path_buf(),
    })
}
