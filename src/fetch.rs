use crate::model::FetchCodeResult;
use crate::util;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read lines `start_line..=end_line` of `path`, which must resolve to a
/// file under `authorized_root`. The range is clamped to the file.
pub fn fetch_code(
    authorized_root: &Path,
    path: &str,
    start_line: i64,
    end_line: i64,
) -> Result<FetchCodeResult> {
    if path.contains("..") || path.contains('~') {
        warn!("security: path traversal attempt blocked: {path}");
        bail!("invalid path: traversal patterns detected");
    }
    if path.trim().is_empty() {
        bail!("invalid path: empty");
    }

    let root = util::absolute_path(authorized_root);
    let candidate = PathBuf::from(path);
    let full_path = if candidate.is_absolute() {
        candidate
    } else {
        root.join(candidate)
    };
    let full_path = util::absolute_path(&full_path);

    if !is_sub_path_of(&root, &full_path) {
        warn!(
            "security: access denied, {} is not under {}",
            full_path.display(),
            root.display()
        );
        bail!("access to path '{path}' is denied: outside the authorized scope");
    }
    if !full_path.is_file() {
        bail!("file not found: {path}");
    }

    let content = util::read_to_string(&full_path)?;
    Ok(FetchCodeResult {
        path: path.to_string(),
        code: util::slice_lines(&content, start_line, end_line),
    })
}

fn is_sub_path_of(base: &Path, target: &Path) -> bool {
    if cfg!(windows) {
        let base = base.to_string_lossy().to_lowercase();
        let target = target.to_string_lossy().to_lowercase();
        Path::new(&target).starts_with(Path::new(&base))
    } else {
        target.starts_with(base)
    }
}
