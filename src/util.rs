use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn normalize_rel_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).with_context(|| {
        format!("strip prefix {} from {}", root.display(), path.display())
    })?;
    Ok(normalize_path(rel))
}

pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Resolve `path` to an absolute form. Existing paths are canonicalized so
/// symlinked and relative spellings agree; missing paths are made absolute
/// against the working directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lines `start_line..=end_line` (1-indexed) of `content`, clamped to the
/// file. A start past the end yields an empty string.
pub fn slice_lines(content: &str, start_line: i64, end_line: i64) -> String {
    if content.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = (start_line.max(1) - 1) as usize;
    let mut end = end_line.max(0) as usize;
    if start >= lines.len() {
        return String::new();
    }
    if end > lines.len() {
        end = lines.len();
    }
    if end <= start {
        return String::new();
    }
    lines[start..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uses_forward_slashes() {
        let path = Path::new("src").join("Services").join("OrderService.cs");
        assert_eq!(normalize_path(&path), "src/Services/OrderService.cs");
        assert_eq!(normalize_path(Path::new("")), ".");
    }

    #[test]
    fn slice_lines_clamps_range() {
        let content = "a\nb\nc\nd";
        assert_eq!(slice_lines(content, 2, 3), "b\nc");
        assert_eq!(slice_lines(content, 0, 2), "a\nb");
        assert_eq!(slice_lines(content, 3, 99), "c\nd");
        assert_eq!(slice_lines(content, 10, 12), "");
        assert_eq!(slice_lines(content, 3, 1), "");
    }
}
