use crate::model::Node;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub mod csharp;
pub mod extract;
pub mod scan;
pub mod stable_id;

/// Anything that can turn a path into the nodes found under it.
///
/// Implementations never fail: a path that cannot be indexed yields an
/// empty list.
pub trait CodeIndex: Send + Sync {
    fn index(&self, path: &Path) -> Arc<Vec<Node>>;
}

impl<T: CodeIndex + ?Sized> CodeIndex for Arc<T> {
    fn index(&self, path: &Path) -> Arc<Vec<Node>> {
        (**self).index(path)
    }
}

#[derive(Debug, Default)]
pub struct IndexStats {
    pub scanned: usize,
    pub indexed: usize,
    pub errors: usize,
    pub nodes: usize,
}

/// Parses source files from disk on every call.
#[derive(Debug, Clone, Default)]
pub struct SourceIndexer {
    scan_options: scan::ScanOptions,
}

impl SourceIndexer {
    pub fn new(scan_options: scan::ScanOptions) -> Self {
        Self { scan_options }
    }

    /// Index `path` and report per-file outcomes alongside the nodes.
    pub fn index_with_stats(&self, path: &Path) -> (Vec<Node>, IndexStats) {
        let started = Instant::now();
        let mut stats = IndexStats::default();
        let files = if path.is_dir() {
            match scan::scan_dir(path, self.scan_options) {
                Ok(files) => files,
                Err(err) => {
                    warn!("scan error {}: {err}", path.display());
                    return (Vec::new(), stats);
                }
            }
        } else {
            match scan::scan_file(path) {
                Some(file) => vec![file],
                None => {
                    debug!("not indexable: {}", path.display());
                    return (Vec::new(), stats);
                }
            }
        };
        stats.scanned = files.len();

        let mut extractor = match csharp::CSharpExtractor::new() {
            Ok(value) => value,
            Err(err) => {
                warn!("parser setup failed: {err}");
                stats.errors = files.len();
                return (Vec::new(), stats);
            }
        };

        let mut nodes = Vec::new();
        for file in &files {
            match index_file(&mut extractor, file) {
                Ok(found) => {
                    stats.indexed += 1;
                    nodes.extend(found);
                }
                Err(err) => {
                    warn!("index error {}: {err}", file.rel_path);
                    stats.errors += 1;
                }
            }
        }
        stats.nodes = nodes.len();
        debug!(
            path = %path.display(),
            scanned = stats.scanned,
            indexed = stats.indexed,
            errors = stats.errors,
            nodes = stats.nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indexed"
        );
        (nodes, stats)
    }
}

impl CodeIndex for SourceIndexer {
    fn index(&self, path: &Path) -> Arc<Vec<Node>> {
        Arc::new(self.index_with_stats(path).0)
    }
}

fn index_file(
    extractor: &mut csharp::CSharpExtractor,
    file: &scan::ScannedFile,
) -> Result<Vec<Node>> {
    let source = crate::util::read_to_string(&file.abs_path)?;
    let extracted = extractor.extract(&source, &file.rel_path)?;
    if extracted.has_syntax_errors {
        warn!(
            "syntax errors in {}, indexed {} recoverable nodes",
            file.rel_path,
            extracted.nodes.len()
        );
    }
    Ok(extracted.nodes)
}
