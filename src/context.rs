use crate::compiler;
use crate::filter;
use crate::indexer::CodeIndex;
use crate::model::{CompileContextResult, Decision, Node};
use crate::rules::RuleProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_NODE_CAP: usize = 20;

/// Index, select and compile one context request.
pub struct ContextService {
    indexer: Arc<dyn CodeIndex>,
    rules: Arc<dyn RuleProvider>,
    default_node_cap: usize,
}

impl ContextService {
    pub fn new(indexer: Arc<dyn CodeIndex>, rules: Arc<dyn RuleProvider>) -> Self {
        Self {
            indexer,
            rules,
            default_node_cap: DEFAULT_NODE_CAP,
        }
    }

    pub fn with_default_node_cap(mut self, cap: usize) -> Self {
        self.default_node_cap = cap;
        self
    }

    pub fn indexer(&self) -> &Arc<dyn CodeIndex> {
        &self.indexer
    }

    pub fn rules(&self) -> &Arc<dyn RuleProvider> {
        &self.rules
    }

    pub fn compile(&self, path: &Path, targets: &[String]) -> CompileContextResult {
        let all_nodes = self.indexer.index(path);
        let selected = self.select(&all_nodes, targets);
        // Decisions are not persisted anywhere yet.
        let decisions: Vec<Decision> = Vec::new();
        let bytecode = compiler::compile(self.rules.get_all(), &selected, &decisions);
        info!(
            path = %path.display(),
            targets = targets.len(),
            indexed = all_nodes.len(),
            selected = selected.len(),
            "compiled context"
        );
        CompileContextResult {
            bytecode,
            summary: format!("Compiled context for {} nodes.", selected.len()),
            targets: selected.iter().map(|node| node.node_id.clone()).collect(),
        }
    }

    /// Filtered nodes, or the first `default_node_cap` nodes when the
    /// request named no targets at all.
    fn select(&self, all_nodes: &[Node], targets: &[String]) -> Vec<Node> {
        let selected = filter::filter_nodes(all_nodes, targets);
        if selected.is_empty() && targets.is_empty() {
            return all_nodes
                .iter()
                .take(self.default_node_cap)
                .cloned()
                .collect();
        }
        selected
    }
}
