use crate::model::Node;

/// Prefixes that mark a target as a node id rather than free text.
pub const NODE_ID_PREFIXES: &[&str] = &[
    "FN:", "TST:", "SRV:", "REPO:", "CTRL:", "API:", "DOM:", "JOB:", "CFG:", "UTIL:",
];

/// How a single target string is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    /// Exact, case-insensitive node id.
    NodeId(&'a str),
    /// Case-insensitive substring of path or summary.
    Text(&'a str),
}

impl<'a> Target<'a> {
    /// Classify `raw`. Blank targets classify as `None`.
    pub fn classify(raw: &'a str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        if looks_like_node_id(raw) {
            Some(Target::NodeId(raw))
        } else {
            Some(Target::Text(raw))
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Target::NodeId(id) => node.node_id.eq_ignore_ascii_case(id),
            Target::Text(text) => {
                let needle = text.to_lowercase();
                node.path.to_lowercase().contains(&needle)
                    || node.summary.to_lowercase().contains(&needle)
            }
        }
    }
}

pub fn looks_like_node_id(candidate: &str) -> bool {
    NODE_ID_PREFIXES.iter().any(|prefix| {
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Select every node matched by at least one target.
///
/// The result keeps the order of `all_nodes` and holds each node once, even
/// when several targets match it. Empty `targets` select nothing.
pub fn filter_nodes(all_nodes: &[Node], targets: &[String]) -> Vec<Node> {
    let targets: Vec<Target<'_>> = targets
        .iter()
        .filter_map(|raw| Target::classify(raw))
        .collect();
    if targets.is_empty() {
        return Vec::new();
    }
    all_nodes
        .iter()
        .filter(|node| targets.iter().any(|target| target.matches(node)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeCategory;

    fn node(id: &str, path: &str, summary: &str) -> Node {
        Node {
            node_id: id.to_string(),
            category: NodeCategory::Service,
            path: path.to_string(),
            line_start: 1,
            line_end: 2,
            tags: Default::default(),
            deps: Default::default(),
            rule_amplitudes: Default::default(),
            summary: summary.to_string(),
        }
    }

    fn sample() -> Vec<Node> {
        vec![
            node("FN:123", "Services/OrderService.cs", "PlaceOrder"),
            node("FN:1234", "Services/OrderService.cs", "CancelOrder"),
            node("FN:77", "Data/UserRepository.cs", "FindUser"),
        ]
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.node_id.as_str()).collect()
    }

    #[test]
    fn classifies_id_prefixes_case_insensitively() {
        assert!(looks_like_node_id("FN:1"));
        assert!(looks_like_node_id("fn:1"));
        assert!(looks_like_node_id("util:9"));
        assert!(looks_like_node_id("Repo:3"));
        assert!(!looks_like_node_id("FN1"));
        assert!(!looks_like_node_id("FOO:1"));
        assert!(!looks_like_node_id("OrderService"));
        assert_eq!(Target::classify("   "), None);
    }

    #[test]
    fn id_target_matches_exactly() {
        let selected = filter_nodes(&sample(), &["fn:123".to_string()]);
        assert_eq!(ids(&selected), vec!["FN:123"]);
    }

    #[test]
    fn text_target_matches_path_or_summary() {
        let nodes = sample();
        assert_eq!(
            ids(&filter_nodes(&nodes, &["orderservice".to_string()])),
            vec!["FN:123", "FN:1234"]
        );
        assert_eq!(
            ids(&filter_nodes(&nodes, &["finduser".to_string()])),
            vec!["FN:77"]
        );
    }

    #[test]
    fn overlapping_targets_are_deduplicated() {
        let targets = vec![
            "FN:123".to_string(),
            "PlaceOrder".to_string(),
            "Services".to_string(),
        ];
        let selected = filter_nodes(&sample(), &targets);
        assert_eq!(ids(&selected), vec!["FN:123", "FN:1234"]);
    }

    #[test]
    fn empty_blank_and_unmatched_targets_select_nothing() {
        let nodes = sample();
        assert!(filter_nodes(&nodes, &[]).is_empty());
        assert!(filter_nodes(&nodes, &["  ".to_string()]).is_empty());
        assert!(filter_nodes(&nodes, &["UnknownThing".to_string()]).is_empty());
        assert!(filter_nodes(&nodes, &["FN:999".to_string()]).is_empty());
    }
}
