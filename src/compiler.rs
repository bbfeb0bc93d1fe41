//! Renders rules, nodes and decisions into the context DSL.
//!
//! The output is parsed downstream, so section markers and field tags are a
//! fixed contract:
//!
//! ```text
//! === RULES ===
//! @RULE R01 PRI:0.9
//!     "Services must not access DB directly. Use repositories."
//!
//! === NODES ===
//! @NODE FN:123 T:Service P:Services/X.cs L:10-20
//!     SUM: "M"
//!
//! === DECISIONS ===
//! ```

use crate::model::{Decision, Node, Rule};
use std::fmt::Write;

pub const RULES_HEADER: &str = "=== RULES ===";
pub const NODES_HEADER: &str = "=== NODES ===";
pub const DECISIONS_HEADER: &str = "=== DECISIONS ===";

const INDENT: &str = "    ";

pub fn compile(rules: &[Rule], nodes: &[Node], decisions: &[Decision]) -> String {
    let mut out = String::new();
    write_rules(&mut out, rules);
    write_nodes(&mut out, nodes);
    write_decisions(&mut out, decisions);
    out
}

fn write_rules(out: &mut String, rules: &[Rule]) {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    // Stable sort keeps input order among equal priorities.
    ordered.sort_by(|a, b| sort_key(b.priority).total_cmp(&sort_key(a.priority)));

    let _ = writeln!(out, "{RULES_HEADER}");
    for rule in ordered {
        let _ = writeln!(out, "@RULE {} PRI:{:.1}", rule.rule_id, rule.priority);
        let _ = writeln!(out, "{INDENT}\"{}\"", rule.description);
    }
    out.push('\n');
}

/// Signed zeros compare equal and NaN ranks below every real priority.
fn sort_key(priority: f64) -> f64 {
    if priority.is_nan() {
        f64::NEG_INFINITY
    } else if priority == 0.0 {
        0.0
    } else {
        priority
    }
}

fn write_nodes(out: &mut String, nodes: &[Node]) {
    let _ = writeln!(out, "{NODES_HEADER}");
    for node in nodes {
        let _ = writeln!(
            out,
            "@NODE {} T:{} P:{} L:{}-{}",
            node.node_id, node.category, node.path, node.line_start, node.line_end
        );
        if !node.tags.is_empty() {
            let _ = writeln!(out, "{INDENT}TAGS: {}", join(node.tags.iter()));
        }
        if !node.deps.is_empty() {
            let _ = writeln!(out, "{INDENT}DEP: {}", join(node.deps.iter()));
        }
        if !node.rule_amplitudes.is_empty() {
            let decs = node
                .rule_amplitudes
                .iter()
                .map(|(rule_id, amplitude)| format!("{rule_id}({amplitude:.1})"));
            let _ = writeln!(out, "{INDENT}DEC: {}", join(decs));
        }
        let _ = writeln!(out, "{INDENT}SUM: \"{}\"", node.summary);
        out.push('\n');
    }
}

fn write_decisions(out: &mut String, decisions: &[Decision]) {
    let _ = writeln!(out, "{DECISIONS_HEADER}");
    for decision in decisions {
        let _ = writeln!(out, "@DECISION {}", decision.decision_id);
        let _ = writeln!(
            out,
            "{INDENT}RULE: {}",
            decision.rule_id.as_deref().unwrap_or("NONE")
        );
        let _ = writeln!(out, "{INDENT}CONTEXT: \"{}\"", decision.context);
        if !decision.scope_nodes.is_empty() {
            let _ = writeln!(out, "{INDENT}SCOPE: {}", join(decision.scope_nodes.iter()));
        }
        out.push('\n');
    }
}

fn join<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(item.as_ref());
    }
    out
}
