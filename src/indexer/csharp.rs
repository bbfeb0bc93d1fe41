use crate::indexer::extract::ExtractedFile;
use crate::indexer::stable_id;
use crate::model::{Node as CodeNode, NodeCategory};
use anyhow::{Result, anyhow};
use tree_sitter::{Node, Parser};

#[derive(Clone, Default)]
struct Context {
    class_stack: Vec<ClassFrame>,
}

#[derive(Clone)]
struct ClassFrame {
    name: String,
    category: NodeCategory,
}

pub struct CSharpExtractor {
    parser: Parser,
}

impl CSharpExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    /// Extract one node per method declared in a class. `rel_path` is
    /// recorded on every node as-is.
    pub fn extract(&mut self, source: &str, rel_path: &str) -> Result<ExtractedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("parser produced no tree for {rel_path}"))?;
        let root = tree.root_node();
        let mut output = ExtractedFile {
            nodes: Vec::new(),
            has_syntax_errors: root.has_error(),
        };
        walk_node(root, &Context::default(), source, rel_path, &mut output);
        Ok(output)
    }
}

fn walk_node(
    node: Node<'_>,
    ctx: &Context,
    source: &str,
    rel_path: &str,
    output: &mut ExtractedFile,
) {
    match node.kind() {
        "class_declaration" => {
            handle_class(node, ctx, source, rel_path, output);
            return;
        }
        "method_declaration" => {
            handle_method(node, ctx, source, rel_path, output);
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(child, ctx, source, rel_path, output);
    }
}

fn handle_class(
    node: Node<'_>,
    ctx: &Context,
    source: &str,
    rel_path: &str,
    output: &mut ExtractedFile,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    if name.is_empty() {
        return;
    }
    let mut next_ctx = ctx.clone();
    next_ctx.class_stack.push(ClassFrame {
        category: NodeCategory::from_type_name(&name),
        name,
    });
    if let Some(body) = node.child_by_field_name("body") {
        walk_declaration_list(body, &next_ctx, source, rel_path, output);
    }
}

fn handle_method(
    node: Node<'_>,
    ctx: &Context,
    source: &str,
    rel_path: &str,
    output: &mut ExtractedFile,
) {
    // Interface and top-level methods have no class to classify them by.
    // A nested class's method is emitted once, for the innermost class only;
    // outer classes do not get a copy.
    let Some(class) = ctx.class_stack.last() else {
        return;
    };
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    if name.is_empty() {
        return;
    }
    let (line_start, line_end) = line_span(node);
    output.nodes.push(CodeNode {
        node_id: stable_id::method_node_id(&class.name, &name),
        category: class.category,
        path: rel_path.to_string(),
        line_start,
        line_end,
        tags: Default::default(),
        deps: Default::default(),
        rule_amplitudes: Default::default(),
        summary: name,
    });
}

fn walk_declaration_list(
    node: Node<'_>,
    ctx: &Context,
    source: &str,
    rel_path: &str,
    output: &mut ExtractedFile,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(child, ctx, source, rel_path, output);
    }
}

/// 1-indexed, inclusive line range of `node`.
fn line_span(node: Node<'_>) -> (i64, i64) {
    let start = node.start_position().row as i64 + 1;
    let end = node.end_position().row as i64 + 1;
    (start, end.max(start))
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}
