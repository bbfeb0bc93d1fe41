use crate::model::Node;

#[derive(Debug, Default)]
pub struct ExtractedFile {
    pub nodes: Vec<Node>,
    /// The parser had to recover from at least one syntax error.
    pub has_syntax_errors: bool,
}
