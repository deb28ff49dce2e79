//! Python syntax check with Tree-sitter.
//!
//! Tree-sitter recovers from errors, so a successful parse is not enough:
//! the tree is searched for the first `ERROR` or `MISSING` node in source
//! order, and that node locates the failure.

use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::read_utf8;

/// Longest source excerpt quoted in a failure message, in characters.
const CONTEXT_LIMIT: usize = 40;

/// Parses Python sources in process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonChecker;

impl Checker for PythonChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Python
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).and_then(|source| check_python(&source)).into()
    }
}

fn check_python(source: &str) -> Result<(), ValidationFailure> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|err| ValidationFailure::tool_unavailable("tree-sitter-python", err))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ValidationFailure::tool_unavailable("tree-sitter-python", "parse aborted"))?;

    first_error_node(tree.root_node()).map_or(Ok(()), |node| Err(describe(node, source)))
}

fn first_error_node(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

fn describe(node: tree_sitter::Node<'_>, source: &str) -> ValidationFailure {
    let message = if node.is_missing() {
        format!("syntax error: missing {}", node.kind())
    } else {
        let excerpt = source
            .get(node.byte_range())
            .map(|text| text.lines().next().unwrap_or_default().trim())
            .unwrap_or_default();
        if excerpt.is_empty() {
            String::from("syntax error")
        } else {
            format!("syntax error near '{}'", truncate(excerpt))
        }
    };
    let (line, column) = point_to_one_based(node.start_position());
    ValidationFailure::syntax(message).at_location(line, column)
}

fn truncate(text: &str) -> String {
    if text.chars().count() > CONTEXT_LIMIT {
        let head: String = text.chars().take(CONTEXT_LIMIT - 3).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}

/// Converts a zero-based Tree-sitter point to one-based coordinates.
fn point_to_one_based(point: tree_sitter::Point) -> (u32, u32) {
    let line = u32::try_from(point.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(point.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}
