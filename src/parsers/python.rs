//! Python parser using tree-sitter
//!
//! Extracts function and class definitions (with docstring presence) and
//! import references from Python source code. Definitions are collected at
//! every nesting level: methods, nested functions and nested classes all
//! count. Imports inside function bodies count too.
//!
//! `async def` counts as a function, and a bare `from . import x` is tallied
//! under the module name `"."`.

use crate::error::ParseError;
use crate::models::{Definition, DefinitionKind, SymbolModel};
use tree_sitter::{Node, Parser};

/// Parse Python source code into a symbol model.
///
/// Source with syntax errors is rejected as a whole, so a unit either
/// contributes its full structure or nothing.
pub fn parse_source(source: &str) -> Result<SymbolModel, ParseError> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        let (line, column) = first_error_position(&root).unwrap_or((1, 1));
        return Err(ParseError::Syntax { line, column });
    }
    // The grammar still accepts Python 2 statements
    if let Some((line, column)) = first_python2_statement(&root) {
        return Err(ParseError::Syntax { line, column });
    }

    let mut model = SymbolModel::new();
    visit(&root, source.as_bytes(), &mut model);
    Ok(model)
}

/// Pre-order walk: outer definitions before inner ones, imports in source order
fn visit(node: &Node, source: &[u8], model: &mut SymbolModel) {
    match node.kind() {
        "function_definition" => push_definition(node, source, DefinitionKind::Function, model),
        "class_definition" => push_definition(node, source, DefinitionKind::Class, model),
        "import_statement" => extract_import(node, source, model),
        "import_from_statement" => extract_import_from(node, source, model),
        "future_import_statement" => model.add_import("__future__"),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(&child, source, model);
    }
}

fn push_definition(node: &Node, source: &[u8], kind: DefinitionKind, model: &mut SymbolModel) {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .unwrap_or("")
        .to_string();

    model.definitions.push(Definition {
        kind,
        name,
        line: node.start_position().row as u32 + 1,
        documented: has_docstring(node, source),
    });
}

/// `import a.b, c as d` references `a.b` and `c`
fn extract_import(node: &Node, source: &[u8], model: &mut SymbolModel) {
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let target = match child.kind() {
            "aliased_import" => child.child_by_field_name("name"),
            _ => Some(child),
        };
        if let Some(text) = target.and_then(|n| n.utf8_text(source).ok()) {
            model.add_import(text);
        }
    }
}

/// `from m import x, y` references `m` once
fn extract_import_from(node: &Node, source: &[u8], model: &mut SymbolModel) {
    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };
    let Ok(text) = module_node.utf8_text(source) else {
        return;
    };

    if module_node.kind() == "relative_import" {
        let stripped = text.trim_start_matches('.');
        model.add_import(if stripped.is_empty() { "." } else { stripped });
    } else {
        model.add_import(text);
    }
}

/// A definition is documented when its body starts with a non-empty string
fn has_docstring(node: &Node, source: &[u8]) -> bool {
    let Some(body) = node.child_by_field_name("body") else {
        return false;
    };

    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");

    let Some(stmt) = first else {
        return false;
    };
    // A tuple like `"doc", 1` is not a docstring
    if stmt.kind() != "expression_statement" || stmt.named_child_count() != 1 {
        return false;
    }

    match stmt.named_child(0) {
        Some(expr) => docstring_content(&expr, source).is_some_and(|s| !s.trim().is_empty()),
        None => false,
    }
}

/// Text of a plain string literal, or `None` for bytes and f-strings
fn docstring_content(expr: &Node, source: &[u8]) -> Option<String> {
    match expr.kind() {
        "string" => plain_string_content(expr, source),
        "concatenated_string" => {
            let mut cursor = expr.walk();
            let mut joined = String::new();
            for part in expr.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                joined.push_str(&plain_string_content(&part, source)?);
            }
            Some(joined)
        }
        _ => None,
    }
}

fn plain_string_content(string: &Node, source: &[u8]) -> Option<String> {
    if string.kind() != "string" {
        return None;
    }

    let mut cursor = string.walk();
    let children: Vec<Node> = string.children(&mut cursor).collect();
    let start = children.iter().find(|c| c.kind() == "string_start")?;
    let end = children.iter().rev().find(|c| c.kind() == "string_end")?;

    let opener = start.utf8_text(source).ok()?;
    let prefix: String = opener
        .chars()
        .take_while(|c| *c != '"' && *c != '\'')
        .collect();
    if prefix.chars().any(|c| matches!(c, 'b' | 'B' | 'f' | 'F' | 't' | 'T')) {
        return None;
    }

    let content = source.get(start.end_byte()..end.start_byte())?;
    Some(String::from_utf8_lossy(content).into_owned())
}

/// 1-based position of the first ERROR or MISSING node
fn first_error_position(node: &Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(pos) = first_error_position(&child) {
            return Some(pos);
        }
    }
    None
}

/// 1-based position of the first `print` or `exec` statement
fn first_python2_statement(node: &Node) -> Option<(usize, usize)> {
    if matches!(node.kind(), "print_statement" | "exec_statement") {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    children.iter().find_map(first_python2_statement)
}
