//! Thin layer over tree-sitter's JavaScript grammar.

use tree_sitter::{Node, Parser, Tree};

use crate::error::OptionsError;

/// Parse `source` as a JavaScript program.
///
/// The tree is returned even when it contains error nodes; callers decide
/// which errors matter.
pub(crate) fn parse_js(source: &str) -> Result<Tree, OptionsError> {
    let mut parser = Parser::new();
    let language = tree_sitter_javascript::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| OptionsError::Grammar(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or(OptionsError::Syntax { offset: 0 })
}

pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Named children, comments excluded.
pub(crate) fn significant_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Every node under `root` (inclusive), in source order.
pub(crate) fn preorder(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Start of the first error or missing node under `node`.
pub(crate) fn first_error_offset(node: Node<'_>) -> Option<usize> {
    if !node.has_error() {
        return None;
    }
    preorder(node)
        .into_iter()
        .find(|n| n.is_error() || n.is_missing())
        .map(|n| n.start_byte())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_literals_do_not_confuse_the_grammar() {
        let src = "const skip = /don't-bundle/;\nwithNx({});";
        let tree = parse_js(src).expect("parse");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn preorder_follows_source_order() {
        let src = "a(b(1), c(2));";
        let tree = parse_js(src).expect("parse");
        let idents: Vec<&str> = preorder(tree.root_node())
            .into_iter()
            .filter(|n| n.kind() == "identifier")
            .map(|n| node_text(n, src))
            .collect();
        assert_eq!(idents, vec!["a", "b", "c"]);
    }

    #[test]
    fn broken_text_reports_an_error_offset() {
        let src = "const a = 1;\nconst = ;";
        let tree = parse_js(src).expect("parse");
        assert!(first_error_offset(tree.root_node()).is_some());
        assert_eq!(first_error_offset(parse_js("1;").expect("parse").root_node()), None);
    }
}
