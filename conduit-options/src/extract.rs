//! Locate the option objects passed to the marker calls of a legacy webpack
//! config.
//!
//! The primary marker (`withNx`) carries the application options; its
//! presence decides whether a config is migratable at all. The secondary
//! marker (`withReact`) carries React plugin options that are forwarded
//! verbatim. When a marker is called more than once the first call wins and
//! a warning is logged.

use serde_json::{Map, Value};
use tree_sitter::Node;

use crate::error::OptionsError;
use crate::parser::parse_object_literal;
use crate::syntax::{node_text, parse_js, preorder, significant_children};

pub const WITH_NX: &str = "withNx";
pub const WITH_REACT: &str = "withReact";

/// Source text of a call's first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerArgument {
    pub text: String,
    /// Byte offset of `text` in the scanned source.
    pub offset: usize,
}

impl MarkerArgument {
    /// Parse the argument as an object literal.
    ///
    /// Errors carry offsets relative to the whole source.
    pub fn parse(&self) -> Result<Map<String, Value>, OptionsError> {
        parse_object_literal(&self.text).map_err(|e| e.shifted(self.offset))
    }
}

/// What one marker looked like in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCall {
    /// Number of calls found.
    pub occurrences: usize,
    /// First argument of the first call; `None` for `marker()`.
    pub argument: Option<MarkerArgument>,
}

/// Both markers of one config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedOptions {
    pub app: MarkerCall,
    pub react: Option<MarkerCall>,
}

impl ExtractedOptions {
    /// Raw text of the application options, if any were passed.
    pub fn app_options(&self) -> Option<&str> {
        self.app.argument.as_ref().map(|a| a.text.as_str())
    }

    /// Raw text of the React options, if `withReact` was called with one.
    pub fn react_options(&self) -> Option<&str> {
        self.react
            .as_ref()
            .and_then(|r| r.argument.as_ref())
            .map(|a| a.text.as_str())
    }

    pub fn has_react(&self) -> bool {
        self.react.is_some()
    }

    /// Parsed application options; empty when `withNx()` had no argument.
    pub fn parse_app_options(&self) -> Result<Map<String, Value>, OptionsError> {
        match &self.app.argument {
            Some(arg) => arg.parse(),
            None => Ok(Map::new()),
        }
    }
}

/// Extract marker arguments using the default marker names.
///
/// Returns `Ok(None)` when the primary marker is never called.
pub fn extract(source: &str) -> Result<Option<ExtractedOptions>, OptionsError> {
    Extractor::default().extract(source)
}

/// Marker-name configuration for [`extract`].
#[derive(Debug, Clone)]
pub struct Extractor {
    primary: String,
    secondary: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            primary: WITH_NX.to_string(),
            secondary: WITH_REACT.to_string(),
        }
    }
}

/// One place in the tree where a marker is called.
enum Site {
    Call { offset: usize, argument: Option<MarkerArgument> },
    /// The call sits inside text the grammar could not parse.
    Broken { offset: usize },
}

impl Extractor {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Parse `source` once and collect both markers.
    ///
    /// Syntax errors elsewhere in the file are tolerated; a marker call that
    /// does not parse is [`OptionsError::MalformedCall`].
    pub fn extract(&self, source: &str) -> Result<Option<ExtractedOptions>, OptionsError> {
        let tree = parse_js(source)?;
        let nodes = preorder(tree.root_node());
        if tree.root_node().has_error() {
            tracing::debug!("source has syntax errors; reading marker calls that still parse");
        }

        let Some(app) = self.marker(&nodes, source, &self.primary)? else {
            tracing::debug!("no {}() call found", self.primary);
            return Ok(None);
        };
        let react = self.marker(&nodes, source, &self.secondary)?;
        Ok(Some(ExtractedOptions { app, react }))
    }

    fn marker(
        &self,
        nodes: &[Node<'_>],
        source: &str,
        callee: &str,
    ) -> Result<Option<MarkerCall>, OptionsError> {
        let sites: Vec<Site> = nodes
            .iter()
            .filter_map(|node| site(*node, source, callee))
            .collect();
        let Some(first) = sites.first() else {
            return Ok(None);
        };
        let (offset, argument) = match first {
            Site::Broken { offset } => {
                return Err(OptionsError::MalformedCall {
                    callee: callee.to_string(),
                    offset: *offset,
                })
            }
            Site::Call { offset, argument } => (*offset, argument.clone()),
        };
        if sites.len() > 1 {
            tracing::warn!(
                "{callee}() is called {} times; using the call at offset {offset}",
                sites.len()
            );
        }
        Ok(Some(MarkerCall {
            occurrences: sites.len(),
            argument,
        }))
    }
}

/// `node` as a call of `callee`, if it is one.
///
/// Only plain identifier callees count, so member calls such as
/// `nx.withNx()` and declarations such as `function withNx() {}` are
/// ignored.
fn site(node: Node<'_>, source: &str, callee: &str) -> Option<Site> {
    match node.kind() {
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            if function.kind() != "identifier" || node_text(function, source) != callee {
                return None;
            }
            let offset = node.start_byte();
            if node.has_error() {
                return Some(Site::Broken { offset });
            }
            let arguments = node.child_by_field_name("arguments")?;
            let argument = significant_children(arguments)
                .first()
                .map(|arg| MarkerArgument {
                    text: node_text(*arg, source).to_string(),
                    offset: arg.start_byte(),
                });
            Some(Site::Call { offset, argument })
        }
        // a marker name the grammar could not attach to a call
        "identifier"
            if node_text(node, source) == callee
                && !node.parent().is_some_and(|p| p.kind() == "call_expression")
                && inside_error(node) =>
        {
            Some(Site::Broken {
                offset: node.start_byte(),
            })
        }
        _ => None,
    }
}

fn inside_error(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.is_error() {
            return true;
        }
        current = parent.parent();
    }
    false
}
