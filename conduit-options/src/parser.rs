//! Convert an object-literal expression into a [`serde_json::Value`].
//!
//! The text is parsed with the JavaScript grammar and the resulting syntax
//! tree is walked. Accepted: objects with identifier, string or number keys,
//! arrays, strings, template literals without substitutions, numbers (with a
//! leading sign), `true`, `false`, `null`, trailing commas and comments.
//! Everything else is reported as [`OptionsError::Unsupported`] rather than
//! guessed at.

use serde_json::{Map, Number, Value};
use tree_sitter::Node;

use crate::error::OptionsError;
use crate::syntax::{first_error_offset, node_text, parse_js, significant_children};

/// Parse any literal value.
pub fn parse_literal(text: &str) -> Result<Value, OptionsError> {
    // Parenthesized so `{` starts an expression, not a block. The newline
    // keeps a trailing line comment from swallowing the `)`.
    let wrapped = format!("({text}\n)");
    let tree = parse_js(&wrapped)?;
    let root = tree.root_node();
    let literal = Literal { source: &wrapped };

    if let Some(offset) = first_error_offset(root) {
        return Err(OptionsError::Syntax {
            offset: literal.offset_of(offset),
        });
    }
    let statements = significant_children(root);
    let inner = match statements.as_slice() {
        [statement] if statement.kind() == "expression_statement" => {
            significant_children(*statement)
                .first()
                .copied()
                .filter(|e| e.kind() == "parenthesized_expression" && e.byte_range() == (0..wrapped.len()))
                .and_then(|e| significant_children(e).first().copied())
        }
        _ => None,
    };
    let Some(inner) = inner else {
        let offset = statements.get(1).map(|n| n.start_byte()).unwrap_or(0);
        return Err(OptionsError::UnexpectedToken {
            found: "trailing text".to_string(),
            expected: "a single value",
            offset: literal.offset_of(offset),
        });
    };
    literal.value(inner)
}

/// Parse `text` and require the result to be an object.
pub fn parse_object_literal(text: &str) -> Result<Map<String, Value>, OptionsError> {
    let start = text.len() - text.trim_start().len();
    match parse_literal(text)? {
        Value::Object(map) => Ok(map),
        other => Err(OptionsError::UnexpectedToken {
            found: describe(&other).to_string(),
            expected: "object literal",
            offset: start,
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walks nodes of the wrapped text; offsets are reported against the
/// caller's text.
struct Literal<'s> {
    source: &'s str,
}

impl Literal<'_> {
    fn offset_of(&self, byte: usize) -> usize {
        byte.saturating_sub(1)
    }

    fn unsupported(&self, construct: &'static str, node: Node<'_>) -> OptionsError {
        OptionsError::Unsupported {
            construct,
            offset: self.offset_of(node.start_byte()),
        }
    }

    fn text(&self, node: Node<'_>) -> &str {
        node_text(node, self.source)
    }

    fn value(&self, node: Node<'_>) -> Result<Value, OptionsError> {
        match node.kind() {
            "object" => self.object(node),
            "array" => self.array(node),
            "string" | "template_string" => self.string(node).map(Value::String),
            "number" => number(self.text(node), false, self.offset_of(node.start_byte())),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "unary_expression" => self.signed(node),
            "identifier" | "undefined" => Err(self.unsupported("identifier reference", node)),
            "spread_element" => Err(self.unsupported("spread element", node)),
            "call_expression" | "new_expression" => Err(self.unsupported("call expression", node)),
            "parenthesized_expression" => Err(self.unsupported("parenthesized expression", node)),
            "arrow_function" | "function_expression" | "function" => {
                Err(self.unsupported("function", node))
            }
            "regex" => Err(self.unsupported("regular expression", node)),
            _ => Err(self.unsupported("expression", node)),
        }
    }

    fn object(&self, node: Node<'_>) -> Result<Value, OptionsError> {
        let mut map = Map::new();
        for member in significant_children(node) {
            match member.kind() {
                "pair" => {
                    let (Some(key), Some(value)) = (
                        member.child_by_field_name("key"),
                        member.child_by_field_name("value"),
                    ) else {
                        return Err(self.unsupported("property", member));
                    };
                    let key = self.key(key)?;
                    let value = self.value(value)?;
                    // later duplicates overwrite earlier ones, as in JavaScript
                    map.insert(key, value);
                }
                "shorthand_property_identifier" => {
                    return Err(self.unsupported("shorthand property", member))
                }
                "spread_element" => return Err(self.unsupported("spread element", member)),
                "method_definition" => return Err(self.unsupported("method definition", member)),
                _ => return Err(self.unsupported("property", member)),
            }
        }
        Ok(Value::Object(map))
    }

    fn key(&self, node: Node<'_>) -> Result<String, OptionsError> {
        match node.kind() {
            "property_identifier" => Ok(self.text(node).to_string()),
            "string" => self.string(node),
            "number" => numeric_key(self.text(node), self.offset_of(node.start_byte())),
            "computed_property_name" => Err(self.unsupported("computed property key", node)),
            _ => Err(self.unsupported("property key", node)),
        }
    }

    fn array(&self, node: Node<'_>) -> Result<Value, OptionsError> {
        let mut items = Vec::new();
        // true right after `[` or `,`
        let mut awaiting_item = true;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "[" | "]" | "comment" => {}
                "," => {
                    if awaiting_item {
                        return Err(self.unsupported("array hole", child));
                    }
                    awaiting_item = true;
                }
                _ => {
                    items.push(self.value(child)?);
                    awaiting_item = false;
                }
            }
        }
        Ok(Value::Array(items))
    }

    fn signed(&self, node: Node<'_>) -> Result<Value, OptionsError> {
        let operator = node.child_by_field_name("operator").map(|op| self.text(op));
        let argument = node.child_by_field_name("argument");
        match (operator, argument) {
            (Some(op @ ("-" | "+")), Some(arg)) if arg.kind() == "number" => {
                number(self.text(arg), op == "-", self.offset_of(node.start_byte()))
            }
            _ => Err(self.unsupported("unary expression", node)),
        }
    }

    /// Cooked value of a string or template literal.
    ///
    /// Raw text between the delimiters is copied; escape sequences are
    /// resolved one node at a time.
    fn string(&self, node: Node<'_>) -> Result<String, OptionsError> {
        let range = node.byte_range();
        let body_start = range.start + 1;
        let body_end = range.end.saturating_sub(1).max(body_start);

        let mut cooked = Cooked::default();
        let mut pos = body_start;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "escape_sequence" => {
                    cooked.raw(&self.source[pos..child.start_byte()]);
                    cooked.escape(self.text(child));
                    pos = child.end_byte();
                }
                "template_substitution" => {
                    return Err(self.unsupported("template substitution", child));
                }
                _ => {}
            }
        }
        cooked.raw(&self.source[pos.min(body_end)..body_end]);
        Ok(cooked.finish())
    }
}

/// String under construction, pairing UTF-16 surrogate escapes.
#[derive(Default)]
struct Cooked {
    out: String,
    high_surrogate: Option<u32>,
}

impl Cooked {
    fn raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush();
        self.out.push_str(text);
    }

    fn escape(&mut self, seq: &str) {
        let body = seq.strip_prefix('\\').unwrap_or(seq);
        let mut chars = body.chars();
        let Some(first) = chars.next() else {
            return;
        };
        let code = match first {
            'n' => '\n' as u32,
            't' => '\t' as u32,
            'r' => '\r' as u32,
            'b' => 0x8,
            'f' => 0xc,
            'v' => 0xb,
            // line continuation
            '\r' | '\n' | '\u{2028}' | '\u{2029}' => {
                self.flush();
                return;
            }
            '0'..='7' => u32::from_str_radix(body, 8).unwrap_or(0),
            'x' => u32::from_str_radix(&body[1..], 16).unwrap_or(0xfffd),
            'u' => {
                let digits = body[1..].trim_start_matches('{').trim_end_matches('}');
                u32::from_str_radix(digits, 16).unwrap_or(0xfffd)
            }
            other => other as u32,
        };
        self.code_unit(code);
    }

    fn code_unit(&mut self, code: u32) {
        match (self.high_surrogate.take(), code) {
            (Some(high), 0xdc00..=0xdfff) => {
                let combined = 0x10000 + ((high - 0xd800) << 10) + (code - 0xdc00);
                self.out.push(char::from_u32(combined).unwrap_or('\u{fffd}'));
            }
            (previous, 0xd800..=0xdbff) => {
                if previous.is_some() {
                    self.out.push('\u{fffd}');
                }
                self.high_surrogate = Some(code);
            }
            (previous, _) => {
                if previous.is_some() {
                    self.out.push('\u{fffd}');
                }
                self.out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
        }
    }

    fn flush(&mut self) {
        if self.high_surrogate.take().is_some() {
            self.out.push('\u{fffd}');
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}

fn number(text: &str, negative: bool, offset: usize) -> Result<Value, OptionsError> {
    let invalid = || OptionsError::InvalidNumber {
        text: if negative { format!("-{text}") } else { text.to_string() },
        offset,
    };
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let radix = match lower.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let magnitude = i64::from_str_radix(&cleaned[2..], radix).map_err(|_| invalid())?;
        return Ok(Value::Number(Number::from(if negative { -magnitude } else { magnitude })));
    }

    let is_integer = !lower.contains(['.', 'e']);
    if is_integer {
        if let Ok(n) = cleaned.parse::<i64>() {
            return Ok(Value::Number(Number::from(if negative { -n } else { n })));
        }
        if !negative {
            if let Ok(n) = cleaned.parse::<u64>() {
                return Ok(Value::Number(Number::from(n)));
            }
        }
    }

    let f: f64 = cleaned.parse().map_err(|_| invalid())?;
    let f = if negative { -f } else { f };
    // JSON has no NaN or infinity
    Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
}

/// Property name for a numeric key, as JavaScript would stringify it.
fn numeric_key(text: &str, offset: usize) -> Result<String, OptionsError> {
    Ok(match number(text, false, offset)? {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    })
}
