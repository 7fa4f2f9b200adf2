//! Error types for conduit-options.

use thiserror::Error;

/// Errors raised while locating or parsing embedded option literals.
///
/// Offsets are byte offsets into the text that was being read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The JavaScript grammar could not be loaded into the parser.
    #[error("failed to load JavaScript grammar: {0}")]
    Grammar(String),

    /// Text that is not valid JavaScript.
    #[error("syntax error at offset {offset}")]
    Syntax { offset: usize },

    /// Valid JavaScript of the wrong shape, e.g. an array where an object
    /// literal is required.
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    /// Valid JavaScript outside the literal subset (spread, computed keys,
    /// identifiers, calls, template substitutions).
    #[error("unsupported {construct} at offset {offset}")]
    Unsupported {
        construct: &'static str,
        offset: usize,
    },

    /// A numeric literal that does not fit a JSON number.
    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    /// A marker call that does not parse, usually an unclosed argument list.
    #[error("call to {callee}() at offset {offset} is malformed")]
    MalformedCall { callee: String, offset: usize },
}

impl OptionsError {
    /// Move the offset of `self` forward by `base` bytes.
    pub(crate) fn shifted(self, base: usize) -> Self {
        match self {
            OptionsError::Syntax { offset } => OptionsError::Syntax {
                offset: base + offset,
            },
            OptionsError::UnexpectedToken {
                found,
                expected,
                offset,
            } => OptionsError::UnexpectedToken {
                found,
                expected,
                offset: base + offset,
            },
            OptionsError::Unsupported { construct, offset } => OptionsError::Unsupported {
                construct,
                offset: base + offset,
            },
            OptionsError::InvalidNumber { text, offset } => OptionsError::InvalidNumber {
                text,
                offset: base + offset,
            },
            OptionsError::MalformedCall { callee, offset } => OptionsError::MalformedCall {
                callee,
                offset: base + offset,
            },
            e @ OptionsError::Grammar(_) => e,
        }
    }
}
