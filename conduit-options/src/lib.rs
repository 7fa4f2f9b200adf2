//! conduit options library: locate, parse and rebase the option objects
//! embedded in legacy webpack configs.
//!
//! - [`extract`]: first-argument extraction for `withNx` / `withReact`
//! - [`parser`]: object-literal text to [`serde_json::Value`]
//! - [`normalize`]: join path-valued options onto a project root

pub mod error;
pub mod extract;
pub mod normalize;
pub mod parser;
mod syntax;

pub use error::OptionsError;
pub use extract::{extract, ExtractedOptions, Extractor, MarkerArgument, MarkerCall, WITH_NX, WITH_REACT};
pub use normalize::{join_path_fragments, normalize_path_options, Normalizer, PATH_OPTION_KEYS};
pub use parser::{parse_literal, parse_object_literal};
