//! # conduit-renderer
//!
//! Tera-based rendering of the replacement webpack config written by
//! `conduit migrate`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use conduit_renderer::{Renderer, WebpackConfigContext};
//!
//! fn render() -> Result<String, conduit_renderer::RenderError> {
//!     let renderer = Renderer::new()?;
//!     let ctx = WebpackConfigContext::new("webpack.config.js", None, None)?;
//!     renderer.render_webpack_config(&ctx)
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{legacy_file_name, legacy_module, WebpackConfigContext};
pub use engine::{Renderer, TemplateEngine, WEBPACK_CONFIG_TEMPLATE};
pub use error::RenderError;
