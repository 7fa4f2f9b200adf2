//! Template context: serializable payload for the generated webpack config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RenderError;

/// Rendering payload for `webpack.config.js.tera`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebpackConfigContext {
    /// File name of the config being replaced, e.g. `webpack.config.js`.
    pub config_file_name: String,
    /// File name the old config is renamed to, e.g. `webpack.config.old.js`.
    pub legacy_file_name: String,
    /// `require` specifier of the renamed config, e.g. `webpack.config.old`.
    pub legacy_module: String,
    /// Options object as pretty-printed JSON, or `{}`.
    pub options_json: String,
    /// Whether the legacy `withNx` call had an argument.
    pub has_app_options: bool,
    /// Raw argument text of the legacy `withReact` call.
    pub react_options: Option<String>,
}

impl WebpackConfigContext {
    /// Build the context for replacing `config_file_name`.
    ///
    /// `options` is `None` when `withNx()` was called without an argument.
    pub fn new(
        config_file_name: &str,
        options: Option<&Map<String, Value>>,
        react_options: Option<&str>,
    ) -> Result<Self, RenderError> {
        let options_json = match options {
            Some(map) => serde_json::to_string_pretty(map)?,
            None => "{}".to_string(),
        };
        Ok(Self {
            config_file_name: config_file_name.to_string(),
            legacy_file_name: legacy_file_name(config_file_name),
            legacy_module: legacy_module(config_file_name),
            options_json,
            has_app_options: options.is_some(),
            react_options: react_options.map(str::to_string),
        })
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// `<name>.old<ext>` for a config file name.
pub fn legacy_file_name(config_file_name: &str) -> String {
    let path = Path::new(config_file_name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{ext}", legacy_module(config_file_name)),
        None => legacy_module(config_file_name),
    }
}

/// `<name>.old`, the extension-less form used in `require`.
pub fn legacy_module(config_file_name: &str) -> String {
    let path = Path::new(config_file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(config_file_name);
    format!("{stem}.old")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_names_insert_old_before_extension() {
        assert_eq!(legacy_file_name("webpack.config.js"), "webpack.config.old.js");
        assert_eq!(legacy_module("webpack.config.js"), "webpack.config.old");
        assert_eq!(legacy_file_name("webpack.config.ts"), "webpack.config.old.ts");
        assert_eq!(legacy_file_name("webpack"), "webpack.old");
    }

    #[test]
    fn options_are_pretty_printed_in_order() {
        let Value::Object(map) = json!({ "outputPath": "dist/apps/a", "main": "apps/a/src/main.ts" }) else {
            unreachable!()
        };
        let ctx = WebpackConfigContext::new("webpack.config.js", Some(&map), None).expect("ctx");
        assert_eq!(
            ctx.options_json,
            "{\n  \"outputPath\": \"dist/apps/a\",\n  \"main\": \"apps/a/src/main.ts\"\n}"
        );
        assert!(ctx.has_app_options);
    }

    #[test]
    fn absent_options_render_as_empty_object() {
        let ctx = WebpackConfigContext::new("webpack.config.js", None, Some("{ svgr: false }")).expect("ctx");
        assert_eq!(ctx.options_json, "{}");
        assert!(!ctx.has_app_options);
        assert_eq!(ctx.react_options.as_deref(), Some("{ svgr: false }"));
        ctx.to_tera_context().expect("tera context");
    }
}
