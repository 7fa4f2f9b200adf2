//! Tera rendering engine: embedded templates plus optional on-disk overrides.
//!
//! | Template                          | Output                                  |
//! |-----------------------------------|-----------------------------------------|
//! | `webpack/webpack.config.js.tera`  | replacement for a migrated webpack config |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::WebpackConfigContext;
use crate::error::RenderError;

/// Name of the generated webpack config template.
pub const WEBPACK_CONFIG_TEMPLATE: &str = "webpack/webpack.config.js.tera";

// Embedded templates, baked into the binary at compile time.
const TPLS: &[(&str, &str)] = &[(
    WEBPACK_CONFIG_TEMPLATE,
    include_str!("templates/webpack.config.js.tera"),
)];

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    files.sort();
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(normalize_template_name(Path::new(name)), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

/// Tera engine over the embedded templates.
///
/// `.tera` files under `user_template_dir` replace embedded templates of the
/// same relative name (lowercased, `/`-separated), e.g.
/// `<dir>/webpack/webpack.config.js.tera`.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render template `name` with `ctx`. Output always uses `\n` line endings.
    pub fn render(&self, name: &str, ctx: &WebpackConfigContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let content = self.tera.render(name, &tera_ctx)?;
        Ok(content.replace("\r\n", "\n"))
    }
}

/// Renders replacement webpack configs. Create once and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(None)?,
        })
    }

    /// Embedded templates overridden by any found in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(Some(dir))?,
        })
    }

    pub fn render_webpack_config(&self, ctx: &WebpackConfigContext) -> Result<String, RenderError> {
        self.engine.render(WEBPACK_CONFIG_TEMPLATE, ctx)
    }
}
