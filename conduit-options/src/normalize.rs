//! Rebase path-valued options onto a project root.
//!
//! Legacy configs give paths relative to the project directory; the new
//! plugin resolves them from the workspace root. Every string stored under a
//! known path key is joined onto the project root, at any nesting depth.
//! Other values are copied unchanged.

use serde_json::{Map, Value};

/// Option keys whose string values are paths.
pub const PATH_OPTION_KEYS: &[&str] = &[
    "output",
    "outputPath",
    "index",
    "main",
    "tsConfig",
    "polyfills",
    "babelConfig",
    "postcssConfig",
    "styles",
    "scripts",
    "assets",
    "additionalEntryPoints",
    "input",
    "replace",
    "with",
    "webpackConfig",
];

/// Normalize `bag` against `base_dir` using [`PATH_OPTION_KEYS`].
pub fn normalize_path_options(base_dir: &str, bag: &Map<String, Value>) -> Map<String, Value> {
    Normalizer::default().normalize(base_dir, bag)
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    keys: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            keys: PATH_OPTION_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Normalizer {
    /// Default keys plus `extra`.
    pub fn with_extra_keys<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut normalizer = Self::default();
        for key in extra {
            let key = key.into();
            if !normalizer.keys.contains(&key) {
                normalizer.keys.push(key);
            }
        }
        normalizer
    }

    pub fn is_path_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn normalize(&self, base_dir: &str, bag: &Map<String, Value>) -> Map<String, Value> {
        bag.iter()
            .map(|(key, value)| {
                let value = if self.is_path_key(key) {
                    self.rebase(base_dir, value)
                } else {
                    self.walk(base_dir, value)
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Recurse into containers looking for path keys.
    fn walk(&self, base_dir: &str, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.normalize(base_dir, map)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.walk(base_dir, v)).collect()),
            other => other.clone(),
        }
    }

    /// Value stored under a path key: strings are joined, arrays element-wise.
    fn rebase(&self, base_dir: &str, value: &Value) -> Value {
        match value {
            Value::String(path) => Value::String(join_path_fragments(&[base_dir, path])),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.rebase(base_dir, v)).collect()),
            Value::Object(map) => Value::Object(self.normalize(base_dir, map)),
            other => other.clone(),
        }
    }
}

/// Join fragments with `/` and resolve `.` and `..` lexically.
///
/// Backslashes count as separators. An absolute first fragment keeps its
/// leading slash, a trailing slash is kept, and an empty result is `.`.
pub fn join_path_fragments(fragments: &[&str]) -> String {
    let joined = fragments
        .iter()
        .filter(|f| !f.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
        .replace('\\', "/");
    normalize_path(&joined)
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let mut out = parts.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[rstest]
    #[case(&["apps/foo", "./dist"], "apps/foo/dist")]
    #[case(&["apps/foo", "../../dist/apps/foo"], "dist/apps/foo")]
    #[case(&["apps/foo", "src/main.ts"], "apps/foo/src/main.ts")]
    #[case(&["apps/foo", ""], "apps/foo")]
    #[case(&["apps/foo", ".."], "apps")]
    #[case(&["apps/foo", "../.."], ".")]
    #[case(&["/abs", "../x"], "/x")]
    #[case(&["/", ".."], "/")]
    #[case(&["apps\\foo", "src\\app"], "apps/foo/src/app")]
    #[case(&["apps/foo", "public/"], "apps/foo/public/")]
    #[case(&[".", "dist"], "dist")]
    #[case(&["", ""], ".")]
    fn joins_like_node(#[case] fragments: &[&str], #[case] expected: &str) {
        assert_eq!(join_path_fragments(fragments), expected);
    }

    #[test]
    fn rebases_known_keys_only() {
        let out = normalize_path_options(
            "apps/shop",
            &bag(json!({
                "outputPath": "../../dist/apps/shop",
                "main": "./src/main.ts",
                "compiler": "babel",
                "optimization": true,
            })),
        );
        assert_eq!(
            Value::Object(out),
            json!({
                "outputPath": "dist/apps/shop",
                "main": "apps/shop/src/main.ts",
                "compiler": "babel",
                "optimization": true,
            })
        );
    }

    #[test]
    fn arrays_and_nested_objects_are_rebased() {
        let out = normalize_path_options(
            "apps/shop",
            &bag(json!({
                "styles": ["./src/styles.css", { "input": "./src/theme.css", "inject": false }],
                "assets": [{ "input": "./public", "glob": "**/*", "output": "." }],
                "fileReplacements": [{ "replace": "src/env.ts", "with": "src/env.prod.ts" }],
                "port": 4200,
            })),
        );
        assert_eq!(
            Value::Object(out),
            json!({
                "styles": ["apps/shop/src/styles.css", { "input": "apps/shop/src/theme.css", "inject": false }],
                "assets": [{ "input": "apps/shop/public", "glob": "**/*", "output": "apps/shop" }],
                "fileReplacements": [{ "replace": "apps/shop/src/env.ts", "with": "apps/shop/src/env.prod.ts" }],
                "port": 4200,
            })
        );
    }

    #[test]
    fn non_string_path_values_are_untouched() {
        let out = normalize_path_options("apps/a", &bag(json!({ "main": null, "index": false })));
        assert_eq!(Value::Object(out), json!({ "main": null, "index": false }));
    }

    #[test]
    fn key_order_is_preserved() {
        let out = normalize_path_options("a", &bag(json!({ "z": 1, "main": "m.ts", "b": 2 })));
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "main", "b"]);
    }

    #[test]
    fn extra_keys_extend_the_default_set() {
        let normalizer = Normalizer::with_extra_keys(["customEntry"]);
        let out = normalizer.normalize("apps/a", &bag(json!({ "customEntry": "x.ts", "main": "m.ts" })));
        assert_eq!(
            Value::Object(out),
            json!({ "customEntry": "apps/a/x.ts", "main": "apps/a/m.ts" })
        );
        assert!(!Normalizer::default().is_path_key("customEntry"));
    }

    #[test]
    fn input_is_not_mutated() {
        let input = bag(json!({ "main": "./m.ts" }));
        let _ = normalize_path_options("apps/a", &input);
        assert_eq!(input.get("main"), Some(&json!("./m.ts")));
    }
}
