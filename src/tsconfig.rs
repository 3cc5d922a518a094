//! Locating the auto-import configuration on disk.
//!
//! The transform is registered as a `compilerOptions.plugins` entry of a
//! `tsconfig.json`:
//!
//! ```jsonc
//! {
//!   "compilerOptions": {
//!     "rootDir": "src",
//!     "plugins": [
//!       { "transform": "ts-transform-auto-import", "autoImports": [ ... ] }
//!     ]
//!   }
//! }
//! ```
//!
//! The plugin entry itself is the raw configuration. The base path is
//! `rootDir` (relative to the tsconfig declaring it) or the directory of the
//! tsconfig. A plain JSON file holding `{ "autoImports": [...] }` works too.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `transform` values under which the plugin entry is recognized.
pub const TRANSFORMER_NAMES: [&str; 2] = ["ts-transform-auto-import", "tsz-auto-import"];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    #[serde(default)]
    root_dir: Option<String>,
    #[serde(default)]
    plugins: Option<Vec<Value>>,
}

/// Raw configuration plus the directory everything resolves against.
#[derive(Debug, Clone)]
pub struct ProjectConfiguration {
    pub base_path: PathBuf,
    pub raw: Value,
}

/// Parse JSON that may contain comments and trailing commas.
pub fn parse_jsonc(source: &str) -> Result<Value> {
    serde_json::from_str(&normalize_jsonc(source)).context("failed to parse JSON")
}

/// Read a stand-alone configuration file.
pub fn load_configuration_file(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration: {}", path.display()))?;
    parse_jsonc(&source).with_context(|| format!("failed to parse configuration: {}", path.display()))
}

/// Find the auto-import plugin entry of a tsconfig, following `extends`.
///
/// `path` may be the tsconfig file or a directory containing `tsconfig.json`.
pub fn load_tsconfig_plugin(path: &Path) -> Result<ProjectConfiguration> {
    let path = if path.is_dir() {
        path.join("tsconfig.json")
    } else {
        path.to_path_buf()
    };
    let config_dir = path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;

    let mut visited = HashSet::new();
    let resolved = load_tsconfig_inner(&path, &mut visited)?;

    let raw = resolved
        .plugins
        .unwrap_or_default()
        .into_iter()
        .find(is_auto_import_plugin)
        .ok_or_else(|| {
            anyhow!(
                "no auto-import plugin (transform {}) in {}",
                TRANSFORMER_NAMES.join(" or "),
                path.display()
            )
        })?;
    let base_path = resolved.root_dir.unwrap_or(config_dir);
    debug!(tsconfig = %path.display(), base = %base_path.display(), "loaded auto-import plugin");

    Ok(ProjectConfiguration { base_path, raw })
}

fn is_auto_import_plugin(plugin: &Value) -> bool {
    plugin
        .get("transform")
        .and_then(Value::as_str)
        .is_some_and(|name| TRANSFORMER_NAMES.contains(&name))
}

/// Options merged along the `extends` chain, with `rootDir` already absolute.
#[derive(Debug, Default)]
struct ResolvedOptions {
    root_dir: Option<PathBuf>,
    plugins: Option<Vec<Value>>,
}

fn load_tsconfig_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ResolvedOptions> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsconfig extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let value = parse_jsonc(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;
    let config: TsConfig = serde_json::from_value(value)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    let config_dir = path.parent().unwrap_or(Path::new("."));
    let options = config.compiler_options.unwrap_or_default();
    let own = ResolvedOptions {
        root_dir: options.root_dir.map(|dir| config_dir.join(dir)),
        plugins: options.plugins,
    };

    let merged = match config.extends {
        Some(extends) => {
            let base = load_tsconfig_inner(&extends_target(config_dir, &extends), visited)?;
            ResolvedOptions {
                root_dir: own.root_dir.or(base.root_dir),
                plugins: own.plugins.or(base.plugins),
            }
        }
        None => own,
    };

    visited.remove(&canonical);
    Ok(merged)
}

/// `extends` is relative to the declaring tsconfig and may omit `.json`.
fn extends_target(config_dir: &Path, extends: &str) -> PathBuf {
    // `join` keeps absolute paths as they are.
    let mut target = config_dir.join(extends);
    if target.extension().is_none() {
        target.set_extension("json");
    }
    target
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum JsoncMode {
    Code,
    Str { escaped: bool },
    LineComment,
    BlockComment,
}

/// Turns JSONC into JSON in one pass: comments are dropped (their newlines
/// kept) and a comma whose next significant token closes an object or array
/// is removed, even when comments sit in between.
fn normalize_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut mode = JsoncMode::Code;
    let mut open_comma: Option<usize> = None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        mode = match mode {
            JsoncMode::LineComment if ch == '\n' => {
                out.push(ch);
                JsoncMode::Code
            }
            JsoncMode::LineComment => mode,
            JsoncMode::BlockComment if ch == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                JsoncMode::Code
            }
            JsoncMode::BlockComment => {
                if ch == '\n' {
                    out.push(ch);
                }
                mode
            }
            JsoncMode::Str { escaped } => {
                out.push(ch);
                match ch {
                    _ if escaped => JsoncMode::Str { escaped: false },
                    '\\' => JsoncMode::Str { escaped: true },
                    '"' => JsoncMode::Code,
                    _ => JsoncMode::Str { escaped: false },
                }
            }
            JsoncMode::Code => match (ch, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    JsoncMode::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    JsoncMode::BlockComment
                }
                (',', _) => {
                    open_comma = Some(out.len());
                    out.push(ch);
                    mode
                }
                ('}' | ']', _) => {
                    if let Some(at) = open_comma.take() {
                        out.remove(at);
                    }
                    out.push(ch);
                    mode
                }
                _ if ch.is_whitespace() => {
                    out.push(ch);
                    mode
                }
                _ => {
                    open_comma = None;
                    out.push(ch);
                    if ch == '"' {
                        JsoncMode::Str { escaped: false }
                    } else {
                        mode
                    }
                }
            },
        };
    }

    out
}
