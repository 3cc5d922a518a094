//! Configuration resolver.
//!
//! Turns the raw plugin configuration (an arbitrary JSON value) into a typed
//! [`AutoImportConfig`], then runs the glob collaborator once per entry to get
//! the frozen list of [`AutoImportRule`]s used for the whole compilation.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, trace};

use crate::error::{ConfigurationError, ConfigurationProblem, Result};
use crate::glob_matcher::FileMatcher;
use crate::path_utils;

/// Extension rewrites applied when `target.extensionRewrite` is omitted.
pub const DEFAULT_EXTENSION_REWRITE: [(&str, &str); 2] = [("ts", "js"), ("tsx", "jsx")];

pub fn default_extension_rewrite() -> IndexMap<String, String> {
    DEFAULT_EXTENSION_REWRITE
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect()
}

/// Validated user configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoImportConfig {
    pub auto_imports: Vec<AutoImportEntry>,
}

/// One `autoImports` item, as written by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoImportEntry {
    pub source: SourceSelector,
    pub target: TargetSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelector {
    pub glob: String,
    /// A single `ignore` string is stored as a one-element list.
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub file: String,
    pub variable: String,
    /// `None` when the user omitted the entry, which is not the same as an
    /// explicit empty object.
    pub extension_rewrite: Option<IndexMap<String, String>>,
}

/// A configuration entry with its defaults applied and its files found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoImportRule {
    pub source_glob: String,
    pub source_ignore: Vec<String>,
    /// Target file, base-relative and POSIX-normalized.
    pub target_file: String,
    pub target_variable: String,
    pub extension_rewrite: IndexMap<String, String>,
    /// Matched files: base-relative, `/`-separated, never outside the base.
    pub found_files: Vec<String>,
}

/// Validate the raw configuration value.
///
/// Checks run in a fixed order and stop at the first problem, which is
/// reported with the one-based index of the offending `autoImports` item.
pub fn validate_configuration(raw: &Value) -> Result<AutoImportConfig, ConfigurationError> {
    let root = raw
        .as_object()
        .ok_or(ConfigurationError::new(ConfigurationProblem::NotAnObject))?;
    let items = root
        .get("autoImports")
        .ok_or(ConfigurationError::new(
            ConfigurationProblem::MissingAutoImports,
        ))?
        .as_array()
        .ok_or(ConfigurationError::new(
            ConfigurationProblem::AutoImportsNotArray,
        ))?;

    let auto_imports = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_entry(item).map_err(|problem| ConfigurationError::for_item(problem, index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AutoImportConfig { auto_imports })
}

fn validate_entry(item: &Value) -> Result<AutoImportEntry, ConfigurationProblem> {
    use ConfigurationProblem as P;

    let item = item.as_object().ok_or(P::NotAnObject)?;

    let source = required_object(item, "source", P::MissingSource, P::SourceNotObject)?;
    let glob = required_string(source, "glob", P::MissingSourceGlob, P::SourceGlobNotString)?;
    let ignore = match source.get("ignore") {
        None => Vec::new(),
        Some(Value::String(pattern)) => vec![pattern.clone()],
        Some(Value::Array(patterns)) => patterns
            .iter()
            .map(|pattern| pattern.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(P::SourceIgnoreInvalid)?,
        Some(_) => return Err(P::SourceIgnoreInvalid),
    };

    let target = required_object(item, "target", P::MissingTarget, P::TargetNotObject)?;
    let file = required_string(target, "file", P::MissingTargetFile, P::TargetFileNotString)?;
    let variable = required_string(
        target,
        "variable",
        P::MissingTargetVariable,
        P::TargetVariableNotString,
    )?;
    let extension_rewrite = match target.get("extensionRewrite") {
        // `null` behaves like an absent key.
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(
            map.iter()
                .map(|(from, to)| Some((from.clone(), to.as_str()?.to_string())))
                .collect::<Option<IndexMap<_, _>>>()
                .ok_or(P::ExtensionRewriteNotObject)?,
        ),
        Some(_) => return Err(P::ExtensionRewriteNotObject),
    };

    Ok(AutoImportEntry {
        source: SourceSelector { glob, ignore },
        target: TargetSpec {
            file,
            variable,
            extension_rewrite,
        },
    })
}

fn required_object<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
    missing: ConfigurationProblem,
    wrong_type: ConfigurationProblem,
) -> Result<&'a Map<String, Value>, ConfigurationProblem> {
    parent.get(key).ok_or(missing)?.as_object().ok_or(wrong_type)
}

fn required_string(
    parent: &Map<String, Value>,
    key: &str,
    missing: ConfigurationProblem,
    wrong_type: ConfigurationProblem,
) -> Result<String, ConfigurationProblem> {
    parent
        .get(key)
        .ok_or(missing)?
        .as_str()
        .map(str::to_string)
        .ok_or(wrong_type)
}

/// Validate `raw` and resolve every entry into a rule, in declaration order.
///
/// `base_path` must be absolute; globs run with it as working directory.
/// Matcher failures are returned as-is.
pub fn resolve_rules(
    raw: &Value,
    base_path: &Path,
    matcher: &dyn FileMatcher,
) -> Result<Vec<AutoImportRule>> {
    let config = validate_configuration(raw)?;
    let base = path_utils::path_to_posix(base_path);

    let rules = config
        .auto_imports
        .into_iter()
        .map(|entry| resolve_entry(entry, &base, base_path, matcher))
        .collect::<Result<Vec<_>>>()?;

    info!(
        rules = rules.len(),
        files = rules.iter().map(|r| r.found_files.len()).sum::<usize>(),
        "resolved auto-import configuration"
    );
    Ok(rules)
}

fn resolve_entry(
    entry: AutoImportEntry,
    base: &str,
    base_path: &Path,
    matcher: &dyn FileMatcher,
) -> Result<AutoImportRule> {
    let AutoImportEntry { source, target } = entry;

    let matches = matcher.find(&source.glob, &source.ignore, base_path)?;
    let found_files: Vec<String> = matches
        .iter()
        .filter_map(|found| normalize_found_file(base, found))
        .collect();
    debug!(
        glob = %source.glob,
        matched = matches.len(),
        kept = found_files.len(),
        "matched auto-import sources"
    );

    Ok(AutoImportRule {
        source_glob: source.glob,
        source_ignore: source.ignore,
        target_file: path_utils::base_relative(base, &target.file),
        target_variable: target.variable,
        extension_rewrite: target
            .extension_rewrite
            .unwrap_or_else(default_extension_rewrite),
        found_files,
    })
}

/// Base-relative POSIX form of a matcher result, or `None` if it lies
/// outside the base path.
pub fn normalize_found_file(base: &str, found: &str) -> Option<String> {
    let relative = path_utils::base_relative(base, found);

    if relative.is_empty()
        || relative == "."
        || path_utils::escapes_base(&relative)
        || path_utils::is_absolute(&relative)
    {
        trace!(file = found, "dropping match outside of base path");
        return None;
    }
    Some(relative)
}
