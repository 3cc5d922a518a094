//! Compilation-wide configuration and per-file processing state.
//!
//! [`AutoImportContext`] is built once per compilation and never changes.
//! [`FileState`] holds the two tables filled while one file is processed; a
//! fresh state is used for every file, so nothing leaks between files.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::ast::Identifier;
use crate::config::{self, AutoImportRule};
use crate::error::Result;
use crate::glob_matcher::{FileMatcher, GlobMatcher};
use crate::path_utils;

/// Resolved configuration shared by every file of a compilation.
#[derive(Debug, Clone)]
pub struct AutoImportContext {
    base_path: String,
    rules: Vec<AutoImportRule>,
}

impl AutoImportContext {
    /// Validate `raw` and match every glob on the filesystem, relative to
    /// `base_path`.
    pub fn new(raw: &Value, base_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_matcher(raw, base_path, &GlobMatcher::new())
    }

    pub fn with_matcher(
        raw: &Value,
        base_path: impl AsRef<Path>,
        matcher: &dyn FileMatcher,
    ) -> Result<Self> {
        let base_path = std::path::absolute(base_path.as_ref())?;
        let rules = config::resolve_rules(raw, &base_path, matcher)?;
        Ok(Self::from_rules(&path_utils::path_to_posix(&base_path), rules))
    }

    /// Build a context from already resolved rules.
    pub fn from_rules(base_path: &str, rules: Vec<AutoImportRule>) -> Self {
        Self {
            base_path: path_utils::normalize(base_path),
            rules,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn rules(&self) -> &[AutoImportRule] {
        &self.rules
    }

    /// Base-relative POSIX key of a source file, as compared with
    /// `target.file`.
    pub fn target_key(&self, file_name: &str) -> String {
        path_utils::base_relative(&self.base_path, file_name)
    }

    /// Rules whose target is `file_name`, in declaration order.
    pub fn rules_for<'a>(&'a self, file_name: &str) -> impl Iterator<Item = &'a AutoImportRule> {
        let key = self.target_key(file_name);
        self.rules.iter().filter(move |rule| rule.target_file == key)
    }

    pub fn is_target(&self, file_name: &str) -> bool {
        self.rules_for(file_name).next().is_some()
    }

    /// Distinct target files, base-relative, in first-declaration order.
    pub fn target_files(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !targets.contains(&rule.target_file.as_str()) {
                targets.push(&rule.target_file);
            }
        }
        targets
    }
}

/// Identifier bound to one imported module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    /// `auto_import_<n>`, only meaningful until imports are synthesized.
    pub placeholder: String,
    /// Name assigned by the factory once the import declaration exists.
    pub name: Option<String>,
}

impl ImportBinding {
    /// The name to reference the module by right now.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name.as_deref().unwrap_or(&self.placeholder))
    }
}

/// Import specifier -> binding, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImportedFiles(IndexMap<String, ImportBinding>);

impl ImportedFiles {
    /// Register `specifier` unless already known; returns its binding.
    pub fn register(&mut self, specifier: &str) -> &ImportBinding {
        let next = self.0.len();
        self.0
            .entry(specifier.to_string())
            .or_insert_with(|| ImportBinding {
                placeholder: format!("auto_import_{next}"),
                name: None,
            })
    }

    pub fn get(&self, specifier: &str) -> Option<&ImportBinding> {
        self.0.get(specifier)
    }

    /// Record the final name chosen for `specifier`.
    pub fn finalize(&mut self, specifier: &str, name: Identifier) {
        if let Some(binding) = self.0.get_mut(specifier) {
            binding.name = Some(name.text);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImportBinding)> {
        self.0.iter().map(|(specifier, binding)| (specifier.as_str(), binding))
    }

    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Display key -> import specifier for one variable.
pub type VariableEntries = IndexMap<String, String>;

/// Variable name -> its entries, merged across rules.
pub type UpdatedVariables = IndexMap<String, VariableEntries>;

/// Tables filled while processing a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileState {
    pub imported_files: ImportedFiles,
    pub updated_variables: UpdatedVariables,
}

impl FileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.imported_files.clear();
        self.updated_variables.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.imported_files.is_empty() && self.updated_variables.is_empty()
    }
}
