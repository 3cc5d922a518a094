//! Path & identifier mapper.
//!
//! For a target file, walks every applicable rule and fills the per-file
//! tables: which modules to import (keyed by import specifier) and, per
//! variable, which display key maps to which specifier.

use tracing::{debug, trace};

use crate::ast::SourceFile;
use crate::config::AutoImportRule;
use crate::context::{AutoImportContext, FileState};
use crate::path_utils;

/// One found file as seen from a target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFile {
    /// Path relative to the target's directory, extension untouched.
    pub display_key: String,
    /// What goes between the quotes of the import declaration.
    pub specifier: String,
}

/// Compute the display key and import specifier of `found_file` for a target
/// living in `current_dir`.
pub fn map_found_file(
    base_path: &str,
    current_dir: &str,
    found_file: &str,
    rule: &AutoImportRule,
) -> MappedFile {
    let absolute = path_utils::resolve(base_path, found_file);
    let display_key = path_utils::relative(current_dir, &absolute);

    let extension = path_utils::extension(&display_key);
    let mut specifier = match rule.extension_rewrite.get(extension) {
        Some(replacement) if !extension.is_empty() => format!(
            "{}{}",
            &display_key[..display_key.len() - extension.len()],
            replacement
        ),
        _ => display_key.clone(),
    };
    if !specifier.starts_with('.') {
        specifier.insert_str(0, "./");
    }

    MappedFile {
        display_key,
        specifier,
    }
}

/// Fills [`FileState`] for files that are the target of at least one rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileAnalyzer;

impl FileAnalyzer {
    pub fn wants(&self, context: &AutoImportContext, file: &SourceFile) -> bool {
        context.is_target(&file.file_name)
    }

    /// Reads the rules, writes both tables of `state`.
    pub fn visit(&self, context: &AutoImportContext, file: &SourceFile, state: &mut FileState) {
        let absolute_file = path_utils::resolve(context.base_path(), &file.file_name);
        let current_dir = path_utils::dirname(&absolute_file);

        for rule in context.rules_for(&file.file_name) {
            debug!(
                file = %file.file_name,
                variable = %rule.target_variable,
                files = rule.found_files.len(),
                "applying auto-import rule"
            );
            let entries = state
                .updated_variables
                .entry(rule.target_variable.clone())
                .or_default();

            for found_file in &rule.found_files {
                let mapped = map_found_file(context.base_path(), &current_dir, found_file, rule);
                let binding = state.imported_files.register(&mapped.specifier);
                trace!(
                    key = %mapped.display_key,
                    specifier = %mapped.specifier,
                    placeholder = %binding.placeholder,
                    "mapped auto-import"
                );
                entries.insert(mapped.display_key, mapped.specifier);
            }
        }
    }
}
