//! Glob-driven auto-import transform.
//!
//! Given rules such as "every file matching `plugins/*.ts` goes into the
//! `plugins` variable of `plugins/index.ts`", the transform prepends one
//! import per matched file to the target file and rewrites the variable into
//! an object literal keyed by file name:
//!
//! ```typescript
//! // plugins/index.ts, before
//! export const plugins = {};
//!
//! // after
//! import first_js_1 from "./first.js";
//! import second_js_1 from "./second.js";
//! export const plugins = {
//!     "first.ts": first_js_1,
//!     "second.ts": second_js_1
//! };
//! ```
//!
//! The pieces, in pipeline order:
//!
//! - [`config`]: validates the configuration and resolves globs into rules
//! - [`file_analyzer`]: maps found files to import specifiers and keys
//! - [`import_inserter`]: inserts the import declarations
//! - [`materializer`]: rewrites the target variables

pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod file_analyzer;
pub mod glob_matcher;
pub mod import_inserter;
pub mod materializer;
pub mod path_utils;
pub mod printer;
pub mod source_parser;
pub mod tracing_config;
pub mod transformer;
pub mod tsconfig;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{AutoImportRule, resolve_rules, validate_configuration};
pub use context::{AutoImportContext, FileState, ImportedFiles, UpdatedVariables};
pub use error::{ConfigurationError, ConfigurationProblem, Error, Result};
pub use glob_matcher::{FileMatcher, GlobMatcher};
pub use materializer::{MaterializeMode, VariableMaterializer};
pub use transformer::{TransformedFile, Transformer};

#[cfg(test)]
#[path = "tests/path_utils_tests.rs"]
mod path_utils_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/glob_matcher_tests.rs"]
mod glob_matcher_tests;
#[cfg(test)]
#[path = "tests/file_analyzer_tests.rs"]
mod file_analyzer_tests;
#[cfg(test)]
#[path = "tests/transformer_tests.rs"]
mod transformer_tests;
#[cfg(test)]
#[path = "tests/source_parser_tests.rs"]
mod source_parser_tests;
#[cfg(test)]
#[path = "tests/tsconfig_tests.rs"]
mod tsconfig_tests;
