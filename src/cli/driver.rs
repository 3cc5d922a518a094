//! Runs the auto-import pipeline over files on disk.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::args::CliArgs;
use crate::context::{AutoImportContext, UpdatedVariables};
use crate::path_utils;
use crate::printer::print_source_file;
use crate::source_parser::parse_source_file;
use crate::transformer::{TransformedFile, Transformer};
use crate::tsconfig::{self, ProjectConfiguration};

/// One processed file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub transformed: TransformedFile,
    /// Source text after the transform (the original text if untouched).
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct PlannedImport<'a> {
    pub specifier: &'a str,
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct FilePlan<'a> {
    pub file: String,
    pub changed: bool,
    pub imports: Vec<PlannedImport<'a>>,
    pub variables: &'a UpdatedVariables,
}

impl FileReport {
    pub fn plan(&self) -> FilePlan<'_> {
        let state = &self.transformed.state;
        FilePlan {
            file: path_utils::path_to_posix(&self.path),
            changed: self.transformed.changed,
            imports: state
                .imported_files
                .iter()
                .map(|(specifier, binding)| PlannedImport {
                    specifier,
                    identifier: binding.identifier().text,
                })
                .collect(),
            variables: &state.updated_variables,
        }
    }
}

/// Locate the raw configuration and base path from the arguments.
///
/// Without `--project` or `--config`, `tsconfig.json` in `cwd` is used.
pub fn load_project(args: &CliArgs, cwd: &Path) -> Result<ProjectConfiguration> {
    let mut project = match (&args.project, &args.config) {
        (Some(project), _) => tsconfig::load_tsconfig_plugin(&cwd.join(project))?,
        (None, Some(config)) => ProjectConfiguration {
            base_path: cwd.to_path_buf(),
            raw: tsconfig::load_configuration_file(&cwd.join(config))?,
        },
        (None, None) => {
            let default_tsconfig = cwd.join("tsconfig.json");
            if !default_tsconfig.is_file() {
                bail!(
                    "no tsconfig.json in {}; pass --project or --config",
                    cwd.display()
                );
            }
            tsconfig::load_tsconfig_plugin(&default_tsconfig)?
        }
    };

    if let Some(root_dir) = &args.root_dir {
        project.base_path = cwd.join(root_dir);
    }
    Ok(project)
}

/// Resolve the configuration once, then transform each requested file.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<Vec<FileReport>> {
    let project = load_project(args, cwd)?;
    let context = AutoImportContext::new(&project.raw, &project.base_path)?;
    let base_path = PathBuf::from(context.base_path());

    let files: Vec<PathBuf> = if args.files.is_empty() {
        context
            .target_files()
            .into_iter()
            .map(|target| base_path.join(target))
            .filter(|path| {
                let exists = path.is_file();
                if !exists {
                    warn!(file = %path.display(), "target file not found, skipping");
                }
                exists
            })
            .collect()
    } else {
        args.files.iter().map(|file| cwd.join(file)).collect()
    };

    let transformer = Transformer::with_mode(context, args.mode.into());
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read source file: {}", path.display()))?;
        let file = parse_source_file(path_utils::path_to_posix(&path), &text);
        let transformed = transformer.transform_file(file);
        let output = if transformed.changed {
            print_source_file(&transformed.file)
        } else {
            text
        };
        reports.push(FileReport {
            path,
            transformed,
            output,
        });
    }

    info!(files = reports.len(), "auto-import pass complete");
    Ok(reports)
}

/// Write every changed file back to disk; returns the paths written.
pub fn write_reports(reports: &[FileReport]) -> Result<Vec<&Path>> {
    let mut written = Vec::new();
    for report in reports.iter().filter(|report| report.transformed.changed) {
        std::fs::write(&report.path, &report.output)
            .with_context(|| format!("failed to write {}", report.path.display()))?;
        written.push(report.path.as_path());
    }
    Ok(written)
}

pub fn render_plans(reports: &[FileReport]) -> Result<String> {
    let plans: Vec<FilePlan<'_>> = reports.iter().map(FileReport::plan).collect();
    serde_json::to_string_pretty(&plans).context("failed to serialize plan")
}
