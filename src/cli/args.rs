use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::materializer::MaterializeMode;

/// CLI arguments for the tsz-auto-import binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsz-auto-import",
    version,
    about = "Import every file matching a glob into a target module variable"
)]
pub struct CliArgs {
    /// Path to tsconfig.json (or a directory containing it) declaring the plugin.
    #[arg(short = 'p', long = "project", conflicts_with = "config")]
    pub project: Option<PathBuf>,

    /// Stand-alone JSON configuration holding an `autoImports` array.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Base directory for globs and target files.
    #[arg(long = "rootDir", alias = "root-dir")]
    pub root_dir: Option<PathBuf>,

    /// What the generated object values refer to.
    #[arg(long, value_enum, default_value_t = Mode::Identifier)]
    pub mode: Mode,

    /// Print the computed imports and variables as JSON instead of sources.
    #[arg(long)]
    pub json: bool,

    /// Rewrite the target files in place.
    #[arg(short = 'w', long, conflicts_with = "json")]
    pub write: bool,

    /// Files to transform. Defaults to every target file of the configuration.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Reference the imported binding.
    Identifier,
    /// Use the import specifier string.
    Specifier,
}

impl From<Mode> for MaterializeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Identifier => MaterializeMode::Identifier,
            Mode::Specifier => MaterializeMode::Specifier,
        }
    }
}
