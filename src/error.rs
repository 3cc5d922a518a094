//! Error types for the auto-import transform.
//!
//! The transform itself only ever raises [`ConfigurationError`]. Failures coming
//! from the glob collaborator (bad patterns, unreadable directories) are carried
//! through unchanged in the other [`Error`] variants.

use std::fmt;

/// Prefix shared by every configuration error message.
pub const CONFIGURATION_ERROR_PREFIX: &str = "Error in transformer configuration";

/// What exactly is wrong with a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationProblem {
    NotAnObject,
    MissingAutoImports,
    AutoImportsNotArray,
    MissingSource,
    SourceNotObject,
    MissingSourceGlob,
    SourceGlobNotString,
    SourceIgnoreInvalid,
    MissingTarget,
    TargetNotObject,
    MissingTargetFile,
    TargetFileNotString,
    MissingTargetVariable,
    TargetVariableNotString,
    ExtensionRewriteNotObject,
}

impl ConfigurationProblem {
    /// The message body, without prefix or item suffix.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotAnObject => "configuration must be an object",
            Self::MissingAutoImports => "missing \"autoImports\" entry",
            Self::AutoImportsNotArray => "\"autoImports\" must be an array",
            Self::MissingSource => "missing \"source\" entry",
            Self::SourceNotObject => "\"source\" entry must be an object",
            Self::MissingSourceGlob => "missing \"source.glob\"",
            Self::SourceGlobNotString => "\"source.glob\" must be a string",
            Self::SourceIgnoreInvalid => {
                "\"source.ignore\" must either be a string or a string array"
            }
            Self::MissingTarget => "missing \"target\" entry",
            Self::TargetNotObject => "\"target\" entry must be an object",
            Self::MissingTargetFile => "missing \"target.file\"",
            Self::TargetFileNotString => "\"target.file\" must be a string",
            Self::MissingTargetVariable => "missing \"target.variable\"",
            Self::TargetVariableNotString => "\"target.variable\" must be a string",
            Self::ExtensionRewriteNotObject => "\"target.extensionRewrite\" must be an object",
        }
    }
}

impl fmt::Display for ConfigurationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Malformed user configuration.
///
/// `item` is the zero-based position in `autoImports` when the problem is
/// scoped to one entry; it is displayed one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    pub problem: ConfigurationProblem,
    pub item: Option<usize>,
}

impl ConfigurationError {
    pub const fn new(problem: ConfigurationProblem) -> Self {
        Self {
            problem,
            item: None,
        }
    }

    pub const fn for_item(problem: ConfigurationProblem, index: usize) -> Self {
        Self {
            problem,
            item: Some(index),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(CONFIGURATION_ERROR_PREFIX)?;
        if let Some(index) = self.item {
            write!(f, " (item #{})", index + 1)?;
        }
        write!(f, ": {}", self.problem)
    }
}

impl std::error::Error for ConfigurationError {}

/// Any failure of the auto-import pass.
#[derive(Debug)]
pub enum Error {
    Configuration(ConfigurationError),
    /// Invalid glob or ignore pattern.
    Glob(globset::Error),
    /// Filesystem failure while matching files.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(err) => fmt::Display::fmt(err, f),
            Error::Glob(err) => fmt::Display::fmt(err, f),
            Error::Io(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration(err) => Some(err),
            Error::Glob(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Error::Configuration(err)
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Error::Glob(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
