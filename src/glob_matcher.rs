//! Glob collaborator used by the configuration resolver.
//!
//! [`FileMatcher`] is the seam: the resolver only needs
//! `find(pattern, ignore, cwd)`. [`GlobMatcher`] is the filesystem-backed
//! implementation built on `globset` and `walkdir`, following node-glob
//! conventions:
//!
//! - relative patterns produce paths relative to `cwd`, absolute patterns
//!   produce absolute paths;
//! - `*` and `?` never cross a `/`, `**` does;
//! - entries whose name starts with `.` are only matched when the pattern
//!   spells out a dot segment;
//! - ignore patterns are matched against the same path form as the results;
//! - only files are returned, never directories;
//! - symlinked files are matched, symlinked directories are not descended
//!   into, so link cycles and aliases cannot repeat or hang a `**` walk.
//!
//! Results come out in walk order, sorted by file name inside each directory.

use globset::{Glob, GlobBuilder, GlobMatcher as CompiledGlob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

use crate::error::Result;
use crate::path_utils;

/// Finds the files matching a glob pattern.
pub trait FileMatcher {
    fn find(&self, pattern: &str, ignore: &[String], cwd: &Path) -> Result<Vec<String>>;
}

/// Filesystem glob matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl GlobMatcher {
    pub const fn new() -> Self {
        Self
    }
}

fn build_glob(pattern: &str) -> Result<Glob> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?)
}

fn build_ignore_set(ignore: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in ignore {
        builder.add(build_glob(&path_utils::to_posix(pattern))?);
    }
    Ok(builder.build()?)
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Split a pattern into the directory prefix without wildcards and the
/// remaining segments.
///
/// `plugins/specials/*.ts` -> (`plugins/specials`, [`*.ts`]).
pub(crate) fn split_literal_prefix(pattern: &str) -> (String, Vec<&str>) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal_len = segments
        .iter()
        .position(|segment| has_glob_meta(segment))
        .unwrap_or(segments.len());

    if literal_len == segments.len() {
        // Fully literal: the last segment is the file itself.
        let (file, dirs) = segments.split_last().map_or((None, &[][..]), |(f, d)| (Some(*f), d));
        return (dirs.join("/"), file.into_iter().collect());
    }

    (
        segments[..literal_len].join("/"),
        segments[literal_len..].to_vec(),
    )
}

impl FileMatcher for GlobMatcher {
    fn find(&self, pattern: &str, ignore: &[String], cwd: &Path) -> Result<Vec<String>> {
        let pattern = path_utils::to_posix(pattern);
        let absolute = path_utils::is_absolute(&pattern);
        let matcher: CompiledGlob = build_glob(&pattern)?.compile_matcher();
        let ignore_set = build_ignore_set(ignore)?;

        let (prefix, rest) = split_literal_prefix(&pattern);
        let walk_root: PathBuf = if absolute {
            PathBuf::from(if prefix.is_empty() { "/" } else { prefix.as_str() })
        } else if prefix.is_empty() {
            cwd.to_path_buf()
        } else {
            cwd.join(&prefix)
        };
        if !walk_root.is_dir() {
            trace!(root = %walk_root.display(), "glob root does not exist");
            return Ok(Vec::new());
        }

        let allow_dot = rest
            .iter()
            .any(|segment| segment.starts_with('.') && *segment != "." && *segment != "..");
        let mut walker = WalkDir::new(&walk_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if !rest.iter().any(|segment| segment.contains("**")) {
            walker = walker.max_depth(rest.len().max(1));
        }

        let mut found = Vec::new();
        let entries = walker.into_iter().filter_entry(|entry| {
            allow_dot || !entry.file_name().to_string_lossy().starts_with('.')
        });
        for entry in entries {
            let entry = entry?;
            // Follows the link for symlinked files.
            if !entry.path().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&walk_root)
                .map(path_utils::path_to_posix)
                .unwrap_or_default();
            let candidate = if absolute {
                path_utils::path_to_posix(entry.path())
            } else if prefix.is_empty() {
                relative
            } else {
                format!("{prefix}/{relative}")
            };

            if matcher.is_match(&candidate) && !ignore_set.is_match(&candidate) {
                found.push(candidate);
            }
        }

        trace!(pattern = %pattern, count = found.len(), "glob matched");
        Ok(found)
    }
}
