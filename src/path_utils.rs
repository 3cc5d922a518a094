//! Lexical POSIX path helpers.
//!
//! Everything the transform compares or emits is a `/`-separated string, so
//! these helpers never touch the filesystem and never produce `\`. Windows
//! drive prefixes (`C:/`) are treated as roots.

use std::path::Path;

/// Replace Windows separators by `/`.
pub fn to_posix(path: &str) -> String {
    path.replace('\\', "/")
}

pub fn path_to_posix(path: &Path) -> String {
    to_posix(&path.to_string_lossy())
}

/// Split a POSIX path into its root (`/`, `C:/` or empty) and the rest.
fn split_root(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.first() == Some(&b'/') {
        return path.split_at(1);
    }
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
    {
        return path.split_at(3);
    }
    ("", path)
}

pub fn is_absolute(path: &str) -> bool {
    !split_root(&to_posix(path)).0.is_empty()
}

/// Collapse `.`, `..` and duplicate separators.
///
/// Leading `..` segments of a relative path are kept; `..` above a root is
/// dropped.
pub fn normalize(path: &str) -> String {
    let path = to_posix(path);
    let (root, rest) = split_root(&path);
    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if root.is_empty() {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if root.is_empty() {
        if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        }
    } else {
        format!("{root}{joined}")
    }
}

/// Resolve `path` against `base` (which should be absolute).
pub fn resolve(base: &str, path: &str) -> String {
    if is_absolute(path) {
        normalize(path)
    } else {
        normalize(&format!("{}/{}", to_posix(base), to_posix(path)))
    }
}

/// Directory part of a path: `a/b/c.ts` -> `a/b`, `c.ts` -> `.`, `/c.ts` -> `/`.
pub fn dirname(path: &str) -> String {
    let path = normalize(path);
    let (root, rest) = split_root(&path);
    match rest.rfind('/') {
        Some(index) => format!("{root}{}", &rest[..index]),
        None if root.is_empty() => ".".to_string(),
        None => root.to_string(),
    }
}

/// Relative path leading from directory `from` to `to`.
///
/// Both paths are normalized first. Returns an empty string when they are the
/// same, and `to` unchanged when they live under different roots.
pub fn relative(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let (from_root, from_rest) = split_root(&from);
    let (to_root, to_rest) = split_root(&to);
    if from_root != to_root {
        return to;
    }

    let from_segments: Vec<&str> = from_rest
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let to_segments: Vec<&str> = to_rest
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    let mut common = 0;
    while common < from_segments.len()
        && common < to_segments.len()
        && from_segments[common] == to_segments[common]
    {
        common += 1;
    }

    let mut result: Vec<&str> = Vec::with_capacity(from_segments.len() + to_segments.len());
    for _ in common..from_segments.len() {
        result.push("..");
    }
    result.extend_from_slice(&to_segments[common..]);
    result.join("/")
}

/// Whether a relative path climbs out of its base directory.
pub fn escapes_base(relative_path: &str) -> bool {
    relative_path == ".." || relative_path.starts_with("../")
}

/// Extension of the last path segment, without the dot.
///
/// Only the text after the final `.` counts (`a.d.ts` -> `ts`); dot-files
/// such as `.eslintrc` have no extension. Case is preserved.
pub fn extension(path: &str) -> &str {
    let name = match path.rfind(['/', '\\']) {
        Some(index) => &path[index + 1..],
        None => path,
    };
    match name.rfind('.') {
        Some(0) | None => "",
        Some(index) => &name[index + 1..],
    }
}

/// Express `path` relative to `base` when absolute, or just normalize it.
pub fn base_relative(base: &str, path: &str) -> String {
    if is_absolute(path) {
        relative(base, path)
    } else {
        normalize(path)
    }
}
