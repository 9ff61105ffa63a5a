//! Relative module specifier resolution against the filesystem.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A probe hit an existing file.
    Resolved(PathBuf),
    /// No probe hit a file; carries the normalized base path as a best guess.
    Unresolved(PathBuf),
}

impl Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Self::Resolved(p) | Self::Unresolved(p) => p,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Resolves relative specifiers for one source extension.
///
/// Probe order is fixed: the exact path, then the path with the extension
/// appended, then `index.<ext>` inside it. Every probe must hit a regular
/// file; a directory at the exact path falls through to the later probes.
#[derive(Debug, Clone)]
pub struct PathResolver {
    extension: String,
}

impl PathResolver {
    /// `extension` may be given with or without the leading dot.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn resolve(&self, source_file: &Path, specifier: &str) -> Resolution {
        let dir = source_file.parent().unwrap_or_else(|| Path::new(""));
        let base = normalize_path(&dir.join(specifier));

        // `./b/`, `.` and `..` can only name a directory.
        if !names_directory(specifier) {
            if base.is_file() {
                return Resolution::Resolved(base);
            }

            let with_extension = append_extension(&base, &self.extension);
            if with_extension.is_file() {
                return Resolution::Resolved(with_extension);
            }
        }

        let index = base.join(format!("index.{}", self.extension));
        if index.is_file() {
            return Resolution::Resolved(index);
        }

        Resolution::Unresolved(base)
    }
}

/// True when the specifier ends in `/` or its last segment is `.` or `..`.
fn names_directory(specifier: &str) -> bool {
    specifier.ends_with('/') || matches!(specifier.rsplit('/').next(), Some(".") | Some(".."))
}

/// `base` + `.ext`, keeping any dots already in the file name.
fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

/// Lexically collapse `.` and `..` components without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
