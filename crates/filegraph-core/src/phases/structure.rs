//! Phase 1: Walk the project directory and build the FileNode hierarchy.

use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::{AnalysisConfig, FileNode};
use crate::error::{AnalysisError, Result};

/// Entry names always pruned from the hierarchy.
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", ".git"];

/// Run the structure phase: walk the project root and return its hierarchy.
///
/// Children are ordered by file name. Excluded entries are pruned together
/// with their subtrees. Only a missing, non-directory or unreadable root is
/// an error; unreadable entries below it are skipped.
pub fn run_structure_phase(config: &AnalysisConfig) -> Result<FileNode> {
    let root = Path::new(&config.repo_path)
        .canonicalize()
        .map_err(|e| root_unreadable(&config.repo_path, e.to_string()))?;
    if !root.is_dir() {
        return Err(root_unreadable(&config.repo_path, "not a directory"));
    }
    std::fs::read_dir(&root).map_err(|e| root_unreadable(&config.repo_path, e.to_string()))?;

    let exclude_patterns: Vec<&str> = DEFAULT_EXCLUDES
        .iter()
        .copied()
        .chain(config.exclude_patterns.iter().map(|s| s.as_str()))
        .collect();

    // Open directories, one per depth level.
    let mut open: Vec<FileNode> = Vec::new();

    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !exclude_patterns.iter().any(|p| name == *p)
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        while open.len() > entry.depth() {
            close_directory(&mut open);
        }

        let path = entry.path().to_string_lossy().to_string();
        let name = if entry.depth() == 0 {
            root.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone())
        } else {
            entry.file_name().to_string_lossy().to_string()
        };

        if entry.file_type().is_dir() {
            open.push(FileNode::directory(path, name));
        } else if entry.file_type().is_file() {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            attach(&mut open, FileNode::file(path, name, size));
        } else {
            debug!("skipping non-regular entry {path}");
        }
    }

    while open.len() > 1 {
        close_directory(&mut open);
    }
    open.pop()
        .ok_or_else(|| root_unreadable(&config.repo_path, "walk produced no root entry"))
}

fn root_unreadable(path: &str, reason: impl Into<String>) -> AnalysisError {
    AnalysisError::RootUnreadable {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Pop the innermost open directory and attach it to its parent.
fn close_directory(open: &mut Vec<FileNode>) {
    if open.len() < 2 {
        return;
    }
    if let Some(dir) = open.pop() {
        attach(open, dir);
    }
}

fn attach(open: &mut [FileNode], node: FileNode) {
    if let Some(children) = open.last_mut().and_then(|d| d.children.as_mut()) {
        children.push(node);
    }
}

/// Count file-kind nodes in a hierarchy.
pub fn count_files(root: &FileNode) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_file() {
            count += 1;
        } else {
            stack.extend(node.children());
        }
    }
    count
}
