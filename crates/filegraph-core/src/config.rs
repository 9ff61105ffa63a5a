//! Core data types and configuration for filegraph analysis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// Kind of a filesystem entry in the project hierarchy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filesystem entry. The root node owns the whole hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Dotted extension, e.g. `".js"`. Files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Size in bytes. Files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Ordered children. Directories only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(path: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let extension = std::path::Path::new(&name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()));
        Self {
            path: path.into(),
            name,
            kind: NodeKind::File,
            extension,
            size: Some(size),
            children: None,
        }
    }

    pub fn directory(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind: NodeKind::Directory,
            extension: None,
            size: None,
            children: Some(Vec::new()),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// The syntax a module reference was written with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `import ... from './x'`
    DeclarativeImport,
    /// `const x = require('./x')`
    CallStyleRequire,
}

/// Sentinel bound name for namespace bindings (`import * as ns from ...`).
pub const NAMESPACE_BINDING: &str = "*";

/// A raw, unresolved module reference found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    pub source_file: String,
    pub specifier: String,
    pub declaration_kind: DeclarationKind,
    pub bound_names: Vec<String>,
}

impl ModuleReference {
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.')
    }
}

/// Edge kind in the dependency graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Import,
    Require,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Require => "require",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DeclarationKind> for EdgeKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::DeclarativeImport => Self::Import,
            DeclarationKind::CallStyleRequire => Self::Require,
        }
    }
}

/// A resolved dependency between two eligible source files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(rename = "importedElements", default)]
    pub imported_elements: Vec<String>,
}

/// Configuration for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub repo_path: String,
    pub output_path: Option<String>,
    /// Source extension without the leading dot.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    /// Entry names pruned from the hierarchy in addition to the defaults.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Worker threads for per-file extraction. `None` uses rayon's default.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub quiet: bool,
}

fn default_source_extension() -> String {
    "js".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            repo_path: String::new(),
            output_path: None,
            source_extension: default_source_extension(),
            exclude_patterns: Vec::new(),
            threads: None,
            verbose: false,
            quiet: false,
        }
    }
}

impl AnalysisConfig {
    /// The source extension with a leading dot, as stored on [`FileNode`].
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.source_extension.trim_start_matches('.'))
    }

    /// Where the JSON result goes: `output_path`, or `<root-name>.filegraph.json`.
    pub fn resolved_output_path(&self) -> String {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let name = std::path::Path::new(&self.repo_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string());
        format!("{name}.filegraph.json")
    }

    /// Log verbosity implied by the `quiet` and `verbose` flags. `quiet` wins.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// Run metadata that is not part of the serialized boundary shape.
#[derive(Debug, Clone, Default)]
pub struct AnalysisMetadata {
    pub analysed_at: String,
    pub duration_ms: f64,
    pub phase_timings: HashMap<String, f64>,
    pub eligible_files: usize,
}

/// Result of an analysis run. Serializes as `{ structure, dependencies }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub structure: FileNode,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub metadata: AnalysisMetadata,
}
