//! filegraph core: dependency extraction engine for JavaScript projects.
//!
//! This crate builds the project file hierarchy, discovers eligible source
//! files, extracts relative `import`/`require` references with tree-sitter,
//! resolves them against the filesystem and exposes the resulting edge list
//! through a path-indexed query surface.

pub mod config;
pub mod error;
pub mod graph;
pub mod languages;
pub mod output;
pub mod phases;
pub mod pipeline;

pub use config::{AnalysisConfig, AnalysisResult, DependencyEdge, EdgeKind, FileNode};
pub use error::{AnalysisError, Diagnostic};
pub use graph::dependency_graph::DependencyGraph;
