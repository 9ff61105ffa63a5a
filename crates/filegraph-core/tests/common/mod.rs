//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use filegraph_core::config::{AnalysisConfig, DependencyEdge, FileNode, ModuleReference};
use filegraph_core::languages::AnalyserRegistry;
use filegraph_core::phases::discovery::{discover_eligible_files, EligibleFiles};
use filegraph_core::phases::imports::{run_imports_phase, ImportsOutput};
use filegraph_core::phases::parsing::extract_source_references;
use filegraph_core::phases::structure::run_structure_phase;

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

/// Absolute path string of a file inside a fixture.
pub fn fixture_file(fixture_name: &str, relative: &str) -> String {
    fixture_path(fixture_name)
        .join(relative)
        .to_string_lossy()
        .to_string()
}

pub fn config_for(path: &Path) -> AnalysisConfig {
    AnalysisConfig {
        repo_path: path.to_string_lossy().to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Phase runners
// ---------------------------------------------------------------------------

pub struct PhaseResult {
    pub structure: FileNode,
    pub eligible: EligibleFiles,
    pub imports: ImportsOutput,
    pub config: AnalysisConfig,
}

/// Run structure + discovery + imports on an arbitrary directory.
pub fn run_phases_at(path: &Path) -> PhaseResult {
    let config = config_for(path);
    let structure = run_structure_phase(&config).expect("structure phase failed");
    let eligible = discover_eligible_files(&structure, &config.dotted_extension());
    let imports = run_imports_phase(&config, &eligible).expect("imports phase failed");
    PhaseResult {
        structure,
        eligible,
        imports,
        config,
    }
}

/// Run structure + discovery + imports on a fixture directory.
pub fn run_phases(fixture_name: &str) -> PhaseResult {
    run_phases_at(&fixture_path(fixture_name))
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Strip `root` from an absolute path for readable assertions.
pub fn relative(root: &Path, path: &str) -> String {
    Path::new(path)
        .strip_prefix(root)
        .unwrap_or(Path::new(path))
        .to_string_lossy()
        .replace('\\', "/")
}

/// Edges as (source, target, type, importedElements) relative to `root`.
pub fn edge_tuples(root: &Path, edges: &[DependencyEdge]) -> Vec<(String, String, String, Vec<String>)> {
    edges
        .iter()
        .map(|e| {
            (
                relative(root, &e.source),
                relative(root, &e.target),
                e.kind.to_string(),
                e.imported_elements.clone(),
            )
        })
        .collect()
}

/// Parse a source string as `/virtual/a.js` and return its references.
pub fn parse_references(code: &str) -> Vec<ModuleReference> {
    let registry = AnalyserRegistry::new();
    let analyser = registry
        .get_by_extension("js")
        .expect("No analyser for extension");
    extract_source_references(analyser, code.as_bytes(), "/virtual/a.js")
        .expect("Failed to parse")
}

/// Write `files` (relative path, contents) under a fresh temp directory.
pub fn temp_project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (relative, contents) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
    }
    dir
}

/// Canonical root of a temp project, matching the paths the walk produces.
pub fn canonical(dir: &tempfile::TempDir) -> PathBuf {
    dir.path()
        .canonicalize()
        .expect("Failed to canonicalize temp dir")
}
