//! Phase 3: Resolve module references into dependency edges.

use std::path::Path;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::config::{AnalysisConfig, DependencyEdge, ModuleReference};
use crate::error::{AnalysisError, Diagnostic, Result};
use crate::languages::{AnalyserRegistry, LanguageAnalyser};
use crate::phases::discovery::EligibleFiles;
use crate::phases::parsing::extract_file_references;
use crate::phases::resolution::PathResolver;

/// Edges plus the per-file failures that were skipped along the way.
#[derive(Debug, Clone, Default)]
pub struct ImportsOutput {
    pub edges: Vec<DependencyEdge>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the imports phase over every eligible file.
///
/// Files are processed in parallel but their edges are concatenated in
/// discovery order. A file that cannot be read or parsed contributes no
/// edges and one diagnostic.
pub fn run_imports_phase(config: &AnalysisConfig, eligible: &EligibleFiles) -> Result<ImportsOutput> {
    let registry = AnalyserRegistry::new();
    let analyser = registry
        .get_by_extension(&config.source_extension)
        .ok_or_else(|| {
            AnalysisError::UnsupportedExtension(
                config.source_extension.trim_start_matches('.').to_string(),
            )
        })?;
    let resolver = PathResolver::new(&config.source_extension);

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build()?;

    let contributions: Vec<Result<Vec<DependencyEdge>>> = pool.install(|| {
        eligible
            .ordered()
            .par_iter()
            .map(|file| file_edges(analyser, &resolver, eligible, file))
            .collect()
    });

    let mut output = ImportsOutput::default();
    for (file, contribution) in eligible.ordered().iter().zip(contributions) {
        match contribution {
            Ok(edges) => {
                trace!("{file}: {} edges", edges.len());
                output.edges.extend(edges);
            }
            Err(err) => {
                warn!("skipping {file}: {err}");
                output.diagnostics.push(Diagnostic::from(&err));
            }
        }
    }

    debug!(
        "resolved {} edges from {} files ({} skipped)",
        output.edges.len(),
        eligible.len(),
        output.diagnostics.len()
    );
    Ok(output)
}

/// Extract, resolve and filter the references of a single file.
pub fn file_edges(
    analyser: &dyn LanguageAnalyser,
    resolver: &PathResolver,
    eligible: &EligibleFiles,
    file_path: &str,
) -> Result<Vec<DependencyEdge>> {
    let references = extract_file_references(analyser, file_path)?;
    Ok(references
        .into_iter()
        .filter(ModuleReference::is_relative)
        .filter_map(|reference| resolve_edge(resolver, eligible, reference))
        .collect())
}

/// Turn one reference into an edge when its target is an eligible file.
fn resolve_edge(
    resolver: &PathResolver,
    eligible: &EligibleFiles,
    reference: ModuleReference,
) -> Option<DependencyEdge> {
    let resolution = resolver.resolve(Path::new(&reference.source_file), &reference.specifier);
    let target = resolution.path().to_string_lossy().into_owned();
    if !resolution.is_resolved() || !eligible.contains(&target) {
        trace!(
            "dropping {} -> {} ({})",
            reference.source_file,
            reference.specifier,
            if resolution.is_resolved() { "not eligible" } else { "unresolved" }
        );
        return None;
    }

    Some(DependencyEdge {
        source: reference.source_file,
        target,
        kind: reference.declaration_kind.into(),
        imported_elements: reference.bound_names,
    })
}
