//! Sequential phase orchestrator with timing.

use std::collections::HashMap;
use std::time::Instant;

use log::debug;

use crate::config::{AnalysisConfig, AnalysisResult};
use crate::error::Result;
use crate::output::build_result;
use crate::phases;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("structure", "Mapping file tree"),
    ("discovery", "Collecting source files"),
    ("imports", "Resolving dependencies"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// Execute the analysis pipeline and return the result.
///
/// Fails only when the project root cannot be read or the configuration
/// cannot be honoured; per-file problems end up in
/// [`AnalysisResult::diagnostics`].
pub fn run_pipeline(
    config: &AnalysisConfig,
    mut progress_callback: Option<ProgressCallback>,
) -> Result<AnalysisResult> {
    let mut timings: HashMap<String, f64> = HashMap::new();
    let total_start = Instant::now();

    let mut phase = |name: &str| -> Instant {
        if let Some(ref mut cb) = progress_callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }
        debug!("phase {name} started");
        Instant::now()
    };

    let start = phase("structure");
    let structure = phases::structure::run_structure_phase(config)?;
    timings.insert("structure".to_string(), start.elapsed().as_secs_f64());

    let start = phase("discovery");
    let eligible =
        phases::discovery::discover_eligible_files(&structure, &config.dotted_extension());
    timings.insert("discovery".to_string(), start.elapsed().as_secs_f64());
    debug!("{} eligible source files", eligible.len());

    let start = phase("imports");
    let imports = phases::imports::run_imports_phase(config, &eligible)?;
    timings.insert("imports".to_string(), start.elapsed().as_secs_f64());

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

    Ok(build_result(
        structure,
        imports,
        eligible.len(),
        timings,
        total_ms,
    ))
}
