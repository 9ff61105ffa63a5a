//! Result assembly and JSON serialisation of the `{ structure, dependencies }` shape.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;

use crate::config::{AnalysisMetadata, AnalysisResult, FileNode};
use crate::phases::imports::ImportsOutput;
use crate::phases::structure::count_files;

/// Assemble the AnalysisResult from the phase outputs.
pub fn build_result(
    structure: FileNode,
    imports: ImportsOutput,
    eligible_files: usize,
    timings: HashMap<String, f64>,
    total_ms: f64,
) -> AnalysisResult {
    AnalysisResult {
        structure,
        dependencies: imports.edges,
        diagnostics: imports.diagnostics,
        metadata: AnalysisMetadata {
            analysed_at: Utc::now().to_rfc3339(),
            duration_ms: (total_ms * 10.0).round() / 10.0,
            phase_timings: timings,
            eligible_files,
        },
    }
}

/// Summary counts for reporting.
pub fn stats(result: &AnalysisResult) -> HashMap<String, serde_json::Value> {
    let mut stats = HashMap::new();
    stats.insert(
        "files".to_string(),
        serde_json::json!(count_files(&result.structure)),
    );
    stats.insert(
        "sources".to_string(),
        serde_json::json!(result.metadata.eligible_files),
    );
    stats.insert(
        "dependencies".to_string(),
        serde_json::json!(result.dependencies.len()),
    );
    stats.insert(
        "skipped".to_string(),
        serde_json::json!(result.diagnostics.len()),
    );
    stats
}

/// Serialise the boundary shape as pretty JSON.
pub fn to_json_string(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Write the analysis result to a JSON file.
pub fn write_output(result: &AnalysisResult, output_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = to_json_string(result).map_err(std::io::Error::other)?;
    std::fs::write(output_path, json)
}
