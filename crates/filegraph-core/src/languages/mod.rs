//! Language analyser trait and registry.

use std::collections::HashMap;

use tree_sitter::{Language, Tree};

use crate::config::ModuleReference;

pub mod javascript;

/// Lazy stream of module references pulled from one parsed file.
pub type References<'tree> = Box<dyn Iterator<Item = ModuleReference> + 'tree>;

/// Trait that all language analysers implement.
pub trait LanguageAnalyser: Send + Sync {
    /// File extensions this analyser handles (e.g. &["js"]).
    fn extensions(&self) -> &[&str];

    /// Human-readable language name (e.g. "JavaScript").
    fn language_name(&self) -> &str;

    /// Get the tree-sitter Language for parsing.
    fn get_language(&self) -> Language;

    /// Extract module references from a parsed, error-free AST.
    fn extract_references<'tree>(
        &self,
        tree: &'tree Tree,
        source: &'tree [u8],
        file_path: &'tree str,
    ) -> References<'tree>;
}

/// Registry mapping file extensions to analysers.
pub struct AnalyserRegistry {
    analysers: Vec<Box<dyn LanguageAnalyser>>,
    extension_map: HashMap<String, usize>,
}

impl AnalyserRegistry {
    /// Build the registry with all available language analysers.
    pub fn new() -> Self {
        let analysers: Vec<Box<dyn LanguageAnalyser>> =
            vec![Box::new(javascript::JavaScriptAnalyser::new())];

        let mut extension_map = HashMap::new();
        for (i, analyser) in analysers.iter().enumerate() {
            for ext in analyser.extensions() {
                extension_map.insert(ext.to_string(), i);
            }
        }

        Self {
            analysers,
            extension_map,
        }
    }

    /// Get the analyser for a given file extension (with or without the dot).
    pub fn get_by_extension(&self, ext: &str) -> Option<&dyn LanguageAnalyser> {
        self.extension_map
            .get(ext.trim_start_matches('.'))
            .map(|&i| self.analysers[i].as_ref())
    }
}

impl Default for AnalyserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
