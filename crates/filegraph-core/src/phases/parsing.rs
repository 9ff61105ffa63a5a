//! Per-file read, parse and module reference extraction.

use tree_sitter::{Node, Parser, Point};

use crate::config::ModuleReference;
use crate::error::{AnalysisError, Result};
use crate::languages::LanguageAnalyser;

/// Read one file from disk and extract its module references.
pub fn extract_file_references(
    analyser: &dyn LanguageAnalyser,
    file_path: &str,
) -> Result<Vec<ModuleReference>> {
    let source = std::fs::read_to_string(file_path).map_err(|source| AnalysisError::FileRead {
        path: file_path.to_string(),
        source,
    })?;
    extract_source_references(analyser, source.as_bytes(), file_path)
}

/// Parse `source` and extract its module references.
///
/// A tree containing any syntax error is rejected as a whole, so a file
/// either contributes all of its references or none.
pub fn extract_source_references(
    analyser: &dyn LanguageAnalyser,
    source: &[u8],
    file_path: &str,
) -> Result<Vec<ModuleReference>> {
    let mut parser = Parser::new();
    parser
        .set_language(&analyser.get_language())
        .map_err(|e| AnalysisError::LanguageInit(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| AnalysisError::Parse {
        path: file_path.to_string(),
        message: "parser returned no tree".to_string(),
    })?;

    if let Some(point) = first_syntax_error(tree.root_node()) {
        return Err(AnalysisError::Parse {
            path: file_path.to_string(),
            message: format!(
                "syntax error at line {}, column {}",
                point.row + 1,
                point.column + 1
            ),
        });
    }

    let references = analyser
        .extract_references(&tree, source, file_path)
        .collect();
    Ok(references)
}

/// Position of the first ERROR or MISSING node in document order.
fn first_syntax_error(root: Node) -> Option<Point> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position());
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    Some(root.start_position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::javascript::JavaScriptAnalyser;

    #[test]
    fn clean_source_yields_references() {
        let analyser = JavaScriptAnalyser::new();
        let refs =
            extract_source_references(&analyser, b"import { a } from './a';", "/p/x.js").unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn syntax_error_reports_position() {
        let analyser = JavaScriptAnalyser::new();
        let source = b"import { a } from './a';\nconst = ;\n";
        let err = extract_source_references(&analyser, source, "/p/bad.js").unwrap_err();
        match err {
            AnalysisError::Parse { path, message } => {
                assert_eq!(path, "/p/bad.js");
                assert!(message.starts_with("syntax error at line"), "unexpected message: {message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let analyser = JavaScriptAnalyser::new();
        let err = extract_file_references(&analyser, "/definitely/not/here.js").unwrap_err();
        assert!(matches!(err, AnalysisError::FileRead { .. }));
    }

    #[test]
    fn non_utf8_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.js");
        std::fs::write(&path, [0x63, 0x6f, 0x6e, 0x73, 0x74, 0x20, 0xe9, 0xff]).unwrap();
        let analyser = JavaScriptAnalyser::new();
        let err = extract_file_references(&analyser, &path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, AnalysisError::FileRead { .. }));
    }
}
