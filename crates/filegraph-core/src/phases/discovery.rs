//! Phase 2: Collect the eligible source files from the hierarchy.

use std::collections::HashSet;

use crate::config::{FileNode, NodeKind};

/// Source files that may be parsed and may be the target of an edge.
///
/// Built once per analysis and shared read-only with every worker.
#[derive(Debug, Clone, Default)]
pub struct EligibleFiles {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl EligibleFiles {
    /// Paths in pre-order discovery order.
    pub fn ordered(&self) -> &[String] {
        &self.ordered
    }

    pub fn contains(&self, path: &str) -> bool {
        self.members.contains(path)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Pre-order walk collecting every file whose dotted extension matches.
pub fn discover_eligible_files(root: &FileNode, dotted_extension: &str) -> EligibleFiles {
    let mut ordered = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.kind {
            NodeKind::File => {
                if node.extension.as_deref() == Some(dotted_extension) {
                    ordered.push(node.path.clone());
                }
            }
            NodeKind::Directory => stack.extend(node.children().iter().rev()),
        }
    }

    let members = ordered.iter().cloned().collect();
    EligibleFiles { ordered, members }
}
