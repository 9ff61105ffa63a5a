//! Path-indexed view over the dependency edge list, backed by petgraph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::config::DependencyEdge;

/// Edge list plus a multigraph index keyed by file path.
///
/// Graph edge weights are positions in the edge list, so queries return
/// edges in the order the builder produced them.
pub struct DependencyGraph {
    edges: Vec<DependencyEdge>,
    graph: DiGraph<String, usize>,
    /// O(1) path → NodeIndex lookup.
    id_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new(edges: Vec<DependencyEdge>) -> Self {
        let mut graph = DiGraph::new();
        let mut id_index = HashMap::new();

        for (position, edge) in edges.iter().enumerate() {
            let source = ensure_node(&mut graph, &mut id_index, &edge.source);
            let target = ensure_node(&mut graph, &mut id_index, &edge.target);
            graph.add_edge(source, target, position);
        }

        Self {
            edges,
            graph,
            id_index,
        }
    }

    /// Edges whose target is `path`.
    pub fn incoming(&self, path: &str) -> Vec<&DependencyEdge> {
        self.directed(path, Direction::Incoming)
    }

    /// Edges whose source is `path`.
    pub fn outgoing(&self, path: &str) -> Vec<&DependencyEdge> {
        self.directed(path, Direction::Outgoing)
    }

    fn directed(&self, path: &str, direction: Direction) -> Vec<&DependencyEdge> {
        let Some(&idx) = self.id_index.get(path) else {
            return Vec::new();
        };
        let mut positions: Vec<usize> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| *edge.weight())
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|i| &self.edges[i]).collect()
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<DependencyEdge> {
        self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.id_index.contains_key(path)
    }
}

fn ensure_node(
    graph: &mut DiGraph<String, usize>,
    id_index: &mut HashMap<String, NodeIndex>,
    path: &str,
) -> NodeIndex {
    if let Some(&idx) = id_index.get(path) {
        idx
    } else {
        let idx = graph.add_node(path.to_string());
        id_index.insert(path.to_string(), idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeKind;

    fn edge(source: &str, target: &str, kind: EdgeKind) -> DependencyEdge {
        DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            imported_elements: Vec::new(),
        }
    }

    fn sample() -> DependencyGraph {
        DependencyGraph::new(vec![
            edge("/p/a.js", "/p/b.js", EdgeKind::Import),
            edge("/p/c.js", "/p/b.js", EdgeKind::Require),
            edge("/p/a.js", "/p/c.js", EdgeKind::Import),
            edge("/p/a.js", "/p/b.js", EdgeKind::Require),
        ])
    }

    #[test]
    fn incoming_in_edge_order() {
        let graph = sample();
        let sources: Vec<_> = graph
            .incoming("/p/b.js")
            .iter()
            .map(|e| (e.source.as_str(), e.kind))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("/p/a.js", EdgeKind::Import),
                ("/p/c.js", EdgeKind::Require),
                ("/p/a.js", EdgeKind::Require),
            ]
        );
    }

    #[test]
    fn outgoing_keeps_multi_edges() {
        let graph = sample();
        let targets: Vec<_> = graph
            .outgoing("/p/a.js")
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(targets, vec!["/p/b.js", "/p/c.js", "/p/b.js"]);
    }

    #[test]
    fn matches_linear_scan() {
        let graph = sample();
        for path in ["/p/a.js", "/p/b.js", "/p/c.js"] {
            let scanned: Vec<_> = graph.edges().iter().filter(|e| e.target == path).collect();
            assert_eq!(graph.incoming(path), scanned);
            let scanned: Vec<_> = graph.edges().iter().filter(|e| e.source == path).collect();
            assert_eq!(graph.outgoing(path), scanned);
        }
    }

    #[test]
    fn self_loop_counted_once_each_way() {
        let graph = DependencyGraph::new(vec![edge("/p/a.js", "/p/a.js", EdgeKind::Import)]);
        assert_eq!(graph.incoming("/p/a.js").len(), 1);
        assert_eq!(graph.outgoing("/p/a.js").len(), 1);
    }

    #[test]
    fn unknown_path_is_empty() {
        let graph = sample();
        assert!(graph.incoming("/p/zzz.js").is_empty());
        assert!(graph.outgoing("/p/zzz.js").is_empty());
        assert!(!graph.has_file("/p/zzz.js"));
        assert!(graph.has_file("/p/c.js"));
        assert_eq!(graph.edge_count(), 4);
    }
}
