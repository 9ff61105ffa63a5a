//! Graph structures built from analysis output.

pub mod dependency_graph;
