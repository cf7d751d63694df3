pub mod builder;
pub mod ir;

pub use builder::{BuildOptions, CancellationToken, DependencyGraphBuilder};
pub use ir::{DependencyGraph, FileRecord, GraphEdge, GraphNode, GraphStats};
