use crate::errors::Result;
use crate::graph::ir::{DependencyGraph, GraphEdge, GraphNode, GraphStats};
use crate::metrics::scc::Cycle;
use crate::metrics::summary::Summary;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct GraphOutput<'a> {
    pub metadata: Metadata,
    pub stats: &'a GraphStats,
    pub summary: Summary,
    pub nodes: Vec<&'a GraphNode>,
    pub edges: &'a [GraphEdge],
    pub cycles: Vec<Cycle>,
}

/// Facts about the run, not the graph.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub root: PathBuf,
    /// Git ref the files were read at, `None` for the working tree
    pub reference: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
    pub elapsed_ms: u64,
}

/// Write the graph with stats, summary and cycles as pretty JSON.
pub fn write_graph_json<W: Write>(
    writer: &mut W,
    graph: &DependencyGraph,
    summary: &Summary,
    cycles: &[Cycle],
    metadata: Metadata,
) -> Result<()> {
    let output = GraphOutput {
        metadata,
        stats: &graph.stats,
        summary: summary.clone(),
        nodes: graph.nodes.values().collect(),
        edges: &graph.edges,
        cycles: cycles.to_vec(),
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}
