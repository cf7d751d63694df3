use crate::graph::ir::DependencyGraph;
use crate::metrics::scc::find_cycles;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate view of a dependency graph for reports.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub mean_fanout: f64,
    pub max_fanout: usize,
    pub mean_fanin: f64,
    pub max_fanin: usize,
    /// Nodes with neither imports nor importers
    pub orphan_count: usize,
    pub cycle_count: usize,
    pub largest_cycle_size: usize,
    /// Node count per language display name
    pub languages: BTreeMap<String, usize>,
}

/// A node ranked by connectivity.
#[derive(Debug, Clone, Serialize)]
pub struct Hotspot {
    pub node: String,
    pub fanout: usize,
    pub fanin: usize,
}

impl Summary {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let node_count = graph.nodes.len();
        let cycles = find_cycles(graph);
        let mut languages = BTreeMap::new();
        for node in graph.nodes.values() {
            *languages
                .entry(node.language.display_name().to_string())
                .or_insert(0) += 1;
        }

        if node_count == 0 {
            return Self {
                mean_fanout: 0.0,
                max_fanout: 0,
                mean_fanin: 0.0,
                max_fanin: 0,
                orphan_count: 0,
                cycle_count: 0,
                largest_cycle_size: 0,
                languages,
            };
        }

        let fanouts: Vec<usize> = graph.nodes.keys().map(|id| graph.fan_out(id)).collect();
        let fanins: Vec<usize> = graph.nodes.keys().map(|id| graph.fan_in(id)).collect();
        let orphan_count = fanouts
            .iter()
            .zip(&fanins)
            .filter(|(o, i)| **o == 0 && **i == 0)
            .count();

        let mean_fanout = fanouts.iter().sum::<usize>() as f64 / node_count as f64;
        let mean_fanin = fanins.iter().sum::<usize>() as f64 / node_count as f64;

        Self {
            mean_fanout: (mean_fanout * 100.0).round() / 100.0,
            max_fanout: fanouts.iter().copied().max().unwrap_or(0),
            mean_fanin: (mean_fanin * 100.0).round() / 100.0,
            max_fanin: fanins.iter().copied().max().unwrap_or(0),
            orphan_count,
            cycle_count: cycles.len(),
            largest_cycle_size: cycles.iter().map(|c| c.size).max().unwrap_or(0),
            languages,
        }
    }
}

/// Nodes sorted by fan-in, then fan-out (both descending), then path.
pub fn hotspots(graph: &DependencyGraph, top_n: usize) -> Vec<Hotspot> {
    let mut spots: Vec<Hotspot> = graph
        .nodes
        .keys()
        .map(|id| Hotspot {
            node: id.clone(),
            fanout: graph.fan_out(id),
            fanin: graph.fan_in(id),
        })
        .filter(|h| h.fanout > 0 || h.fanin > 0)
        .collect();
    spots.sort_by(|a, b| {
        b.fanin
            .cmp(&a.fanin)
            .then(b.fanout.cmp(&a.fanout))
            .then_with(|| a.node.cmp(&b.node))
    });
    spots.truncate(top_n);
    spots
}
