use crate::graph::ir::DependencyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashSet;

/// A group of files that import each other, directly or transitively.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Cycle {
    pub id: usize,
    pub size: usize,
    /// Member paths, sorted
    pub members: Vec<String>,
    pub internal_edges: usize,
}

/// Find all non-trivial strongly connected components (size > 1 or a
/// self-import), ordered by their smallest member path.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let (dg, _) = graph.to_digraph();
    let mut cycles = Vec::new();

    for scc in tarjan_scc(&dg) {
        let is_self_loop = scc.len() == 1 && {
            let node = scc[0];
            dg.edges_directed(node, petgraph::Direction::Outgoing)
                .any(|e| e.target() == node)
        };
        if scc.len() <= 1 && !is_self_loop {
            continue;
        }

        let scc_set: HashSet<_> = scc.iter().copied().collect();
        let internal_edges = scc
            .iter()
            .flat_map(|&n| dg.edges_directed(n, petgraph::Direction::Outgoing))
            .filter(|e| scc_set.contains(&e.target()))
            .count();

        let mut members: Vec<String> = scc.iter().map(|&idx| dg[idx].clone()).collect();
        members.sort();

        cycles.push(Cycle {
            id: 0,
            size: scc.len(),
            members,
            internal_edges,
        });
    }

    cycles.sort_by(|a, b| a.members.cmp(&b.members));
    for (id, cycle) in cycles.iter_mut().enumerate() {
        cycle.id = id;
    }
    cycles
}
