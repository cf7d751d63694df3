use crate::walk::{extension_of, Language};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One file of the analyzed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// '/'-separated path relative to the repository root, no leading slash
    pub path: String,
    /// Lowercased extension without the dot, empty when absent
    pub extension: String,
    /// Size in bytes as reported by the listing
    pub size_estimate: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size_estimate: u64) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            extension,
            size_estimate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Same as the file path
    pub id: String,
    /// Last path segment
    pub label: String,
    pub extension: String,
    pub language: Language,
    /// Specifiers that resolved to a file, in source order
    pub imports: Vec<String>,
    /// Ids of the files importing this one
    pub imported_by: BTreeSet<String>,
}

impl GraphNode {
    pub fn from_record(record: &FileRecord) -> Self {
        let label = record
            .path
            .rsplit('/')
            .next()
            .unwrap_or(&record.path)
            .to_string();
        Self {
            id: record.path.clone(),
            label,
            extension: record.extension.clone(),
            language: Language::from_extension(&record.extension),
            imports: Vec::new(),
            imported_by: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// The raw specifier that produced this edge
    pub import_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_files: usize,
    pub analyzed_files: usize,
    /// Files whose content could not be fetched
    pub failed_files: usize,
    pub total_dependencies: usize,
    pub internal_deps: usize,
    pub external_deps: usize,
}

/// File-level dependency graph produced by
/// [`DependencyGraphBuilder`](crate::graph::builder::DependencyGraphBuilder).
///
/// Edges are not deduplicated: two identical imports yield two edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}

/// Petgraph view of a [`DependencyGraph`], one edge per [`GraphEdge`].
pub type DepGraph = DiGraph<String, String>;

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Outgoing edges of a node, in discovery order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Number of distinct files a node depends on.
    pub fn fan_out(&self, id: &str) -> usize {
        self.edges_from(id)
            .map(|e| e.target.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of distinct files depending on a node.
    pub fn fan_in(&self, id: &str) -> usize {
        self.nodes.get(id).map_or(0, |n| n.imported_by.len())
    }

    /// Convert to a petgraph graph for algorithms (cycles, reachability).
    pub fn to_digraph(&self) -> (DepGraph, HashMap<String, NodeIndex>) {
        let mut graph = DepGraph::new();
        let mut index = HashMap::with_capacity(self.nodes.len());
        for id in self.nodes.keys() {
            index.insert(id.clone(), graph.add_node(id.clone()));
        }
        for edge in &self.edges {
            if let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) {
                graph.add_edge(s, t, edge.import_path.clone());
            }
        }
        (graph, index)
    }
}
