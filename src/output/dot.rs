use crate::errors::Result;
use crate::graph::ir::DependencyGraph;
use std::collections::HashMap;
use std::io::Write;

/// Write the dependency graph in Graphviz DOT format.
///
/// Nodes are colored by language. Repeated imports between the same pair of
/// files collapse into one edge labelled with the reference count.
pub fn write_dot<W: Write>(writer: &mut W, graph: &DependencyGraph) -> Result<()> {
    writeln!(writer, "digraph dependencies {{")?;
    writeln!(writer, "    rankdir=LR;")?;
    writeln!(writer, "    node [shape=box, style=filled];")?;
    writeln!(writer)?;

    for node in graph.nodes.values() {
        writeln!(
            writer,
            "    \"{}\" [label=\"{}\", fillcolor=\"{}\"];",
            escape(&node.id),
            escape(&node.label),
            node.language.color()
        )?;
    }
    writeln!(writer)?;

    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in &graph.edges {
        let key = (edge.source.as_str(), edge.target.as_str());
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    for (source, target) in order {
        let refs = counts.get(&(source, target)).copied().unwrap_or(1);
        if refs > 1 {
            writeln!(
                writer,
                "    \"{}\" -> \"{}\" [label=\"{} refs\"];",
                escape(source),
                escape(target),
                refs
            )?;
        } else {
            writeln!(writer, "    \"{}\" -> \"{}\";", escape(source), escape(target))?;
        }
    }

    writeln!(writer, "}}")?;
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
