use crate::errors::Result;
use crate::graph::ir::DependencyGraph;
use crate::metrics::scc::Cycle;
use crate::metrics::summary::{hotspots, Summary};
use crate::output::json::Metadata;
use std::io::Write;

/// Number of hotspots listed in the text report.
pub const TOP_HOTSPOTS: usize = 20;

/// Write a human-readable report of the graph.
pub fn write_graph_text<W: Write>(
    writer: &mut W,
    graph: &DependencyGraph,
    summary: &Summary,
    cycles: &[Cycle],
    metadata: &Metadata,
) -> Result<()> {
    let stats = &graph.stats;

    writeln!(writer, "Repodeps Dependency Report")?;
    writeln!(writer, "==========================")?;
    writeln!(writer)?;
    writeln!(writer, "Root:       {}", metadata.root.display())?;
    if let Some(ref reference) = metadata.reference {
        writeln!(writer, "Ref:        {reference}")?;
    }
    writeln!(writer, "Files:      {}", stats.total_files)?;
    writeln!(
        writer,
        "Analyzed:   {} ({} failed)",
        stats.analyzed_files, stats.failed_files
    )?;
    writeln!(
        writer,
        "Imports:    {} ({} internal, {} external)",
        stats.total_dependencies, stats.internal_deps, stats.external_deps
    )?;
    writeln!(writer, "Edges:      {}", metadata.edge_count)?;
    writeln!(writer)?;

    writeln!(writer, "Summary")?;
    writeln!(writer, "-------")?;
    writeln!(
        writer,
        "Fan-out:  mean={:.2}  max={}",
        summary.mean_fanout, summary.max_fanout
    )?;
    writeln!(
        writer,
        "Fan-in:   mean={:.2}  max={}",
        summary.mean_fanin, summary.max_fanin
    )?;
    writeln!(writer, "Orphans:  {}", summary.orphan_count)?;
    writeln!(
        writer,
        "Cycles:   {} (largest: {})",
        summary.cycle_count, summary.largest_cycle_size
    )?;
    writeln!(writer)?;

    if !summary.languages.is_empty() {
        writeln!(writer, "Languages")?;
        writeln!(writer, "{:-<60}", "")?;
        for (language, count) in &summary.languages {
            writeln!(writer, "{language:<20} {count:>8}")?;
        }
        writeln!(writer)?;
    }

    let spots = hotspots(graph, TOP_HOTSPOTS);
    if !spots.is_empty() {
        writeln!(writer, "Top {} Hotspots", spots.len())?;
        writeln!(writer, "{:-<60}", "")?;
        writeln!(writer, "{:<44} {:>7} {:>7}", "File", "Fan-in", "Fan-out")?;
        for spot in &spots {
            writeln!(
                writer,
                "{:<44} {:>7} {:>7}",
                spot.node, spot.fanin, spot.fanout
            )?;
        }
        writeln!(writer)?;
    }

    if !cycles.is_empty() {
        writeln!(writer, "Import Cycles")?;
        writeln!(writer, "{:-<60}", "")?;
        for cycle in cycles {
            writeln!(
                writer,
                "Cycle #{} (size={}, internal_edges={})",
                cycle.id, cycle.size, cycle.internal_edges
            )?;
            for member in &cycle.members {
                writeln!(writer, "  - {member}")?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(
        writer,
        "Completed in {:.2}s",
        metadata.elapsed_ms as f64 / 1000.0
    )?;
    Ok(())
}
