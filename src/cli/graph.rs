use crate::cache::{DiskCache, ExpiringCache};
use crate::cli::target::Target;
use crate::config::resolve::{resolve_config, CliOverrides};
use crate::config::{ResolvedCacheConfig, ResolvedConfig};
use crate::errors::Result;
use crate::graph::builder::{BuildOptions, DependencyGraphBuilder};
use crate::graph::ir::{DependencyGraph, FileRecord};
use crate::metrics::scc::find_cycles;
use crate::metrics::summary::Summary;
use crate::output::json::Metadata;
use crate::output::OutputFormat;
use crate::source::{CachedSource, ContentSource};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Repository path to analyze
    pub path: PathBuf,

    /// Read files from this git ref instead of the working tree
    #[arg(long = "ref", value_name = "REF")]
    pub reference: Option<String>,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Maximum number of files whose content is analyzed
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Worker threads used to read and parse files
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Include glob patterns
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude glob patterns
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Read every file directly, bypassing the content cache
    #[arg(long)]
    pub no_cache: bool,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}

impl GraphArgs {
    fn to_cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            format: self.format,
            quiet: self.quiet,
            max_files: self.max_files,
            jobs: self.jobs,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            no_cache: self.no_cache,
        }
    }
}

pub fn run(args: &GraphArgs) -> Result<()> {
    let start = Instant::now();

    let working_dir = args.path.canonicalize().unwrap_or_else(|_| args.path.clone());
    let config = resolve_config(&working_dir, &args.to_cli_overrides())?;
    let target = Target::open(&args.path, args.reference.as_deref(), &config)?;
    let namespace = target.cache_namespace();
    let Target {
        root,
        reference,
        files,
        source,
    } = target;

    let cache = match namespace {
        Some(namespace) if config.cache.enabled => {
            open_cache(&config.cache).map(|cache| (namespace, cache))
        }
        _ => None,
    };
    let graph = match cache {
        Some((namespace, cache)) => {
            let cached = CachedSource::new(source, cache, namespace, config.cache.ttl());
            build_graph(&files, &cached, &config)?
        }
        None => build_graph(&files, &source, &config)?,
    };

    let summary = Summary::from_graph(&graph);
    let cycles = find_cycles(&graph);
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let metadata = Metadata {
        root,
        reference,
        node_count: graph.nodes.len(),
        edge_count: graph.edges.len(),
        elapsed_ms,
    };

    let mut stdout = std::io::stdout().lock();
    match config.format {
        OutputFormat::Json => {
            crate::output::json::write_graph_json(&mut stdout, &graph, &summary, &cycles, metadata)?;
        }
        OutputFormat::Text => {
            crate::output::text::write_graph_text(&mut stdout, &graph, &summary, &cycles, &metadata)?;
        }
        OutputFormat::Dot => {
            crate::output::dot::write_dot(&mut stdout, &graph)?;
        }
    }

    if !config.quiet {
        eprintln!(
            "Analyzed {} of {} files ({} internal, {} external imports) in {:.2}s",
            graph.stats.analyzed_files,
            graph.stats.total_files,
            graph.stats.internal_deps,
            graph.stats.external_deps,
            elapsed_ms as f64 / 1000.0
        );
    }

    Ok(())
}

/// Open the persistent content cache. An unusable directory disables
/// caching for this run.
fn open_cache(config: &ResolvedCacheConfig) -> Option<Arc<dyn ExpiringCache>> {
    let Some(dir) = config.directory() else {
        tracing::warn!("no cache directory available, reading files directly");
        return None;
    };
    match DiskCache::open(&dir) {
        Ok(cache) => {
            tracing::debug!(dir = %dir.display(), "using content cache");
            Some(Arc::new(cache))
        }
        Err(e) => {
            tracing::warn!("cannot use cache directory {}: {e}", dir.display());
            None
        }
    }
}

fn build_graph<S>(files: &[FileRecord], source: &S, config: &ResolvedConfig) -> Result<DependencyGraph>
where
    S: ContentSource + ?Sized,
{
    let mut builder = DependencyGraphBuilder::new(BuildOptions {
        max_files: config.max_files,
        jobs: config.jobs,
    });

    let progress = if config.quiet {
        None
    } else {
        let pb = indicatif::ProgressBar::new(files.len().min(config.max_files) as u64);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .expect("valid progress template")
                .progress_chars("#>-"),
        );
        builder = builder.with_progress(pb.clone());
        Some(pb)
    };

    let graph = builder.build(files, source);
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    graph
}
