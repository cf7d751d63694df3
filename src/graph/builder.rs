use crate::errors::{RepodepsError, Result};
use crate::graph::ir::{DependencyGraph, FileRecord, GraphEdge, GraphNode, GraphStats};
use crate::parse::extract::extract_specifiers;
use crate::parse::resolver::{FileUniverse, PathResolver};
use crate::source::ContentSource;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default cap on the number of files whose content is analyzed.
pub const DEFAULT_MAX_FILES: usize = 100;

/// Shared flag checked before every fetch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Only the first `max_files` records (input order) are fetched
    pub max_files: usize,
    /// Worker threads for fetching; 1 runs on the calling thread
    pub jobs: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            jobs: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// One specifier of one file after resolution.
#[derive(Debug)]
struct ResolvedSpecifier {
    specifier: String,
    target: Option<String>,
}

/// Outcome of fetching and analyzing one file.
#[derive(Debug)]
enum FileOutcome {
    Analyzed(Vec<ResolvedSpecifier>),
    Failed,
    Cancelled,
}

/// Builds a [`DependencyGraph`] from a file list and a content source.
///
/// Fetching, extraction and resolution run on a bounded thread pool; the
/// results are applied in input order, so the graph is identical to a
/// sequential run.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraphBuilder {
    options: BuildOptions,
    cancel: Option<CancellationToken>,
    progress: Option<indicatif::ProgressBar>,
}

impl DependencyGraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            cancel: None,
            progress: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Tick `progress` once per file processed.
    pub fn with_progress(mut self, progress: indicatif::ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build<S>(&self, files: &[FileRecord], source: &S) -> Result<DependencyGraph>
    where
        S: ContentSource + ?Sized,
    {
        let mut nodes = BTreeMap::new();
        for record in files {
            nodes
                .entry(record.path.clone())
                .or_insert_with(|| GraphNode::from_record(record));
        }

        let universe = FileUniverse::from_records(files);
        let analyzed: Vec<&FileRecord> = files.iter().take(self.options.max_files).collect();

        let outcomes: Vec<FileOutcome> = if self.options.jobs <= 1 {
            analyzed
                .iter()
                .map(|record| self.process(record, source, &universe))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.jobs)
                .build()?;
            pool.install(|| {
                analyzed
                    .par_iter()
                    .map(|record| self.process(record, source, &universe))
                    .collect::<Vec<_>>()
            })
        };

        if outcomes
            .iter()
            .any(|o| matches!(o, FileOutcome::Cancelled))
        {
            return Err(RepodepsError::Cancelled);
        }

        let mut edges = Vec::new();
        let mut stats = GraphStats {
            total_files: nodes.len(),
            ..Default::default()
        };

        for (record, outcome) in analyzed.iter().zip(outcomes) {
            let resolved = match outcome {
                FileOutcome::Analyzed(resolved) => resolved,
                FileOutcome::Failed => {
                    stats.failed_files += 1;
                    continue;
                }
                FileOutcome::Cancelled => continue,
            };
            stats.analyzed_files += 1;

            for ResolvedSpecifier { specifier, target } in resolved {
                stats.total_dependencies += 1;
                let Some(target) = target.filter(|t| nodes.contains_key(t)) else {
                    stats.external_deps += 1;
                    continue;
                };

                stats.internal_deps += 1;
                if let Some(target_node) = nodes.get_mut(&target) {
                    target_node.imported_by.insert(record.path.clone());
                }
                if let Some(source_node) = nodes.get_mut(&record.path) {
                    source_node.imports.push(specifier.clone());
                }
                edges.push(GraphEdge {
                    source: record.path.clone(),
                    target,
                    import_path: specifier,
                });
            }
        }

        tracing::info!(
            total = stats.total_files,
            analyzed = stats.analyzed_files,
            failed = stats.failed_files,
            internal = stats.internal_deps,
            external = stats.external_deps,
            "dependency graph built"
        );

        Ok(DependencyGraph {
            nodes,
            edges,
            stats,
        })
    }

    fn process<S>(&self, record: &FileRecord, source: &S, universe: &FileUniverse) -> FileOutcome
    where
        S: ContentSource + ?Sized,
    {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return FileOutcome::Cancelled;
        }

        let outcome = match source.fetch(&record.path) {
            Ok(content) => {
                let resolver = PathResolver::new(universe);
                let resolved = extract_specifiers(&content, &record.path)
                    .into_iter()
                    .map(|specifier| {
                        let target = resolver.resolve(&specifier, &record.path);
                        if target.is_none() {
                            tracing::trace!(file = %record.path, %specifier, "external import");
                        }
                        ResolvedSpecifier { specifier, target }
                    })
                    .collect();
                FileOutcome::Analyzed(resolved)
            }
            Err(e) => {
                tracing::debug!("Skipping {}: {}", record.path, e);
                FileOutcome::Failed
            }
        };

        if let Some(ref pb) = self.progress {
            pb.inc(1);
        }
        outcome
    }
}
