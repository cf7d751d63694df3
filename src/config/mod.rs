pub mod ignore;
pub mod provenance;
pub mod resolve;
pub mod schema;
pub mod show;

use crate::cache::DiskCache;
use crate::graph::builder::DEFAULT_MAX_FILES;
use crate::output::OutputFormat;
use provenance::Provenance;
use std::path::PathBuf;
use std::time::Duration;

/// Default lifetime of cached file contents.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Fully resolved configuration, no Option fields.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub format: OutputFormat,
    pub quiet: bool,

    pub max_files: usize,
    pub jobs: usize,

    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Patterns read from `.repodepsignore`
    pub ignore_patterns: Vec<String>,

    pub cache: ResolvedCacheConfig,

    pub provenance: Provenance,
    pub loaded_files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedCacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
    /// Overrides the platform cache directory
    pub dir: Option<PathBuf>,
}

impl Default for ResolvedCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            dir: None,
        }
    }
}

impl ResolvedCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Where the content cache lives: `dir` if set, else
    /// [`DiskCache::default_dir`].
    pub fn directory(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(DiskCache::default_dir)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            quiet: false,
            max_files: DEFAULT_MAX_FILES,
            jobs: std::thread::available_parallelism().map_or(1, |n| n.get()),
            include: Vec::new(),
            exclude: Vec::new(),
            ignore_patterns: Vec::new(),
            cache: ResolvedCacheConfig::default(),
            provenance: Provenance::new(),
            loaded_files: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// Exclude globs from config plus `.repodepsignore` patterns.
    pub fn effective_excludes(&self) -> Vec<String> {
        self.exclude
            .iter()
            .chain(&self.ignore_patterns)
            .cloned()
            .collect()
    }
}
