use crate::config::ResolvedConfig;
use crate::errors::{RepodepsError, Result};
use crate::graph::ir::FileRecord;
use crate::source::{ContentSource, FetchError, FsSource, GitSource};
use crate::walk;
use std::path::{Path, PathBuf};

/// Where file text comes from for one command invocation.
pub enum RepoSource {
    Worktree(FsSource),
    Git(GitSource),
}

impl ContentSource for RepoSource {
    fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        match self {
            RepoSource::Worktree(fs) => fs.fetch(path),
            RepoSource::Git(git) => git.fetch(path),
        }
    }
}

/// A resolved repository: its file universe and how to read it.
pub struct Target {
    pub root: PathBuf,
    pub reference: Option<String>,
    pub files: Vec<FileRecord>,
    pub source: RepoSource,
}

impl Target {
    /// Discover files under `path`, from the working tree or the git tree
    /// at `reference`.
    pub fn open(path: &Path, reference: Option<&str>, config: &ResolvedConfig) -> Result<Self> {
        let root = path.canonicalize().map_err(|_| RepodepsError::NoFiles {
            path: path.to_path_buf(),
        })?;
        let exclude = config.effective_excludes();

        let (files, source) = match reference {
            Some(reference) => {
                let git = GitSource::open(&root, reference)?;
                let files = git.list_files(&config.include, &exclude)?;
                (files, RepoSource::Git(git))
            }
            None => {
                let files = walk::discover_files(&root, &config.include, &exclude)?;
                (files, RepoSource::Worktree(FsSource::new(root.clone())))
            }
        };

        if files.is_empty() {
            return Err(RepodepsError::NoFiles { path: root });
        }
        tracing::debug!(
            root = %root.display(),
            reference = reference.unwrap_or("worktree"),
            files = files.len(),
            "discovered files"
        );

        Ok(Self {
            root,
            reference: reference.map(str::to_string),
            files,
            source,
        })
    }

    /// Cache namespace identifying this repository snapshot: the root and
    /// the resolved commit. `None` for the working tree, whose files can
    /// change between runs.
    pub fn cache_namespace(&self) -> Option<String> {
        match &self.source {
            RepoSource::Git(git) => Some(format!("{}@{}", self.root.display(), git.commit_id())),
            RepoSource::Worktree(_) => None,
        }
    }

    /// Display name for the tree root.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}
