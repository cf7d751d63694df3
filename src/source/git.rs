use crate::errors::{RepodepsError, Result};
use crate::graph::ir::FileRecord;
use crate::source::{decode_text, ContentSource, FetchError};
use crate::walk;
use git2::{ObjectType, Oid, Repository};
use std::path::Path;
use std::sync::Mutex;

/// Reads files from the tree of a git commit, without touching the working tree.
pub struct GitSource {
    repo: Mutex<Repository>,
    commit_id: Oid,
    tree_id: Oid,
    reference: String,
}

impl GitSource {
    /// Open the repository containing `path` (walking up) at `reference`.
    pub fn open(path: &Path, reference: &str) -> Result<Self> {
        let repo = Repository::discover(path).map_err(RepodepsError::Git)?;
        let (commit_id, tree_id) = {
            let obj = repo
                .revparse_single(reference)
                .map_err(|_| RepodepsError::BadRef {
                    reference: reference.to_string(),
                })?;
            let commit = obj.peel_to_commit().map_err(|_| RepodepsError::BadRef {
                reference: reference.to_string(),
            })?;
            (commit.id(), commit.tree_id())
        };
        Ok(Self {
            repo: Mutex::new(repo),
            commit_id,
            tree_id,
            reference: reference.to_string(),
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The commit `reference` resolved to when the source was opened.
    pub fn commit_id(&self) -> Oid {
        self.commit_id
    }

    /// List every blob of the tree as a [`FileRecord`], sorted by path.
    pub fn list_files(
        &self,
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Vec<FileRecord>> {
        let exclude_set = walk::build_exclude_set(exclude_patterns)?;
        let include_set = walk::build_include_set(include_patterns)?;

        let repo = self.repo.lock().unwrap_or_else(|e| e.into_inner());
        let tree = repo.find_tree(self.tree_id)?;
        let odb = repo.odb()?;

        let mut files = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return git2::TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                return git2::TreeWalkResult::Ok;
            };
            let path = format!("{dir}{name}");
            if walk::is_selected(&path, &exclude_set, include_set.as_ref()) {
                let size = odb
                    .read_header(entry.id())
                    .map(|(size, _)| size as u64)
                    .unwrap_or(0);
                files.push(FileRecord::new(path, size));
            }
            git2::TreeWalkResult::Ok
        })?;

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

impl ContentSource for GitSource {
    fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        let git_err = |source: git2::Error| FetchError::Git {
            path: path.to_string(),
            source,
        };

        let repo = self.repo.lock().unwrap_or_else(|e| e.into_inner());
        let tree = repo.find_tree(self.tree_id).map_err(git_err)?;
        let entry = tree
            .get_path(Path::new(path))
            .map_err(|_| FetchError::NotFound(path.to_string()))?;
        let blob = entry
            .to_object(&repo)
            .and_then(|obj| obj.peel_to_blob())
            .map_err(git_err)?;
        if blob.is_binary() {
            return Err(FetchError::Binary(path.to_string()));
        }
        decode_text(path, blob.content().to_vec())
    }
}
