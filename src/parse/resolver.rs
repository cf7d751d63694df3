use crate::graph::ir::FileRecord;
use std::collections::HashSet;

/// Extensions probed after the bare candidate, in order.
pub const EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx"];

/// Root-relative directories probed for bare specifiers, in order.
pub const CONVENTION_DIRS: &[&str] = &["src/", "lib/", "components/", "utils/"];

/// The fixed set of known file paths for one analysis run.
///
/// Keeps input order (the partial-match fallback returns the first entry in
/// that order) alongside a hash index for exact lookups.
#[derive(Debug, Clone, Default)]
pub struct FileUniverse {
    paths: Vec<String>,
    index: HashSet<String>,
}

impl FileUniverse {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut universe = Self::default();
        for path in paths {
            let path = path.into();
            if universe.index.insert(path.clone()) {
                universe.paths.push(path);
            }
        }
        universe
    }

    pub fn from_records(records: &[FileRecord]) -> Self {
        Self::new(records.iter().map(|r| r.path.as_str()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Maps import specifiers to files of a [`FileUniverse`].
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    universe: &'a FileUniverse,
}

impl<'a> PathResolver<'a> {
    pub fn new(universe: &'a FileUniverse) -> Self {
        Self { universe }
    }

    /// Resolve `specifier`, written in `source_path`, to a known file.
    ///
    /// Returns `None` for external or unresolvable specifiers; never fails.
    pub fn resolve(&self, specifier: &str, source_path: &str) -> Option<String> {
        if specifier.is_empty() {
            return None;
        }
        if specifier.starts_with('.') {
            self.resolve_relative(specifier, source_path)
        } else if let Some(stripped) = specifier.strip_prefix('/') {
            self.resolve_absolute(stripped)
        } else {
            self.resolve_bare(specifier)
        }
    }

    fn resolve_relative(&self, specifier: &str, source_path: &str) -> Option<String> {
        let candidate = join_relative(source_path, specifier);
        if candidate.is_empty() {
            return None;
        }

        if let Some(found) = self.first_exact(candidate_variants(&candidate, true)) {
            return Some(found);
        }

        // Loose fallback: same path once extensions are ignored, first in
        // universe order. Can pick a wrong file when names collide.
        let stripped = strip_extension(&candidate);
        self.universe
            .iter()
            .find(|path| strip_extension(path) == stripped)
            .map(str::to_string)
    }

    fn resolve_absolute(&self, stripped: &str) -> Option<String> {
        if stripped.is_empty() {
            return None;
        }
        self.first_exact(candidate_variants(stripped, false))
    }

    fn resolve_bare(&self, specifier: &str) -> Option<String> {
        CONVENTION_DIRS.iter().find_map(|dir| {
            let candidate = format!("{dir}{specifier}");
            self.first_exact(candidate_variants(&candidate, true))
        })
    }

    fn first_exact(&self, variants: Vec<String>) -> Option<String> {
        variants.into_iter().find(|v| self.universe.contains(v))
    }
}

/// Convenience wrapper around [`PathResolver::resolve`].
pub fn resolve(specifier: &str, source_path: &str, universe: &FileUniverse) -> Option<String> {
    PathResolver::new(universe).resolve(specifier, source_path)
}

/// Apply `specifier` to the directory of `source_path`.
///
/// `..` pops a segment (no-op at the root), `.` and empty segments are
/// skipped, anything else is appended.
pub fn join_relative(source_path: &str, specifier: &str) -> String {
    let mut parts: Vec<&str> = source_path.split('/').filter(|s| !s.is_empty()).collect();
    parts.pop();

    for segment in specifier.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            other => parts.push(other),
        }
    }

    parts.join("/")
}

/// Candidate paths in probe order: bare, with each extension, then (when
/// `with_index`) `index` files inside the candidate directory.
pub fn candidate_variants(candidate: &str, with_index: bool) -> Vec<String> {
    let mut variants = Vec::with_capacity(1 + EXTENSIONS.len() * 2);
    variants.push(candidate.to_string());
    for ext in EXTENSIONS {
        variants.push(format!("{candidate}{ext}"));
    }
    if with_index {
        for ext in EXTENSIONS {
            variants.push(format!("{candidate}/index{ext}"));
        }
    }
    variants
}

/// Drop a trailing `.ext` from the last segment (`a/b.test.js` -> `a/b.test`).
pub fn strip_extension(path: &str) -> &str {
    let start = path.rfind('/').map_or(0, |i| i + 1);
    match path[start..].rfind('.') {
        Some(dot) if start + dot + 1 < path.len() => &path[..start + dot],
        _ => path,
    }
}
