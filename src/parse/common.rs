use serde::Serialize;

/// Raw import extracted from a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawImport {
    /// The specifier as written in source
    pub specifier: String,
    /// Which textual rule matched
    pub kind: ImportKind,
    /// Line number of the match start (1-indexed)
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import x from './x'`
    Static,
    /// `import './setup'`
    SideEffect,
    /// `import('./lazy')`
    Dynamic,
    /// `require('./x')`
    Require,
    /// `export { a } from './a'`
    ReExport,
    /// `/// <reference path="./types.d.ts" />`
    Reference,
    /// `@import 'base.css'`
    StyleImport,
    /// `url(./logo.png)`
    StyleUrl,
}

/// Network-style specifiers are never treated as imports.
pub fn is_network_specifier(specifier: &str) -> bool {
    specifier.starts_with("http")
}

/// Newline offsets of a text, for repeated offset-to-line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        Self {
            newlines: content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// 1-based line number of a byte offset. Offsets past the end map to
    /// the last line.
    pub fn line_at(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}
