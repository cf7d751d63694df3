pub mod common;
pub mod extract;
pub mod patterns;
pub mod resolver;

pub use common::{ImportKind, RawImport};
pub use extract::{extract_imports, extract_specifiers};
pub use resolver::{FileUniverse, PathResolver};
