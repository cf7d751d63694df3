use crate::errors::Result;
use crate::tree::TreeNode;
use clap::ValueEnum;
use std::io::Write;

/// Rendering of a folder tree.
#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TreeFormat {
    #[default]
    Json,
    Text,
}

pub fn write_tree_json<W: Write>(writer: &mut W, tree: &TreeNode) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, tree)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the tree as an indented listing, folders suffixed with `/`.
pub fn write_tree_text<W: Write>(writer: &mut W, tree: &TreeNode) -> Result<()> {
    writeln!(writer, "{}/", tree.name)?;
    write_children(writer, tree, "")?;
    writeln!(writer, "\n{} files", tree.file_count())?;
    Ok(())
}

fn write_children<W: Write>(writer: &mut W, node: &TreeNode, prefix: &str) -> Result<()> {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        if child.is_folder() {
            writeln!(writer, "{prefix}{branch}{}/", child.name)?;
            write_children(writer, child, &format!("{prefix}{indent}"))?;
        } else {
            writeln!(writer, "{prefix}{branch}{}", child.name)?;
        }
    }
    Ok(())
}
