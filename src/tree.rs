//! Folder/file hierarchy built from a flat path list.

use crate::graph::ir::FileRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNodeKind {
    Folder,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeNodeKind,
    /// Empty for files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    /// '/'-joined path from the root, `""` for the root itself
    pub full_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        self.kind == TreeNodeKind::Folder
    }

    /// Number of file leaves below this node.
    pub fn file_count(&self) -> usize {
        match self.kind {
            TreeNodeKind::File => 1,
            TreeNodeKind::Folder => self.children.iter().map(TreeNode::file_count).sum(),
        }
    }

    /// Find a descendant by full path.
    pub fn find(&self, full_path: &str) -> Option<&TreeNode> {
        if self.full_path == full_path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(full_path))
    }
}

#[derive(Debug)]
struct ArenaNode {
    name: String,
    full_path: String,
    kind: TreeNodeKind,
    size: Option<u64>,
    children: Vec<usize>,
}

/// Build the folder tree for `files` under a synthetic root named `root_name`.
///
/// Every path prefix becomes exactly one folder and every record one file
/// leaf. Children are sorted folders first, then by name, so the result does
/// not depend on input order.
pub fn build_tree(files: &[FileRecord], root_name: &str) -> TreeNode {
    let mut arena = vec![ArenaNode {
        name: root_name.to_string(),
        full_path: String::new(),
        kind: TreeNodeKind::Folder,
        size: None,
        children: Vec::new(),
    }];
    let mut folders: HashMap<String, usize> = HashMap::new();
    let mut seen_files: HashMap<String, usize> = HashMap::new();

    for record in files {
        let segments: Vec<&str> = record.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            continue;
        };

        let mut parent = 0;
        let mut prefix = String::new();
        for dir in dirs {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(dir);
            parent = match folders.get(&prefix) {
                Some(&idx) => idx,
                None => {
                    let idx = arena.len();
                    arena.push(ArenaNode {
                        name: dir.to_string(),
                        full_path: prefix.clone(),
                        kind: TreeNodeKind::Folder,
                        size: None,
                        children: Vec::new(),
                    });
                    arena[parent].children.push(idx);
                    folders.insert(prefix.clone(), idx);
                    idx
                }
            };
        }

        let full_path = segments.join("/");
        if seen_files.contains_key(&full_path) {
            continue;
        }
        let idx = arena.len();
        arena.push(ArenaNode {
            name: file_name.to_string(),
            full_path: full_path.clone(),
            kind: TreeNodeKind::File,
            size: Some(record.size_estimate),
            children: Vec::new(),
        });
        arena[parent].children.push(idx);
        seen_files.insert(full_path, idx);
    }

    materialize(&arena, 0)
}

fn materialize(arena: &[ArenaNode], idx: usize) -> TreeNode {
    let node = &arena[idx];
    let mut children: Vec<TreeNode> = node
        .children
        .iter()
        .map(|&c| materialize(arena, c))
        .collect();
    children.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    TreeNode {
        id: if idx == 0 {
            "root".to_string()
        } else {
            node.full_path.clone()
        },
        name: node.name.clone(),
        kind: node.kind,
        children,
        full_path: node.full_path.clone(),
        size: node.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(paths: &[&str]) -> Vec<FileRecord> {
        paths.iter().map(|p| FileRecord::new(*p, 1)).collect()
    }

    #[test]
    fn single_path_is_one_chain() {
        let tree = build_tree(&records(&["src/components/ui/Button.tsx"]), "repo");
        assert_eq!(tree.full_path, "");
        assert_eq!(tree.children.len(), 1);

        let mut node = &tree;
        for expected in ["src", "src/components", "src/components/ui"] {
            assert_eq!(node.children.len(), 1);
            node = &node.children[0];
            assert!(node.is_folder());
            assert_eq!(node.full_path, expected);
        }
        assert_eq!(node.children.len(), 1);
        let leaf = &node.children[0];
        assert_eq!(leaf.kind, TreeNodeKind::File);
        assert_eq!(leaf.full_path, "src/components/ui/Button.tsx");
        assert!(leaf.children.is_empty());
    }

    #[test]
    fn folders_before_files_then_by_name() {
        let tree = build_tree(
            &records(&["zeta.js", "b/x.js", "alpha.js", "a/y.js", "README.md"]),
            "repo",
        );
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "README.md", "alpha.js", "zeta.js"]);
    }

    #[test]
    fn shared_prefixes_created_once() {
        let tree = build_tree(
            &records(&["src/a.js", "src/b.js", "src/lib/c.js", "src/lib/d.js"]),
            "repo",
        );
        assert_eq!(tree.children.len(), 1);
        let src = &tree.children[0];
        assert_eq!(src.children.len(), 3);
        assert_eq!(src.children[0].name, "lib");
        assert_eq!(tree.file_count(), 4);
    }

    #[test]
    fn order_independent() {
        let a = build_tree(&records(&["x/1.js", "y/2.js", "x/z/3.js", "4.js"]), "r");
        let b = build_tree(&records(&["4.js", "x/z/3.js", "y/2.js", "x/1.js"]), "r");
        assert_eq!(a, b);
    }

    #[test]
    fn file_and_folder_with_same_name_coexist() {
        let tree = build_tree(&records(&["docs", "docs/index.md"]), "r");
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children[0].is_folder());
        assert!(!tree.children[1].is_folder());
        assert_eq!(tree.find("docs/index.md").unwrap().size, Some(1));
    }

    #[test]
    fn empty_and_duplicate_paths() {
        let tree = build_tree(&records(&["", "a.js", "a.js"]), "r");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.id, "root");
    }

    #[test]
    fn serializes_type_field() {
        let tree = build_tree(&records(&["a.js"]), "r");
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["children"][0]["type"], "file");
        assert!(json["children"][0].get("children").is_none());
    }
}
