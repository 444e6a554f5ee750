use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub line_no: usize,
    pub indent_depth: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(line_no: usize, indent_depth: usize, text: impl Into<String>) -> Self {
        Self {
            line_no,
            indent_depth,
            text: text.into(),
        }
    }
}

/// One top-level declaration: the header line followed by its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub lines: Vec<SourceLine>,
}

impl Block {
    pub fn header(&self) -> Option<&SourceLine> {
        self.lines.first()
    }

    pub fn body(&self) -> &[SourceLine] {
        self.lines.get(1..).unwrap_or(&[])
    }
}

/// Index of a node inside its owning [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub line: SourceLine,
    pub depth: usize,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Arena-backed indentation tree for a single block. Parent links are plain
/// indices so the tree never owns a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root: SourceLine) -> Self {
        let depth = root.indent_depth;
        Self {
            nodes: vec![TreeNode {
                line: root,
                depth,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Appends `line` as the last child of `parent` and returns the new node.
    pub fn push_child(&mut self, parent: NodeId, line: SourceLine) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = line.indent_depth;
        self.nodes.push(TreeNode {
            line,
            depth,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}
