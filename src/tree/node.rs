//! Arena storage for the assignment hierarchy
//!
//! Nodes live in one `Vec` and refer to each other by index. A parent link
//! is only used for walking upwards; ownership stays with the arena, so no
//! cycles or shared children can form.

use crate::extract::AssignmentDate;
use crate::{ErrorKind, ThemisError};
use url::Url;

/// Index of a node inside its [`AssignmentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A course, assignment, sub-assignment or activity
#[derive(Debug, Clone)]
pub struct AssignmentNode {
    /// Label shown on the parent's listing
    pub name: String,

    /// Page this node was discovered at
    pub url: Url,

    /// Tooltip dates, filled by [`attach_dates`](crate::tree::attach_dates)
    pub dates: Option<AssignmentDate>,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: u32,
}

impl AssignmentNode {
    /// The node whose listing produced this one; `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in listing order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root (the root is at 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A page that could not be crawled under the skip-branch policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    /// Node left without children because of the failure
    pub node: NodeId,

    /// URL that failed
    pub url: String,

    pub kind: ErrorKind,

    /// HTTP status, where one was received
    pub status: Option<u16>,

    pub message: String,
}

/// The crawled hierarchy
#[derive(Debug, Clone)]
pub struct AssignmentTree {
    nodes: Vec<AssignmentNode>,
    failures: Vec<CrawlFailure>,
}

impl AssignmentTree {
    /// Creates a tree holding only its root
    pub fn new(root_name: impl Into<String>, root_url: Url) -> Self {
        Self {
            nodes: vec![AssignmentNode {
                name: root_name.into(),
                url: root_url,
                dates: None,
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
            failures: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Looks up a node
    ///
    /// Ids are only handed out by this tree, so lookups of its own ids
    /// always succeed.
    pub fn get(&self, id: NodeId) -> Option<&AssignmentNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut AssignmentNode> {
        self.nodes.get_mut(id.0)
    }

    /// Creates a node and links it as the last child of `parent`
    ///
    /// Returns `None` if `parent` does not belong to this tree.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        url: Url,
    ) -> Option<NodeId> {
        let depth = self.get(parent)?.depth + 1;
        let id = NodeId(self.nodes.len());

        self.nodes.push(AssignmentNode {
            name: name.into(),
            url,
            dates: None,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.0].children.push(id);

        Some(id)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AssignmentNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Node ids in pre-order (parent before children, children in listing order)
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }

        order
    }

    /// Names from the root down to `id`
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self.get(id);

        while let Some(node) = current {
            names.push(node.name.as_str());
            current = node.parent.and_then(|p| self.get(p));
        }

        names.reverse();
        names
    }

    /// Nodes without children
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Depth of the deepest node
    pub fn height(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Pages skipped under the skip-branch policy
    pub fn failures(&self) -> &[CrawlFailure] {
        &self.failures
    }

    pub(crate) fn record_failure(&mut self, node: NodeId, error: &ThemisError) {
        let url = error
            .url()
            .map(str::to_string)
            .or_else(|| self.get(node).map(|n| n.url.to_string()))
            .unwrap_or_default();

        self.failures.push(CrawlFailure {
            node,
            url,
            kind: error.kind(),
            status: error.status(),
            message: error.to_string(),
        });
    }
}
