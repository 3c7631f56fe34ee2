// Pane layout engine: immutable binary tree of terminal panes and splits.

pub mod divider;
pub mod geometry;
pub mod interaction;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

pub use geometry::{compute_rects, nearest_in_direction, Rect};

/// Source of pane ids, shared by every session in the process.
static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

/// Smallest ratio a split may hold.
pub const MIN_RATIO: f32 = 0.1;
/// Largest ratio a split may hold.
pub const MAX_RATIO: f32 = 0.9;

/// Unique identifier for a node (leaf or split) in a pane tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub u64);

impl PaneId {
    /// Allocate an id no other node in the process holds.
    pub fn next() -> Self {
        Self(NEXT_PANE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane-{}", self.0)
    }
}

/// Identifier of the content stream (e.g. a pty) shown in a leaf.
///
/// Stable for the life of the underlying process, independent of where the
/// pane sits in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axis along which a split divides its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Divides height: first child on top.
    Horizontal,
    /// Divides width: first child on the left.
    Vertical,
}

/// Arrow direction for keyboard focus moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Clamp a split ratio into `[MIN_RATIO, MAX_RATIO]`. NaN maps to an even split.
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        return 0.5;
    }
    ratio.clamp(MIN_RATIO, MAX_RATIO)
}

/// Snapshots from outside the process are held to the same ratio bounds.
fn deserialize_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    f32::deserialize(deserializer).map(clamp_ratio)
}

/// Node of a session's layout tree.
///
/// Nodes are never mutated in place. Every transform returns a new tree that
/// rebuilds the path from the changed node to the root and shares all other
/// subtrees through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaneNode {
    /// A leaf node showing one content stream.
    Leaf { id: PaneId, content_id: ContentId },
    /// An internal split node with exactly two children.
    Split {
        id: PaneId,
        direction: SplitDirection,
        #[serde(deserialize_with = "deserialize_ratio")]
        ratio: f32,
        first: Arc<PaneNode>,
        second: Arc<PaneNode>,
    },
}

impl PaneNode {
    pub fn leaf(id: PaneId, content_id: ContentId) -> Self {
        PaneNode::Leaf { id, content_id }
    }

    /// Create a new split node. The ratio is clamped.
    pub fn split(
        id: PaneId,
        direction: SplitDirection,
        ratio: f32,
        first: impl Into<Arc<PaneNode>>,
        second: impl Into<Arc<PaneNode>>,
    ) -> Self {
        PaneNode::Split {
            id,
            direction,
            ratio: clamp_ratio(ratio),
            first: first.into(),
            second: second.into(),
        }
    }

    /// The id of this node.
    pub fn id(&self) -> PaneId {
        match self {
            PaneNode::Leaf { id, .. } | PaneNode::Split { id, .. } => *id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PaneNode::Leaf { .. })
    }

    /// The content id if this is a leaf node.
    pub fn content_id(&self) -> Option<&ContentId> {
        match self {
            PaneNode::Leaf { content_id, .. } => Some(content_id),
            PaneNode::Split { .. } => None,
        }
    }

    /// Depth-first lookup by node id.
    pub fn find_by_id(&self, target: PaneId) -> Option<&PaneNode> {
        if self.id() == target {
            return Some(self);
        }
        match self {
            PaneNode::Leaf { .. } => None,
            PaneNode::Split { first, second, .. } => first
                .find_by_id(target)
                .or_else(|| second.find_by_id(target)),
        }
    }

    /// Depth-first lookup of the leaf showing `content_id`.
    pub fn find_by_content_id(&self, target: &ContentId) -> Option<&PaneNode> {
        match self {
            PaneNode::Leaf { content_id, .. } if content_id == target => Some(self),
            PaneNode::Leaf { .. } => None,
            PaneNode::Split { first, second, .. } => first
                .find_by_content_id(target)
                .or_else(|| second.find_by_content_id(target)),
        }
    }

    /// Longest chain of split ancestors from this node to any leaf.
    pub fn nesting_depth(&self) -> usize {
        match self {
            PaneNode::Leaf { .. } => 0,
            PaneNode::Split { first, second, .. } => {
                1 + first.nesting_depth().max(second.nesting_depth())
            }
        }
    }

    /// Number of visible panes under this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            PaneNode::Leaf { .. } => 1,
            PaneNode::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// All leaves in pre-order (first child before second).
    pub fn collect_leaves(&self) -> Vec<&PaneNode> {
        let mut leaves = Vec::new();
        self.push_leaves(&mut leaves);
        leaves
    }

    fn push_leaves<'a>(&'a self, out: &mut Vec<&'a PaneNode>) {
        match self {
            PaneNode::Leaf { .. } => out.push(self),
            PaneNode::Split { first, second, .. } => {
                first.push_leaves(out);
                second.push_leaves(out);
            }
        }
    }

    /// Leaf ids in pre-order.
    pub fn leaf_ids(&self) -> Vec<PaneId> {
        self.collect_leaves().into_iter().map(PaneNode::id).collect()
    }

    /// Content ids of all leaves in pre-order.
    pub fn content_ids(&self) -> Vec<ContentId> {
        self.collect_leaves()
            .into_iter()
            .filter_map(|leaf| leaf.content_id().cloned())
            .collect()
    }

    /// The first leaf in pre-order.
    pub fn first_leaf(&self) -> &PaneNode {
        match self {
            PaneNode::Leaf { .. } => self,
            PaneNode::Split { first, .. } => first.first_leaf(),
        }
    }
}

/// Return a new tree where the node `target` is replaced by `replacement`.
///
/// Ancestors of `target` are rebuilt; every other subtree is shared with the
/// input. If `target` is absent the input root is returned as-is.
pub fn replace_node(tree: &Arc<PaneNode>, target: PaneId, replacement: Arc<PaneNode>) -> Arc<PaneNode> {
    rebuild(tree, target, &replacement).unwrap_or_else(|| tree.clone())
}

/// Return a new tree where the split `split_id` holds `ratio` (clamped).
///
/// `None` if `split_id` does not name a split in `tree`.
pub fn with_ratio(tree: &Arc<PaneNode>, split_id: PaneId, ratio: f32) -> Option<Arc<PaneNode>> {
    match tree.find_by_id(split_id)? {
        PaneNode::Leaf { .. } => None,
        PaneNode::Split {
            id,
            direction,
            first,
            second,
            ..
        } => {
            let updated = Arc::new(PaneNode::Split {
                id: *id,
                direction: *direction,
                ratio: clamp_ratio(ratio),
                first: first.clone(),
                second: second.clone(),
            });
            Some(replace_node(tree, split_id, updated))
        }
    }
}

/// Remove the node `target`.
///
/// Removing the root yields `None`. Removing a direct child of a split
/// collapses that split into the surviving sibling. If `target` is absent the
/// input root is returned unchanged.
pub fn remove_node(tree: &Arc<PaneNode>, target: PaneId) -> Option<Arc<PaneNode>> {
    if tree.id() == target {
        return None;
    }
    Some(remove_below(tree, target).unwrap_or_else(|| tree.clone()))
}

/// `Some(new_subtree)` when `target` was found below `node`, `None` otherwise.
fn remove_below(node: &Arc<PaneNode>, target: PaneId) -> Option<Arc<PaneNode>> {
    let PaneNode::Split {
        id,
        direction,
        ratio,
        first,
        second,
    } = node.as_ref()
    else {
        return None;
    };
    if first.id() == target {
        return Some(second.clone());
    }
    if second.id() == target {
        return Some(first.clone());
    }
    if let Some(new_first) = remove_below(first, target) {
        return Some(Arc::new(PaneNode::Split {
            id: *id,
            direction: *direction,
            ratio: *ratio,
            first: new_first,
            second: second.clone(),
        }));
    }
    remove_below(second, target).map(|new_second| {
        Arc::new(PaneNode::Split {
            id: *id,
            direction: *direction,
            ratio: *ratio,
            first: first.clone(),
            second: new_second,
        })
    })
}

/// Rebuild the path to `target`, substituting `replacement` for it.
fn rebuild(node: &Arc<PaneNode>, target: PaneId, replacement: &Arc<PaneNode>) -> Option<Arc<PaneNode>> {
    if node.id() == target {
        return Some(replacement.clone());
    }
    let PaneNode::Split {
        id,
        direction,
        ratio,
        first,
        second,
    } = node.as_ref()
    else {
        return None;
    };
    if let Some(new_first) = rebuild(first, target, replacement) {
        return Some(Arc::new(PaneNode::Split {
            id: *id,
            direction: *direction,
            ratio: *ratio,
            first: new_first,
            second: second.clone(),
        }));
    }
    rebuild(second, target, replacement).map(|new_second| {
        Arc::new(PaneNode::Split {
            id: *id,
            direction: *direction,
            ratio: *ratio,
            first: first.clone(),
            second: new_second,
        })
    })
}
