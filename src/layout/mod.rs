// Layout store: per-session split trees, focus, and the pane element registry.

pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::pane::{
    compute_rects, nearest_in_direction, remove_node, replace_node, with_ratio, ContentId,
    FocusDirection, PaneId, PaneNode, Rect, SplitDirection,
};

pub use registry::{PaneElement, PaneElementRegistry};

/// Identifier of the session (tab) that owns a layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a split was rejected. State is left untouched in every case.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("session {0} has no split layout")]
    NoLayout(SessionId),
    #[error("pane {0} not found")]
    PaneNotFound(PaneId),
    #[error("pane {0} is a split, not a terminal pane")]
    NotALeaf(PaneId),
    #[error("maximum split depth of {max} reached")]
    NestingLimit { max: usize },
    #[error("content {0} is already shown in this layout")]
    DuplicateContent(ContentId),
}

/// Outcome of closing a pane.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPane {
    /// Content the caller should now tear down.
    pub removed_content_id: ContentId,
    /// True when the closed pane was the last one and the session fell back
    /// to having no layout.
    pub layout_cleared: bool,
}

/// Owns every session's split tree and focused pane.
///
/// Each operation reads a session's tree, computes a new tree, and commits it
/// whole before returning.
#[derive(Debug)]
pub struct LayoutStore<H = ()> {
    config: LayoutConfig,
    layout_trees: HashMap<SessionId, Arc<PaneNode>>,
    focused_panes: HashMap<SessionId, PaneId>,
    pane_elements: PaneElementRegistry<H>,
}

impl<H> Default for LayoutStore<H> {
    fn default() -> Self {
        Self::with_config(LayoutConfig::default())
    }
}

impl<H> LayoutStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            layout_trees: HashMap::new(),
            focused_panes: HashMap::new(),
            pane_elements: PaneElementRegistry::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    // ── Getters ──────────────────────────────────────────────────────

    /// Current tree of `session`. Clone the `Arc` to keep a snapshot.
    pub fn layout(&self, session: &SessionId) -> Option<&Arc<PaneNode>> {
        self.layout_trees.get(session)
    }

    pub fn has_layout(&self, session: &SessionId) -> bool {
        self.layout_trees.contains_key(session)
    }

    pub fn focused_pane(&self, session: &SessionId) -> Option<PaneId> {
        self.focused_panes.get(session).copied()
    }

    // ── Tree operations ──────────────────────────────────────────────

    /// Give `session` a single-pane layout showing `content_id`.
    ///
    /// Returns the new pane, or `None` if the session already has a layout
    /// (which is left as is).
    pub fn initialize_layout(&mut self, session: &SessionId, content_id: ContentId) -> Option<PaneId> {
        if self.layout_trees.contains_key(session) {
            log::debug!("Layout for session {session} already exists");
            return None;
        }
        let pane_id = PaneId::next();
        self.layout_trees
            .insert(session.clone(), Arc::new(PaneNode::leaf(pane_id, content_id)));
        self.focused_panes.insert(session.clone(), pane_id);
        log::debug!("Initialized layout for session {session} with {pane_id}");
        Some(pane_id)
    }

    /// Split the leaf `pane_id`, placing a new leaf for `new_content_id`
    /// after it. The new leaf takes focus and its id is returned.
    pub fn split_pane(
        &mut self,
        session: &SessionId,
        pane_id: PaneId,
        direction: SplitDirection,
        new_content_id: ContentId,
    ) -> Result<PaneId, LayoutError> {
        let tree = self
            .layout_trees
            .get(session)
            .ok_or_else(|| LayoutError::NoLayout(session.clone()))?;

        let max = self.config.max_nesting;
        if tree.nesting_depth() >= max {
            log::warn!("Maximum nesting level reached for session {session}");
            return Err(LayoutError::NestingLimit { max });
        }

        let target = tree
            .find_by_id(pane_id)
            .ok_or(LayoutError::PaneNotFound(pane_id))?;
        if !target.is_leaf() {
            return Err(LayoutError::NotALeaf(pane_id));
        }
        if tree.find_by_content_id(&new_content_id).is_some() {
            return Err(LayoutError::DuplicateContent(new_content_id));
        }

        let new_pane_id = PaneId::next();
        let split = PaneNode::split(
            PaneId::next(),
            direction,
            self.config.default_ratio,
            target.clone(),
            PaneNode::leaf(new_pane_id, new_content_id),
        );
        let new_tree = replace_node(tree, pane_id, Arc::new(split));

        self.layout_trees.insert(session.clone(), new_tree);
        self.focused_panes.insert(session.clone(), new_pane_id);
        log::debug!("Split {pane_id} {direction:?} in session {session}, new pane {new_pane_id}");
        Ok(new_pane_id)
    }

    /// Close the leaf `pane_id`, collapsing its parent split.
    ///
    /// `None` if there is no layout or `pane_id` is not a leaf.
    pub fn close_pane(&mut self, session: &SessionId, pane_id: PaneId) -> Option<ClosedPane> {
        let tree = self.layout_trees.get(session)?;
        let removed_content_id = tree.find_by_id(pane_id)?.content_id()?.clone();

        let Some(new_tree) = remove_node(tree, pane_id) else {
            self.layout_trees.remove(session);
            self.focused_panes.remove(session);
            log::debug!("Closed last pane {pane_id}, cleared layout for session {session}");
            return Some(ClosedPane {
                removed_content_id,
                layout_cleared: true,
            });
        };

        if self.focused_panes.get(session) == Some(&pane_id) {
            let next = new_tree.first_leaf().id();
            self.focused_panes.insert(session.clone(), next);
        }
        self.layout_trees.insert(session.clone(), new_tree);
        log::debug!("Closed {pane_id} in session {session}");
        Some(ClosedPane {
            removed_content_id,
            layout_cleared: false,
        })
    }

    /// Focus `pane_id` if it is a leaf of the session's tree.
    pub fn set_focused_pane(&mut self, session: &SessionId, pane_id: PaneId) -> bool {
        let is_leaf = self
            .layout_trees
            .get(session)
            .and_then(|tree| tree.find_by_id(pane_id))
            .is_some_and(PaneNode::is_leaf);
        if is_leaf {
            self.focused_panes.insert(session.clone(), pane_id);
        }
        is_leaf
    }

    /// Set the ratio of split `split_id`, clamped to the allowed range.
    ///
    /// Returns true if the stored ratio changed.
    pub fn update_split_ratio(&mut self, session: &SessionId, split_id: PaneId, ratio: f32) -> bool {
        let Some(tree) = self.layout_trees.get(session) else {
            return false;
        };
        let clamped = crate::pane::clamp_ratio(ratio);
        match tree.find_by_id(split_id) {
            Some(PaneNode::Split { ratio: current, .. }) if *current != clamped => {}
            _ => return false,
        }
        let Some(new_tree) = with_ratio(tree, split_id, clamped) else {
            return false;
        };
        self.layout_trees.insert(session.clone(), new_tree);
        log::debug!("Split {split_id} ratio set to {clamped} in session {session}");
        true
    }

    /// Move focus to the nearest pane in `direction`. Returns the newly
    /// focused pane, or `None` if focus stayed put.
    pub fn move_focus(&mut self, session: &SessionId, direction: FocusDirection) -> Option<PaneId> {
        let tree = self.layout_trees.get(session)?;
        let focused = self.focused_panes.get(session).copied()?;
        let rects = compute_rects(tree, Rect::unit_percent());
        let next = nearest_in_direction(&rects, focused, direction)?;
        self.focused_panes.insert(session.clone(), next);
        log::debug!("Focus moved {direction:?} from {focused} to {next} in session {session}");
        Some(next)
    }

    /// Drop the session's layout and focus, and unregister its pane elements.
    /// Returns the content ids that were live in the layout.
    pub fn clear_layout(&mut self, session: &SessionId) -> Vec<ContentId> {
        self.focused_panes.remove(session);
        let Some(tree) = self.layout_trees.remove(session) else {
            return Vec::new();
        };
        for leaf in tree.collect_leaves() {
            self.pane_elements.unregister(leaf.id());
        }
        log::debug!("Cleared layout for session {session}");
        tree.content_ids()
    }

    // ── Content-keyed helpers ────────────────────────────────────────

    pub fn find_pane_by_content_id(&self, session: &SessionId, content_id: &ContentId) -> Option<&PaneNode> {
        self.layout_trees.get(session)?.find_by_content_id(content_id)
    }

    pub fn content_id_for_pane(&self, session: &SessionId, pane_id: PaneId) -> Option<&ContentId> {
        self.layout_trees.get(session)?.find_by_id(pane_id)?.content_id()
    }

    /// Content ids of every leaf, in layout order.
    pub fn list_content_ids(&self, session: &SessionId) -> Vec<ContentId> {
        self.layout_trees
            .get(session)
            .map(|tree| tree.content_ids())
            .unwrap_or_default()
    }

    pub fn nesting_depth_of(&self, session: &SessionId) -> usize {
        self.layout_trees
            .get(session)
            .map_or(0, |tree| tree.nesting_depth())
    }

    /// Close whichever pane shows `content_id`.
    pub fn remove_by_content_id(&mut self, session: &SessionId, content_id: &ContentId) -> Option<ClosedPane> {
        let pane_id = self.find_pane_by_content_id(session, content_id)?.id();
        self.close_pane(session, pane_id)
    }

    /// Leaf rects of the session's layout within `bounds`, in layout order.
    pub fn pane_rects(&self, session: &SessionId, bounds: Rect) -> Vec<(PaneId, Rect)> {
        self.layout_trees
            .get(session)
            .map(|tree| compute_rects(tree, bounds))
            .unwrap_or_default()
    }

    // ── Pane element registry ────────────────────────────────────────

    pub fn register_pane_element(&mut self, pane_id: PaneId, content_id: ContentId, handle: H) {
        self.pane_elements.register(pane_id, content_id, handle);
    }

    pub fn unregister_pane_element(&mut self, pane_id: PaneId) {
        self.pane_elements.unregister(pane_id);
    }

    pub fn pane_element_for_content(&self, content_id: &ContentId) -> Option<&PaneElement<H>> {
        self.pane_elements.lookup_by_content_id(content_id)
    }

    pub fn pane_elements(&self) -> &PaneElementRegistry<H> {
        &self.pane_elements
    }
}
