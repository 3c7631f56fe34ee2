// Pane element registry: pane id → (content id, external placement handle).

use std::collections::BTreeMap;

use crate::pane::{ContentId, PaneId};

/// One registered placement handle.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneElement<H> {
    pub pane_id: PaneId,
    pub content_id: ContentId,
    pub handle: H,
}

/// Auxiliary index maintained by the rendering side.
///
/// Never consulted by tree operations, so it may briefly reference panes that
/// have already left the tree.
#[derive(Debug, Clone)]
pub struct PaneElementRegistry<H> {
    elements: BTreeMap<PaneId, PaneElement<H>>,
}

impl<H> Default for PaneElementRegistry<H> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }
}

impl<H> PaneElementRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the element for `pane_id`.
    pub fn register(&mut self, pane_id: PaneId, content_id: ContentId, handle: H) {
        self.elements.insert(
            pane_id,
            PaneElement {
                pane_id,
                content_id,
                handle,
            },
        );
    }

    /// Remove the element for `pane_id`, returning it if present.
    pub fn unregister(&mut self, pane_id: PaneId) -> Option<PaneElement<H>> {
        self.elements.remove(&pane_id)
    }

    pub fn get(&self, pane_id: PaneId) -> Option<&PaneElement<H>> {
        self.elements.get(&pane_id)
    }

    /// First element (in pane id order) showing `content_id`.
    pub fn lookup_by_content_id(&self, content_id: &ContentId) -> Option<&PaneElement<H>> {
        self.elements.values().find(|e| &e.content_id == content_id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
