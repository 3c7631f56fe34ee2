// Pointer handling over a laid-out tree: divider hover, resize drags, click-to-focus.

use super::divider::{calculate_dividers, hit_test_divider, DividerInfo};
use super::geometry::compute_rects;
use super::{PaneId, PaneNode, Rect, SplitDirection};
use crate::config::DividerConfig;

/// Where the pointer stands relative to the dividers.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    /// Pointer is over a pane, or outside the layout.
    Idle,
    /// Pointer is within grab distance of `dividers[divider_index]`, which
    /// belongs to split `split_id`.
    Hovering { divider_index: usize, split_id: PaneId },
    /// Button held on a divider; pointer motion resizes its split.
    Dragging {
        divider_index: usize,
        split_id: PaneId,
        /// Ratio to restore if the drag is cancelled.
        start_ratio: f32,
    },
}

/// Effects the caller should apply after processing a mouse event.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    /// Nothing to do.
    None,
    /// Swap the pointer icon.
    SetCursor(CursorType),
    /// Feed into `LayoutStore::update_split_ratio`.
    UpdateRatio { split_id: PaneId, ratio: f32 },
    /// Feed into `LayoutStore::set_focused_pane`.
    FocusPane(PaneId),
}

/// Pointer icons a host should map to its platform cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorType {
    Default,
    EwResize,
    NsResize,
}

/// Translates raw pointer events into layout store calls.
pub struct PaneInteraction {
    state: InteractionState,
    config: DividerConfig,
    /// Dividers of the last tree passed to `update_layout`.
    dividers: Vec<DividerInfo>,
    /// Cached leaf rects for click-to-focus.
    panes: Vec<(PaneId, Rect)>,
    /// Most recent pointer position.
    cursor_pos: (f32, f32),
}

impl PaneInteraction {
    pub fn new(config: DividerConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            config,
            dividers: Vec::new(),
            panes: Vec::new(),
            cursor_pos: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn dividers(&self) -> &[DividerInfo] {
        &self.dividers
    }

    /// Recompute cached geometry from the current tree.
    ///
    /// A hover or drag on a divider that no longer exists drops back to idle.
    pub fn update_layout(&mut self, root: Option<&PaneNode>, bounds: Rect) {
        match root {
            Some(root) => {
                self.dividers = calculate_dividers(root, bounds, self.config.width);
                self.panes = compute_rects(root, bounds);
            }
            None => {
                self.dividers.clear();
                self.panes.clear();
            }
        }
        let split_id = match self.state {
            InteractionState::Idle => return,
            InteractionState::Hovering { split_id, .. }
            | InteractionState::Dragging { split_id, .. } => split_id,
        };
        // Pre-order indices shift when an earlier split goes away
        let Some(index) = self.dividers.iter().position(|d| d.split_id == split_id) else {
            self.state = InteractionState::Idle;
            return;
        };
        match &mut self.state {
            InteractionState::Hovering { divider_index, .. }
            | InteractionState::Dragging { divider_index, .. } => *divider_index = index,
            InteractionState::Idle => {}
        }
    }

    /// Track the pointer; while dragging this yields ratio updates.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) -> InteractionEffect {
        self.cursor_pos = (x, y);

        if let InteractionState::Dragging { divider_index, .. } = self.state {
            return match self.dividers.get(divider_index) {
                Some(divider) => InteractionEffect::UpdateRatio {
                    split_id: divider.split_id,
                    ratio: divider.ratio_at(self.cursor_pos),
                },
                None => InteractionEffect::None,
            };
        }

        match hit_test_divider(self.cursor_pos, &self.dividers, self.config.hit_margin) {
            Some(idx) => {
                let cursor = match self.dividers[idx].direction {
                    SplitDirection::Vertical => CursorType::EwResize,
                    SplitDirection::Horizontal => CursorType::NsResize,
                };
                let was_hovering = matches!(
                    self.state,
                    InteractionState::Hovering { divider_index, .. } if divider_index == idx
                );
                self.state = InteractionState::Hovering {
                    divider_index: idx,
                    split_id: self.dividers[idx].split_id,
                };
                if was_hovering {
                    InteractionEffect::None
                } else {
                    InteractionEffect::SetCursor(cursor)
                }
            }
            None => {
                let was_hovering = matches!(self.state, InteractionState::Hovering { .. });
                self.state = InteractionState::Idle;
                if was_hovering {
                    InteractionEffect::SetCursor(CursorType::Default)
                } else {
                    InteractionEffect::None
                }
            }
        }
    }

    /// Primary button down: start a drag over a divider, otherwise focus the
    /// pane under the pointer.
    pub fn on_mouse_press(&mut self) -> InteractionEffect {
        match self.state {
            InteractionState::Hovering {
                divider_index,
                split_id,
            } => {
                let start_ratio = self.dividers.get(divider_index).map_or(0.5, |d| d.ratio);
                self.state = InteractionState::Dragging {
                    divider_index,
                    split_id,
                    start_ratio,
                };
                InteractionEffect::None
            }
            InteractionState::Idle => {
                // Click-to-focus
                let (px, py) = self.cursor_pos;
                self.panes
                    .iter()
                    .find(|(_, rect)| rect.contains_point(px, py))
                    .map_or(InteractionEffect::None, |(id, _)| InteractionEffect::FocusPane(*id))
            }
            InteractionState::Dragging { .. } => InteractionEffect::None,
        }
    }

    /// Primary button up: ends a drag.
    pub fn on_mouse_release(&mut self) -> InteractionEffect {
        match self.state {
            InteractionState::Dragging { .. } => {
                self.state = InteractionState::Idle;
                InteractionEffect::SetCursor(CursorType::Default)
            }
            _ => InteractionEffect::None,
        }
    }

    /// Abort a drag, restoring the ratio the split had when it started.
    pub fn cancel_drag(&mut self) -> InteractionEffect {
        let InteractionState::Dragging {
            split_id,
            start_ratio,
            ..
        } = self.state
        else {
            return InteractionEffect::None;
        };
        self.state = InteractionState::Idle;
        InteractionEffect::UpdateRatio {
            split_id,
            ratio: start_ratio,
        }
    }
}
