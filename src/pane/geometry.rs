// Geometry: rectangles for every leaf and directional nearest-neighbour search.

use serde::{Deserialize, Serialize};

use super::{FocusDirection, PaneId, PaneNode, SplitDirection};

/// Weight applied to the cross-axis offset when scoring focus candidates.
const CROSS_AXIS_WEIGHT: f32 = 0.5;

/// A rectangle in whatever unit the caller's bounds use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The normalized 0–100 box used for focus navigation.
    pub fn unit_percent() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    /// Check if a point (px, py) is inside this rectangle.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Center point of this rectangle.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Split a rect into two sub-rects along a direction with a given ratio.
pub(crate) fn split_rect(bounds: Rect, direction: SplitDirection, ratio: f32) -> (Rect, Rect) {
    match direction {
        SplitDirection::Vertical => {
            let first_w = bounds.width * ratio;
            (
                Rect::new(bounds.x, bounds.y, first_w, bounds.height),
                Rect::new(bounds.x + first_w, bounds.y, bounds.width - first_w, bounds.height),
            )
        }
        SplitDirection::Horizontal => {
            let first_h = bounds.height * ratio;
            (
                Rect::new(bounds.x, bounds.y, bounds.width, first_h),
                Rect::new(bounds.x, bounds.y + first_h, bounds.width, bounds.height - first_h),
            )
        }
    }
}

/// Calculate rects for all leaf nodes given a bounding rect.
/// Returns `(PaneId, Rect)` pairs in leaf pre-order.
pub fn compute_rects(tree: &PaneNode, bounds: Rect) -> Vec<(PaneId, Rect)> {
    let mut out = Vec::with_capacity(tree.leaf_count());
    collect_rects(tree, bounds, &mut out);
    out
}

fn collect_rects(node: &PaneNode, bounds: Rect, out: &mut Vec<(PaneId, Rect)>) {
    match node {
        PaneNode::Leaf { id, .. } => out.push((*id, bounds)),
        PaneNode::Split {
            direction,
            ratio,
            first,
            second,
            ..
        } => {
            let (first_bounds, second_bounds) = split_rect(bounds, *direction, *ratio);
            collect_rects(first, first_bounds, out);
            collect_rects(second, second_bounds, out);
        }
    }
}

/// Find the pane nearest to `from` in `direction`.
///
/// A candidate qualifies when its center lies strictly beyond `from`'s center
/// along the direction's axis. Candidates score
/// `primary_distance + 0.5 * cross_distance`; the lowest wins and ties go to
/// the earliest entry in `rects`. No wraparound.
pub fn nearest_in_direction(
    rects: &[(PaneId, Rect)],
    from: PaneId,
    direction: FocusDirection,
) -> Option<PaneId> {
    let (_, current) = rects.iter().find(|(id, _)| *id == from)?;
    let (cx, cy) = current.center();

    let mut best: Option<(PaneId, f32)> = None;
    for &(id, rect) in rects {
        if id == from {
            continue;
        }
        let (px, py) = rect.center();
        let (primary, cross) = match direction {
            FocusDirection::Left => (cx - px, py - cy),
            FocusDirection::Right => (px - cx, py - cy),
            FocusDirection::Up => (cy - py, px - cx),
            FocusDirection::Down => (py - cy, px - cx),
        };
        if primary <= 0.0 {
            continue;
        }
        let score = primary + cross.abs() * CROSS_AXIS_WEIGHT;
        match best {
            Some((_, best_score)) if best_score <= score => {}
            _ => best = Some((id, score)),
        }
    }
    best.map(|(id, _)| id)
}
