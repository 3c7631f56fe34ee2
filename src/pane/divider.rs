// Divider bars between sibling panes, used to grab and resize splits.

use super::geometry::split_rect;
use super::{clamp_ratio, PaneId, PaneNode, Rect, SplitDirection};

/// Default width of the divider bar.
pub const DIVIDER_WIDTH: f32 = 2.0;

/// Default hit-test margin around a divider.
pub const HIT_TEST_MARGIN: f32 = 8.0;

/// One split's divider, positioned within the caller's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerInfo {
    /// Id of the split node that owns this divider.
    pub split_id: PaneId,
    /// Direction of the owning split. A vertical split draws a vertical bar.
    pub direction: SplitDirection,
    /// Current ratio of the split.
    pub ratio: f32,
    /// Rect of the divider line itself.
    pub rect: Rect,
    /// Full rect allotted to the split; drag ratios are measured against it.
    pub region: Rect,
}

impl DividerInfo {
    /// Ratio that would put the divider under `point`, clamped to the split bounds.
    pub fn ratio_at(&self, point: (f32, f32)) -> f32 {
        let (px, py) = point;
        let (offset, extent) = match self.direction {
            SplitDirection::Vertical => (px - self.region.x, self.region.width),
            SplitDirection::Horizontal => (py - self.region.y, self.region.height),
        };
        if extent <= 0.0 {
            return 0.5;
        }
        clamp_ratio(offset / extent)
    }
}

/// Hit-test a point against dividers, returning the index of the first
/// divider within `margin` on its thin axis.
pub fn hit_test_divider(point: (f32, f32), dividers: &[DividerInfo], margin: f32) -> Option<usize> {
    let (px, py) = point;
    dividers.iter().position(|divider| {
        let r = &divider.rect;
        let expanded = match divider.direction {
            SplitDirection::Vertical => Rect::new(r.x - margin, r.y, r.width + margin * 2.0, r.height),
            SplitDirection::Horizontal => Rect::new(r.x, r.y - margin, r.width, r.height + margin * 2.0),
        };
        expanded.contains_point(px, py)
    })
}

/// Calculate divider rects from the pane tree, one per split in pre-order.
pub fn calculate_dividers(root: &PaneNode, bounds: Rect, width: f32) -> Vec<DividerInfo> {
    let mut dividers = Vec::new();
    collect_dividers(root, bounds, width, &mut dividers);
    dividers
}

fn collect_dividers(node: &PaneNode, bounds: Rect, width: f32, dividers: &mut Vec<DividerInfo>) {
    let PaneNode::Split {
        id,
        direction,
        ratio,
        first,
        second,
    } = node
    else {
        return;
    };

    let rect = match direction {
        SplitDirection::Vertical => {
            let boundary_x = bounds.x + bounds.width * ratio;
            Rect::new(boundary_x - width / 2.0, bounds.y, width, bounds.height)
        }
        SplitDirection::Horizontal => {
            let boundary_y = bounds.y + bounds.height * ratio;
            Rect::new(bounds.x, boundary_y - width / 2.0, bounds.width, width)
        }
    };

    dividers.push(DividerInfo {
        split_id: *id,
        direction: *direction,
        ratio: *ratio,
        rect,
        region: bounds,
    });

    let (first_bounds, second_bounds) = split_rect(bounds, *direction, *ratio);
    collect_dividers(first, first_bounds, width, dividers);
    collect_dividers(second, second_bounds, width, dividers);
}
