//! Viewport geometry and intersection math.
//!
//! Mirrors what the browser's `IntersectionObserver` computes, so the same
//! [`WatchOptions`] drive both the native observer (via
//! [`RootMargin::to_css`]) and the scroll-scan fallback used when the host
//! has no observer support.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap with `other`, or `None` when they don't touch at all.
    ///
    /// Edge-adjacent rectangles produce a zero-area overlap, matching the
    /// observer's "touching counts" rule.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The viewport as a root box at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Grows (positive) or shrinks (negative) the root box before intersecting.
///
/// Field order follows CSS shorthand: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Same margin on the vertical edges only (`"50px 0px"`).
    pub const fn vertical(px: f64) -> Self {
        Self {
            top: px,
            right: 0.0,
            bottom: px,
            left: 0.0,
        }
    }

    /// Shrink only the bottom edge, so elements trigger `px` after entering.
    pub const fn bottom_inset(px: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: -px,
            left: 0.0,
        }
    }

    /// `rootMargin` string for `IntersectionObserverInit`.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }

    fn apply(&self, root: &Rect) -> Rect {
        Rect::new(
            root.x - self.left,
            root.y - self.top,
            root.width + self.left + self.right,
            root.height + self.top + self.bottom,
        )
    }
}

/// Threshold and margin of one intersection watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Fraction of the target's area that must be visible, `0.0..=1.0`.
    pub threshold: f64,
    pub margin: RootMargin,
}

impl WatchOptions {
    /// `rootMargin` for the browser observer.
    pub fn to_css_margin(&self) -> String {
        self.margin.to_css()
    }

    /// Whether `target` counts as intersecting a viewport of `root`.
    pub fn is_intersecting(&self, target: &Rect, root: &Rect) -> bool {
        match intersection_ratio(target, root, &self.margin) {
            Some(ratio) => ratio >= self.threshold,
            None => false,
        }
    }
}

/// Visible fraction of `target` within `root` expanded by `margin`.
///
/// `None` means no contact at all. A zero-area target touching the root
/// reports `1.0`, as the observer does.
pub fn intersection_ratio(target: &Rect, root: &Rect, margin: &RootMargin) -> Option<f64> {
    let root = margin.apply(root);
    let overlap = target.intersection(&root)?;
    let area = target.area();
    if area == 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    #[test]
    fn fully_inside_is_ratio_one() {
        let target = Rect::new(100.0, 100.0, 200.0, 200.0);
        let ratio = intersection_ratio(&target, &viewport(), &RootMargin::default());
        assert_eq!(ratio, Some(1.0));
    }

    #[test]
    fn below_fold_has_no_contact() {
        let target = Rect::new(0.0, 900.0, 200.0, 200.0);
        assert_eq!(
            intersection_ratio(&target, &viewport(), &RootMargin::default()),
            None
        );
    }

    #[test]
    fn partial_overlap_ratio() {
        // 50 of 200 px visible
        let target = Rect::new(0.0, 750.0, 100.0, 200.0);
        let ratio = intersection_ratio(&target, &viewport(), &RootMargin::default()).unwrap();
        assert!((ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn negative_bottom_margin_delays_trigger() {
        let options = WatchOptions {
            threshold: 0.1,
            margin: RootMargin::bottom_inset(50.0),
        };
        // 40px peeking in: inside the raw viewport, but not past the inset
        let target = Rect::new(0.0, 760.0, 100.0, 200.0);
        assert!(!options.is_intersecting(&target, &viewport()));

        // 100px in: 50px past the inset, 25% of the card
        let target = Rect::new(0.0, 700.0, 100.0, 200.0);
        assert!(options.is_intersecting(&target, &viewport()));
    }

    #[test]
    fn positive_margin_triggers_before_entry() {
        let options = WatchOptions {
            threshold: 0.1,
            margin: RootMargin::vertical(50.0),
        };
        // 30px below the fold, inside the 50px lookahead
        let target = Rect::new(0.0, 830.0, 100.0, 100.0);
        assert!(options.is_intersecting(&target, &viewport()));
    }

    #[test]
    fn zero_area_target_touching_root_is_fully_visible() {
        let target = Rect::new(10.0, 10.0, 0.0, 0.0);
        assert_eq!(
            intersection_ratio(&target, &viewport(), &RootMargin::default()),
            Some(1.0)
        );
    }

    #[test]
    fn margin_css_order_is_top_right_bottom_left() {
        assert_eq!(RootMargin::bottom_inset(50.0).to_css(), "0px 0px -50px 0px");
        assert_eq!(RootMargin::vertical(50.0).to_css(), "50px 0px 50px 0px");
    }
}
