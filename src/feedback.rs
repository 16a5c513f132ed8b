//! Hover, press and touch-drag feedback, plus the mobile-only tweaks.
//!
//! Small, stateless-per-event style writes: artwork images grow slightly
//! under the pointer, buttons lift, touched cards and buttons shrink while the
//! finger is down. On narrow viewports heavy decorative animations are turned
//! off, horizontal artwork strips get touch drag-scrolling with a scroll
//! indicator, and pull-to-refresh is suppressed at the top of the page.

use tracing::debug;

use crate::config::{FeedbackConfig, MotionConfig};
use crate::dom::{self, Block, Dom, ElementId};

/// What an element does under the pointer or finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Gallery card: its inner artwork zooms on hover, the card shrinks a
    /// little while touched.
    Card,
    /// Call-to-action: lifts on hover, shrinks while touched.
    Button,
}

/// New `scrollLeft` of a strip being dragged.
///
/// The strip moves `speed` pixels per pixel of finger travel, opposite to the
/// finger so content follows it.
pub fn drag_scroll_left(start_scroll: f64, start_x: f64, x: f64, speed: f64) -> f64 {
    start_scroll - (x - start_x) * speed
}

/// Whether a touch move at the top of the page should be cancelled to stop
/// the browser's pull-to-refresh.
pub fn blocks_pull_to_refresh(start_y: f64, y: f64, page_scroll: f64) -> bool {
    y - start_y > 0.0 && page_scroll == 0.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start_x: f64,
    start_scroll: f64,
}

#[derive(Debug)]
pub struct Feedback {
    hover_cards: Vec<ElementId>,
    hover_buttons: Vec<ElementId>,
    touch_cards: Vec<ElementId>,
    touch_buttons: Vec<ElementId>,
    card_image: String,
    config: FeedbackConfig,
    mobile: bool,
    strip: Option<ElementId>,
    drag: Option<Drag>,
    pull_start_y: Option<f64>,
}

impl Feedback {
    pub fn init<D: Dom + ?Sized>(dom: &mut D, config: &MotionConfig, mobile: bool) -> Self {
        let strip = if mobile {
            dom.query_one(&config.selectors.drag_scroll)
        } else {
            None
        };
        let feedback = Self {
            hover_cards: dom::query_each(dom, &config.selectors.cards),
            hover_buttons: dom.query_all(&config.selectors.buttons),
            touch_cards: dom::query_each(dom, &config.selectors.touch_cards),
            touch_buttons: dom::query_each(dom, &config.selectors.touch_buttons),
            card_image: config.selectors.card_image.clone(),
            config: config.feedback.clone(),
            mobile,
            strip,
            drag: None,
            pull_start_y: None,
        };

        if mobile {
            for el in dom::query_each(dom, &config.selectors.heavy_animations) {
                dom.set_style(el, "animation", "none");
            }
            if let Some(strip) = strip {
                dom.set_style(strip, "position", "relative");
                dom.append_block(strip, &scroll_indicator(&config.classes.scroll_indicator));
            }
        }
        debug!(mobile, drag_strip = strip.is_some(), "feedback ready");
        feedback
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub fn drag_strip(&self) -> Option<ElementId> {
        self.strip
    }

    fn hover_kind(&self, el: ElementId) -> Option<FeedbackKind> {
        if self.hover_cards.contains(&el) {
            Some(FeedbackKind::Card)
        } else if self.hover_buttons.contains(&el) {
            Some(FeedbackKind::Button)
        } else {
            None
        }
    }

    fn touch_kind(&self, el: ElementId) -> Option<FeedbackKind> {
        // Buttons first: a card may itself carry a button class.
        if self.touch_buttons.contains(&el) {
            Some(FeedbackKind::Button)
        } else if self.touch_cards.contains(&el) {
            Some(FeedbackKind::Card)
        } else {
            None
        }
    }

    /// Elements that need pointer enter/leave listeners.
    pub fn hover_targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.hover_cards.iter().chain(&self.hover_buttons).copied()
    }

    /// Elements that need touch start/end listeners.
    pub fn touch_targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.touch_buttons
            .iter()
            .chain(self.touch_cards.iter().filter(|el| !self.touch_buttons.contains(*el)))
            .copied()
    }

    pub fn pointer_enter<D: Dom + ?Sized>(&self, dom: &mut D, el: ElementId) {
        self.hover(dom, el, true);
    }

    pub fn pointer_leave<D: Dom + ?Sized>(&self, dom: &mut D, el: ElementId) {
        self.hover(dom, el, false);
    }

    fn hover<D: Dom + ?Sized>(&self, dom: &mut D, el: ElementId, entering: bool) {
        match self.hover_kind(el) {
            Some(FeedbackKind::Card) => {
                let scale = if entering { self.config.hover_scale } else { 1.0 };
                if let Some(image) = dom.query_within(el, &self.card_image).into_iter().next() {
                    dom.set_style(image, "transform", &format!("scale({scale})"));
                }
            }
            Some(FeedbackKind::Button) => {
                let lift = if entering { -self.config.button_lift_px } else { 0.0 };
                dom.set_style(el, "transform", &format!("translateY({lift}px)"));
            }
            None => {}
        }
    }

    pub fn touch_start<D: Dom + ?Sized>(&self, dom: &mut D, el: ElementId) {
        let scale = match self.touch_kind(el) {
            Some(FeedbackKind::Card) => self.config.card_press_scale,
            Some(FeedbackKind::Button) => self.config.button_press_scale,
            None => return,
        };
        dom.set_style(el, "transform", &format!("scale({scale})"));
        dom.set_style(el, "transition", &self.config.press_transition);
    }

    pub fn touch_end<D: Dom + ?Sized>(&self, dom: &mut D, el: ElementId) {
        if self.touch_kind(el).is_some() {
            dom.set_style(el, "transform", "scale(1)");
        }
    }

    pub fn drag_start<D: Dom + ?Sized>(&mut self, dom: &D, page_x: f64) {
        let Some(strip) = self.strip else {
            return;
        };
        self.drag = Some(Drag {
            start_x: page_x - dom.offset_left(strip),
            start_scroll: dom.scroll_left(strip),
        });
    }

    /// Returns `true` when the host should cancel the native touch move.
    pub fn drag_move<D: Dom + ?Sized>(&mut self, dom: &mut D, page_x: f64) -> bool {
        let (Some(strip), Some(drag)) = (self.strip, self.drag) else {
            return false;
        };
        let x = page_x - dom.offset_left(strip);
        let left = drag_scroll_left(drag.start_scroll, drag.start_x, x, self.config.drag_speed);
        dom.set_scroll_left(strip, left);
        true
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
    }

    pub fn pull_start(&mut self, page_y: f64) {
        if self.mobile {
            self.pull_start_y = Some(page_y);
        }
    }

    /// Returns `true` when the host should cancel the native touch move.
    pub fn pull_move(&self, page_y: f64, page_scroll: f64) -> bool {
        self.pull_start_y
            .is_some_and(|start| blocks_pull_to_refresh(start, page_y, page_scroll))
    }
}

fn scroll_indicator(class: &str) -> Block {
    Block {
        class: class.to_string(),
        css_text: "position: absolute; bottom: 10px; left: 50%; transform: translateX(-50%); \
                   width: 40px; height: 4px; background: rgba(0,0,0,0.2); \
                   border-radius: 2px; z-index: 10;"
            .to_string(),
        text: None,
    }
}
