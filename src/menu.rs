//! Mobile hamburger menu.
//!
//! Two states, `Closed` (initial) and `Open`. The toggle button flips between
//! them; everything else only ever closes: a tap on a link inside the panel
//! (after a short delay, so the close transition can play), a click outside
//! both toggle and panel, Escape, or a leftward swipe on the panel.
//!
//! Every transition goes through one function that writes the open class on
//! both the toggle and the panel and the body scroll lock together, so at any
//! observable point `scroll_locked == (state == Open)` and the two elements
//! agree.

use std::time::Duration;

use tracing::debug;

use crate::config::MotionConfig;
use crate::dom::{Dom, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

/// Why the menu is closing, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    LinkTap,
    OutsideClick,
    Escape,
    Swipe,
}

/// Tracks a single-finger horizontal swipe on the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Swipe {
    start_x: f64,
    current_x: f64,
}

impl Swipe {
    /// Leftward travel; positive when the finger moved left.
    fn leftward(&self) -> f64 {
        self.start_x - self.current_x
    }
}

#[derive(Debug)]
pub struct MobileMenu {
    toggle: ElementId,
    panel: ElementId,
    body: Option<ElementId>,
    state: MenuState,
    open_class: String,
    close_delay: Duration,
    swipe_threshold: f64,
    swipe: Option<Swipe>,
    close_pending: bool,
}

impl MobileMenu {
    /// Wire up the menu, or `None` if the page lacks the toggle or the panel.
    pub fn init<D: Dom + ?Sized>(dom: &mut D, config: &MotionConfig) -> Option<Self> {
        let toggle = dom.query_one(&config.selectors.menu_toggle)?;
        let panel = dom.query_one(&config.selectors.menu_panel)?;
        let body = dom.body();
        let mut menu = Self {
            toggle,
            panel,
            body,
            state: MenuState::Closed,
            open_class: config.classes.menu_open.clone(),
            close_delay: config.menu.close_delay(),
            swipe_threshold: config.menu.swipe_threshold_px,
            swipe: None,
            close_pending: false,
        };
        menu.apply(dom, MenuState::Closed);
        Some(menu)
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    pub fn toggle_element(&self) -> ElementId {
        self.toggle
    }

    pub fn panel_element(&self) -> ElementId {
        self.panel
    }

    /// Links inside the panel that close the menu when tapped.
    pub fn links<D: Dom + ?Sized>(&self, dom: &mut D, selector: &str) -> Vec<ElementId> {
        dom.query_within(self.panel, selector)
    }

    /// The single place state and DOM change together.
    fn apply<D: Dom + ?Sized>(&mut self, dom: &mut D, state: MenuState) {
        self.state = state;
        match state {
            MenuState::Open => {
                dom.add_class(self.toggle, &self.open_class);
                dom.add_class(self.panel, &self.open_class);
                if let Some(body) = self.body {
                    dom.set_style(body, "overflow", "hidden");
                }
            }
            MenuState::Closed => {
                dom.remove_class(self.toggle, &self.open_class);
                dom.remove_class(self.panel, &self.open_class);
                if let Some(body) = self.body {
                    dom.set_style(body, "overflow", "");
                }
                self.swipe = None;
            }
        }
    }

    fn close<D: Dom + ?Sized>(&mut self, dom: &mut D, reason: CloseReason) {
        if self.state == MenuState::Closed {
            return;
        }
        debug!(?reason, "closing menu");
        self.apply(dom, MenuState::Closed);
    }

    /// Toggle button click. The host stops the event from propagating to the
    /// document, so this never doubles as an outside click.
    pub fn toggle<D: Dom + ?Sized>(&mut self, dom: &mut D) -> MenuState {
        let next = match self.state {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        };
        debug!(?next, "menu toggled");
        self.apply(dom, next);
        self.state
    }

    /// A link inside the panel was tapped. Returns the delay after which the
    /// host must call [`MobileMenu::close_timer_elapsed`].
    pub fn link_tapped(&mut self) -> Option<Duration> {
        if self.close_pending {
            return None;
        }
        self.close_pending = true;
        Some(self.close_delay)
    }

    /// The delayed close from a link tap is due.
    pub fn close_timer_elapsed<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if !self.close_pending {
            return;
        }
        self.close_pending = false;
        self.close(dom, CloseReason::LinkTap);
    }

    /// Any click on the document. Closes unless it landed on the toggle or
    /// inside the panel.
    pub fn document_click<D: Dom + ?Sized>(&mut self, dom: &mut D, target: Option<ElementId>) {
        if let Some(target) = target {
            if dom.contains(self.toggle, target) || dom.contains(self.panel, target) {
                return;
            }
        }
        self.close(dom, CloseReason::OutsideClick);
    }

    pub fn key_down<D: Dom + ?Sized>(&mut self, dom: &mut D, key: &str) {
        if key == "Escape" {
            self.close(dom, CloseReason::Escape);
        }
    }

    pub fn touch_start(&mut self, x: f64) {
        self.swipe = Some(Swipe {
            start_x: x,
            current_x: x,
        });
    }

    pub fn touch_move(&mut self, x: f64) {
        if let Some(swipe) = self.swipe.as_mut() {
            swipe.current_x = x;
        }
    }

    /// Finger lifted. Closes on a leftward swipe strictly longer than the
    /// threshold; a tap without movement never closes.
    pub fn touch_end<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        let Some(swipe) = self.swipe.take() else {
            return;
        };
        if swipe.leftward() > self.swipe_threshold {
            self.close(dom, CloseReason::Swipe);
        }
    }

    /// Whether the body scroll lock is engaged.
    pub fn scroll_locked(&self) -> bool {
        self.body.is_some() && self.is_open()
    }
}
