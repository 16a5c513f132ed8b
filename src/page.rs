//! The page context: every controller, wired to host events.
//!
//! [`Page`] is built once per document. It owns the [`Dom`], the resolved
//! configuration and one instance of each controller, and exposes one method
//! per host event. Methods never block and never start timers themselves:
//! when follow-up work is needed they return a [`Schedule`] and the host
//! calls back into [`Page::frame`] or [`Page::timer`] when it is due.
//!
//! ## Rate Limiting
//!
//! Scroll, resize and pointer moves each pass through their own [`Throttle`]
//! gate, all configured with the same [`RateLimit`]. The event methods only
//! record the latest value (offset, viewport, pointer position); the work runs
//! when the gate admits it and always reads the latest value, so coalesced
//! events are never replayed.
//!
//! ## Intersection Detection
//!
//! With [`Detection::Observer`] the host's intersection observers report
//! through [`Page::intersections`]. With [`Detection::Scan`] (no observer
//! support) every admitted scroll or resize also evaluates the watched
//! elements against the viewport geometry, using the same thresholds and
//! margins.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{MotionConfig, generate_stylesheet};
use crate::dom::{Dom, ElementId, Watcher};
use crate::feedback::Feedback;
use crate::geometry::Viewport;
use crate::lazy::LazyImages;
use crate::menu::{MenuState, MobileMenu};
use crate::motion::DecorativeMotion;
use crate::navbar::NavbarState;
use crate::navigation::{self, AnchorClick};
use crate::reveal::RevealAnimator;
use crate::throttle::{Admission, RateLimit, Throttle};

/// Element id of the injected `<style>` block.
pub const STYLESHEET_ID: &str = "sanat-motion-styles";

/// A rate-limited input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Scroll,
    Resize,
    Pointer,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Scroll, Channel::Resize, Channel::Pointer];
}

/// Which timer the host is reporting in [`Page::timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Delayed menu close after a link tap.
    MenuClose,
    /// Trailing run of an interval-limited channel.
    Throttle(Channel),
}

/// Follow-up the host must arrange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Request an animation frame, then call [`Page::frame`].
    Frame,
    /// Start a timer for `delay`, then call [`Page::timer`] with `kind`.
    Timer { kind: TimerKind, delay: Duration },
}

/// How the host reports elements entering the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Observer,
    Scan,
}

#[derive(Debug)]
pub struct Page<D: Dom> {
    dom: D,
    config: MotionConfig,
    viewport: Viewport,
    scroll_offset: f64,
    pointer: (f64, f64),
    detection: Detection,
    navbar: NavbarState,
    reveal: RevealAnimator,
    menu: Option<MobileMenu>,
    lazy: LazyImages,
    motion: DecorativeMotion,
    feedback: Feedback,
    fragment_links: Vec<ElementId>,
    menu_links: Vec<ElementId>,
    scroll_gate: Throttle,
    resize_gate: Throttle,
    pointer_gate: Throttle,
}

impl<D: Dom> Page<D> {
    /// Initialize every controller against the current document.
    ///
    /// The host should follow up with one [`Page::scroll`] carrying the
    /// current offset, so a page restored mid-scroll gets its navbar state.
    pub fn new(mut dom: D, config: MotionConfig, viewport: Viewport, detection: Detection) -> Self {
        dom.ensure_stylesheet(STYLESHEET_ID, &generate_stylesheet(&config));

        let mobile = viewport.width <= config.breakpoints.mobile_px;
        let navbar = NavbarState::new(
            dom.query_one(&config.selectors.navbar),
            config.navbar.threshold_px,
            config.classes.scrolled.clone(),
        );
        let reveal = RevealAnimator::init(&mut dom, &config);
        let menu = MobileMenu::init(&mut dom, &config);
        let lazy = LazyImages::init(&mut dom, &config);
        let motion = DecorativeMotion::init(&mut dom, &config, viewport);
        let feedback = Feedback::init(&mut dom, &config, mobile);
        let fragment_links = dom.query_all(&config.selectors.fragment_links);
        let menu_links = match &menu {
            Some(menu) => menu.links(&mut dom, &config.selectors.menu_links),
            None => Vec::new(),
        };
        let limit = config.rate_limit();

        info!(
            width = viewport.width,
            mobile,
            ?detection,
            ?limit,
            navbar = navbar.is_active(),
            menu = menu.is_some(),
            anchors = fragment_links.len(),
            "page ready"
        );

        let mut page = Self {
            dom,
            config,
            viewport,
            scroll_offset: 0.0,
            pointer: (0.0, 0.0),
            detection,
            navbar,
            reveal,
            menu,
            lazy,
            motion,
            feedback,
            fragment_links,
            menu_links,
            scroll_gate: Throttle::new(limit),
            resize_gate: Throttle::new(limit),
            pointer_gate: Throttle::new(limit),
        };
        page.scan();
        page
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn detection(&self) -> Detection {
        self.detection
    }

    pub fn is_mobile(&self) -> bool {
        self.feedback.is_mobile()
    }

    pub fn navbar(&self) -> &NavbarState {
        &self.navbar
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn lazy(&self) -> &LazyImages {
        &self.lazy
    }

    pub fn motion(&self) -> &DecorativeMotion {
        &self.motion
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Anchors that need click listeners for smooth scrolling.
    pub fn fragment_links(&self) -> &[ElementId] {
        &self.fragment_links
    }

    /// Links inside the mobile menu panel.
    pub fn menu_links(&self) -> &[ElementId] {
        &self.menu_links
    }

    // =====================================================================
    // Rate-limited streams
    // =====================================================================

    pub fn scroll(&mut self, offset: f64, now: Duration) -> Option<Schedule> {
        self.scroll_offset = offset;
        self.admit(Channel::Scroll, now)
    }

    pub fn resize(&mut self, viewport: Viewport, now: Duration) -> Option<Schedule> {
        self.viewport = viewport;
        self.admit(Channel::Resize, now)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) -> Option<Schedule> {
        if !self.motion.wants_pointer() {
            return None;
        }
        self.pointer = (x, y);
        self.admit(Channel::Pointer, now)
    }

    /// An animation frame requested through [`Schedule::Frame`] arrived.
    pub fn frame(&mut self, now: Duration) {
        for channel in Channel::ALL {
            let gate = self.gate_mut(channel);
            if gate.limit() == RateLimit::Frame && gate.fire(now) {
                self.run(channel);
            }
        }
    }

    /// A timer started through [`Schedule::Timer`] elapsed.
    pub fn timer(&mut self, kind: TimerKind, now: Duration) {
        match kind {
            TimerKind::MenuClose => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.close_timer_elapsed(&mut self.dom);
                }
            }
            TimerKind::Throttle(channel) => {
                if self.gate_mut(channel).fire(now) {
                    self.run(channel);
                }
            }
        }
    }

    fn gate_mut(&mut self, channel: Channel) -> &mut Throttle {
        match channel {
            Channel::Scroll => &mut self.scroll_gate,
            Channel::Resize => &mut self.resize_gate,
            Channel::Pointer => &mut self.pointer_gate,
        }
    }

    fn admit(&mut self, channel: Channel, now: Duration) -> Option<Schedule> {
        match self.gate_mut(channel).request(now) {
            Admission::Run => {
                self.run(channel);
                None
            }
            Admission::NextFrame => Some(Schedule::Frame),
            Admission::After(delay) => Some(Schedule::Timer {
                kind: TimerKind::Throttle(channel),
                delay,
            }),
            Admission::Coalesced => None,
        }
    }

    fn run(&mut self, channel: Channel) {
        match channel {
            Channel::Scroll => {
                self.navbar.update(&mut self.dom, self.scroll_offset);
                if self.motion.wants_scroll() {
                    self.motion
                        .scroll(&mut self.dom, self.scroll_offset, self.viewport);
                }
                self.scan();
            }
            Channel::Resize => {
                self.motion.resize(&mut self.dom, self.viewport);
                self.scan();
            }
            Channel::Pointer => {
                let (x, y) = self.pointer;
                self.motion.pointer(&mut self.dom, x, y, self.viewport);
            }
        }
    }

    fn scan(&mut self) {
        if self.detection != Detection::Scan {
            return;
        }
        let root = self.viewport.rect();
        let revealed = self.reveal.scan(&mut self.dom, &root);
        self.lazy.scan(&mut self.dom, &root);
        if revealed > 0 {
            debug!(revealed, "scan revealed elements");
        }
    }

    // =====================================================================
    // Discrete events
    // =====================================================================

    /// Click on one of [`Page::fragment_links`].
    pub fn anchor_click(&mut self, anchor: ElementId) -> AnchorClick {
        navigation::anchor_click(&mut self.dom, anchor)
    }

    /// Click on the hamburger button. `None` when the page has no menu.
    pub fn toggle_click(&mut self) -> Option<MenuState> {
        let menu = self.menu.as_mut()?;
        Some(menu.toggle(&mut self.dom))
    }

    /// Tap on one of [`Page::menu_links`].
    pub fn menu_link_click(&mut self) -> Option<Schedule> {
        let delay = self.menu.as_mut()?.link_tapped()?;
        Some(Schedule::Timer {
            kind: TimerKind::MenuClose,
            delay,
        })
    }

    /// Any click that reached the document. `target` is `None` when the
    /// host could not resolve the clicked element.
    pub fn document_click(&mut self, target: Option<ElementId>) {
        if let Some(menu) = self.menu.as_mut() {
            menu.document_click(&mut self.dom, target);
        }
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(menu) = self.menu.as_mut() {
            menu.key_down(&mut self.dom, key);
        }
    }

    pub fn menu_touch_start(&mut self, x: f64) {
        if let Some(menu) = self.menu.as_mut() {
            menu.touch_start(x);
        }
    }

    pub fn menu_touch_move(&mut self, x: f64) {
        if let Some(menu) = self.menu.as_mut() {
            menu.touch_move(x);
        }
    }

    pub fn menu_touch_end(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.touch_end(&mut self.dom);
        }
    }

    /// A batch of observer reports for one watcher.
    pub fn intersections(&mut self, watcher: Watcher, entries: &[(ElementId, bool)]) {
        for (el, intersecting) in entries {
            match watcher {
                Watcher::Reveal => {
                    self.reveal
                        .on_intersection(&mut self.dom, *el, *intersecting);
                }
                Watcher::Lazy => self.lazy.on_intersection(&mut self.dom, *el, *intersecting),
            }
        }
    }

    pub fn image_loaded(&mut self, el: ElementId) {
        self.lazy.on_load(&mut self.dom, el);
    }

    pub fn image_failed(&mut self, el: ElementId) {
        self.lazy.on_error(&mut self.dom, el);
    }

    pub fn pointer_enter(&mut self, el: ElementId) {
        self.feedback.pointer_enter(&mut self.dom, el);
    }

    pub fn pointer_leave(&mut self, el: ElementId) {
        self.feedback.pointer_leave(&mut self.dom, el);
    }

    pub fn touch_start(&mut self, el: ElementId) {
        self.feedback.touch_start(&mut self.dom, el);
    }

    pub fn touch_end(&mut self, el: ElementId) {
        self.feedback.touch_end(&mut self.dom, el);
    }

    pub fn drag_start(&mut self, page_x: f64) {
        self.feedback.drag_start(&self.dom, page_x);
    }

    /// Returns `true` when the host should cancel the native touch move.
    pub fn drag_move(&mut self, page_x: f64) -> bool {
        self.feedback.drag_move(&mut self.dom, page_x)
    }

    pub fn drag_end(&mut self) {
        self.feedback.drag_end();
    }

    pub fn pull_touch_start(&mut self, page_y: f64) {
        self.feedback.pull_start(page_y);
    }

    /// Returns `true` when the host should cancel the native touch move.
    pub fn pull_touch_move(&mut self, page_y: f64) -> bool {
        self.feedback.pull_move(page_y, self.scroll_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitMode;
    use crate::geometry::Rect;
    use crate::lazy::LoadState;
    use crate::test_helpers::MemoryDom;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Site {
        dom: MemoryDom,
        navbar: ElementId,
        panel: ElementId,
        links: Vec<ElementId>,
        gallery: ElementId,
        cards: Vec<ElementId>,
        images: Vec<ElementId>,
    }

    /// Header with a hamburger menu, then a gallery of eight cards starting
    /// below an 800px fold.
    fn site() -> Site {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let navbar = dom.append(body, "nav", &["navbar"]);
        dom.append(navbar, "button", &["mobile-menu-toggle"]);
        let panel = dom.append(navbar, "ul", &["nav-menu"]);
        let links: Vec<ElementId> = ["#gallery", "#about", "#contact"]
            .iter()
            .map(|href| {
                let link = dom.append(panel, "a", &[]);
                dom.set_attribute(link, "href", href);
                link
            })
            .collect();
        let gallery = dom.append(body, "section", &[]);
        dom.set_attribute(gallery, "id", "gallery");

        let mut cards = Vec::new();
        let mut images = Vec::new();
        for _ in 0..8 {
            let card = dom.append(gallery, "div", &["gallery-item"]);
            let frame = dom.append(card, "div", &["artwork-image"]);
            images.push(dom.append(frame, "img", &["artwork-img"]));
            cards.push(card);
        }
        Site {
            dom,
            navbar,
            panel,
            links,
            gallery,
            cards,
            images,
        }
    }

    /// Card `i` sits at document y `900 + 400i`, 300px tall.
    fn layout(dom: &mut MemoryDom, cards: &[ElementId], offset: f64) {
        for (i, card) in cards.iter().enumerate() {
            let y = 900.0 + 400.0 * i as f64 - offset;
            dom.set_rect(*card, Rect::new(0.0, y, 300.0, 300.0));
        }
    }

    fn desktop() -> Viewport {
        Viewport::new(1024.0, 800.0)
    }

    #[test]
    fn stylesheet_is_installed_once() {
        let s = site();
        let page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        let dom = page.into_dom();
        assert_eq!(dom.stylesheet_count(), 1);

        let page = Page::new(dom, MotionConfig::default(), desktop(), Detection::Observer);
        assert_eq!(page.dom().stylesheet_count(), 1);
        assert!(page.dom().stylesheet(STYLESHEET_ID).is_some());
    }

    #[test]
    fn collects_anchor_and_menu_links() {
        let s = site();
        let page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        assert_eq!(page.fragment_links(), s.links.as_slice());
        assert_eq!(page.menu_links(), s.links.as_slice());
    }

    #[test]
    fn menu_link_tap_closes_after_delay() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        let body = page.dom().body_id();

        assert_eq!(page.toggle_click(), Some(MenuState::Open));
        assert_eq!(page.dom().style(body, "overflow"), Some("hidden"));
        assert!(page.dom().has_class(s.panel, "active"));

        let scheduled = page.menu_link_click();
        assert_eq!(
            scheduled,
            Some(Schedule::Timer {
                kind: TimerKind::MenuClose,
                delay: ms(300),
            })
        );
        // A second tap during the delay doesn't stack another close
        assert_eq!(page.menu_link_click(), None);
        assert!(page.menu().is_some_and(|m| m.is_open()));

        page.timer(TimerKind::MenuClose, ms(300));
        assert!(page.menu().is_some_and(|m| !m.is_open()));
        assert_eq!(page.dom().style(body, "overflow"), None);
        assert!(!page.dom().has_class(s.panel, "active"));
    }

    #[test]
    fn click_inside_panel_keeps_menu_open() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        page.toggle_click();
        page.document_click(Some(s.links[1]));
        assert!(page.menu().is_some_and(|m| m.is_open()));
        page.document_click(Some(s.gallery));
        assert!(page.menu().is_some_and(|m| !m.is_open()));
    }

    #[test]
    fn anchor_click_scrolls_to_section() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        let click = page.anchor_click(s.links[0]);
        assert!(click.prevent_default);
        assert!(click.scrolled);
        assert_eq!(page.dom().scrolled_into_view(), &[s.gallery]);

        let click = page.anchor_click(s.links[1]);
        assert!(click.prevent_default);
        assert!(!click.scrolled);
    }

    #[test]
    fn frame_mode_applies_scroll_on_next_frame() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);

        assert_eq!(page.scroll(100.0, ms(0)), Some(Schedule::Frame));
        assert_eq!(page.scroll(150.0, ms(4)), None);
        assert!(!page.dom().has_class(s.navbar, "scrolled"));
        page.frame(ms(16));
        assert!(page.dom().has_class(s.navbar, "scrolled"));

        // Exactly at the threshold counts as the top
        assert_eq!(page.scroll(100.0, ms(20)), Some(Schedule::Frame));
        page.frame(ms(33));
        assert!(!page.dom().has_class(s.navbar, "scrolled"));
    }

    #[test]
    fn interval_mode_runs_then_trails() {
        let s = site();
        let mut config = MotionConfig::default();
        config.rate_limit.mode = RateLimitMode::Interval;
        let mut page = Page::new(s.dom, config, desktop(), Detection::Observer);

        assert_eq!(page.scroll(150.0, ms(100)), None);
        assert!(page.dom().has_class(s.navbar, "scrolled"));

        assert_eq!(
            page.scroll(50.0, ms(105)),
            Some(Schedule::Timer {
                kind: TimerKind::Throttle(Channel::Scroll),
                delay: ms(11),
            })
        );
        assert_eq!(page.scroll(20.0, ms(110)), None);
        assert!(page.dom().has_class(s.navbar, "scrolled"));

        // Frames don't drive interval gates
        page.frame(ms(112));
        assert!(page.dom().has_class(s.navbar, "scrolled"));

        page.timer(TimerKind::Throttle(Channel::Scroll), ms(116));
        assert!(!page.dom().has_class(s.navbar, "scrolled"));
    }

    #[test]
    fn scan_reveals_cards_on_frame_only() {
        let mut s = site();
        layout(&mut s.dom, &s.cards, 0.0);
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Scan);
        assert_eq!(page.reveal().revealed_count(), 0);

        layout(page.dom_mut(), &s.cards, 200.0);
        assert_eq!(page.scroll(200.0, ms(0)), Some(Schedule::Frame));
        assert_eq!(page.reveal().revealed_count(), 0);

        page.frame(ms(16));
        // First card is 100px into the viewport, 50px past the inset
        assert!(page.reveal().is_revealed(s.cards[0]));
        assert_eq!(page.reveal().revealed_count(), 1);

        layout(page.dom_mut(), &s.cards, 3000.0);
        page.scroll(3000.0, ms(20));
        page.frame(ms(33));
        let revealed: Vec<usize> = (0..8)
            .filter(|i| page.reveal().is_revealed(s.cards[*i]))
            .collect();
        assert_eq!(revealed, vec![0, 5, 6, 7]);

        // Scrolling back never hides anything
        layout(page.dom_mut(), &s.cards, 0.0);
        page.scroll(0.0, ms(40));
        page.frame(ms(50));
        assert_eq!(page.reveal().revealed_count(), 4);
        assert_eq!(page.dom().style(s.cards[0], "opacity"), Some("1"));
    }

    #[test]
    fn observer_reports_reveal_cards() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        page.intersections(Watcher::Reveal, &[(s.cards[2], true), (s.cards[3], false)]);
        assert!(page.reveal().is_revealed(s.cards[2]));
        assert!(!page.reveal().is_revealed(s.cards[3]));
        assert!(page.dom().has_class(s.cards[2], "animate-in"));
    }

    #[test]
    fn failed_image_gets_single_placeholder() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        let img = s.images[0];

        page.intersections(Watcher::Lazy, &[(img, true)]);
        assert_eq!(page.lazy().state(img), Some(LoadState::Loading));

        page.image_failed(img);
        page.image_failed(img);
        page.image_loaded(img);
        assert_eq!(page.lazy().state(img), Some(LoadState::Errored));
        let frame = page.dom().parent(img).unwrap();
        assert_eq!(page.dom().children_with_class(frame, "image-placeholder").len(), 1);
        assert_eq!(page.dom().style(img, "display"), Some("none"));
    }

    #[test]
    fn pointer_moves_ignored_without_pointer_beam() {
        let s = site();
        let mut page = Page::new(s.dom, MotionConfig::default(), desktop(), Detection::Observer);
        assert_eq!(page.pointer_move(10.0, 10.0, ms(0)), None);
    }

    #[test]
    fn narrow_viewport_is_mobile() {
        let s = site();
        let page = Page::new(
            s.dom,
            MotionConfig::default(),
            Viewport::new(375.0, 667.0),
            Detection::Observer,
        );
        assert!(page.is_mobile());
    }

    #[test]
    fn pull_guard_uses_latest_scroll() {
        let s = site();
        let mut page = Page::new(
            s.dom,
            MotionConfig::default(),
            Viewport::new(375.0, 667.0),
            Detection::Observer,
        );
        page.pull_touch_start(100.0);
        assert!(page.pull_touch_move(180.0));

        page.scroll(40.0, ms(0));
        assert!(!page.pull_touch_move(180.0));
    }
}
