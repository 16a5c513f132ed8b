//! Reveal-on-scroll animations.
//!
//! Gallery cards and section headings start hidden and animate in the first
//! time they cross into the viewport. Revealing is one-way: an element that
//! has been shown stays shown for the rest of the page session, however far
//! it is scrolled back out of view, and is released from the watcher as soon
//! as it is revealed.
//!
//! Cards (a subset of the reveal targets) additionally get inline styles: at
//! startup they are faded out and pushed down, and on reveal they are faded
//! in and returned to their resting position by the configured transition.

use tracing::{debug, info};

use crate::config::MotionConfig;
use crate::dom::{self, Dom, ElementId, Watcher};
use crate::geometry::{Rect, WatchOptions};

#[derive(Debug, Clone, PartialEq)]
struct Target {
    el: ElementId,
    /// Also animated through inline opacity/transform.
    card: bool,
    revealed: bool,
}

#[derive(Debug)]
pub struct RevealAnimator {
    targets: Vec<Target>,
    class: String,
    watch: WatchOptions,
}

impl RevealAnimator {
    /// Collect reveal targets, prepare cards, and register every target with
    /// the reveal watcher.
    pub fn init<D: Dom + ?Sized>(dom: &mut D, config: &MotionConfig) -> Self {
        let cards = dom::query_each(dom, &config.selectors.cards);
        let mut elements = dom::query_each(dom, &config.selectors.reveal);
        for card in &cards {
            if !elements.contains(card) {
                elements.push(*card);
            }
        }

        let offset = format!("translateY({}px)", config.reveal.card_offset_px);
        let targets: Vec<Target> = elements
            .into_iter()
            .map(|el| {
                let card = cards.contains(&el);
                if card {
                    dom.set_style(el, "opacity", "0");
                    dom.set_style(el, "transform", &offset);
                    dom.set_style(el, "transition", &config.reveal.card_transition);
                }
                dom.observe(Watcher::Reveal, el);
                Target {
                    el,
                    card,
                    revealed: false,
                }
            })
            .collect();

        info!(
            targets = targets.len(),
            cards = cards.len(),
            "reveal animator ready"
        );
        Self {
            targets,
            class: config.classes.revealed.clone(),
            watch: config.reveal_watch(),
        }
    }

    pub fn watch(&self) -> WatchOptions {
        self.watch
    }

    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.targets.iter().any(|t| t.el == el && t.revealed)
    }

    pub fn revealed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.revealed).count()
    }

    pub fn pending(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.targets.iter().filter(|t| !t.revealed).map(|t| t.el)
    }

    /// Handle one watcher report for `el`.
    ///
    /// Leaving the viewport (`intersecting == false`) never hides anything.
    /// Returns `true` if this report revealed the element.
    pub fn on_intersection<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        el: ElementId,
        intersecting: bool,
    ) -> bool {
        if !intersecting {
            return false;
        }
        let Some(target) = self.targets.iter_mut().find(|t| t.el == el) else {
            return false;
        };
        if target.revealed {
            return false;
        }
        target.revealed = true;
        dom.add_class(el, &self.class);
        if target.card {
            dom.set_style(el, "opacity", "1");
            dom.set_style(el, "transform", "translateY(0)");
        }
        dom.unobserve(Watcher::Reveal, el);
        debug!(element = el.0, "revealed");
        true
    }

    /// Evaluate every unrevealed target against the viewport directly.
    ///
    /// Used when the host has no intersection observer.
    pub fn scan<D: Dom + ?Sized>(&mut self, dom: &mut D, viewport: &Rect) -> usize {
        let due: Vec<ElementId> = self
            .pending()
            .filter(|el| {
                dom.bounding_rect(*el)
                    .is_some_and(|rect| self.watch.is_intersecting(&rect, viewport))
            })
            .collect();
        due.into_iter()
            .filter(|el| self.on_intersection(&mut *dom, *el, true))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MemoryDom;
    use proptest::prelude::*;

    fn page() -> (MemoryDom, Vec<ElementId>, ElementId) {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let cards: Vec<ElementId> = (0..3)
            .map(|_| dom.append(body, "div", &["gallery-item"]))
            .collect();
        let title = dom.append(body, "h2", &["section-title"]);
        (dom, cards, title)
    }

    #[test]
    fn init_hides_cards_and_observes_everything() {
        let (mut dom, cards, title) = page();
        let animator = RevealAnimator::init(&mut dom, &MotionConfig::default());

        assert_eq!(animator.pending().count(), 4);
        for card in &cards {
            assert_eq!(dom.style(*card, "opacity"), Some("0"));
            assert_eq!(dom.style(*card, "transform"), Some("translateY(30px)"));
            assert!(dom.is_observed(Watcher::Reveal, *card));
        }
        // Headings only get the class, never inline styles
        assert_eq!(dom.style(title, "opacity"), None);
        assert!(dom.is_observed(Watcher::Reveal, title));
    }

    #[test]
    fn intersection_reveals_once_and_releases() {
        let (mut dom, cards, _) = page();
        let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());

        assert!(animator.on_intersection(&mut dom, cards[0], true));
        assert!(dom.has_class(cards[0], "animate-in"));
        assert_eq!(dom.style(cards[0], "opacity"), Some("1"));
        assert_eq!(dom.style(cards[0], "transform"), Some("translateY(0)"));
        assert!(!dom.is_observed(Watcher::Reveal, cards[0]));

        // A second report is ignored
        assert!(!animator.on_intersection(&mut dom, cards[0], true));
        assert_eq!(animator.revealed_count(), 1);
    }

    #[test]
    fn leaving_viewport_never_hides() {
        let (mut dom, cards, _) = page();
        let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());

        animator.on_intersection(&mut dom, cards[1], true);
        animator.on_intersection(&mut dom, cards[1], false);
        assert!(animator.is_revealed(cards[1]));
        assert!(dom.has_class(cards[1], "animate-in"));
    }

    #[test]
    fn non_intersecting_report_does_nothing() {
        let (mut dom, cards, _) = page();
        let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());
        assert!(!animator.on_intersection(&mut dom, cards[2], false));
        assert!(!dom.has_class(cards[2], "animate-in"));
    }

    #[test]
    fn unknown_element_is_ignored() {
        let (mut dom, _, _) = page();
        let stray = dom.append(dom.body_id(), "div", &[]);
        let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());
        assert!(!animator.on_intersection(&mut dom, stray, true));
    }

    #[test]
    fn empty_page_has_no_targets() {
        let mut dom = MemoryDom::new();
        let animator = RevealAnimator::init(&mut dom, &MotionConfig::default());
        assert_eq!(animator.pending().count(), 0);
    }

    #[test]
    fn scan_uses_geometry() {
        let (mut dom, cards, title) = page();
        dom.set_rect(cards[0], Rect::new(0.0, 100.0, 300.0, 400.0));
        dom.set_rect(cards[1], Rect::new(0.0, 1200.0, 300.0, 400.0));
        let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());

        let viewport = Rect::new(0.0, 0.0, 1024.0, 800.0);
        assert_eq!(animator.scan(&mut dom, &viewport), 1);
        assert!(animator.is_revealed(cards[0]));
        assert!(!animator.is_revealed(cards[1]));
        // No rect reported: stays pending
        assert!(!animator.is_revealed(title));
    }

    proptest! {
        #[test]
        fn revealed_is_monotonic(reports in proptest::collection::vec((0usize..4, any::<bool>()), 0..40)) {
            let (mut dom, mut cards, title) = page();
            cards.push(title);
            let mut animator = RevealAnimator::init(&mut dom, &MotionConfig::default());
            let mut seen = [false; 4];
            for (index, intersecting) in reports {
                animator.on_intersection(&mut dom, cards[index], intersecting);
                seen[index] |= intersecting;
                for (i, el) in cards.iter().enumerate() {
                    prop_assert_eq!(animator.is_revealed(*el), seen[i]);
                }
            }
        }
    }
}
