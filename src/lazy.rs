//! Lazy artwork images.
//!
//! Each deferred image is watched until it comes within the lookahead margin
//! of the viewport, then resolved exactly once:
//!
//! ```text
//!             intersect, ready          ┌────────┐
//!   Pending ─────────────────────────▶ │ Loaded │
//!      │                                └────────┘
//!      │ intersect, in flight               ▲ load
//!      ▼                                    │
//!   Loading ────────────────────────────────┘
//!      │ error                          ┌─────────┐
//!      └──────────────────────────────▶ │ Errored │ ◀── intersect, broken
//!                                       └─────────┘
//! ```
//!
//! An image is released from the watcher on its first intersection, whatever
//! the outcome, so no callback outlives its purpose. Images that are already
//! decoded at startup (served from cache) skip the watcher entirely.
//!
//! A failed image is hidden and exactly one placeholder block is appended to
//! its parent. `Loaded` and `Errored` are terminal: late or duplicate load and
//! error events are ignored.

use tracing::{debug, info, warn};

use crate::config::MotionConfig;
use crate::dom::{Block, Dom, ElementId, ImageReadiness, Watcher};
use crate::geometry::{Rect, WatchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loading,
    Loaded,
    Errored,
}

impl LoadState {
    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Errored)
    }
}

#[derive(Debug, Clone)]
struct LazyImage {
    el: ElementId,
    container: Option<ElementId>,
    state: LoadState,
    placeholder: Option<ElementId>,
}

#[derive(Debug)]
pub struct LazyImages {
    images: Vec<LazyImage>,
    loaded_class: String,
    loading_class: String,
    placeholder: Block,
    watch: WatchOptions,
}

impl LazyImages {
    pub fn init<D: Dom + ?Sized>(dom: &mut D, config: &MotionConfig) -> Self {
        let mut lazy = Self {
            images: Vec::new(),
            loaded_class: config.classes.loaded.clone(),
            loading_class: config.classes.loading.clone(),
            placeholder: Block {
                class: config.classes.placeholder.clone(),
                css_text: config.lazy.placeholder_css.clone(),
                text: Some(config.lazy.placeholder_text.clone()),
            },
            watch: config.lazy_watch(),
        };

        for el in dom.query_all(&config.selectors.lazy_images) {
            let container = dom.closest(el, &config.selectors.image_container);
            lazy.images.push(LazyImage {
                el,
                container,
                state: LoadState::Pending,
                placeholder: None,
            });
            if dom.image_readiness(el) == ImageReadiness::Ready {
                lazy.mark_loaded(dom, el);
            } else {
                dom.observe(Watcher::Lazy, el);
            }
        }

        info!(
            images = lazy.images.len(),
            cached = lazy.count(LoadState::Loaded),
            "lazy images ready"
        );
        lazy
    }

    pub fn watch(&self) -> WatchOptions {
        self.watch
    }

    pub fn state(&self, el: ElementId) -> Option<LoadState> {
        self.find(el).map(|image| image.state)
    }

    pub fn count(&self, state: LoadState) -> usize {
        self.images.iter().filter(|i| i.state == state).count()
    }

    /// Every deferred image, in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.images.iter().map(|image| image.el)
    }

    pub fn placeholder_of(&self, el: ElementId) -> Option<ElementId> {
        self.find(el).and_then(|image| image.placeholder)
    }

    fn find(&self, el: ElementId) -> Option<&LazyImage> {
        self.images.iter().find(|i| i.el == el)
    }

    fn find_mut(&mut self, el: ElementId) -> Option<&mut LazyImage> {
        self.images.iter_mut().find(|i| i.el == el)
    }

    /// Watcher report for `el`. Only the first intersecting report counts.
    pub fn on_intersection<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        el: ElementId,
        intersecting: bool,
    ) {
        if !intersecting {
            return;
        }
        let loading_class = self.loading_class.clone();
        let Some(image) = self.find_mut(el) else {
            return;
        };
        if image.state != LoadState::Pending {
            return;
        }
        dom.unobserve(Watcher::Lazy, el);

        match dom.image_readiness(el) {
            ImageReadiness::Ready => self.mark_loaded(dom, el),
            ImageReadiness::Broken => self.mark_errored(dom, el),
            ImageReadiness::InFlight => {
                image.state = LoadState::Loading;
                if let Some(container) = image.container {
                    dom.add_class(container, &loading_class);
                }
                debug!(image = el.0, "image loading");
            }
        }
    }

    /// The browser finished loading `el`.
    ///
    /// Ignored while the image is still `Pending`: the intersection will find
    /// it ready and mark it then, so nothing is shown before it nears view.
    pub fn on_load<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId) {
        if self.state(el) == Some(LoadState::Loading) {
            self.mark_loaded(dom, el);
        }
    }

    /// The browser failed to load `el`.
    pub fn on_error<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId) {
        match self.state(el) {
            Some(LoadState::Pending) | Some(LoadState::Loading) => {
                dom.unobserve(Watcher::Lazy, el);
                self.mark_errored(dom, el);
            }
            _ => {}
        }
    }

    fn mark_loaded<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId) {
        let loaded_class = self.loaded_class.clone();
        let loading_class = self.loading_class.clone();
        let Some(image) = self.find_mut(el) else {
            return;
        };
        image.state = LoadState::Loaded;
        dom.add_class(el, &loaded_class);
        dom.set_style(el, "opacity", "1");
        if let Some(container) = image.container {
            dom.remove_class(container, &loading_class);
        }
        debug!(image = el.0, "image loaded");
    }

    fn mark_errored<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId) {
        let loading_class = self.loading_class.clone();
        let placeholder = self.placeholder.clone();
        let Some(image) = self.find_mut(el) else {
            return;
        };
        image.state = LoadState::Errored;
        dom.set_style(el, "display", "none");
        if let Some(container) = image.container {
            dom.remove_class(container, &loading_class);
        }
        if image.placeholder.is_none() {
            match dom.parent(el) {
                Some(parent) => image.placeholder = dom.append_block(parent, &placeholder),
                None => warn!(image = el.0, "broken image has no parent for placeholder"),
            }
        }
        debug!(image = el.0, "image failed, placeholder shown");
    }

    /// Evaluate every pending image against the viewport directly.
    ///
    /// Used when the host has no intersection observer.
    pub fn scan<D: Dom + ?Sized>(&mut self, dom: &mut D, viewport: &Rect) {
        let due: Vec<ElementId> = self
            .images
            .iter()
            .filter(|i| i.state == LoadState::Pending)
            .filter(|i| {
                dom.bounding_rect(i.el)
                    .is_some_and(|rect| self.watch.is_intersecting(&rect, viewport))
            })
            .map(|i| i.el)
            .collect();
        for el in due {
            self.on_intersection(&mut *dom, el, true);
        }
    }
}
