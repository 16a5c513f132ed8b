//! Navbar "scrolled" styling.
//!
//! The header gets a solid background and shadow once the page has moved
//! past a fixed offset. The comparison is strict: at exactly the threshold the
//! page still counts as "at the top".

use tracing::debug;

use crate::dom::{Dom, ElementId};

/// Whether an offset counts as scrolled past `threshold`.
pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

#[derive(Debug)]
pub struct NavbarState {
    navbar: Option<ElementId>,
    threshold: f64,
    class: String,
    /// Last state written to the DOM, so repeated scroll events at the same
    /// side of the threshold don't touch the class list.
    applied: Option<bool>,
}

impl NavbarState {
    pub fn new(navbar: Option<ElementId>, threshold: f64, class: impl Into<String>) -> Self {
        Self {
            navbar,
            threshold,
            class: class.into(),
            applied: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.navbar.is_some()
    }

    /// Apply the state for `offset`. Safe to call any number of times.
    pub fn update<D: Dom + ?Sized>(&mut self, dom: &mut D, offset: f64) {
        let Some(navbar) = self.navbar else {
            return;
        };
        let scrolled = is_scrolled(offset, self.threshold);
        if self.applied == Some(scrolled) {
            return;
        }
        debug!(offset, scrolled, "navbar state changed");
        if scrolled {
            dom.add_class(navbar, &self.class);
        } else {
            dom.remove_class(navbar, &self.class);
        }
        self.applied = Some(scrolled);
    }
}
