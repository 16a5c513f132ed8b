//! The host seam: everything the controllers know about the page.
//!
//! Controllers never touch browser APIs. They address elements through
//! [`ElementId`] handles and read or mutate the document through the [`Dom`]
//! trait. In the browser the trait is implemented over `web-sys` (see the
//! `web` module); in tests it is an in-memory tree.
//!
//! ## Optional Handles
//!
//! The markup is produced by an external page template, and not every page
//! carries every hook (a page without a hamburger menu, an about page without
//! a light beam). Every single-element lookup therefore returns `Option`, and
//! every consumer treats `None` as "this feature is off on this page".
//! Multi-element lookups return an empty `Vec` for the same reason. Writes to
//! an element are infallible from the controller's point of view: a host that
//! cannot apply one logs it and moves on.

use crate::geometry::Rect;

/// Opaque handle to an element known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Which intersection watcher an element is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Watcher {
    /// Reveal-on-scroll animations.
    Reveal,
    /// Deferred artwork images.
    Lazy,
}

/// Loading state of an `<img>` as reported by the host at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageReadiness {
    /// Finished and decoded (`complete && naturalWidth > 0`), e.g. from cache.
    Ready,
    /// Finished without producing pixels (`complete && naturalWidth == 0`).
    Broken,
    /// Still fetching.
    InFlight,
}

/// A styled block element the host appends to a parent.
///
/// Used for the broken-image placeholder and the horizontal scroll indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub class: String,
    /// Inline `style` attribute, as CSS declarations.
    pub css_text: String,
    pub text: Option<String>,
}

/// Read and write access to the host document.
pub trait Dom {
    /// All elements matching `selector`, in document order.
    fn query_all(&mut self, selector: &str) -> Vec<ElementId>;

    /// First element matching `selector`.
    fn query_one(&mut self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `root` matching `selector`, in document order.
    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId>;

    /// Element whose `id` attribute equals `id`.
    fn by_id(&mut self, id: &str) -> Option<ElementId>;

    fn body(&mut self) -> Option<ElementId>;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    /// Smoothly scroll so the top edge of `el` aligns with the viewport top.
    fn scroll_into_view(&mut self, el: ElementId);

    fn image_readiness(&self, el: ElementId) -> ImageReadiness;

    /// Append `block` as the last child of `parent`.
    fn append_block(&mut self, parent: ElementId, block: &Block) -> Option<ElementId>;

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Bounding box in viewport coordinates.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    fn scroll_left(&self, el: ElementId) -> f64;
    fn set_scroll_left(&mut self, el: ElementId, value: f64);
    fn offset_left(&self, el: ElementId) -> f64;

    /// Install `css` in a `<style>` element with the given id, unless one
    /// with that id already exists.
    fn ensure_stylesheet(&mut self, id: &str, css: &str);

    fn observe(&mut self, watcher: Watcher, el: ElementId);
    fn unobserve(&mut self, watcher: Watcher, el: ElementId);
}

/// Collect the matches of several selectors, dropping duplicates.
///
/// Order follows the first selector that matched each element, which keeps
/// results stable when selector lists overlap (`.gallery-item` appears in
/// both the reveal and card lists).
pub fn query_each<D: Dom + ?Sized>(dom: &mut D, selectors: &[String]) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = Vec::new();
    for selector in selectors {
        for el in dom.query_all(selector) {
            if !out.contains(&el) {
                out.push(el);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MemoryDom;

    #[test]
    fn query_each_deduplicates_overlapping_selectors() {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let a = dom.append(body, "div", &["gallery-item"]);
        let b = dom.append(body, "h2", &["section-title"]);

        let found = query_each(
            &mut dom,
            &[
                ".gallery-item".to_string(),
                ".section-title".to_string(),
                ".gallery-item".to_string(),
            ],
        );
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn query_one_on_empty_page_is_none() {
        let mut dom = MemoryDom::new();
        assert_eq!(dom.query_one(".navbar"), None);
    }
}
