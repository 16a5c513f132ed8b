//! Smooth scrolling for in-page anchors.

use tracing::debug;

use crate::dom::{Dom, ElementId};

/// Target id of a same-page fragment link (`"#gallery"` → `"gallery"`).
///
/// A bare `"#"` has no target and yields `None`.
pub fn fragment_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() { None } else { Some(id) }
}

/// What the host should do with the click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorClick {
    /// Cancel the browser's own jump.
    pub prevent_default: bool,
    /// Whether a section was found and scrolled to.
    pub scrolled: bool,
}

/// Handle a click on a fragment anchor.
///
/// Every fragment anchor suppresses the default jump, even when its target is
/// missing; the missing case is simply a no-op.
pub fn anchor_click<D: Dom + ?Sized>(dom: &mut D, anchor: ElementId) -> AnchorClick {
    let Some(href) = dom.attribute(anchor, "href") else {
        return AnchorClick {
            prevent_default: false,
            scrolled: false,
        };
    };
    if !href.starts_with('#') {
        return AnchorClick {
            prevent_default: false,
            scrolled: false,
        };
    }
    let target = fragment_target(&href).and_then(|id| dom.by_id(id));
    match target {
        Some(section) => {
            debug!(%href, "scrolling to section");
            dom.scroll_into_view(section);
        }
        None => debug!(%href, "fragment target not on page"),
    }
    AnchorClick {
        prevent_default: true,
        scrolled: target.is_some(),
    }
}
