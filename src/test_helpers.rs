//! Shared test utilities for the sanat-motion test suite.
//!
//! Provides [`MemoryDom`], an in-memory element tree implementing [`Dom`],
//! plus inspection helpers for asserting on what the controllers wrote.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::MemoryDom;
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.body_id();
//! let nav = dom.append(body, "nav", &["navbar"]);
//!
//! let mut navbar = NavbarState::new(Some(nav), 100.0, "scrolled");
//! navbar.update(&mut dom, 150.0);
//! assert!(dom.has_class(nav, "scrolled"));
//! ```
//!
//! Selector support covers what the stock configuration uses: comma lists,
//! descendant combinators, tag names, `.class`, `#id`, and `[attr]`,
//! `[attr="v"]` and `[attr^="v"]` attribute tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dom::{Block, Dom, ElementId, ImageReadiness, Watcher};
use crate::geometry::Rect;

// =========================================================================
// Tree
// =========================================================================

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Option<Rect>,
    image: ImageReadiness,
    text: Option<String>,
    scroll_left: f64,
    offset_left: f64,
}

impl Node {
    fn new(tag: &str, classes: &[&str], parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
            rect: None,
            image: ImageReadiness::InFlight,
            text: None,
            scroll_left: 0.0,
            offset_left: 0.0,
        }
    }
}

/// In-memory document with a `<body>` root.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    class_writes: HashMap<ElementId, usize>,
    scrolled: Vec<ElementId>,
    observed: HashSet<(Watcher, ElementId)>,
    unobserve_calls: HashMap<(Watcher, ElementId), usize>,
    stylesheets: Vec<(String, String)>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body", &[], None)],
            class_writes: HashMap::new(),
            scrolled: Vec::new(),
            observed: HashSet::new(),
            unobserve_calls: HashMap::new(),
            stylesheets: Vec::new(),
        }
    }

    pub fn body_id(&self) -> ElementId {
        ElementId(0)
    }

    /// Append a `<tag class="...">` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str, classes: &[&str]) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag, classes, Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    pub fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        self.node_mut(el)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        self.node_mut(el).rect = Some(rect);
    }

    pub fn set_image(&mut self, el: ElementId, readiness: ImageReadiness) {
        self.node_mut(el).image = readiness;
    }

    pub fn set_offset_left(&mut self, el: ElementId, value: f64) {
        self.node_mut(el).offset_left = value;
    }

    // =====================================================================
    // Inspection
    // =====================================================================

    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el).styles.get(property).map(String::as_str)
    }

    /// Number of `add_class`/`remove_class` calls made on `el`.
    pub fn class_writes(&self, el: ElementId) -> usize {
        self.class_writes.get(&el).copied().unwrap_or(0)
    }

    pub fn scrolled_into_view(&self) -> &[ElementId] {
        &self.scrolled
    }

    pub fn is_observed(&self, watcher: Watcher, el: ElementId) -> bool {
        self.observed.contains(&(watcher, el))
    }

    pub fn unobserve_calls(&self, watcher: Watcher, el: ElementId) -> usize {
        self.unobserve_calls
            .get(&(watcher, el))
            .copied()
            .unwrap_or(0)
    }

    pub fn children_with_class(&self, parent: ElementId, class: &str) -> Vec<ElementId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .filter(|child| self.has_class(*child, class))
            .collect()
    }

    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.node(el).text.as_deref()
    }

    /// CSS of the stylesheet installed under `id`.
    pub fn stylesheet(&self, id: &str) -> Option<&str> {
        self.stylesheets
            .iter()
            .find(|(sheet, _)| sheet == id)
            .map(|(_, css)| css.as_str())
    }

    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn node(&self, el: ElementId) -> &Node {
        &self.nodes[el.0 as usize]
    }

    fn node_mut(&mut self, el: ElementId) -> &mut Node {
        &mut self.nodes[el.0 as usize]
    }

    /// Every element in document order.
    fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk(self.body_id(), &mut out);
        out
    }

    fn walk(&self, el: ElementId, out: &mut Vec<ElementId>) {
        out.push(el);
        for child in &self.node(el).children {
            self.walk(*child, out);
        }
    }

    fn matches(&self, el: ElementId, selector: &str) -> bool {
        selector.split(',').any(|alternative| {
            let parts: Vec<&str> = alternative.split_whitespace().collect();
            !parts.is_empty() && self.matches_chain(el, &parts)
        })
    }

    /// `parts` is a descendant chain; the last part must match `el` and the
    /// rest must match successive ancestors.
    fn matches_chain(&self, el: ElementId, parts: &[&str]) -> bool {
        let Some((last, rest)) = parts.split_last() else {
            return true;
        };
        if !self.matches_compound(el, last) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        let mut ancestor = self.node(el).parent;
        while let Some(a) = ancestor {
            if self.matches_chain(a, rest) {
                return true;
            }
            ancestor = self.node(a).parent;
        }
        false
    }

    fn matches_compound(&self, el: ElementId, compound: &str) -> bool {
        let node = self.node(el);
        let mut rest = compound;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" && tag != node.tag {
            return false;
        }
        rest = &rest[tag_end..];

        while !rest.is_empty() {
            if let Some(attr) = rest.strip_prefix('[') {
                let Some(close) = attr.find(']') else {
                    return false;
                };
                if !self.matches_attribute(node, &attr[..close]) {
                    return false;
                }
                rest = &attr[close + 1..];
            } else {
                let kind = &rest[..1];
                let body = &rest[1..];
                let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                let name = &body[..end];
                let ok = match kind {
                    "." => node.classes.iter().any(|c| c == name),
                    "#" => node.attrs.get("id").map(String::as_str) == Some(name),
                    _ => false,
                };
                if !ok {
                    return false;
                }
                rest = &body[end..];
            }
        }
        true
    }

    fn matches_attribute(&self, node: &Node, test: &str) -> bool {
        let unquote = |v: &str| v.trim_matches('"').trim_matches('\'').to_string();
        if let Some((name, value)) = test.split_once("^=") {
            node.attrs
                .get(name)
                .is_some_and(|actual| actual.starts_with(&unquote(value)))
        } else if let Some((name, value)) = test.split_once('=') {
            node.attrs
                .get(name)
                .is_some_and(|actual| *actual == unquote(value))
        } else {
            node.attrs.contains_key(test)
        }
    }
}

impl Dom for MemoryDom {
    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|el| self.matches(*el, selector))
            .collect()
    }

    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let mut scope = Vec::new();
        self.walk(root, &mut scope);
        scope
            .into_iter()
            .skip(1)
            .filter(|el| self.matches(*el, selector))
            .collect()
    }

    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(candidate) = current {
            if self.matches(candidate, selector) {
                return Some(candidate);
            }
            current = self.node(candidate).parent;
        }
        None
    }

    fn by_id(&mut self, id: &str) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .find(|el| self.node(*el).attrs.get("id").map(String::as_str) == Some(id))
    }

    fn body(&mut self) -> Option<ElementId> {
        Some(self.body_id())
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.node(el).attrs.get(name).cloned()
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        *self.class_writes.entry(el).or_default() += 1;
        let node = self.node_mut(el);
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        *self.class_writes.entry(el).or_default() += 1;
        self.node_mut(el).classes.retain(|c| c != class);
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el).classes.iter().any(|c| c == class)
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let styles = &mut self.node_mut(el).styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.node(el).parent;
        }
        false
    }

    fn scroll_into_view(&mut self, el: ElementId) {
        self.scrolled.push(el);
    }

    fn image_readiness(&self, el: ElementId) -> ImageReadiness {
        self.node(el).image
    }

    fn append_block(&mut self, parent: ElementId, block: &Block) -> Option<ElementId> {
        let el = self.append(parent, "div", &[block.class.as_str()]);
        for declaration in block.css_text.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                self.set_style(el, property.trim(), value.trim());
            }
        }
        self.node_mut(el).text = block.text.clone();
        Some(el)
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).parent
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        self.node(el).rect
    }

    fn scroll_left(&self, el: ElementId) -> f64 {
        self.node(el).scroll_left
    }

    fn set_scroll_left(&mut self, el: ElementId, value: f64) {
        self.node_mut(el).scroll_left = value;
    }

    fn offset_left(&self, el: ElementId) -> f64 {
        self.node(el).offset_left
    }

    fn ensure_stylesheet(&mut self, id: &str, css: &str) {
        if self.stylesheet(id).is_none() {
            self.stylesheets.push((id.to_string(), css.to_string()));
        }
    }

    fn observe(&mut self, watcher: Watcher, el: ElementId) {
        self.observed.insert((watcher, el));
    }

    fn unobserve(&mut self, watcher: Watcher, el: ElementId) {
        *self.unobserve_calls.entry((watcher, el)).or_default() += 1;
        self.observed.remove(&(watcher, el));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_cover_stock_hooks() {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let deco = dom.append(body, "div", &["floating-artworks"]);
        let floating = dom.append(deco, "div", &["artwork-item"]);
        let loose = dom.append(body, "div", &["artwork-item"]);
        let link = dom.append(body, "a", &[]);
        dom.set_attribute(link, "href", "#about");
        let external = dom.append(body, "a", &[]);
        dom.set_attribute(external, "href", "/shop");

        assert_eq!(
            dom.query_all(".floating-artworks .artwork-item"),
            vec![floating]
        );
        assert_eq!(dom.query_all(".artwork-item"), vec![floating, loose]);
        assert_eq!(dom.query_all("a[href^=\"#\"]"), vec![link]);
        assert_eq!(dom.query_all("a"), vec![link, external]);
    }

    #[test]
    fn query_all_follows_document_order() {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let first = dom.append(body, "section", &[]);
        let second = dom.append(body, "div", &["item"]);
        let nested = dom.append(first, "div", &["item"]);
        assert_eq!(dom.query_all(".item"), vec![nested, second]);
    }

    #[test]
    fn append_block_parses_inline_css() {
        let mut dom = MemoryDom::new();
        let body = dom.body_id();
        let block = Block {
            class: "note".into(),
            css_text: "height: 200px; color: #666".into(),
            text: Some("hi".into()),
        };
        let el = dom.append_block(body, &block).unwrap();
        assert_eq!(dom.style(el, "height"), Some("200px"));
        assert_eq!(dom.style(el, "color"), Some("#666"));
        assert_eq!(dom.text(el), Some("hi"));
    }
}
