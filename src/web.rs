//! Browser shell: [`Dom`] over `web-sys`, listeners, observers and timers.
//!
//! Everything browser-specific lives here. The shell resolves elements to
//! [`ElementId`] handles (stamped on the element as `data-motion-id`),
//! builds one `IntersectionObserver` per [`Watcher`], installs listeners that
//! forward into the shared [`Page`], and turns each returned [`Schedule`] into
//! a `requestAnimationFrame` or `setTimeout` call.
//!
//! Listener closures are leaked with `forget()`: they live as long as the
//! document. One-shot frame and timer callbacks use `Closure::once_into_js`
//! so they are released after running.
//!
//! If either observer cannot be constructed the page runs in
//! [`Detection::Scan`] mode and neither observer is used.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    HtmlImageElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent, Node, NodeList, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Touch, TouchEvent, Window,
};

use crate::config::{ConfigError, MotionConfig, resolve_config, stock_defaults_value};
use crate::dom::{Block, Dom, ElementId, ImageReadiness, Watcher};
use crate::geometry::{Rect, Viewport, WatchOptions};
use crate::logging;
use crate::page::{Detection, Page, Schedule};

/// Attribute carrying an element's handle.
const ID_ATTRIBUTE: &str = "data-motion-id";

/// Script blocks holding page config as TOML.
const CONFIG_SELECTOR: &str = r#"script[type="application/toml"][data-motion-config]"#;

/// Root attribute that switches console logging to debug level.
const DEBUG_ATTRIBUTE: &str = "data-motion-debug";

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("no global window")]
    MissingWindow,
    #[error("window has no document")]
    MissingDocument,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for ShellError {
    fn from(value: JsValue) -> Self {
        ShellError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// =========================================================================
// Dom over web-sys
// =========================================================================

#[derive(Debug)]
pub struct WebDom {
    document: Document,
    registry: RefCell<Vec<Element>>,
    reveal: Option<IntersectionObserver>,
    lazy: Option<IntersectionObserver>,
}

impl WebDom {
    pub fn new(
        document: Document,
        reveal: Option<IntersectionObserver>,
        lazy: Option<IntersectionObserver>,
    ) -> Self {
        Self {
            document,
            registry: RefCell::new(Vec::new()),
            reveal,
            lazy,
        }
    }

    /// Handle for `el`, registering it on first sight.
    pub fn handle(&self, el: Element) -> ElementId {
        if let Some(index) = el
            .get_attribute(ID_ATTRIBUTE)
            .and_then(|v| v.parse::<usize>().ok())
        {
            let registry = self.registry.borrow();
            let node: &Node = &el;
            if registry
                .get(index)
                .is_some_and(|known| known.is_same_node(Some(node)))
            {
                return ElementId(index as u32);
            }
        }
        let mut registry = self.registry.borrow_mut();
        let index = registry.len();
        if let Err(err) = el.set_attribute(ID_ATTRIBUTE, &index.to_string()) {
            debug!(error = ?err, "could not stamp element handle");
        }
        registry.push(el);
        ElementId(index as u32)
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(id.0 as usize).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, list: NodeList) -> Vec<ElementId> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.handle(el))
            .collect()
    }

    fn observer(&self, watcher: Watcher) -> Option<&IntersectionObserver> {
        match watcher {
            Watcher::Reveal => self.reveal.as_ref(),
            Watcher::Lazy => self.lazy.as_ref(),
        }
    }
}

impl Dom for WebDom {
    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                warn!(selector, error = ?err, "invalid selector");
                Vec::new()
            }
        }
    }

    fn query_within(&mut self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(root) = self.element(root) else {
            return Vec::new();
        };
        match root.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                warn!(selector, error = ?err, "invalid selector");
                Vec::new()
            }
        }
    }

    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.element(el)?.closest(selector).ok()??;
        Some(self.handle(found))
    }

    fn by_id(&mut self, id: &str) -> Option<ElementId> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.handle(el))
    }

    fn body(&mut self) -> Option<ElementId> {
        let body: Element = self.document.body()?.into();
        Some(self.handle(body))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            if let Err(err) = el.class_list().add_1(class) {
                debug!(class, error = ?err, "add class failed");
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            if let Err(err) = el.class_list().remove_1(class) {
                debug!(class, error = ?err, "remove class failed");
            }
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            debug!(property, error = ?err, "style write failed");
        }
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let (Some(ancestor), Some(node)) = (self.element(ancestor), self.element(node)) else {
            return false;
        };
        let node: &Node = &node;
        ancestor.contains(Some(node))
    }

    fn scroll_into_view(&mut self, el: ElementId) {
        if let Some(el) = self.element(el) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn image_readiness(&self, el: ElementId) -> ImageReadiness {
        let image = self
            .element(el)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        match image {
            Some(img) if img.complete() && img.natural_width() > 0 => ImageReadiness::Ready,
            Some(img) if img.complete() => ImageReadiness::Broken,
            Some(_) => ImageReadiness::InFlight,
            // Not an <img>: nothing to wait for
            None => ImageReadiness::Ready,
        }
    }

    fn append_block(&mut self, parent: ElementId, block: &Block) -> Option<ElementId> {
        let parent = self.element(parent)?;
        let el = self.document.create_element("div").ok()?;
        el.set_class_name(&block.class);
        el.set_attribute("style", &block.css_text).ok()?;
        if let Some(text) = &block.text {
            el.set_text_content(Some(text));
        }
        parent.append_child(&el).ok()?;
        Some(self.handle(el))
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.element(el)?.parent_element()?;
        Some(self.handle(parent))
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let rect = self.element(el)?.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn scroll_left(&self, el: ElementId) -> f64 {
        self.element(el)
            .map(|el| f64::from(el.scroll_left()))
            .unwrap_or(0.0)
    }

    fn set_scroll_left(&mut self, el: ElementId, value: f64) {
        if let Some(el) = self.element(el) {
            el.set_scroll_left(value.round() as i32);
        }
    }

    fn offset_left(&self, el: ElementId) -> f64 {
        self.html(el)
            .map(|html| f64::from(html.offset_left()))
            .unwrap_or(0.0)
    }

    fn ensure_stylesheet(&mut self, id: &str, css: &str) {
        if self.document.get_element_by_id(id).is_some() {
            return;
        }
        let style = match self.document.create_element("style") {
            Ok(style) => style,
            Err(err) => {
                warn!(error = ?err, "cannot create stylesheet");
                return;
            }
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        let head: Option<Element> = self
            .document
            .head()
            .map(Into::into)
            .or_else(|| self.document.body().map(Into::into));
        match head {
            Some(head) => {
                if let Err(err) = head.append_child(&style) {
                    warn!(error = ?err, "cannot install stylesheet");
                }
            }
            None => warn!("document has neither head nor body for stylesheet"),
        }
    }

    fn observe(&mut self, watcher: Watcher, el: ElementId) {
        if let (Some(observer), Some(el)) = (self.observer(watcher), self.element(el)) {
            observer.observe(&el);
        }
    }

    fn unobserve(&mut self, watcher: Watcher, el: ElementId) {
        if let (Some(observer), Some(el)) = (self.observer(watcher), self.element(el)) {
            observer.unobserve(&el);
        }
    }
}

// =========================================================================
// Shell
// =========================================================================

struct Shell {
    window: Window,
    page: RefCell<Option<Page<WebDom>>>,
}

thread_local! {
    static SHELL: RefCell<Option<Rc<Shell>>> = const { RefCell::new(None) };
}

impl Shell {
    /// Monotonic page clock.
    fn now(&self) -> Duration {
        let ms = self
            .window
            .performance()
            .map(|p| p.now())
            .unwrap_or(0.0);
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Run `f` against the page unless it is missing or already borrowed.
    fn with_page<R>(&self, f: impl FnOnce(&mut Page<WebDom>) -> R) -> Option<R> {
        let Ok(mut slot) = self.page.try_borrow_mut() else {
            warn!("re-entrant event dropped");
            return None;
        };
        slot.as_mut().map(f)
    }
}

/// Forward an event to the page and arrange whatever it asks for.
fn dispatch(
    shell: &Rc<Shell>,
    f: impl FnOnce(&mut Page<WebDom>, Duration) -> Option<Schedule>,
) {
    let now = shell.now();
    if let Some(Some(schedule)) = shell.with_page(|page| f(page, now)) {
        arrange(shell, schedule);
    }
}

fn arrange(shell: &Rc<Shell>, schedule: Schedule) {
    let later = Rc::clone(shell);
    let result = match schedule {
        Schedule::Frame => {
            let callback = Closure::once_into_js(move || {
                let now = later.now();
                later.with_page(|page| page.frame(now));
            });
            shell
                .window
                .request_animation_frame(callback.unchecked_ref())
                .map(|_| ())
        }
        Schedule::Timer { kind, delay } => {
            let callback = Closure::once_into_js(move || {
                let now = later.now();
                later.with_page(|page| page.timer(kind, now));
            });
            let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
            shell
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    millis,
                )
                .map(|_| ())
        }
    };
    if let Err(err) = result {
        warn!(?schedule, error = ?err, "could not schedule callback");
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), ShellError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

/// Listen on the element behind `id`, skipping handles that no longer resolve.
fn listen_on(
    page: &Page<WebDom>,
    id: ElementId,
    kind: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), ShellError> {
    let Some(el) = page.dom().element(id) else {
        debug!(element = id.0, kind, "listener target vanished");
        return Ok(());
    };
    let target: &EventTarget = el.as_ref();
    listen(target, kind, passive, handler)
}

fn first_touch(event: &Event) -> Option<Touch> {
    event.dyn_ref::<TouchEvent>()?.touches().get(0)
}

fn watcher_observer(
    shell: &Rc<Shell>,
    watcher: Watcher,
    watch: WatchOptions,
) -> Option<IntersectionObserver> {
    let shell = Rc::clone(shell);
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: JsValue| {
        let reports: Vec<(Element, bool)> = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| (entry.target(), entry.is_intersecting()))
            .collect();
        shell.with_page(|page| {
            let entries: Vec<(ElementId, bool)> = reports
                .into_iter()
                .map(|(el, intersecting)| (page.dom().handle(el), intersecting))
                .collect();
            page.intersections(watcher, &entries);
        });
    }) as Box<dyn FnMut(js_sys::Array, JsValue)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(watch.threshold));
    init.set_root_margin(&watch.to_css_margin());
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            callback.forget();
            Some(observer)
        }
        Err(err) => {
            warn!(?watcher, error = ?err, "intersection observer unavailable");
            None
        }
    }
}

/// Page config from the embedded TOML blocks, or the stock defaults.
///
/// Blocks are layered in document order. Any unreadable block discards the
/// whole page config rather than applying a partial one.
fn page_config(document: &Document) -> MotionConfig {
    let blocks = match document.query_selector_all(CONFIG_SELECTOR) {
        Ok(list) => list,
        Err(err) => {
            warn!(error = ?err, "cannot query page config");
            return MotionConfig::default();
        }
    };
    let sources: Vec<String> = (0..blocks.length())
        .filter_map(|i| blocks.item(i))
        .filter_map(|node| node.text_content())
        .collect();
    if sources.is_empty() {
        return MotionConfig::default();
    }

    let layered = sources
        .iter()
        .map(|source| toml::from_str::<toml::Value>(source).map_err(ConfigError::from))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|overlays| resolve_config(stock_defaults_value(), overlays));
    match layered {
        Ok(config) => {
            debug!(blocks = sources.len(), "page config applied");
            config
        }
        Err(err) => {
            warn!(%err, "invalid page config, using defaults");
            MotionConfig::default()
        }
    }
}

fn init_logging(document: &Document) {
    let debug = document
        .document_element()
        .is_some_and(|root| root.has_attribute(DEBUG_ATTRIBUTE));
    logging::init_browser(logging::browser_level(debug));
}

fn boot(window: Window, document: Document, config: MotionConfig) -> Result<(), ShellError> {
    if SHELL.with(|slot| slot.borrow().is_some()) {
        warn!("already started");
        return Ok(());
    }

    let shell = Rc::new(Shell {
        window,
        page: RefCell::new(None),
    });
    let reveal = watcher_observer(&shell, Watcher::Reveal, config.reveal_watch());
    let lazy = watcher_observer(&shell, Watcher::Lazy, config.lazy_watch());
    let (reveal, lazy, detection) = match (reveal, lazy) {
        (Some(reveal), Some(lazy)) => (Some(reveal), Some(lazy), Detection::Observer),
        _ => (None, None, Detection::Scan),
    };

    let dom = WebDom::new(document.clone(), reveal, lazy);
    let page = Page::new(dom, config, shell.viewport(), detection);
    wire(&shell, &document, &page)?;
    *shell.page.borrow_mut() = Some(page);
    SHELL.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&shell)));

    let offset = shell.scroll_offset();
    dispatch(&shell, |page, now| page.scroll(offset, now));
    info!("motion started");
    Ok(())
}

fn wire(shell: &Rc<Shell>, document: &Document, page: &Page<WebDom>) -> Result<(), ShellError> {
    let window: &EventTarget = shell.window.as_ref();
    let doc: &EventTarget = document.as_ref();

    let s = Rc::clone(shell);
    listen(window, "scroll", true, move |_| {
        let offset = s.scroll_offset();
        dispatch(&s, |page, now| page.scroll(offset, now));
    })?;

    let s = Rc::clone(shell);
    listen(window, "resize", true, move |_| {
        let viewport = s.viewport();
        dispatch(&s, |page, now| page.resize(viewport, now));
    })?;

    if page.motion().wants_pointer() {
        let s = Rc::clone(shell);
        listen(doc, "mousemove", true, move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let (x, y) = (f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                dispatch(&s, |page, now| page.pointer_move(x, y, now));
            }
        })?;
    }

    for &anchor in page.fragment_links() {
        let s = Rc::clone(shell);
        listen_on(page, anchor, "click", false, move |event| {
            if s.with_page(|page| page.anchor_click(anchor))
                .is_some_and(|click| click.prevent_default)
            {
                event.prevent_default();
            }
        })?;
    }

    if let Some(menu) = page.menu() {
        let s = Rc::clone(shell);
        listen_on(page, menu.toggle_element(), "click", false, move |event| {
            event.stop_propagation();
            s.with_page(|page| page.toggle_click());
        })?;

        for &link in page.menu_links() {
            let s = Rc::clone(shell);
            listen_on(page, link, "click", false, move |_| {
                dispatch(&s, |page, _| page.menu_link_click());
            })?;
        }

        let s = Rc::clone(shell);
        listen(doc, "click", false, move |event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            s.with_page(|page| {
                let target = target.map(|el| page.dom().handle(el));
                page.document_click(target);
            });
        })?;

        let s = Rc::clone(shell);
        listen(doc, "keydown", false, move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) {
                s.with_page(|page| page.key_down(&key));
            }
        })?;

        let panel = menu.panel_element();
        let s = Rc::clone(shell);
        listen_on(page, panel, "touchstart", true, move |event| {
            if let Some(touch) = first_touch(&event) {
                s.with_page(|page| page.menu_touch_start(f64::from(touch.client_x())));
            }
        })?;
        let s = Rc::clone(shell);
        listen_on(page, panel, "touchmove", true, move |event| {
            if let Some(touch) = first_touch(&event) {
                s.with_page(|page| page.menu_touch_move(f64::from(touch.client_x())));
            }
        })?;
        let s = Rc::clone(shell);
        listen_on(page, panel, "touchend", true, move |_| {
            s.with_page(|page| page.menu_touch_end());
        })?;
    }

    for image in page.lazy().elements() {
        let s = Rc::clone(shell);
        listen_on(page, image, "load", true, move |_| {
            s.with_page(|page| page.image_loaded(image));
        })?;
        let s = Rc::clone(shell);
        listen_on(page, image, "error", true, move |_| {
            s.with_page(|page| page.image_failed(image));
        })?;
    }

    for el in page.feedback().hover_targets() {
        let s = Rc::clone(shell);
        listen_on(page, el, "mouseenter", true, move |_| {
            s.with_page(|page| page.pointer_enter(el));
        })?;
        let s = Rc::clone(shell);
        listen_on(page, el, "mouseleave", true, move |_| {
            s.with_page(|page| page.pointer_leave(el));
        })?;
    }

    for el in page.feedback().touch_targets() {
        let s = Rc::clone(shell);
        listen_on(page, el, "touchstart", true, move |_| {
            s.with_page(|page| page.touch_start(el));
        })?;
        let s = Rc::clone(shell);
        listen_on(page, el, "touchend", true, move |_| {
            s.with_page(|page| page.touch_end(el));
        })?;
    }

    if let Some(strip) = page.feedback().drag_strip() {
        let s = Rc::clone(shell);
        listen_on(page, strip, "touchstart", true, move |event| {
            if let Some(touch) = first_touch(&event) {
                s.with_page(|page| page.drag_start(f64::from(touch.page_x())));
            }
        })?;
        let s = Rc::clone(shell);
        listen_on(page, strip, "touchmove", false, move |event| {
            let Some(touch) = first_touch(&event) else {
                return;
            };
            if s.with_page(|page| page.drag_move(f64::from(touch.page_x())))
                .unwrap_or(false)
            {
                event.prevent_default();
            }
        })?;
        let s = Rc::clone(shell);
        listen_on(page, strip, "touchend", true, move |_| {
            s.with_page(|page| page.drag_end());
        })?;
    }

    if page.is_mobile() {
        let s = Rc::clone(shell);
        listen(doc, "touchstart", true, move |event| {
            if let Some(touch) = first_touch(&event) {
                s.with_page(|page| page.pull_touch_start(f64::from(touch.client_y())));
            }
        })?;
        let s = Rc::clone(shell);
        listen(doc, "touchmove", false, move |event| {
            let Some(touch) = first_touch(&event) else {
                return;
            };
            if s.with_page(|page| page.pull_touch_move(f64::from(touch.client_y())))
                .unwrap_or(false)
            {
                event.prevent_default();
            }
        })?;
    }

    Ok(())
}

// =========================================================================
// Entry points
// =========================================================================

/// Start with the page's embedded config (or the stock defaults).
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or(ShellError::MissingWindow)?;
    let document = window.document().ok_or(ShellError::MissingDocument)?;
    init_logging(&document);
    let config = page_config(&document);
    boot(window, document, config)?;
    Ok(())
}

/// Start with a config object serialized as JSON.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or(ShellError::MissingWindow)?;
    let document = window.document().ok_or(ShellError::MissingDocument)?;
    init_logging(&document);
    let config = MotionConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
    boot(window, document, config)?;
    Ok(())
}
