//! Motion configuration.
//!
//! Every class-name hook, threshold, delay and easing the controllers use is
//! configurable, so the same module can serve pages whose templates name
//! things differently. Configuration is layered: stock defaults are
//! overridden by one or more user files, applied in order.
//!
//! ## Where Config Comes From
//!
//! In the browser, the page embeds TOML in one or more script tags, applied
//! in document order:
//!
//! ```html
//! <script type="application/toml" data-motion-config>
//! [menu]
//! close_delay_ms = 250
//! </script>
//! ```
//!
//! JavaScript callers can instead pass the same shape as JSON to
//! `startWithConfig`. On the command line, `sanat-motion check a.toml b.toml`
//! layers files the same way the page does.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [navbar]
//! threshold_px = 100.0      # "scrolled" once the page is strictly past this
//!
//! [reveal]
//! threshold = 0.1           # Visible fraction that counts as "in view"
//! bottom_margin_px = 50.0   # Trigger this far after the element enters
//!
//! [lazy]
//! threshold = 0.1
//! margin_px = 50.0          # Start loading this far before entry
//! placeholder_text = "Image not available"
//!
//! [menu]
//! close_delay_ms = 300      # Let the close transition play after a link tap
//! swipe_threshold_px = 50.0
//!
//! [rate_limit]
//! mode = "frame"            # "frame" or "interval"
//! interval_ms = 16
//!
//! [beam]
//! mode = "static"           # "static", "pointer" or "scroll"
//! ```
//!
//! The complete list, with every selector and class name, is printed by
//! `sanat-motion gen-config`. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::geometry::{RootMargin, WatchOptions};
use crate::throttle::RateLimit;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete motion configuration.
///
/// All fields have defaults matching the stock gallery templates. User config
/// needs only the values it wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Markup hooks the controllers look for.
    pub selectors: SelectorConfig,
    /// Class names the controllers toggle.
    pub classes: ClassConfig,
    pub navbar: NavbarConfig,
    pub reveal: RevealConfig,
    pub lazy: LazyConfig,
    pub menu: MenuConfig,
    /// Rate limiting for scroll, resize and pointer events.
    pub rate_limit: RateLimitConfig,
    pub breakpoints: BreakpointConfig,
    pub parallax: ParallaxConfig,
    /// Decorative light beam behavior.
    pub beam: BeamConfig,
    /// Hover, press and drag feedback.
    pub feedback: FeedbackConfig,
}

impl MotionConfig {
    /// Parse a single TOML document on top of stock defaults and validate it.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Value = toml::from_str(source)?;
        resolve_config(stock_defaults_value(), [overlay])
    }

    /// Parse a (possibly sparse) JSON object and validate it.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: MotionConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("reveal.threshold", self.reveal.threshold),
            ("lazy.threshold", self.lazy.threshold),
            ("beam.opacity", self.beam.opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} must be 0.0-1.0")));
            }
        }
        for (name, value) in [
            ("navbar.threshold_px", self.navbar.threshold_px),
            ("reveal.bottom_margin_px", self.reveal.bottom_margin_px),
            ("reveal.card_offset_px", self.reveal.card_offset_px),
            ("lazy.margin_px", self.lazy.margin_px),
            ("menu.swipe_threshold_px", self.menu.swipe_threshold_px),
            ("feedback.drag_speed", self.feedback.drag_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if self.rate_limit.mode == RateLimitMode::Interval && self.rate_limit.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.interval_ms must be positive in interval mode".into(),
            ));
        }
        if self.breakpoints.small_px >= self.breakpoints.mobile_px {
            return Err(ConfigError::Validation(
                "breakpoints.small_px must be below breakpoints.mobile_px".into(),
            ));
        }
        if let Some(name) = self.selectors.first_empty() {
            return Err(ConfigError::Validation(format!(
                "selectors.{name} must not be empty"
            )));
        }
        Ok(())
    }

    pub fn rate_limit(&self) -> RateLimit {
        match self.rate_limit.mode {
            RateLimitMode::Frame => RateLimit::Frame,
            RateLimitMode::Interval => {
                RateLimit::Interval(Duration::from_millis(self.rate_limit.interval_ms))
            }
        }
    }

    pub fn reveal_watch(&self) -> WatchOptions {
        WatchOptions {
            threshold: self.reveal.threshold,
            margin: RootMargin::bottom_inset(self.reveal.bottom_margin_px),
        }
    }

    pub fn lazy_watch(&self) -> WatchOptions {
        WatchOptions {
            threshold: self.lazy.threshold,
            margin: RootMargin::vertical(self.lazy.margin_px),
        }
    }
}

/// CSS selectors for the markup hooks produced by the page template.
///
/// Any hook may be absent from a given page; the matching feature is then
/// skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    /// In-page anchors that scroll smoothly instead of jumping.
    pub fragment_links: String,
    pub navbar: String,
    /// Hamburger button.
    pub menu_toggle: String,
    /// Overlay navigation panel.
    pub menu_panel: String,
    /// Links inside the panel that close it, relative to the panel.
    pub menu_links: String,
    /// Elements that animate in when scrolled into view.
    pub reveal: Vec<String>,
    /// Reveal targets that also fade and slide up via inline styles.
    pub cards: Vec<String>,
    /// Artwork image inside a card, scaled on hover.
    pub card_image: String,
    /// Buttons that lift on hover.
    pub buttons: String,
    /// Artwork images loaded lazily.
    pub lazy_images: String,
    /// Wrapper around a lazy image that shows the loading skeleton.
    pub image_container: String,
    /// Decorative artworks moved by scroll parallax.
    pub floating_artworks: String,
    /// Decorative elements whose CSS animation is disabled on mobile.
    pub heavy_animations: Vec<String>,
    pub light_beam: String,
    pub light_particles: String,
    /// Elements that shrink slightly while touched.
    pub touch_cards: Vec<String>,
    /// Buttons that shrink more noticeably while touched.
    pub touch_buttons: Vec<String>,
    /// Horizontal strips that support touch drag-scrolling on mobile.
    pub drag_scroll: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            fragment_links: r##"a[href^="#"]"##.to_string(),
            navbar: ".navbar".to_string(),
            menu_toggle: ".mobile-menu-toggle".to_string(),
            menu_panel: ".nav-menu".to_string(),
            menu_links: "a".to_string(),
            reveal: strings(&[
                ".gallery-item",
                ".collection-item",
                ".section-title",
                ".section-description",
            ]),
            cards: strings(&[".gallery-item", ".collection-item"]),
            card_image: ".image-placeholder, .artwork-img".to_string(),
            buttons: ".btn-primary, .btn-secondary".to_string(),
            lazy_images: ".artwork-img".to_string(),
            image_container: ".artwork-image".to_string(),
            floating_artworks: ".floating-artworks .artwork-item".to_string(),
            heavy_animations: strings(&[
                ".floating-artworks .artwork-item",
                ".scattered-artworks .artwork-item",
            ]),
            light_beam: ".circular-light-beam".to_string(),
            light_particles: ".light-particle".to_string(),
            touch_cards: strings(&[
                ".gallery-item",
                ".oil-painting-item",
                ".studio-photo-item",
            ]),
            touch_buttons: strings(&[".btn-primary", ".btn-secondary", ".view-artwork"]),
            drag_scroll: ".oil-paintings-grid".to_string(),
        }
    }
}

impl SelectorConfig {
    fn first_empty(&self) -> Option<&'static str> {
        let singles = [
            ("fragment_links", &self.fragment_links),
            ("navbar", &self.navbar),
            ("menu_toggle", &self.menu_toggle),
            ("menu_panel", &self.menu_panel),
            ("menu_links", &self.menu_links),
            ("card_image", &self.card_image),
            ("buttons", &self.buttons),
            ("lazy_images", &self.lazy_images),
            ("image_container", &self.image_container),
            ("floating_artworks", &self.floating_artworks),
            ("light_beam", &self.light_beam),
            ("light_particles", &self.light_particles),
            ("drag_scroll", &self.drag_scroll),
        ];
        if let Some((name, _)) = singles.iter().find(|(_, s)| s.trim().is_empty()) {
            return Some(*name);
        }
        let lists = [
            ("reveal", &self.reveal),
            ("cards", &self.cards),
            ("heavy_animations", &self.heavy_animations),
            ("touch_cards", &self.touch_cards),
            ("touch_buttons", &self.touch_buttons),
        ];
        lists
            .iter()
            .find(|(_, list)| list.iter().any(|s| s.trim().is_empty()))
            .map(|(name, _)| *name)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Class names toggled on elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassConfig {
    pub revealed: String,
    pub scrolled: String,
    /// Applied to both the toggle and the panel while the menu is open.
    pub menu_open: String,
    pub loaded: String,
    pub loading: String,
    pub placeholder: String,
    pub scroll_indicator: String,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            revealed: "animate-in".to_string(),
            scrolled: "scrolled".to_string(),
            menu_open: "active".to_string(),
            loaded: "loaded".to_string(),
            loading: "loading".to_string(),
            placeholder: "image-placeholder".to_string(),
            scroll_indicator: "scroll-indicator".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarConfig {
    /// Scroll offset the page must strictly exceed to count as scrolled.
    pub threshold_px: f64,
    /// Background of the scrolled navbar (CSS value).
    pub scrolled_background: String,
    pub scrolled_shadow: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            threshold_px: 100.0,
            scrolled_background: "rgba(255, 255, 255, 0.98)".to_string(),
            scrolled_shadow: "0 2px 20px rgba(0, 0, 0, 0.1)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub threshold: f64,
    pub bottom_margin_px: f64,
    /// How far cards start below their resting position.
    pub card_offset_px: f64,
    pub card_transition: String,
    /// Animation applied by the revealed class.
    pub animation: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 50.0,
            card_offset_px: 30.0,
            card_transition: "opacity 0.6s ease, transform 0.6s ease".to_string(),
            animation: "fadeInUp 0.8s ease forwards".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyConfig {
    pub threshold: f64,
    pub margin_px: f64,
    pub placeholder_text: String,
    /// Inline style of the placeholder block.
    pub placeholder_css: String,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            margin_px: 50.0,
            placeholder_text: "Image not available".to_string(),
            placeholder_css: "width: 100%; height: 100%; \
                background: linear-gradient(135deg, #f0f0f0, #e0e0e0); \
                display: flex; align-items: center; justify-content: center; \
                color: #999; font-size: 0.9rem;"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    pub close_delay_ms: u64,
    /// Leftward swipe distance on the panel that closes it.
    pub swipe_threshold_px: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 300,
            swipe_threshold_px: 50.0,
        }
    }
}

impl MenuConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitMode {
    Frame,
    Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    pub mode: RateLimitMode,
    /// Minimum spacing between runs in `interval` mode.
    pub interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            mode: RateLimitMode::Frame,
            interval_ms: 16,
        }
    }
}

/// Viewport widths (CSS px, inclusive) for the mobile layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointConfig {
    pub mobile_px: f64,
    pub small_px: f64,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            mobile_px: 768.0,
            small_px: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    /// Scroll speed factor of the first floating artwork.
    pub base_speed: f64,
    /// Added per subsequent artwork, so later ones drift faster.
    pub speed_step: f64,
    /// Degrees of rotation per scrolled pixel.
    pub rotation_factor: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.3,
            speed_step: 0.05,
            rotation_factor: 0.01,
        }
    }
}

/// How the light beam reacts to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamMode {
    /// Placed by breakpoint, never moves.
    Static,
    /// Drifts toward the pointer.
    Pointer,
    /// Widens and softens as the page scrolls.
    Scroll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeamConfig {
    pub mode: BeamMode,
    pub opacity: f64,
    /// Maximum drift from the resting position in `pointer` mode.
    pub pointer_travel_px: f64,
    /// Scale reached after one viewport height of scrolling in `scroll` mode.
    pub scroll_max_scale: f64,
    pub scroll_max_blur_px: f64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            mode: BeamMode::Static,
            opacity: 0.8,
            pointer_travel_px: 30.0,
            scroll_max_scale: 1.4,
            scroll_max_blur_px: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedbackConfig {
    /// Scale of a card's artwork while hovered.
    pub hover_scale: f64,
    pub button_lift_px: f64,
    pub card_press_scale: f64,
    pub button_press_scale: f64,
    pub press_transition: String,
    /// Strip scroll distance per pixel of finger travel.
    pub drag_speed: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            hover_scale: 1.05,
            button_lift_px: 2.0,
            card_press_scale: 0.98,
            button_press_scale: 0.95,
            press_transition: "transform 0.1s ease".to_string(),
            drag_speed: 2.0,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MotionConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value
/// outright (so a selector list in an overlay replaces, not extends, the
/// stock list).
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Fold overlays onto `base` in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<MotionConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: MotionConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load and layer config files, later files overriding earlier ones.
///
/// With no paths this is the stock configuration.
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<MotionConfig, ConfigError> {
    let mut overlays = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(path.as_ref())?;
        overlays.push(toml::from_str::<toml::Value>(&content)?);
    }
    resolve_config(stock_defaults_value(), overlays)
}

/// Returns a fully-commented stock `motion.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sanat Motion Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Embed in a page with one or more
#   <script type="application/toml" data-motion-config> ... </script>
# tags. Later tags override earlier ones, key by key.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Markup hooks (CSS selectors). Any hook missing from a page disables the
# feature that uses it on that page.
# ---------------------------------------------------------------------------
[selectors]
fragment_links = 'a[href^="#"]'
navbar = ".navbar"
menu_toggle = ".mobile-menu-toggle"
menu_panel = ".nav-menu"
# Relative to the menu panel.
menu_links = "a"
reveal = [".gallery-item", ".collection-item", ".section-title", ".section-description"]
# Reveal targets that also fade in and slide up.
cards = [".gallery-item", ".collection-item"]
card_image = ".image-placeholder, .artwork-img"
buttons = ".btn-primary, .btn-secondary"
lazy_images = ".artwork-img"
image_container = ".artwork-image"
floating_artworks = ".floating-artworks .artwork-item"
# CSS animations disabled on mobile.
heavy_animations = [".floating-artworks .artwork-item", ".scattered-artworks .artwork-item"]
light_beam = ".circular-light-beam"
light_particles = ".light-particle"
touch_cards = [".gallery-item", ".oil-painting-item", ".studio-photo-item"]
touch_buttons = [".btn-primary", ".btn-secondary", ".view-artwork"]
drag_scroll = ".oil-paintings-grid"

# ---------------------------------------------------------------------------
# Class names toggled by the script
# ---------------------------------------------------------------------------
[classes]
revealed = "animate-in"
scrolled = "scrolled"
# Applied to both the menu toggle and the panel while open.
menu_open = "active"
loaded = "loaded"
loading = "loading"
placeholder = "image-placeholder"
scroll_indicator = "scroll-indicator"

# ---------------------------------------------------------------------------
# Navbar
# ---------------------------------------------------------------------------
[navbar]
# The navbar is "scrolled" once the page is strictly past this offset.
threshold_px = 100.0
scrolled_background = "rgba(255, 255, 255, 0.98)"
scrolled_shadow = "0 2px 20px rgba(0, 0, 0, 0.1)"

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
[reveal]
# Fraction of an element that must be visible (0.0 - 1.0).
threshold = 0.1
# Trigger this far after the element's top crosses the bottom of the viewport.
bottom_margin_px = 50.0
card_offset_px = 30.0
card_transition = "opacity 0.6s ease, transform 0.6s ease"
animation = "fadeInUp 0.8s ease forwards"

# ---------------------------------------------------------------------------
# Lazy images
# ---------------------------------------------------------------------------
[lazy]
threshold = 0.1
# Start loading this far before the image scrolls into view.
margin_px = 50.0
placeholder_text = "Image not available"
placeholder_css = "width: 100%; height: 100%; background: linear-gradient(135deg, #f0f0f0, #e0e0e0); display: flex; align-items: center; justify-content: center; color: #999; font-size: 0.9rem;"

# ---------------------------------------------------------------------------
# Mobile menu
# ---------------------------------------------------------------------------
[menu]
# Delay between tapping a menu link and closing, for the close transition.
close_delay_ms = 300
# Leftward swipe on the open panel that closes it.
swipe_threshold_px = 50.0

# ---------------------------------------------------------------------------
# Rate limiting of scroll, resize and pointer events
# ---------------------------------------------------------------------------
[rate_limit]
# "frame": at most once per animation frame.
# "interval": at most once per interval_ms, plus a trailing run.
mode = "frame"
interval_ms = 16

# ---------------------------------------------------------------------------
# Breakpoints (viewport width, inclusive)
# ---------------------------------------------------------------------------
[breakpoints]
mobile_px = 768.0
small_px = 480.0

# ---------------------------------------------------------------------------
# Floating artwork parallax
# ---------------------------------------------------------------------------
[parallax]
base_speed = 0.3
speed_step = 0.05
# Degrees per scrolled pixel.
rotation_factor = 0.01

# ---------------------------------------------------------------------------
# Light beam
# ---------------------------------------------------------------------------
[beam]
# "static": placed by breakpoint, never moves.
# "pointer": drifts toward the mouse pointer.
# "scroll": widens and softens while scrolling.
mode = "static"
opacity = 0.8
pointer_travel_px = 30.0
scroll_max_scale = 1.4
scroll_max_blur_px = 8.0

# ---------------------------------------------------------------------------
# Hover, touch and drag feedback
# ---------------------------------------------------------------------------
[feedback]
hover_scale = 1.05
button_lift_px = 2.0
card_press_scale = 0.98
button_press_scale = 0.95
press_transition = "transform 0.1s ease"
drag_speed = 2.0
"##
}

/// Generate the stylesheet injected once at startup.
///
/// Covers the states the script toggles by class (scrolled navbar, revealed
/// elements) and the transitions the beam relies on.
pub fn generate_stylesheet(config: &MotionConfig) -> String {
    format!(
        r#"{navbar}.{scrolled} {{
    background: {background};
    box-shadow: {shadow};
}}

.{revealed} {{
    animation: {animation};
}}

{beam} {{
    transition: opacity 0.3s ease, transform 0.3s ease, filter 0.3s ease;
}}

{particles} {{
    transition: transform 0.2s ease;
}}"#,
        navbar = config.selectors.navbar,
        scrolled = config.classes.scrolled,
        background = config.navbar.scrolled_background,
        shadow = config.navbar.scrolled_shadow,
        revealed = config.classes.revealed,
        animation = config.reveal.animation,
        beam = config.selectors.light_beam,
        particles = config.selectors.light_particles,
    )
}
