//! # Sanat Motion
//!
//! Client-side behavior for a static art-gallery site: smooth in-page
//! scrolling, reveal-on-scroll animations, the "scrolled" navbar, the mobile
//! hamburger menu, lazy artwork images, and decorative parallax and
//! light-beam motion. Compiled to WebAssembly and loaded by the pages a
//! gallery site generator emits.
//!
//! # Architecture: Host-Independent Core, Thin Browser Shell
//!
//! ```text
//!   browser events ──▶ web (wasm32 only) ──▶ Page ──▶ controllers ──▶ Dom
//!        ▲                 │                   │                       │
//!        └── rAF / timers ◀┘◀── Schedule ──────┘        web-sys  or  MemoryDom
//! ```
//!
//! Every controller is a plain Rust type that reacts to host events and
//! writes through the [`dom::Dom`] trait. The core never calls a browser API,
//! never reads a clock, and never starts a timer: time arrives as a
//! `Duration`, and follow-up work is returned to the host as a
//! [`page::Schedule`]. The same code therefore runs under `cargo test`
//! against an in-memory tree and in the browser against `web-sys`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | The single context object: owns every controller and routes host events |
//! | [`navigation`] | Smooth scrolling for same-page fragment anchors |
//! | [`reveal`] | One-shot reveal animations as elements enter the viewport |
//! | [`navbar`] | Navbar "scrolled" class past a fixed offset |
//! | [`menu`] | Mobile hamburger menu state machine with body scroll lock |
//! | [`lazy`] | Deferred artwork images with a one-time placeholder on failure |
//! | [`motion`] | Floating-artwork parallax and light-beam placement |
//! | [`feedback`] | Hover, press and drag feedback plus mobile-only tweaks |
//! | [`throttle`] | The one rate limiter for scroll, resize and pointer floods |
//! | [`geometry`] | Rectangles and intersection math mirroring `IntersectionObserver` |
//! | [`dom`] | The host seam: element handles and the `Dom` trait |
//! | [`config`] | Layered `motion.toml` loading, validation and stylesheet generation |
//! | [`logging`] | `tracing` subscribers for the CLI and the browser console |
//! | [`output`] | CLI output formatting for `check` |
//! | `web` | `wasm32` only: `Dom` over `web-sys`, listeners, `start` entry points |
//!
//! # Design Decisions
//!
//! ## One Context Object
//!
//! All per-page state (menu state, throttle gates, reveal and image
//! bookkeeping) lives in fields of [`page::Page`]. There are no globals in
//! the core; the browser shell holds exactly one `Page` behind an
//! `Rc<RefCell<_>>`.
//!
//! ## Missing Markup Is Normal
//!
//! The page template decides which hooks a page carries. Every lookup of an
//! optional element returns `Option`, and a missing element turns its feature
//! into a no-op instead of an error.
//!
//! ## Observer First, Geometry as Fallback
//!
//! Visibility is detected with the browser's `IntersectionObserver` when
//! available. Without it, [`geometry`] evaluates the same thresholds and
//! margins against element rectangles on every rate-limited scroll, so both
//! paths reveal and load the same elements.
//!
//! ## Terminal States
//!
//! Revealed elements stay revealed; loaded and failed images stay that way.
//! Late or duplicate events for a settled element are ignored, which makes
//! every handler safe to call any number of times.

pub mod config;
pub mod dom;
pub mod feedback;
pub mod geometry;
pub mod lazy;
pub mod logging;
pub mod menu;
pub mod motion;
pub mod navbar;
pub mod navigation;
pub mod output;
pub mod page;
pub mod reveal;
pub mod throttle;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
