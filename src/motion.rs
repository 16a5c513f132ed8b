//! Decorative motion: floating-artwork parallax and the light beam.
//!
//! Purely cosmetic. Every transform is a pure function of scroll offset,
//! pointer position or viewport size; [`DecorativeMotion`] only writes the
//! results as inline styles. Nothing here is read back by other controllers.
//!
//! The beam has one behavior per page, chosen by [`BeamMode`]. `Static` is the
//! stock behavior: the beam is placed by breakpoint and never moves. `Pointer`
//! and `Scroll` are opt-in.

use tracing::debug;

use crate::config::{BeamConfig, BeamMode, BreakpointConfig, MotionConfig, ParallaxConfig};
use crate::dom::{Dom, ElementId};
use crate::geometry::Viewport;

/// `transform` for the `index`-th floating artwork at `scroll`.
pub fn parallax_transform(scroll: f64, index: usize, parallax: &ParallaxConfig) -> String {
    let speed = parallax.base_speed + index as f64 * parallax.speed_step;
    let rotation = scroll * parallax.rotation_factor;
    format!("translateY({}px) rotate({}deg)", scroll * speed, rotation)
}

/// Resting position of the beam's center, as CSS percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamPlacement {
    pub left_pct: f64,
    pub top_pct: f64,
}

impl BeamPlacement {
    /// Beside the hero title on desktop, above it on phones.
    pub fn for_width(width: f64, breakpoints: &BreakpointConfig) -> Self {
        if width <= breakpoints.small_px {
            Self {
                left_pct: 50.0,
                top_pct: 20.0,
            }
        } else if width <= breakpoints.mobile_px {
            Self {
                left_pct: 50.0,
                top_pct: 25.0,
            }
        } else {
            Self {
                left_pct: 35.0,
                top_pct: 50.0,
            }
        }
    }
}

/// `transform` for the beam in pointer mode: the centering translate plus a
/// drift toward the pointer, at most `travel` px on each axis.
pub fn pointer_beam_transform(x: f64, y: f64, viewport: Viewport, travel: f64) -> String {
    let dx = drift(x, viewport.width) * travel;
    let dy = drift(y, viewport.height) * travel;
    format!("translate(calc(-50% + {dx:.1}px), calc(-50% + {dy:.1}px))")
}

/// Pointer position relative to the center, in `-1.0..=1.0`.
fn drift(position: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    ((position - extent / 2.0) / (extent / 2.0)).clamp(-1.0, 1.0)
}

/// Scale and blur of the beam in scroll mode.
///
/// Both grow linearly over the first viewport height of scrolling, then hold.
pub fn scroll_beam_style(scroll: f64, viewport: Viewport, beam: &BeamConfig) -> (String, String) {
    let progress = if viewport.height > 0.0 {
        (scroll / viewport.height).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scale = 1.0 + (beam.scroll_max_scale - 1.0) * progress;
    let blur = beam.scroll_max_blur_px * progress;
    (
        format!("translate(-50%, -50%) scale({scale:.3})"),
        format!("blur({blur:.1}px)"),
    )
}

#[derive(Debug)]
pub struct DecorativeMotion {
    floating: Vec<ElementId>,
    beam: Option<ElementId>,
    particles: Vec<ElementId>,
    parallax: ParallaxConfig,
    beam_config: BeamConfig,
    breakpoints: BreakpointConfig,
}

impl DecorativeMotion {
    pub fn init<D: Dom + ?Sized>(dom: &mut D, config: &MotionConfig, viewport: Viewport) -> Self {
        let mut motion = Self {
            floating: dom.query_all(&config.selectors.floating_artworks),
            beam: dom.query_one(&config.selectors.light_beam),
            particles: dom.query_all(&config.selectors.light_particles),
            parallax: config.parallax.clone(),
            beam_config: config.beam.clone(),
            breakpoints: config.breakpoints.clone(),
        };

        if let Some(beam) = motion.beam {
            dom.set_style(beam, "transform", "translate(-50%, -50%)");
            dom.set_style(beam, "opacity", &motion.beam_config.opacity.to_string());
            dom.set_style(beam, "visibility", "visible");
        }
        for particle in &motion.particles {
            dom.set_style(*particle, "transform", "translate(0, 0)");
            dom.set_style(*particle, "opacity", "1");
        }
        motion.resize(dom, viewport);
        debug!(
            floating = motion.floating.len(),
            beam = motion.beam.is_some(),
            mode = ?motion.beam_config.mode,
            "decorative motion ready"
        );
        motion
    }

    pub fn beam_mode(&self) -> BeamMode {
        self.beam_config.mode
    }

    /// Whether scroll events need to reach [`DecorativeMotion::scroll`].
    pub fn wants_scroll(&self) -> bool {
        !self.floating.is_empty() || (self.beam.is_some() && self.beam_config.mode == BeamMode::Scroll)
    }

    /// Whether pointer moves need to reach [`DecorativeMotion::pointer`].
    pub fn wants_pointer(&self) -> bool {
        self.beam.is_some() && self.beam_config.mode == BeamMode::Pointer
    }

    pub fn scroll<D: Dom + ?Sized>(&self, dom: &mut D, scroll: f64, viewport: Viewport) {
        for (index, artwork) in self.floating.iter().enumerate() {
            dom.set_style(
                *artwork,
                "transform",
                &parallax_transform(scroll, index, &self.parallax),
            );
        }
        if let (Some(beam), BeamMode::Scroll) = (self.beam, self.beam_config.mode) {
            let (transform, filter) = scroll_beam_style(scroll, viewport, &self.beam_config);
            dom.set_style(beam, "transform", &transform);
            dom.set_style(beam, "filter", &filter);
        }
    }

    pub fn pointer<D: Dom + ?Sized>(&self, dom: &mut D, x: f64, y: f64, viewport: Viewport) {
        if let (Some(beam), BeamMode::Pointer) = (self.beam, self.beam_config.mode) {
            let transform =
                pointer_beam_transform(x, y, viewport, self.beam_config.pointer_travel_px);
            dom.set_style(beam, "transform", &transform);
        }
    }

    /// Re-place the beam for the current breakpoint.
    pub fn resize<D: Dom + ?Sized>(&self, dom: &mut D, viewport: Viewport) {
        let Some(beam) = self.beam else {
            return;
        };
        let placement = BeamPlacement::for_width(viewport.width, &self.breakpoints);
        dom.set_style(beam, "left", &format!("{}%", placement.left_pct));
        dom.set_style(beam, "top", &format!("{}%", placement.top_pct));
    }
}
