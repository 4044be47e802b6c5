//! Twinkling starfield behind the hero.
//!
//! A fixed number of stars sit at random positions on a canvas sized to its
//! container. Every frame each star's opacity moves by its own speed and
//! bounces between a floor and full opacity. Resizing the canvas throws the
//! stars away and scatters a fresh set.
//!
//! Nothing animates when the visitor asks for reduced motion.

use crate::config::StarfieldConfig;
use rand::Rng;
use serde::Serialize;

/// Lowest opacity a star fades to before brightening again.
pub const ALPHA_FLOOR: f64 = 0.15;
pub const RADIUS_MIN: f64 = 0.7;
pub const RADIUS_SPAN: f64 = 1.4;
pub const ALPHA_MIN: f64 = 0.25;
pub const SPEED_MIN: f64 = 0.05;
pub const SPEED_SPAN: f64 = 0.22;

/// Optional browser capabilities the runtime may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `ResizeObserver` is available, so the canvas can follow its
    /// container.
    pub resize_observer: bool,
    pub prefers_reduced_motion: bool,
}

/// Which events re-size the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSources {
    pub container: bool,
    pub window: bool,
}

impl Capabilities {
    pub fn resize_sources(&self) -> ResizeSources {
        ResizeSources {
            container: self.resize_observer,
            window: true,
        }
    }
}

/// Settings the page runtime reads from the canvas's `data-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarfieldRuntime {
    pub count: usize,
    pub max_dpr: f64,
    pub alpha_floor: f64,
    pub alpha_min: f64,
    pub radius_min: f64,
    pub radius_span: f64,
    pub speed_min: f64,
    pub speed_span: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
    /// Signed opacity change per frame.
    pub speed: f64,
}

impl Star {
    fn random<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        let sign = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        Self {
            x: rng.gen_range(0.0..width.max(f64::MIN_POSITIVE)),
            y: rng.gen_range(0.0..height.max(f64::MIN_POSITIVE)),
            radius: RADIUS_MIN + rng.gen_range(0.0..RADIUS_SPAN),
            alpha: ALPHA_MIN + rng.gen_range(0.0..1.0 - ALPHA_MIN),
            speed: (rng.gen_range(0.0..SPEED_SPAN) + SPEED_MIN) * sign,
        }
    }

    /// Advance one frame, reflecting at the opacity bounds.
    pub fn step(&mut self) {
        self.alpha += self.speed;
        if self.alpha > 1.0 {
            self.alpha = 1.0;
            self.speed = -self.speed;
        }
        if self.alpha < ALPHA_FLOOR {
            self.alpha = ALPHA_FLOOR;
            self.speed = -self.speed;
        }
    }

    /// Canvas fill style for this star.
    pub fn fill_style(&self) -> String {
        format!("rgba(255, 255, 255, {:.3})", self.alpha)
    }
}

/// Backing-store size of the canvas after a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    settings: StarfieldConfig,
    stars: Vec<Star>,
    size: Option<CanvasSize>,
}

impl Starfield {
    pub fn new(settings: StarfieldConfig) -> Self {
        Self {
            settings,
            stars: Vec::new(),
            size: None,
        }
    }

    /// Whether the animation should run at all.
    pub fn is_enabled(caps: Capabilities) -> bool {
        !caps.prefers_reduced_motion
    }

    pub fn runtime_settings(&self) -> StarfieldRuntime {
        StarfieldRuntime {
            count: self.settings.count,
            max_dpr: self.settings.max_dpr,
            alpha_floor: ALPHA_FLOOR,
            alpha_min: ALPHA_MIN,
            radius_min: RADIUS_MIN,
            radius_span: RADIUS_SPAN,
            speed_min: SPEED_MIN,
            speed_span: SPEED_SPAN,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn size(&self) -> Option<CanvasSize> {
        self.size
    }

    /// Size the canvas to its container and scatter a fresh set of stars.
    ///
    /// The device pixel ratio is capped; a missing or nonsensical ratio
    /// counts as 1.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        rng: &mut R,
    ) -> CanvasSize {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.settings.max_dpr)
        } else {
            1.0
        };
        let css_width = css_width.max(0.0);
        let css_height = css_height.max(0.0);
        let size = CanvasSize {
            css_width,
            css_height,
            dpr,
            pixel_width: (css_width * dpr).floor() as u32,
            pixel_height: (css_height * dpr).floor() as u32,
        };

        self.stars = (0..self.settings.count)
            .map(|_| Star::random(css_width, css_height, rng))
            .collect();
        self.size = Some(size);
        size
    }

    /// One animation frame.
    pub fn tick(&mut self) {
        for star in &mut self.stars {
            star.step();
        }
    }
}
