//! Lightbox viewer state machine.
//!
//! The lightbox is either closed or open on one gallery image. While open it
//! handles navigation (buttons, arrow keys, horizontal swipes), zoom around a
//! pointer pivot, panning while zoomed, and a focus trap over its own
//! controls. Closing restores focus to whatever opened it.
//!
//! ```text
//!            open(i)                 next / prev / swipe
//!   closed ─────────▶ open(i) ◀──────────────────────────┐
//!      ▲                 │  └───────────────────────────┘
//!      └──── close ──────┘          zoom / pan (same image)
//! ```
//!
//! All geometry is in CSS pixels relative to the stage centre. The page
//! runtime feeds DOM events in and applies [`Lightbox::transform_css`]; its
//! settings come from [`Lightbox::runtime_settings`].

use crate::config::{ViewerConfig, ZOOM_CEILING, ZOOM_FLOOR};
use serde::Serialize;

/// Opaque handle to the element that had focus before the lightbox opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget(pub String);

/// Size of the stage the image is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
}

/// A point relative to the stage centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything the lightbox remembers. Reset to defaults on close.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub is_open: bool,
    pub current_index: usize,
    pub zoom: f64,
    pub pan: Point,
    pub last_focused: Option<FocusTarget>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            is_open: false,
            current_index: 0,
            zoom: 1.0,
            pan: Point::ORIGIN,
            last_focused: None,
        }
    }
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }
}

/// What the runtime should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Ignored,
    /// Load these indices (current first, then neighbours to prefetch).
    Show(Vec<usize>),
    /// Lightbox closed; refocus this element.
    Closed(Option<FocusTarget>),
    /// Move focus within the modal's controls.
    TrapFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left: show the next image.
    Left,
    /// Finger moved right: show the previous image.
    Right,
}

/// Wrap any signed index into `0..count`. `count` must be non-zero.
pub fn wrap_index(index: i64, count: usize) -> usize {
    index.rem_euclid(count as i64) as usize
}

/// Index of the control that should receive focus after Tab / Shift+Tab.
///
/// `current` is the focused control's position among `control_count`
/// controls, or `None` when focus is somewhere outside them.
pub fn focus_trap(control_count: usize, current: Option<usize>, shift: bool) -> Option<usize> {
    if control_count == 0 {
        return None;
    }
    let last = control_count - 1;
    Some(match (current, shift) {
        (None, false) => 0,
        (None, true) => last,
        (Some(i), false) if i >= last => 0,
        (Some(i), false) => i + 1,
        (Some(0), true) => last,
        (Some(i), true) => (i - 1).min(last),
    })
}

/// Tracks a single pointer gesture and classifies it as a swipe or not.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: f64,
    ratio: f64,
    start: Option<Point>,
}

impl SwipeTracker {
    pub fn new(settings: &ViewerConfig) -> Self {
        Self {
            threshold: settings.swipe_threshold,
            ratio: settings.swipe_ratio,
            start: None,
        }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some(Point::new(x, y));
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Finish the gesture. A swipe must travel at least the threshold
    /// horizontally and dominate vertical travel by the configured ratio.
    pub fn end(&mut self, x: f64, y: f64) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        let dx = x - start.x;
        let dy = y - start.y;
        if dx.abs() < self.threshold || dx.abs() <= self.ratio * dy.abs() {
            return None;
        }
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

/// Settings the page runtime reads from the lightbox's `data-settings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerRuntime {
    pub count: usize,
    pub swipe_threshold: f64,
    pub swipe_ratio: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
}

/// The lightbox controller. Owns its [`ViewerState`] exclusively.
#[derive(Debug, Clone)]
pub struct Lightbox {
    count: usize,
    settings: ViewerConfig,
    state: ViewerState,
}

impl Lightbox {
    /// Zoom bounds are forced into `[1, 4]` whatever `settings` says.
    pub fn new(count: usize, settings: ViewerConfig) -> Self {
        let zoom_max = if settings.zoom_max.is_finite() && settings.zoom_max > ZOOM_FLOOR {
            settings.zoom_max.min(ZOOM_CEILING)
        } else {
            ZOOM_CEILING
        };
        Self {
            count,
            settings: ViewerConfig {
                zoom_min: ZOOM_FLOOR,
                zoom_max,
                ..settings
            },
            state: ViewerState::default(),
        }
    }

    pub fn runtime_settings(&self) -> ViewerRuntime {
        ViewerRuntime {
            count: self.count,
            swipe_threshold: self.settings.swipe_threshold,
            swipe_ratio: self.settings.swipe_ratio,
            zoom_min: self.settings.zoom_min,
            zoom_max: self.settings.zoom_max,
            zoom_step: self.settings.zoom_step,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Current image and its wrap-around neighbours, without duplicates.
    fn load_set(&self) -> Vec<usize> {
        let i = self.state.current_index as i64;
        let mut set = vec![self.state.current_index];
        for neighbour in [wrap_index(i - 1, self.count), wrap_index(i + 1, self.count)] {
            if !set.contains(&neighbour) {
                set.push(neighbour);
            }
        }
        set
    }

    fn reset_view(&mut self) {
        self.state.zoom = self.settings.zoom_min;
        self.state.pan = Point::ORIGIN;
    }

    /// Open on `index`, remembering `focused` for restoration.
    ///
    /// Returns the indices to load, or an empty list for an empty gallery
    /// (which leaves the lightbox closed).
    pub fn open(&mut self, index: i64, focused: Option<FocusTarget>) -> Vec<usize> {
        if self.count == 0 {
            return Vec::new();
        }
        if !self.state.is_open {
            self.state.last_focused = focused;
        }
        self.state.is_open = true;
        self.show(index)
    }

    /// Jump to `index` (wrapped) and reset zoom and pan.
    pub fn show(&mut self, index: i64) -> Vec<usize> {
        if !self.state.is_open || self.count == 0 {
            return Vec::new();
        }
        self.state.current_index = wrap_index(index, self.count);
        self.reset_view();
        self.load_set()
    }

    pub fn next(&mut self) -> Vec<usize> {
        self.show(self.state.current_index as i64 + 1)
    }

    pub fn prev(&mut self) -> Vec<usize> {
        self.show(self.state.current_index as i64 - 1)
    }

    /// Close and reset. Returns the element to refocus.
    pub fn close(&mut self) -> Option<FocusTarget> {
        if !self.state.is_open {
            return None;
        }
        let focus = self.state.last_focused.take();
        self.state = ViewerState::default();
        focus
    }

    /// Document-level key handling while open.
    pub fn handle_key(&mut self, key: Key) -> KeyAction {
        if !self.state.is_open {
            return KeyAction::Ignored;
        }
        match key {
            Key::Escape => KeyAction::Closed(self.close()),
            Key::ArrowLeft => KeyAction::Show(self.prev()),
            Key::ArrowRight => KeyAction::Show(self.next()),
            Key::Tab => KeyAction::TrapFocus,
            Key::Other => KeyAction::Ignored,
        }
    }

    /// Apply a finished swipe. Ignored while zoomed, where drags pan instead.
    pub fn swipe(&mut self, direction: Option<SwipeDirection>) -> Vec<usize> {
        if self.is_zoomed() {
            return Vec::new();
        }
        match direction {
            Some(SwipeDirection::Left) => self.next(),
            Some(SwipeDirection::Right) => self.prev(),
            None => Vec::new(),
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.zoom > self.settings.zoom_min
    }

    /// Change zoom by whole wheel notches (positive zooms in).
    pub fn zoom_by(&mut self, steps: f64, pivot: Point, stage: Stage) {
        let target = self.state.zoom + steps * self.settings.zoom_step;
        self.set_zoom(target, pivot, stage);
    }

    /// Two-finger pinch: scale the zoom the gesture started at by how far the
    /// fingers have spread, around their midpoint.
    pub fn pinch(
        &mut self,
        start_zoom: f64,
        start_distance: f64,
        distance: f64,
        midpoint: Point,
        stage: Stage,
    ) {
        if start_distance <= 0.0 {
            return;
        }
        self.set_zoom(start_zoom * distance / start_distance, midpoint, stage);
    }

    /// Set the zoom scale, keeping the image point under `pivot` fixed.
    ///
    /// The scale is clamped to the configured bounds; reaching the lower
    /// bound snaps the pan back to the origin.
    pub fn set_zoom(&mut self, scale: f64, pivot: Point, stage: Stage) {
        if !self.state.is_open {
            return;
        }
        let min = self.settings.zoom_min;
        let max = self.settings.zoom_max;
        let next = if scale.is_nan() { min } else { scale.max(min).min(max) };
        if next <= min {
            self.reset_view();
            return;
        }
        let prev = self.state.zoom;
        let factor = next / prev;
        // Image point under the pivot stays under the pivot.
        let pan = Point::new(
            pivot.x - (pivot.x - self.state.pan.x) * factor,
            pivot.y - (pivot.y - self.state.pan.y) * factor,
        );
        self.state.zoom = next;
        self.state.pan = self.clamp_pan(pan, stage);
    }

    /// Pan by a pointer delta. Only moves while zoomed in.
    pub fn pan_by(&mut self, dx: f64, dy: f64, stage: Stage) {
        if !self.state.is_open || !self.is_zoomed() {
            return;
        }
        let pan = Point::new(self.state.pan.x + dx, self.state.pan.y + dy);
        self.state.pan = self.clamp_pan(pan, stage);
    }

    /// Largest offset per axis that still keeps the scaled image covering
    /// the stage centre line.
    pub fn pan_limit(&self, stage: Stage) -> Point {
        let extra = self.state.zoom - 1.0;
        Point::new(
            (stage.width * extra / 2.0).max(0.0),
            (stage.height * extra / 2.0).max(0.0),
        )
    }

    fn clamp_pan(&self, pan: Point, stage: Stage) -> Point {
        let limit = self.pan_limit(stage);
        Point::new(
            pan.x.clamp(-limit.x, limit.x),
            pan.y.clamp(-limit.y, limit.y),
        )
    }

    /// CSS transform for the lightbox image.
    pub fn transform_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.state.pan.x, self.state.pan.y, self.state.zoom
        )
    }
}
