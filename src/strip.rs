//! Thumbnail strip scrolling.
//!
//! Two buttons scroll the strip by a fraction of its visible width and are
//! disabled at either end. Pointer drags scroll it too; a press only counts
//! as a drag once it travels past a small threshold, and a drag swallows the
//! click that would otherwise open the lightbox. Every new press clears a
//! pending swallow, so a click that never reached a thumbnail cannot eat the
//! next one.

use crate::config::StripConfig;
use serde::Serialize;

/// Distance (px) from either end within which a scroll button counts as
/// being at that end.
pub const EDGE_TOLERANCE: f64 = 1.0;

/// Scroll geometry of the strip, as reported by the DOM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripMetrics {
    pub scroll_left: f64,
    pub client_width: f64,
    pub scroll_width: f64,
}

impl StripMetrics {
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Enabled state of the prev/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub prev: bool,
    pub next: bool,
}

/// Settings the page runtime reads from the strip's `data-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripRuntime {
    pub step_fraction: f64,
    pub drag_threshold: f64,
    pub edge_tolerance: f64,
}

/// Strip controller settings.
#[derive(Debug, Clone, Copy)]
pub struct Strip {
    settings: StripConfig,
}

impl Strip {
    pub fn new(settings: StripConfig) -> Self {
        Self { settings }
    }

    /// Distance one button press scrolls.
    pub fn scroll_step(&self, client_width: f64) -> f64 {
        client_width * self.settings.step_fraction
    }

    /// Where a button press should smooth-scroll to.
    pub fn target_scroll(&self, metrics: StripMetrics, direction: Direction) -> f64 {
        let step = self.scroll_step(metrics.client_width);
        let target = match direction {
            Direction::Prev => metrics.scroll_left - step,
            Direction::Next => metrics.scroll_left + step,
        };
        target.clamp(0.0, metrics.max_scroll())
    }

    /// Buttons are disabled within [`EDGE_TOLERANCE`] of either end,
    /// absorbing sub-pixel scroll positions.
    pub fn button_states(&self, metrics: StripMetrics) -> ButtonStates {
        ButtonStates {
            prev: metrics.scroll_left > EDGE_TOLERANCE,
            next: metrics.scroll_left < metrics.max_scroll() - EDGE_TOLERANCE,
        }
    }

    pub fn drag_tracker(&self) -> DragTracker {
        DragTracker {
            threshold: self.settings.drag_threshold,
            press: None,
            swallow_click: false,
        }
    }

    pub fn runtime_settings(&self) -> StripRuntime {
        StripRuntime {
            step_fraction: self.settings.step_fraction,
            drag_threshold: self.settings.drag_threshold,
            edge_tolerance: EDGE_TOLERANCE,
        }
    }
}

/// How a pointer press ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Short press: let the thumbnail click through.
    Click,
    /// Real drag: suppress the click.
    Drag,
    /// No press was in progress.
    Idle,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f64,
    start_scroll: f64,
    dragging: bool,
}

/// Follows one pointer press on the strip.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    threshold: f64,
    press: Option<Press>,
    swallow_click: bool,
}

impl DragTracker {
    pub fn press(&mut self, x: f64, scroll_left: f64) {
        self.swallow_click = false;
        self.press = Some(Press {
            start_x: x,
            start_scroll: scroll_left,
            dragging: false,
        });
    }

    /// Pointer moved. Returns the new scroll position once the press has
    /// become a drag.
    pub fn move_to(&mut self, x: f64) -> Option<f64> {
        let press = self.press.as_mut()?;
        let dx = x - press.start_x;
        if !press.dragging && dx.abs() > self.threshold {
            press.dragging = true;
        }
        press.dragging.then(|| press.start_scroll - dx)
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    pub fn release(&mut self) -> DragOutcome {
        match self.press.take() {
            Some(p) if p.dragging => {
                self.swallow_click = true;
                DragOutcome::Drag
            }
            Some(_) => DragOutcome::Click,
            None => DragOutcome::Idle,
        }
    }

    /// A click arrived anywhere in the strip. Returns whether it may open
    /// the lightbox; the click right after a drag is swallowed.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.swallow_click)
    }
}
