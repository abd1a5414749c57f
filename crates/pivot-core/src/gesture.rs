#![forbid(unsafe_code)]

//! Swipe recognition: turns a pointer down/up pair into a navigation intent.
//!
//! [`SwipeRecognizer`] is a small stateful processor. It remembers the last
//! pointer-down and, on the matching pointer-up, applies the swipe policy:
//!
//! 1. Vertical travel must stay below `max_vertical_ratio` of horizontal travel.
//! 2. Horizontal travel must exceed `min_horizontal_px`.
//! 3. The device must be touch, unless the host cannot report device types.
//! 4. With content swipes disabled, both endpoints must lie in the header strip.
//!
//! An accepted swipe scales its horizontal travel by an inertia factor
//! `max(1, (reference / dt)^2)`, corrects the sign for right-to-left flow,
//! and navigates when the result exceeds `viewport_fraction` of the viewport.
//! Everything else is [`SwipeOutcome::Unhandled`] so the caller can run tap
//! detection on the same pointer-up.
//!
//! The recognizer also tracks the most recent pointer type per instance,
//! so hosts never need process-wide pointer state.
//!
//! # Invariants
//!
//! 1. A pointer-up without a preceding pointer-down is always `Unhandled`.
//! 2. Each pointer-down is consumed by at most one pointer-up.
//! 3. After `reset()`, no pointer-down is pending.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::event::{PointerEvent, PointerEventKind, PointerType};
use crate::geometry::{Bounds, Point};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for swipe recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Maximum `|dy| / |dx|` for a swipe (default: 0.4).
    pub max_vertical_ratio: f32,
    /// Minimum horizontal travel in pixels (default: 32.0).
    pub min_horizontal_px: f32,
    /// Reference duration for the inertia multiplier in ms (default: 350).
    pub inertia_reference_ms: u64,
    /// Fraction of the viewport a scaled swipe must cover (default: 0.25).
    pub viewport_fraction: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_vertical_ratio: 0.4,
            min_horizontal_px: 32.0,
            inertia_reference_ms: 350,
            viewport_fraction: 0.25,
        }
    }
}

impl SwipeConfig {
    /// Inertia multiplier for a gesture that took `dt`.
    ///
    /// Sub-millisecond gestures are treated as 1ms.
    #[must_use]
    pub fn inertia(&self, dt: Duration) -> f32 {
        let dt_ms = dt.as_secs_f32() * 1000.0;
        let ratio = self.inertia_reference_ms as f32 / dt_ms.max(1.0);
        (ratio * ratio).max(1.0)
    }
}

/// Environment a pointer-up is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeContext {
    /// Width of the content viewport in pixels.
    pub viewport_width: f32,
    /// Right-to-left layout direction.
    pub rtl: bool,
    /// Bounds of the header strip in pointer coordinates.
    pub header_bounds: Bounds,
    /// Whether swipes over content (outside the header strip) navigate.
    pub content_swipe_enabled: bool,
}

/// Result of a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeOutcome {
    /// Navigate to the next item.
    Next,
    /// Navigate to the previous item.
    Previous,
    /// Not a navigating swipe; the caller may treat it as a tap.
    Unhandled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerDown {
    point: Point,
    timestamp: Duration,
    pointer_type: Option<PointerType>,
}

// ---------------------------------------------------------------------------
// SwipeRecognizer
// ---------------------------------------------------------------------------

/// Stateful swipe recognizer for one pivot instance.
#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    down: Option<PointerDown>,
    pointer_type: Option<PointerType>,
}

impl SwipeRecognizer {
    /// Create a recognizer with the given configuration.
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            down: None,
            pointer_type: None,
        }
    }

    /// Process a pointer event.
    ///
    /// Down and enter events record state and return `Unhandled`; an up
    /// event evaluates the swipe policy against `cx`.
    pub fn process(&mut self, event: &PointerEvent, cx: &SwipeContext) -> SwipeOutcome {
        if event.pointer_type.is_some() {
            self.pointer_type = event.pointer_type;
        }
        match event.kind {
            PointerEventKind::Down => {
                self.down = Some(PointerDown {
                    point: Point::new(event.x, event.y),
                    timestamp: event.timestamp,
                    pointer_type: event.pointer_type,
                });
                SwipeOutcome::Unhandled
            }
            PointerEventKind::Up => self.on_pointer_up(event, cx),
            PointerEventKind::Enter | PointerEventKind::Leave => SwipeOutcome::Unhandled,
        }
    }

    /// Most recent pointer type reported for this instance.
    #[inline]
    #[must_use]
    pub const fn pointer_type(&self) -> Option<PointerType> {
        self.pointer_type
    }

    /// Forget any pending pointer-down.
    pub fn reset(&mut self) {
        self.down = None;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, cx: &SwipeContext) -> SwipeOutcome {
        let Some(down) = self.down.take() else {
            return SwipeOutcome::Unhandled;
        };
        let up = Point::new(event.x, event.y);
        let dx = up.x - down.point.x;
        let dy = up.y - down.point.y;

        if dy.abs() >= dx.abs() * self.config.max_vertical_ratio
            || dx.abs() <= self.config.min_horizontal_px
        {
            return SwipeOutcome::Unhandled;
        }
        let pointer_type = down.pointer_type.or(event.pointer_type);
        if pointer_type.is_some_and(|kind| kind != PointerType::Touch) {
            return SwipeOutcome::Unhandled;
        }
        if !cx.content_swipe_enabled
            && !(cx.header_bounds.contains(down.point) && cx.header_bounds.contains(up))
        {
            return SwipeOutcome::Unhandled;
        }

        let dt = event.timestamp.saturating_sub(down.timestamp);
        let mut scaled = dx * self.config.inertia(dt);
        if cx.rtl {
            scaled = -scaled;
        }
        let threshold = cx.viewport_width * self.config.viewport_fraction;
        let outcome = if scaled < -threshold {
            SwipeOutcome::Next
        } else if scaled > threshold {
            SwipeOutcome::Previous
        } else {
            SwipeOutcome::Unhandled
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "pivot.swipe",
            dx,
            dy,
            scaled_dx = scaled,
            outcome = ?outcome
        );

        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
