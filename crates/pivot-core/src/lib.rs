#![forbid(unsafe_code)]

//! Core: input events, swipe recognition, geometry, and animation primitives.
//!
//! # Role in the pivot workspace
//! `pivot-core` is the input and timing layer. It knows nothing about
//! headers or items; it normalizes host input into canonical events, turns
//! pointer pairs into swipe intents, and provides tick-driven, cancellable
//! animation tasks.
//!
//! # Primary responsibilities
//! - **Event**: canonical key and pointer events.
//! - **Geometry**: points and bounds in layout pixels.
//! - **Gesture**: the swipe policy, with per-instance pointer-type tracking.
//! - **Animation**: easing, tweens, and single-outstanding animation slots.
//!
//! # How it fits in the system
//! `pivot-widgets` consumes these types to drive its header state machine and
//! navigation controller. Nothing here reads a clock: the host advances time
//! explicitly, which keeps every behavior deterministic under test.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
