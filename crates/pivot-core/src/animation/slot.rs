#![forbid(unsafe_code)]

//! Single-outstanding animation task holder.
//!
//! An [`AnimationSlot`] owns at most one running [`Tween`] together with an
//! effect payload `E` describing what the tween drives and what must happen
//! when it ends. Starting a new task supersedes the running one.
//!
//! # Invariants
//!
//! 1. At most one task is outstanding per slot.
//! 2. Every started task is reported exactly once as [`Finished`], either
//!    `Completed` (from [`tick`](AnimationSlot::tick)) or `Cancelled` (from
//!    [`start`](AnimationSlot::start) or [`cancel`](AnimationSlot::cancel)).
//! 3. Generations increase monotonically; [`is_current`](AnimationSlot::is_current)
//!    lets completion handlers discard stale results.

use web_time::Duration;

use super::{Animation, Tween};

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The tween ran to its end.
    Completed,
    /// The task was cancelled or superseded.
    Cancelled,
}

/// A task that left its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Finished<E> {
    /// The effect payload given to [`AnimationSlot::start`].
    pub effect: E,
    /// How the task ended.
    pub outcome: Outcome,
    /// Generation the task was started with.
    pub generation: u64,
}

#[derive(Debug)]
struct Task<E> {
    tween: Tween,
    effect: E,
    generation: u64,
}

/// Holder for at most one running animation task.
#[derive(Debug)]
pub struct AnimationSlot<E> {
    task: Option<Task<E>>,
    generation: u64,
}

impl<E> Default for AnimationSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> AnimationSlot<E> {
    /// Create an idle slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            task: None,
            generation: 0,
        }
    }

    /// Start a task, superseding any running one.
    ///
    /// Returns the new task's generation and the superseded task, if any,
    /// reported as `Cancelled`.
    pub fn start(&mut self, tween: Tween, effect: E) -> (u64, Option<Finished<E>>) {
        let superseded = self.cancel();
        self.generation = self.generation.wrapping_add(1);
        self.task = Some(Task {
            tween,
            effect,
            generation: self.generation,
        });
        (self.generation, superseded)
    }

    /// Cancel the running task, returning it for finalization.
    pub fn cancel(&mut self) -> Option<Finished<E>> {
        self.take(Outcome::Cancelled)
    }

    /// Advance the running task by `dt`.
    ///
    /// Returns the task once it completes.
    pub fn tick(&mut self, dt: Duration) -> Option<Finished<E>> {
        let task = self.task.as_mut()?;
        task.tween.tick(dt);
        if task.tween.is_complete() {
            return self.take(Outcome::Completed);
        }
        None
    }

    fn take(&mut self, outcome: Outcome) -> Option<Finished<E>> {
        self.task.take().map(|task| Finished {
            effect: task.effect,
            outcome,
            generation: task.generation,
        })
    }

    /// Whether a task is outstanding.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Interpolated tween value of the running task.
    #[must_use]
    pub fn current(&self) -> Option<f32> {
        self.task.as_ref().map(|task| task.tween.current())
    }

    /// Eased progress (0.0–1.0) of the running task.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        self.task.as_ref().map(|task| task.tween.value())
    }

    /// Effect payload of the running task.
    #[must_use]
    pub fn effect(&self) -> Option<&E> {
        self.task.as_ref().map(|task| &task.effect)
    }

    /// Generation of the most recently started task.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `generation` belongs to the most recently started task.
    #[inline]
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn idle_slot_ticks_to_nothing() {
        let mut slot: AnimationSlot<&str> = AnimationSlot::new();
        assert!(!slot.is_running());
        assert!(slot.tick(MS_100).is_none());
        assert!(slot.cancel().is_none());
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn completes_after_duration() {
        let mut slot = AnimationSlot::new();
        let (generation, superseded) = slot.start(Tween::progress(MS_100), "fade");
        assert!(superseded.is_none());
        assert!(slot.tick(Duration::from_millis(50)).is_none());
        assert_eq!(slot.effect(), Some(&"fade"));
        let finished = slot.tick(Duration::from_millis(50)).expect("finished");
        assert_eq!(finished.outcome, Outcome::Completed);
        assert_eq!(finished.effect, "fade");
        assert_eq!(finished.generation, generation);
        assert!(!slot.is_running());
    }

    #[test]
    fn start_supersedes_running_task() {
        let mut slot = AnimationSlot::new();
        let (first, _) = slot.start(Tween::progress(MS_100), 1);
        let (second, superseded) = slot.start(Tween::progress(MS_100), 2);
        let superseded = superseded.expect("first task reported");
        assert_eq!(superseded.effect, 1);
        assert_eq!(superseded.outcome, Outcome::Cancelled);
        assert_eq!(superseded.generation, first);
        assert!(second > first);
        assert!(slot.is_current(second));
        assert!(!slot.is_current(first));
    }

    #[test]
    fn cancel_reports_once_and_empties_slot() {
        let mut slot = AnimationSlot::new();
        let (generation, _) = slot.start(Tween::progress(MS_100), ());
        let finished = slot.cancel().expect("cancelled");
        assert_eq!(finished.outcome, Outcome::Cancelled);
        assert_eq!(finished.generation, generation);
        assert!(slot.cancel().is_none());
        assert!(slot.tick(MS_100).is_none());
        assert!(slot.is_current(generation));
    }

    #[test]
    fn current_tracks_tween() {
        let mut slot = AnimationSlot::new();
        slot.start(Tween::new(0.0, -100.0, MS_100), ());
        slot.tick(Duration::from_millis(50));
        let value = slot.current().expect("running");
        assert!((value + 50.0).abs() < 1e-3);
        assert!((slot.progress().expect("running") - 0.5).abs() < 1e-3);
    }
}
