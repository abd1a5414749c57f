#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Hosts translate their native keyboard and pointer input into these types
//! before handing them to a pivot. All events derive `Clone` and `PartialEq`
//! for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are layout pixels in the host's coordinate space.
//! - Pointer timestamps are monotonic offsets; only differences matter.
//! - `pointer_type` is `None` when the host cannot tell input devices apart.

use web_time::Duration;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, touch, or pen) event.
    Pointer(PointerEvent),

    /// The viewport or header area may have changed size.
    Resize,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Key codes the pivot reacts to, plus a catch-all for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Enter/Return key.
    Enter,

    /// Space bar.
    Space,

    /// A regular character key.
    Char(char),
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

/// Input device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse or trackpad.
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// Pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Contact started or a button was pressed.
    Down,
    /// Contact ended or the button was released.
    Up,
    /// The pointer entered the header strip.
    Enter,
    /// The pointer left the header strip.
    Leave,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,

    /// X coordinate in layout pixels.
    pub x: f32,

    /// Y coordinate in layout pixels.
    pub y: f32,

    /// Device type, when the host can detect it.
    pub pointer_type: Option<PointerType>,

    /// Monotonic time the event was generated.
    pub timestamp: Duration,
}

impl PointerEvent {
    /// Create a pointer event of unknown device type at time zero.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            pointer_type: None,
            timestamp: Duration::ZERO,
        }
    }

    /// Set the device type.
    #[must_use]
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = Some(pointer_type);
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Get pointer position as (x, y) tuple.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
