#![forbid(unsafe_code)]

//! Host element handles.
//!
//! A [`HostElement`] stands for the surface a pivot is mounted on. At most
//! one controller may be bound to a host at a time; binding a second one is a
//! structural error. The binding is released on dispose or drop.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PivotError, Result};

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to the element a pivot is mounted on. Clones share binding state.
#[derive(Debug, Clone)]
pub struct HostElement {
    id: u64,
    bound: Rc<Cell<bool>>,
}

impl HostElement {
    /// Create a fresh, unbound host element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed),
            bound: Rc::new(Cell::new(false)),
        }
    }

    /// Unique identifier of this host.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Whether a controller is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    pub(crate) fn bind(&self) -> Result<HostBinding> {
        if self.bound.replace(true) {
            return Err(PivotError::AlreadyBound { host: self.id });
        }
        Ok(HostBinding {
            host: self.clone(),
            released: false,
        })
    }
}

impl Default for HostElement {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive claim on a host, released on drop.
#[derive(Debug)]
pub(crate) struct HostBinding {
    host: HostElement,
    released: bool,
}

impl HostBinding {
    pub(crate) fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.host.bound.set(false);
        }
    }
}

impl Drop for HostBinding {
    fn drop(&mut self) {
        self.release();
    }
}
