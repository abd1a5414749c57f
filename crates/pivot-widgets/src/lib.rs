#![forbid(unsafe_code)]

//! Pivot: a tabbed, swipeable container.
//!
//! A pivot shows one content item at a time under a strip of headers, one
//! per item. Users move between items by tapping headers, pressing arrow
//! keys, pressing the strip's navigation buttons, or swiping.
//!
//! # Pieces
//! - [`PivotController`]: selection, item transitions, input, and collection
//!   adaptation.
//! - [`header_state`]: the Static / Overflow header layouts and the rule that
//!   picks between them.
//! - [`header`]: header visuals, the header renderer, and header geometry.
//! - [`collection`]: the observable [`ItemList`] a pivot binds to.
//! - [`probe`]: the [`LayoutProbe`] capability that answers layout questions.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use pivot_widgets::{ContentItem, HeaderLabel, HostElement, ItemList, PivotConfig,
//!     PivotController, TextProbe};
//!
//! struct Page(&'static str);
//!
//! impl ContentItem for Page {
//!     fn header(&self) -> HeaderLabel {
//!         self.0.into()
//!     }
//! }
//!
//! let items: ItemList<Page> = ["Mail", "Calendar", "People"]
//!     .into_iter()
//!     .map(|name| Rc::new(Page(name)))
//!     .collect();
//! let host = HostElement::new();
//! let mut pivot =
//!     PivotController::new(&host, items, TextProbe::columns(80), PivotConfig::default())?;
//! pivot.flush()?;
//! pivot.go_next();
//! assert_eq!(pivot.selected_index(), Some(1));
//! # Ok::<(), pivot_widgets::PivotError>(())
//! ```

pub mod collection;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod header;
pub mod header_state;
pub mod host;
pub mod item;
pub mod panel;
pub mod probe;

#[cfg(test)]
pub(crate) mod test_support;

pub use collection::{ItemList, ListChange, Subscription};
pub use config::PivotConfig;
pub use controller::{NavButton, PivotController};
pub use error::{PivotError, Result};
pub use event::{Direction, PivotEvent};
pub use header::{HeaderRenderer, HeaderStrip, HeaderTemplate, HeaderVisual, PlainTextTemplate};
pub use header_state::HeaderStateKind;
pub use host::HostElement;
pub use item::{Activation, ContentItem, HeaderLabel};
pub use panel::Panel;
pub use probe::{LayoutProbe, TextProbe};

pub use pivot_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, PointerEvent, PointerEventKind, PointerType,
};
