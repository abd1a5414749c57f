#![forbid(unsafe_code)]

//! Layout measurement capability.
//!
//! The header state machine never touches a rendering surface directly.
//! Everything it needs to know about layout goes through a [`LayoutProbe`],
//! which hosts implement on top of their real surface and tests implement
//! with fixed numbers.

use std::rc::Rc;

use pivot_core::geometry::Bounds;
use unicode_width::UnicodeWidthStr;

/// Read-only view of the host's layout.
pub trait LayoutProbe {
    /// Natural width of a header showing `label`, excluding margins.
    fn measure_header(&self, label: &str) -> f32;

    /// Width available to the header strip.
    fn header_area_width(&self) -> f32;

    /// Width of the content viewport.
    fn viewport_width(&self) -> f32;

    /// Bounds of the header strip in pointer coordinates.
    fn header_bounds(&self) -> Bounds;

    /// Whether the computed layout direction is right-to-left.
    fn is_rtl(&self) -> bool {
        false
    }
}

impl<P: LayoutProbe + ?Sized> LayoutProbe for Rc<P> {
    fn measure_header(&self, label: &str) -> f32 {
        (**self).measure_header(label)
    }

    fn header_area_width(&self) -> f32 {
        (**self).header_area_width()
    }

    fn viewport_width(&self) -> f32 {
        (**self).viewport_width()
    }

    fn header_bounds(&self) -> Bounds {
        (**self).header_bounds()
    }

    fn is_rtl(&self) -> bool {
        (**self).is_rtl()
    }
}

impl<P: LayoutProbe + ?Sized> LayoutProbe for Box<P> {
    fn measure_header(&self, label: &str) -> f32 {
        (**self).measure_header(label)
    }

    fn header_area_width(&self) -> f32 {
        (**self).header_area_width()
    }

    fn viewport_width(&self) -> f32 {
        (**self).viewport_width()
    }

    fn header_bounds(&self) -> Bounds {
        (**self).header_bounds()
    }

    fn is_rtl(&self) -> bool {
        (**self).is_rtl()
    }
}

/// Probe for monospace cell grids: a header is as wide as its label's
/// display width times the cell width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextProbe {
    /// Pixel width of one cell.
    pub cell_width: f32,
    /// Bounds of the header strip; its width is the header area width.
    pub header_bounds: Bounds,
    /// Width of the content viewport.
    pub viewport_width: f32,
    /// Right-to-left layout.
    pub rtl: bool,
}

impl TextProbe {
    /// Probe for a grid `columns` cells wide with one-pixel cells and a
    /// one-row header strip at the top.
    #[must_use]
    pub fn columns(columns: u16) -> Self {
        let width = f32::from(columns);
        Self {
            cell_width: 1.0,
            header_bounds: Bounds::new(0.0, 0.0, width, 1.0),
            viewport_width: width,
            rtl: false,
        }
    }
}

impl LayoutProbe for TextProbe {
    fn measure_header(&self, label: &str) -> f32 {
        label.width() as f32 * self.cell_width
    }

    fn header_area_width(&self) -> f32 {
        self.header_bounds.width
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn header_bounds(&self) -> Bounds {
        self.header_bounds
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }
}
