//! Fixtures shared by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use pivot_core::geometry::Bounds;

use crate::item::{ContentItem, HeaderLabel};
use crate::probe::LayoutProbe;

/// Item whose label can be changed after creation.
#[derive(Debug)]
pub(crate) struct Label {
    text: RefCell<String>,
}

impl Label {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: RefCell::new(text.to_owned()),
        }
    }

    pub(crate) fn set(&self, text: &str) {
        *self.text.borrow_mut() = text.to_owned();
    }
}

impl ContentItem for Label {
    fn header(&self) -> HeaderLabel {
        HeaderLabel::text(self.text.borrow().clone())
    }
}

/// Probe with a fixed header area and per-label widths.
#[derive(Debug, Clone)]
pub(crate) struct FixedProbe {
    pub(crate) area: f32,
    pub(crate) rtl: bool,
    default_width: f32,
    widths: HashMap<String, f32>,
}

impl FixedProbe {
    pub(crate) fn new(area: f32) -> Self {
        Self {
            area,
            rtl: false,
            default_width: 40.0,
            widths: HashMap::new(),
        }
    }

    pub(crate) fn with_width(mut self, label: &str, width: f32) -> Self {
        self.widths.insert(label.to_owned(), width);
        self
    }

    pub(crate) fn with_default_width(mut self, width: f32) -> Self {
        self.default_width = width;
        self
    }
}

impl LayoutProbe for FixedProbe {
    fn measure_header(&self, label: &str) -> f32 {
        self.widths.get(label).copied().unwrap_or(self.default_width)
    }

    fn header_area_width(&self) -> f32 {
        self.area
    }

    fn viewport_width(&self) -> f32 {
        self.area
    }

    fn header_bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.area, 40.0)
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }
}
