//! Shared fixtures for pivot integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pivot_core::geometry::Bounds;
use pivot_widgets::{
    Activation, ContentItem, HeaderLabel, HostElement, ItemList, LayoutProbe, PivotConfig,
    PivotController,
};
use web_time::Duration;

/// One frame at 60 Hz.
pub const FRAME: Duration = Duration::from_millis(16);

/// Height of the header strip in pointer coordinates.
pub const HEADER_HEIGHT: f32 = 40.0;

// ---------------------------------------------------------------------------
// FakeProbe
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ProbeState {
    area: Cell<f32>,
    viewport: Cell<f32>,
    rtl: Cell<bool>,
    default_width: Cell<f32>,
    widths: RefCell<HashMap<String, f32>>,
}

/// Layout probe with adjustable numbers. Clones share state, so a test can
/// keep a handle after giving one to the controller.
#[derive(Debug, Clone)]
pub struct FakeProbe {
    state: Rc<ProbeState>,
}

impl FakeProbe {
    /// Header area and viewport both `area` wide; headers 40px wide.
    pub fn new(area: f32) -> Self {
        Self {
            state: Rc::new(ProbeState {
                area: Cell::new(area),
                viewport: Cell::new(area),
                rtl: Cell::new(false),
                default_width: Cell::new(40.0),
                widths: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn with_header_width(self, width: f32) -> Self {
        self.state.default_width.set(width);
        self
    }

    pub fn set_area(&self, area: f32) {
        self.state.area.set(area);
    }

    pub fn set_viewport(&self, viewport: f32) {
        self.state.viewport.set(viewport);
    }

    pub fn set_rtl(&self, rtl: bool) {
        self.state.rtl.set(rtl);
    }

    pub fn set_width(&self, label: &str, width: f32) {
        self.state.widths.borrow_mut().insert(label.to_owned(), width);
    }
}

impl LayoutProbe for FakeProbe {
    fn measure_header(&self, label: &str) -> f32 {
        self.state
            .widths
            .borrow()
            .get(label)
            .copied()
            .unwrap_or_else(|| self.state.default_width.get())
    }

    fn header_area_width(&self) -> f32 {
        self.state.area.get()
    }

    fn viewport_width(&self) -> f32 {
        self.state.viewport.get()
    }

    fn header_bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.state.area.get(), HEADER_HEIGHT)
    }

    fn is_rtl(&self) -> bool {
        self.state.rtl.get()
    }
}

// ---------------------------------------------------------------------------
// TestItem
// ---------------------------------------------------------------------------

/// Item with a mutable label and controllable activation.
#[derive(Debug)]
pub struct TestItem {
    label: RefCell<String>,
    ready: Cell<bool>,
    activations: Cell<u32>,
}

impl TestItem {
    pub fn new(label: &str) -> Rc<Self> {
        Rc::new(Self {
            label: RefCell::new(label.to_owned()),
            ready: Cell::new(true),
            activations: Cell::new(0),
        })
    }

    /// Item whose activation stays pending until [`finish_loading`].
    ///
    /// [`finish_loading`]: Self::finish_loading
    pub fn lazy(label: &str) -> Rc<Self> {
        let item = Self::new(label);
        item.ready.set(false);
        item
    }

    pub fn finish_loading(&self) {
        self.ready.set(true);
    }

    pub fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_owned();
    }

    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn activations(&self) -> u32 {
        self.activations.get()
    }
}

impl ContentItem for TestItem {
    fn header(&self) -> HeaderLabel {
        HeaderLabel::text(self.label())
    }

    fn activate(&self) -> Activation {
        self.activations.set(self.activations.get() + 1);
        if self.ready.get() {
            Activation::Ready
        } else {
            Activation::Pending
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn items(labels: &[&str]) -> ItemList<TestItem> {
    labels.iter().map(|label| TestItem::new(label)).collect()
}

pub fn instant() -> PivotConfig {
    PivotConfig {
        animations_enabled: false,
        ..PivotConfig::default()
    }
}

/// Bound, flushed pivot.
pub fn pivot_with(
    items: ItemList<TestItem>,
    probe: &FakeProbe,
    config: PivotConfig,
) -> PivotController<TestItem> {
    let mut pivot =
        PivotController::new(&HostElement::new(), items, probe.clone(), config).expect("pivot");
    pivot.flush().expect("flush");
    pivot
}

/// Bound, flushed pivot without animations in a 400px area.
pub fn pivot(labels: &[&str]) -> PivotController<TestItem> {
    pivot_with(items(labels), &FakeProbe::new(400.0), instant())
}

/// Tick until nothing is animating or waiting to show.
pub fn settle(pivot: &mut PivotController<TestItem>) {
    for _ in 0..500 {
        if !pivot.is_animating() && !pivot.is_show_pending() {
            return;
        }
        pivot.tick(FRAME).expect("tick");
    }
    panic!("pivot did not settle");
}

pub fn selected_label(pivot: &PivotController<TestItem>) -> Option<String> {
    pivot.selected_item().map(|item| item.label())
}

pub fn panel_labels(pivot: &PivotController<TestItem>) -> Vec<String> {
    pivot.panels().iter().map(|panel| panel.item().label()).collect()
}

pub fn visible_panels(pivot: &PivotController<TestItem>) -> Vec<usize> {
    pivot
        .panels()
        .iter()
        .enumerate()
        .filter(|(_, panel)| panel.is_visible())
        .map(|(index, _)| index)
        .collect()
}
