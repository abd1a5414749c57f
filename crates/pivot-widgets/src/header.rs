#![forbid(unsafe_code)]

//! Header visuals, rendering, and header geometry.
//!
//! A [`HeaderStrip`] is the pivot's model of its header row: an ordered list
//! of [`HeaderVisual`]s laid out left to right (mirrored for right-to-left
//! flow), a strip-wide horizontal translation used by slide animations, and
//! the leading/trailing navigation buttons.
//!
//! [`HeaderRenderer`] turns an item into a visual through a pluggable
//! [`HeaderTemplate`]. [`cumulative_header_width`] and [`header_offset`] are
//! the geometry the header state machine bases its decisions on.
//!
//! # Layout
//!
//! Every header carries `margin` on both sides. Header `i` starts at
//! `sum(width[j] + 2 * margin for j < i) + margin` from the leading edge.

use std::fmt;

use crate::item::{ContentItem, HeaderLabel};
use crate::probe::LayoutProbe;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Turns a header label into display text.
pub trait HeaderTemplate {
    /// Render `label`.
    fn render(&self, label: &HeaderLabel) -> String;
}

/// Default template: text as-is, structured values as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextTemplate;

impl HeaderTemplate for PlainTextTemplate {
    fn render(&self, label: &HeaderLabel) -> String {
        match label {
            HeaderLabel::Text(text) => text.clone(),
            HeaderLabel::Structured(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl<F> HeaderTemplate for F
where
    F: Fn(&HeaderLabel) -> String,
{
    fn render(&self, label: &HeaderLabel) -> String {
        self(label)
    }
}

// ---------------------------------------------------------------------------
// HeaderVisual
// ---------------------------------------------------------------------------

/// One rendered header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVisual {
    index: usize,
    label: String,
    natural_width: f32,
    max_width: Option<f32>,
    pub(crate) interactive: bool,
    pub(crate) selected: bool,
    pub(crate) aria_selected: bool,
    pub(crate) hidden: bool,
    pub(crate) opacity: f32,
    left: f32,
}

impl HeaderVisual {
    /// Index of the item this header belongs to.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Rendered label text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rendered width, after truncation.
    #[must_use]
    pub fn width(&self) -> f32 {
        match self.max_width {
            Some(max) => self.natural_width.min(max),
            None => self.natural_width,
        }
    }

    /// Whether the label is cut off with an ellipsis.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.max_width.is_some_and(|max| self.natural_width > max)
    }

    /// Whether the header is a selectable tab.
    #[inline]
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Whether the header carries the selection highlight.
    #[inline]
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Accessibility selection state.
    #[inline]
    #[must_use]
    pub const fn is_aria_selected(&self) -> bool {
        self.aria_selected
    }

    /// Whether the header is hidden from assistive technology.
    #[inline]
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Current opacity.
    #[inline]
    #[must_use]
    pub const fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Physical left edge within the strip, before translation.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    pub(crate) fn set_label(&mut self, label: String, natural_width: f32) {
        self.label = label;
        self.natural_width = natural_width;
    }

    pub(crate) fn set_max_width(&mut self, max_width: Option<f32>) {
        self.max_width = max_width;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.aria_selected = selected;
    }
}

// ---------------------------------------------------------------------------
// HeaderStrip
// ---------------------------------------------------------------------------

/// Model of the header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderStrip {
    visuals: Vec<HeaderVisual>,
    pub(crate) translate_x: f32,
    pub(crate) nav_buttons: bool,
    pub(crate) nav_buttons_visible: bool,
    pub(crate) focused: Option<usize>,
    pub(crate) max_header_width: Option<f32>,
    container_width: f32,
    generation: u64,
}

impl HeaderStrip {
    /// Rendered headers in strip order.
    #[must_use]
    pub fn visuals(&self) -> &[HeaderVisual] {
        &self.visuals
    }

    /// Number of rendered headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Whether no headers are rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Item indices of the rendered headers, in strip order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.visuals.iter().map(HeaderVisual::index).collect()
    }

    /// Labels of the rendered headers, in strip order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.visuals.iter().map(HeaderVisual::label).collect()
    }

    /// Slot of the header carrying the selection highlight.
    #[must_use]
    pub fn selected_slot(&self) -> Option<usize> {
        self.visuals.iter().position(|visual| visual.selected)
    }

    /// Slot keyboard focus is tracked on.
    #[inline]
    #[must_use]
    pub const fn focused_slot(&self) -> Option<usize> {
        self.focused
    }

    /// Strip-wide horizontal translation.
    #[inline]
    #[must_use]
    pub const fn translate_x(&self) -> f32 {
        self.translate_x
    }

    /// Whether leading/trailing navigation buttons are present.
    #[inline]
    #[must_use]
    pub const fn has_nav_buttons(&self) -> bool {
        self.nav_buttons
    }

    /// Whether the navigation buttons are currently shown (mouse hover).
    #[inline]
    #[must_use]
    pub const fn nav_buttons_visible(&self) -> bool {
        self.nav_buttons && self.nav_buttons_visible
    }

    /// Width the strip lays out against.
    #[inline]
    #[must_use]
    pub const fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Incremented on every full rebuild; lets deferred work detect stale
    /// visuals.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Slot whose translated extent contains strip-relative `x`.
    #[must_use]
    pub fn slot_at(&self, x: f32) -> Option<usize> {
        let x = x - self.translate_x;
        self.visuals
            .iter()
            .position(|visual| x >= visual.left && x < visual.left + visual.width())
    }

    pub(crate) fn visual_mut(&mut self, slot: usize) -> Option<&mut HeaderVisual> {
        self.visuals.get_mut(slot)
    }

    pub(crate) fn visuals_mut(&mut self) -> impl Iterator<Item = &mut HeaderVisual> {
        self.visuals.iter_mut()
    }

    /// Drop every header and start a new generation.
    pub(crate) fn clear(&mut self, container_width: f32) {
        self.visuals.clear();
        self.translate_x = 0.0;
        self.nav_buttons = false;
        self.focused = None;
        self.max_header_width = None;
        self.container_width = container_width;
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn push(&mut self, visual: HeaderVisual) {
        self.visuals.push(visual);
    }

    pub(crate) fn remove_first(&mut self) -> Option<HeaderVisual> {
        if self.visuals.is_empty() {
            return None;
        }
        self.focused = self.focused.and_then(|slot| slot.checked_sub(1));
        Some(self.visuals.remove(0))
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.visuals.truncate(len);
    }

    /// Move the selection highlight and focus to `slot`.
    pub(crate) fn select_slot(&mut self, slot: usize) {
        for (i, visual) in self.visuals.iter_mut().enumerate() {
            visual.set_selected(i == slot);
        }
        self.focused = (slot < self.visuals.len()).then_some(slot);
    }

    /// Recompute every header's physical left edge.
    pub(crate) fn layout(&mut self, margin: f32, rtl: bool) {
        let mut leading = 0.0_f32;
        for visual in &mut self.visuals {
            let start = leading + margin;
            visual.left = if rtl {
                self.container_width - start - visual.width()
            } else {
                start
            };
            leading = start + visual.width() + margin;
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Builds header visuals for items.
pub struct HeaderRenderer {
    template: Box<dyn HeaderTemplate>,
}

impl fmt::Debug for HeaderRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderRenderer").finish_non_exhaustive()
    }
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new(PlainTextTemplate)
    }
}

impl HeaderRenderer {
    /// Renderer using `template` for labels.
    pub fn new(template: impl HeaderTemplate + 'static) -> Self {
        Self {
            template: Box::new(template),
        }
    }

    /// Render the header for `item` at `index`.
    ///
    /// Interactive headers are selectable tabs; non-interactive ones exist
    /// only for measurement or as a peek affordance.
    pub fn render_header<I: ContentItem + ?Sized>(
        &self,
        item: &I,
        index: usize,
        interactive: bool,
        probe: &dyn LayoutProbe,
    ) -> HeaderVisual {
        let label = self.template.render(&item.header());
        let natural_width = probe.measure_header(&label);
        HeaderVisual {
            index,
            label,
            natural_width,
            max_width: None,
            interactive,
            selected: false,
            aria_selected: false,
            hidden: false,
            opacity: 1.0,
            left: 0.0,
        }
    }

    /// Replace the label of every header showing item `index` in place.
    ///
    /// Returns how many headers were updated. Truncation follows the strip's
    /// current maximum header width.
    pub fn update_header_label<I: ContentItem + ?Sized>(
        &self,
        strip: &mut HeaderStrip,
        index: usize,
        item: &I,
        probe: &dyn LayoutProbe,
    ) -> usize {
        let label = self.template.render(&item.header());
        let natural_width = probe.measure_header(&label);
        let max_width = strip.max_header_width;
        let mut updated = 0;
        for visual in strip.visuals_mut().filter(|visual| visual.index == index) {
            visual.set_label(label.clone(), natural_width);
            visual.set_max_width(max_width.filter(|max| natural_width > *max));
            updated += 1;
        }
        updated
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Total width of the headers of the first `upto` items, margins included.
///
/// Headers are rendered provisionally after the strip's existing visuals,
/// measured from their laid-out bounds, and removed again, so the strip is
/// left as it was found. Returns 0 for `upto == 0`.
pub fn cumulative_header_width<'i, I>(
    strip: &mut HeaderStrip,
    renderer: &HeaderRenderer,
    items: impl IntoIterator<Item = &'i I>,
    upto: usize,
    margin: f32,
    rtl: bool,
    probe: &dyn LayoutProbe,
) -> f32
where
    I: ContentItem + ?Sized + 'i,
{
    let original = strip.len();
    for (index, item) in items.into_iter().take(upto).enumerate() {
        strip.push(renderer.render_header(item, index, false, probe));
    }
    let rendered = strip.len() - original;
    if rendered == 0 {
        return 0.0;
    }
    strip.layout(margin, rtl);

    let first = &strip.visuals()[original];
    let last = &strip.visuals()[original + rendered - 1];
    let (leftmost, rightmost) = if rtl { (last, first) } else { (first, last) };
    let width = rightmost.left() + rightmost.width() - leftmost.left() + 2.0 * margin;

    strip.truncate(original);
    strip.layout(margin, rtl);
    width
}

/// Leading-edge position of `visual` within a container `container_width`
/// wide, measured from the right edge for right-to-left flow.
#[must_use]
pub fn header_offset(visual: &HeaderVisual, container_width: f32, rtl: bool) -> f32 {
    if rtl {
        container_width - (visual.left() + visual.width())
    } else {
        visual.left()
    }
}
