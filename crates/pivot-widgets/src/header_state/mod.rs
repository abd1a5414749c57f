#![forbid(unsafe_code)]

//! Header layout state machine.
//!
//! The header strip is in exactly one of three states:
//!
//! - **Nop**: before the first items are applied and after dispose. Every
//!   operation is a no-op.
//! - **Static**: all headers fit the header area. Every item gets one header
//!   in item order.
//! - **Overflow**: the headers do not fit. A rotating window of headers
//!   starting just before the selection is rendered, with a partially
//!   visible peek header at the leading edge and navigation buttons.
//!
//! The active state is Overflow iff the cumulative header width exceeds the
//! header area width. [`HeaderState::refresh`] applies that rule, always
//! exiting the outgoing state before the incoming one is constructed.
//!
//! States never call back into the controller. They operate on a
//! [`HeaderContext`] that borrows exactly the controller fields they need,
//! and header activation is returned as a [`HeaderActivation`] intent that
//! the controller turns into a navigation.

mod overflow;
mod static_layout;

use std::fmt;

use pivot_core::animation::{AnimationSlot, Finished, Tween};
use web_time::Duration;

#[cfg(feature = "tracing")]
use web_time::Instant;

use crate::config::PivotConfig;
use crate::header::{HeaderRenderer, HeaderStrip, HeaderVisual, cumulative_header_width};
use crate::item::ContentItem;
use crate::panel::Panel;
use crate::probe::LayoutProbe;

pub(crate) use overflow::OverflowHeaders;
pub(crate) use static_layout::StaticHeaders;

/// Which header layout is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderStateKind {
    /// Nothing rendered.
    Nop,
    /// All headers fit.
    Static,
    /// Headers scroll in a rotating window.
    Overflow,
}

impl fmt::Display for HeaderStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nop => "nop",
            Self::Static => "static",
            Self::Overflow => "overflow",
        })
    }
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// Cached layout measurements. Invalidated together on resize.
#[derive(Debug, Clone, Default)]
pub(crate) struct Measurements {
    header_area: Option<f32>,
    viewport: Option<f32>,
    total_headers: Option<f32>,
}

impl Measurements {
    pub(crate) fn header_area_width(&mut self, probe: &dyn LayoutProbe) -> f32 {
        *self
            .header_area
            .get_or_insert_with(|| probe.header_area_width())
    }

    pub(crate) fn viewport_width(&mut self, probe: &dyn LayoutProbe) -> f32 {
        *self.viewport.get_or_insert_with(|| probe.viewport_width())
    }

    /// Cached (viewport, header area) widths, if measured.
    pub(crate) fn cached_widths(&self) -> (Option<f32>, Option<f32>) {
        (self.viewport, self.header_area)
    }

    pub(crate) fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn invalidate_headers(&mut self) {
        self.total_headers = None;
    }
}

// ---------------------------------------------------------------------------
// Animations
// ---------------------------------------------------------------------------

/// What a header animation drives and how it finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HeaderEffect {
    /// Overflow strip slide after a navigation; re-renders when done.
    NavigationSlide { go_previous: bool },
    /// Static entry transition from the previous layout's offset to 0.
    EnterStatic,
    /// Overflow entry slide; unblocks rendering when done.
    EnterOverflow,
    /// Fade-out of the header scrolled past on backward navigation.
    PeekFade { strip_generation: u64 },
}

/// Header animation slots.
#[derive(Debug, Default)]
pub(crate) struct HeaderAnimations {
    pub(crate) slide: AnimationSlot<HeaderEffect>,
    pub(crate) transition: AnimationSlot<HeaderEffect>,
    pub(crate) peek: AnimationSlot<HeaderEffect>,
}

impl HeaderAnimations {
    pub(crate) fn is_running(&self) -> bool {
        self.slide.is_running() || self.transition.is_running() || self.peek.is_running()
    }

    /// Advance every slot, returning tasks that ended.
    pub(crate) fn tick(&mut self, dt: Duration) -> Vec<Finished<HeaderEffect>> {
        [
            self.transition.tick(dt),
            self.slide.tick(dt),
            self.peek.tick(dt),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Write running animation values into the strip.
    pub(crate) fn apply(&self, strip: &mut HeaderStrip) {
        if let Some(x) = self.transition.current().or_else(|| self.slide.current()) {
            strip.translate_x = x;
        }
        if let (Some(progress), Some(HeaderEffect::PeekFade { strip_generation })) =
            (self.peek.progress(), self.peek.effect())
            && *strip_generation == strip.generation()
            && let Some(first) = strip.visual_mut(0)
        {
            first.opacity = 1.0 - progress;
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Controller state a header state operates on.
pub(crate) struct HeaderContext<'a, I: ContentItem + ?Sized> {
    pub(crate) panels: &'a [Panel<I>],
    pub(crate) selected: Option<usize>,
    pub(crate) strip: &'a mut HeaderStrip,
    pub(crate) renderer: &'a HeaderRenderer,
    pub(crate) probe: &'a dyn LayoutProbe,
    pub(crate) config: &'a PivotConfig,
    pub(crate) measurements: &'a mut Measurements,
    pub(crate) animations: &'a mut HeaderAnimations,
    pub(crate) rtl: bool,
    /// An item replacement is staged; renders are deferred until it applies.
    pub(crate) items_staged: bool,
    pub(crate) first_load: bool,
}

impl<I: ContentItem + ?Sized> HeaderContext<'_, I> {
    pub(crate) fn len(&self) -> usize {
        self.panels.len()
    }

    pub(crate) fn margin(&self) -> f32 {
        self.config.header_horizontal_margin
    }

    pub(crate) fn animate(&self) -> bool {
        self.config.animations_enabled
    }

    pub(crate) fn header_area_width(&mut self) -> f32 {
        self.measurements.header_area_width(self.probe)
    }

    /// Cumulative width of all headers, cached until the next invalidation.
    pub(crate) fn total_header_width(&mut self) -> f32 {
        if let Some(width) = self.measurements.total_headers {
            return width;
        }
        let width = self.cumulative_width(self.len());
        self.measurements.total_headers = Some(width);
        width
    }

    pub(crate) fn cumulative_width(&mut self, upto: usize) -> f32 {
        let margin = self.margin();
        cumulative_header_width(
            self.strip,
            self.renderer,
            self.panels.iter().map(|panel| &**panel.item()),
            upto,
            margin,
            self.rtl,
            self.probe,
        )
    }

    pub(crate) fn render_visual(&self, index: usize, interactive: bool) -> Option<HeaderVisual> {
        let panel = self.panels.get(index)?;
        Some(
            self.renderer
                .render_header(&**panel.item(), index, interactive, self.probe),
        )
    }

    pub(crate) fn layout(&mut self) {
        let margin = self.margin();
        self.strip.layout(margin, self.rtl);
    }

    /// Convert a logical (leading-edge) shift into a physical translation.
    pub(crate) fn physical(&self, logical: f32) -> f32 {
        if self.rtl { -logical } else { logical }
    }

    pub(crate) fn slide_tween(&self, from: f32, to: f32) -> Tween {
        Tween::new(from, to, self.config.header_slide())
            .easing(pivot_core::animation::ease_out)
    }
}

/// Header tap resolved to a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderActivation {
    pub(crate) index: usize,
    pub(crate) go_previous: bool,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Active header layout.
#[derive(Debug, Default)]
pub(crate) enum HeaderState {
    #[default]
    Nop,
    Static(StaticHeaders),
    Overflow(OverflowHeaders),
}

impl HeaderState {
    pub(crate) fn kind(&self) -> HeaderStateKind {
        match self {
            Self::Nop => HeaderStateKind::Nop,
            Self::Static(_) => HeaderStateKind::Static,
            Self::Overflow(_) => HeaderStateKind::Overflow,
        }
    }

    /// Tear down state-owned work. The strip is left for the next state.
    pub(crate) fn exit<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        match self {
            Self::Nop => {}
            Self::Static(headers) => headers.exit(cx),
            Self::Overflow(headers) => headers.exit(cx),
        }
    }

    /// Rebuild the strip from the current items and selection.
    pub(crate) fn render<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        go_previous: bool,
    ) {
        #[cfg(feature = "tracing")]
        let render_start = Instant::now();
        #[cfg(feature = "tracing")]
        let render_span = tracing::debug_span!(
            "pivot.headers.render",
            state = %self.kind(),
            item_count = cx.len(),
            go_previous,
            render_duration_us = tracing::field::Empty
        );
        #[cfg(feature = "tracing")]
        let _render_guard = render_span.enter();

        match self {
            Self::Nop => {}
            Self::Static(headers) => headers.render(cx),
            Self::Overflow(headers) => headers.render(cx, go_previous),
        }

        #[cfg(feature = "tracing")]
        {
            let elapsed_us = render_start.elapsed().as_micros() as u64;
            render_span.record("render_duration_us", elapsed_us);
        }
    }

    /// Resolve a tap on the header at `slot`.
    ///
    /// Returns `None` for non-interactive headers and for the header that is
    /// already selected.
    pub(crate) fn activate_header(
        &self,
        strip: &HeaderStrip,
        slot: usize,
        selected: Option<usize>,
    ) -> Option<HeaderActivation> {
        let visual = strip.visuals().get(slot)?;
        if !visual.is_interactive() || selected == Some(visual.index()) {
            return None;
        }
        let go_previous = match self {
            Self::Nop => return None,
            Self::Static(_) => selected.is_some_and(|selected| visual.index() < selected),
            Self::Overflow(_) => strip.selected_slot().is_some_and(|current| slot < current),
        };
        Some(HeaderActivation {
            index: visual.index(),
            go_previous,
        })
    }

    /// Update the strip for a selection change from `old` to `index`.
    pub(crate) fn handle_navigation<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        go_previous: bool,
        index: usize,
        old: Option<usize>,
    ) {
        match self {
            Self::Nop => {}
            Self::Static(headers) => headers.handle_navigation(cx, index),
            Self::Overflow(headers) => headers.handle_navigation(cx, go_previous, index, old),
        }
    }

    /// Re-evaluate the layout after the header area changed size.
    pub(crate) fn handle_resize<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        if matches!(self, Self::Nop) {
            return;
        }
        cx.measurements.invalidate_headers();
        if !self.refresh(cx) {
            self.render(cx, false);
        }
    }

    /// Refresh the headers of item `index` after its label changed.
    pub(crate) fn handle_header_label_changed<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        index: usize,
    ) {
        if matches!(self, Self::Nop) {
            return;
        }
        let Some(panel) = cx.panels.get(index) else {
            return;
        };
        cx.renderer
            .update_header_label(cx.strip, index, &**panel.item(), cx.probe);
        cx.layout();
        cx.measurements.invalidate_headers();
        self.refresh(cx);
    }

    /// Finalize a header animation that ended, whether it completed or was
    /// cancelled.
    pub(crate) fn on_animation_finished<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        finished: Finished<HeaderEffect>,
    ) {
        match finished.effect {
            HeaderEffect::NavigationSlide { go_previous } => {
                cx.strip.translate_x = 0.0;
                if let Self::Overflow(headers) = self {
                    headers.render(cx, go_previous);
                }
            }
            HeaderEffect::EnterStatic => cx.strip.translate_x = 0.0,
            HeaderEffect::EnterOverflow => {
                cx.strip.translate_x = 0.0;
                if let Self::Overflow(headers) = self {
                    headers.unblock(cx);
                }
            }
            HeaderEffect::PeekFade { strip_generation } => {
                if strip_generation == cx.strip.generation() {
                    overflow::drop_peek(cx);
                }
            }
        }
    }

    /// Apply the layout rule: Overflow iff the headers do not fit.
    ///
    /// Returns whether the state changed.
    pub(crate) fn refresh<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) -> bool {
        let total = cx.total_header_width();
        let area = cx.header_area_width();
        let wanted = if total > area {
            HeaderStateKind::Overflow
        } else {
            HeaderStateKind::Static
        };
        let from = self.kind();
        if from == wanted {
            return false;
        }

        self.exit(cx);
        *self = match wanted {
            HeaderStateKind::Overflow => Self::Overflow(OverflowHeaders::enter(cx)),
            _ => Self::Static(StaticHeaders::enter(cx)),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "pivot.header_state",
            from = %from,
            to = %wanted,
            total_width = total,
            area_width = area
        );
        true
    }

    /// Leave the current state for Nop.
    pub(crate) fn reset<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        self.exit(cx);
        *self = Self::Nop;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::{FixedProbe, Label};
    use std::rc::Rc;

    /// Owned pieces a [`HeaderContext`] borrows from.
    pub(crate) struct Rig {
        pub(crate) panels: Vec<Panel<Label>>,
        pub(crate) selected: Option<usize>,
        pub(crate) strip: HeaderStrip,
        pub(crate) renderer: HeaderRenderer,
        pub(crate) probe: FixedProbe,
        pub(crate) config: PivotConfig,
        pub(crate) measurements: Measurements,
        pub(crate) animations: HeaderAnimations,
    }

    impl Rig {
        pub(crate) fn new(labels: &[&str], probe: FixedProbe) -> Self {
            Self {
                panels: labels
                    .iter()
                    .map(|label| Panel::hidden(Rc::new(Label::new(label))))
                    .collect(),
                selected: (!labels.is_empty()).then_some(0),
                strip: HeaderStrip::default(),
                renderer: HeaderRenderer::default(),
                probe,
                config: PivotConfig::default(),
                measurements: Measurements::default(),
                animations: HeaderAnimations::default(),
            }
        }

        pub(crate) fn cx(&mut self) -> HeaderContext<'_, Label> {
            HeaderContext {
                panels: &self.panels,
                selected: self.selected,
                strip: &mut self.strip,
                renderer: &self.renderer,
                probe: &self.probe,
                config: &self.config,
                measurements: &mut self.measurements,
                animations: &mut self.animations,
                rtl: self.probe.rtl,
                items_staged: false,
                first_load: false,
            }
        }

        /// Run header animations to completion.
        pub(crate) fn settle(&mut self, state: &mut HeaderState) {
            for _ in 0..64 {
                if !self.animations.is_running() {
                    return;
                }
                let finished = self.animations.tick(Duration::from_millis(50));
                self.animations.apply(&mut self.strip);
                let mut cx = self.cx();
                for task in finished {
                    state.on_animation_finished(&mut cx, task);
                }
            }
        }
    }

    #[test]
    fn fitting_headers_enter_static() {
        let mut rig = Rig::new(&["a", "b", "c"], FixedProbe::new(400.0));
        let mut state = HeaderState::Nop;
        assert!(state.refresh(&mut rig.cx()));
        assert_eq!(state.kind(), HeaderStateKind::Static);
        assert_eq!(rig.strip.indices(), vec![0, 1, 2]);
        assert!(!state.refresh(&mut rig.cx()));
    }

    #[test]
    fn wide_headers_enter_overflow() {
        // Five 100px headers with 12px margins need 620px.
        let mut rig = Rig::new(
            &["a", "b", "c", "d", "e"],
            FixedProbe::new(400.0).with_default_width(100.0),
        );
        rig.config.animations_enabled = false;
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Overflow);
        assert!(rig.strip.has_nav_buttons());
    }

    #[test]
    fn boundary_width_stays_static() {
        // Two 76px headers plus margins are exactly 200px.
        let mut rig = Rig::new(&["a", "b"], FixedProbe::new(200.0).with_default_width(76.0));
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Static);
    }

    #[test]
    fn nop_ignores_everything() {
        let mut rig = Rig::new(&["a"], FixedProbe::new(400.0));
        let mut state = HeaderState::Nop;
        state.render(&mut rig.cx(), false);
        state.handle_navigation(&mut rig.cx(), false, 0, None);
        state.handle_resize(&mut rig.cx());
        state.handle_header_label_changed(&mut rig.cx(), 0);
        assert!(rig.strip.is_empty());
        assert_eq!(state.kind(), HeaderStateKind::Nop);
    }

    #[test]
    fn resize_switches_state() {
        let mut rig = Rig::new(&["a", "b", "c"], FixedProbe::new(400.0).with_default_width(100.0));
        rig.config.animations_enabled = false;
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Static);

        rig.probe.area = 300.0;
        rig.measurements.invalidate();
        state.handle_resize(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Overflow);

        rig.probe.area = 1000.0;
        rig.measurements.invalidate();
        state.handle_resize(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Static);
        assert!(!rig.strip.has_nav_buttons());
    }

    #[test]
    fn label_growth_switches_to_overflow() {
        let mut rig = Rig::new(
            &["a", "b"],
            FixedProbe::new(300.0).with_width("a very long header", 400.0),
        );
        rig.config.animations_enabled = false;
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        assert_eq!(state.kind(), HeaderStateKind::Static);

        rig.panels[1].item().set("a very long header");
        state.handle_header_label_changed(&mut rig.cx(), 1);
        assert_eq!(state.kind(), HeaderStateKind::Overflow);
        assert!(rig.strip.labels().contains(&"a very long header"));
    }

    #[test]
    fn activation_resolves_direction() {
        let mut rig = Rig::new(&["a", "b", "c"], FixedProbe::new(400.0));
        rig.selected = Some(1);
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        assert_eq!(
            state.activate_header(&rig.strip, 0, rig.selected),
            Some(HeaderActivation {
                index: 0,
                go_previous: true
            })
        );
        assert_eq!(
            state.activate_header(&rig.strip, 2, rig.selected),
            Some(HeaderActivation {
                index: 2,
                go_previous: false
            })
        );
        assert_eq!(state.activate_header(&rig.strip, 1, rig.selected), None);
        assert_eq!(state.activate_header(&rig.strip, 9, rig.selected), None);
    }

    #[test]
    fn exit_cancels_state_animations() {
        let mut rig = Rig::new(&["a", "b", "c"], FixedProbe::new(400.0).with_default_width(100.0));
        let mut state = HeaderState::Nop;
        state.refresh(&mut rig.cx());
        rig.selected = Some(2);
        state.render(&mut rig.cx(), false);

        // Shrinking with headers present plays the overflow entry slide.
        rig.probe.area = 300.0;
        rig.measurements.invalidate();
        state.handle_resize(&mut rig.cx());
        assert!(rig.animations.transition.is_running());

        state.reset(&mut rig.cx());
        assert!(!rig.animations.is_running());
        assert_eq!(rig.strip.translate_x(), 0.0);
    }
}
