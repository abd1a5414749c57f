//! Overflow header layout.
//!
//! Renders a rotating window of `len + leading` headers starting `leading`
//! items before the selection, wrapping around the item list. `leading` is
//! one normally and two right after a backward navigation, where the extra
//! header fades out and is removed. The first rendered header is only a peek
//! affordance: it is not interactive and is hidden from assistive
//! technology. Headers wider than a fraction of the area are truncated.

use pivot_core::animation::Tween;

use super::{HeaderContext, HeaderEffect};
use crate::header::{HeaderStrip, header_offset};
use crate::item::ContentItem;

#[derive(Debug)]
pub(crate) struct OverflowHeaders {
    /// Set while the entry slide runs; renders are dropped until it ends.
    blocked: bool,
}

impl OverflowHeaders {
    /// Enter the overflow layout.
    ///
    /// With a rendered, selected strip the whole strip first slides so the
    /// selected header lands where the overflow layout will place it, and
    /// only then is the window rendered.
    pub(crate) fn enter<I: ContentItem + ?Sized>(cx: &mut HeaderContext<'_, I>) -> Self {
        let mut headers = Self { blocked: false };

        let start = cx.strip.selected_slot().and_then(|slot| {
            let container = cx.strip.container_width();
            cx.strip
                .visuals()
                .get(slot)
                .map(|visual| header_offset(visual, container, cx.rtl))
        });

        match (start, cx.selected) {
            (Some(start), Some(selected)) if cx.animate() && !cx.items_staged => {
                let end = leading_extent(cx, selected);
                let offset = cx.physical(end - start);
                headers.blocked = true;
                let tween = cx.slide_tween(0.0, offset);
                cx.animations
                    .transition
                    .start(tween, HeaderEffect::EnterOverflow);
            }
            _ => headers.render(cx, false),
        }
        headers
    }

    pub(crate) fn exit<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        cx.animations.transition.cancel();
        cx.animations.slide.cancel();
        cx.animations.peek.cancel();
        self.blocked = false;
        cx.strip.translate_x = 0.0;
    }

    /// End of the entry slide.
    pub(crate) fn unblock<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        self.blocked = false;
        self.render(cx, false);
    }

    pub(crate) fn render<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        go_previous: bool,
    ) {
        if self.blocked || cx.items_staged {
            return;
        }
        cx.animations.peek.cancel();

        let area = cx.header_area_width();
        let max_width = area * cx.config.overflow_max_header_ratio;
        cx.strip.clear(area);
        cx.strip.max_header_width = Some(max_width);

        let len = cx.len();
        if len == 0 {
            return;
        }
        let selected = cx.selected.unwrap_or(0).min(len - 1);
        let forward = cx.config.overflow_leading_headers;
        let leading = match (len, go_previous) {
            (1, _) => 0,
            (_, true) => cx.config.overflow_leading_headers_backward,
            (_, false) => forward,
        };
        let count = if len == 1 { 1 } else { len + leading };
        let first = wrap(selected, -(leading as isize), len);

        for slot in 0..count {
            let index = (first + slot) % len;
            if let Some(mut visual) = cx.render_visual(index, true) {
                let natural = visual.width();
                visual.set_max_width((natural > max_width).then_some(max_width));
                cx.strip.push(visual);
            }
        }
        cx.strip.select_slot(leading);
        if len > 1 {
            mark_peek(cx.strip);
            cx.strip.nav_buttons = true;
        }
        cx.layout();

        if len > 1 && leading > forward {
            if cx.animate() {
                let generation = cx.strip.generation();
                cx.animations.peek.start(
                    Tween::progress(cx.config.peek_fade()),
                    HeaderEffect::PeekFade {
                        strip_generation: generation,
                    },
                );
            } else {
                drop_peek(cx);
            }
        }
    }

    pub(crate) fn handle_navigation<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        go_previous: bool,
        index: usize,
        old: Option<usize>,
    ) {
        // Settle a running peek fade first so offsets are measured on the
        // strip the slide will actually move.
        if let Some(finished) = cx.animations.peek.cancel()
            && let HeaderEffect::PeekFade { strip_generation } = finished.effect
            && strip_generation == cx.strip.generation()
        {
            drop_peek(cx);
        }

        let len = cx.len();
        let current = cx.strip.selected_slot();
        let (Some(old), Some(current), false, false) = (old, current, self.blocked, cx.first_load)
        else {
            self.render(cx, go_previous);
            return;
        };

        let target = if go_previous {
            current.checked_sub(1)
        } else {
            let step = (index as isize - old as isize).rem_euclid(len.max(1) as isize);
            Some(current + step as usize)
        };
        let target = target.filter(|slot| {
            cx.strip
                .visuals()
                .get(*slot)
                .is_some_and(|visual| visual.index() == index)
        });
        let Some(target) = target else {
            self.render(cx, go_previous);
            return;
        };
        if !cx.animate() {
            self.render(cx, go_previous);
            return;
        }

        let container = cx.strip.container_width();
        let visuals = cx.strip.visuals();
        let from = header_offset(&visuals[current], container, cx.rtl);
        let to = header_offset(&visuals[target], container, cx.rtl);
        cx.strip.select_slot(target);
        // The peek slot can become the selection mid-slide; it is a real tab
        // until the window is re-rendered.
        if let Some(visual) = cx.strip.visual_mut(target) {
            visual.interactive = true;
            visual.hidden = false;
        }

        let shift = cx.physical(from - to);
        let tween = cx.slide_tween(0.0, shift);
        cx.animations
            .slide
            .start(tween, HeaderEffect::NavigationSlide { go_previous });
    }
}

/// Remove the faded-out leading header.
pub(super) fn drop_peek<I: ContentItem + ?Sized>(cx: &mut HeaderContext<'_, I>) {
    if cx.strip.remove_first().is_some() {
        mark_peek(cx.strip);
        cx.layout();
    }
}

fn mark_peek(strip: &mut HeaderStrip) {
    if let Some(first) = strip.visual_mut(0) {
        first.interactive = false;
        first.hidden = true;
    }
}

/// Where the selected header sits in a forward overflow window: the
/// leading headers (truncated) plus margins.
fn leading_extent<I: ContentItem + ?Sized>(cx: &mut HeaderContext<'_, I>, selected: usize) -> f32 {
    let len = cx.len();
    let margin = cx.margin();
    let max_width = cx.header_area_width() * cx.config.overflow_max_header_ratio;
    let mut extent = margin;
    if len > 1 {
        for back in 1..=cx.config.overflow_leading_headers {
            let index = wrap(selected, -(back as isize), len);
            if let Some(visual) = cx.render_visual(index, false) {
                extent += visual.width().min(max_width) + 2.0 * margin;
            }
        }
    }
    extent
}

fn wrap(index: usize, delta: isize, len: usize) -> usize {
    (index as isize + delta).rem_euclid(len as isize) as usize
}
