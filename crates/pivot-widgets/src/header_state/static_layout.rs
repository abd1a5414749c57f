//! Static header layout: every header fits, one per item in item order.

use super::{HeaderContext, HeaderEffect};
use crate::header::header_offset;
use crate::item::ContentItem;

#[derive(Debug)]
pub(crate) struct StaticHeaders;

impl StaticHeaders {
    /// Enter the static layout.
    ///
    /// When a rendered strip with a selected header is being replaced, the
    /// new strip starts translated so the selected header appears where it
    /// was, then slides into place.
    pub(crate) fn enter<I: ContentItem + ?Sized>(cx: &mut HeaderContext<'_, I>) -> Self {
        let mut headers = Self;

        let start = cx.strip.selected_slot().and_then(|slot| {
            let container = cx.strip.container_width();
            cx.strip
                .visuals()
                .get(slot)
                .map(|visual| header_offset(visual, container, cx.rtl))
        });

        headers.render(cx);

        if let (Some(start), Some(selected), true) = (start, cx.selected, cx.animate())
            && !cx.items_staged
        {
            let end = cx.cumulative_width(selected) + cx.margin();
            let offset = cx.physical(start - end);
            if offset != 0.0 {
                cx.strip.translate_x = offset;
                let tween = cx.slide_tween(offset, 0.0);
                cx.animations.transition.start(tween, HeaderEffect::EnterStatic);
            }
        }
        headers
    }

    pub(crate) fn exit<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        if cx.animations.transition.cancel().is_some() {
            cx.strip.translate_x = 0.0;
        }
    }

    pub(crate) fn render<I: ContentItem + ?Sized>(&mut self, cx: &mut HeaderContext<'_, I>) {
        if cx.items_staged {
            return;
        }
        let area = cx.header_area_width();
        cx.strip.clear(area);
        for index in 0..cx.len() {
            if let Some(visual) = cx.render_visual(index, true) {
                cx.strip.push(visual);
            }
        }
        if let Some(selected) = cx.selected.filter(|selected| *selected < cx.strip.len()) {
            cx.strip.select_slot(selected);
        }
        cx.layout();
    }

    pub(crate) fn handle_navigation<I: ContentItem + ?Sized>(
        &mut self,
        cx: &mut HeaderContext<'_, I>,
        index: usize,
    ) {
        if cx.strip.len() != cx.len() {
            self.render(cx);
            return;
        }
        cx.strip.select_slot(index);
    }
}
