#![forbid(unsafe_code)]

//! The pivot controller.
//!
//! [`PivotController`] owns the selection, sequences the item hide/show
//! animations, interprets keyboard and pointer input, adapts collection
//! mutations, and drives the header state machine.
//!
//! # Scheduling
//!
//! The controller never blocks and never spawns. Asynchronous work (staged
//! item replacement, collection notifications, animations, lazy item
//! activation) advances only through [`tick`](PivotController::tick), which
//! hosts call once per frame, or [`flush`](PivotController::flush), which
//! does the non-time-based part of a tick.
//!
//! Navigation is applied to the selection synchronously and in request
//! order. Its visual consequences run in single-outstanding animation slots:
//! at most one hide, one show, and one header slide are in flight, and a new
//! navigation cancels and finalizes the older ones before starting its own.
//!
//! # Invariants
//!
//! 1. `selected_index()` is `None` iff the pivot shows no items; otherwise it
//!    is in `[0, len)`.
//! 2. Panels are kept in the bound list's order, one per item, and every
//!    item appears at most once.
//! 3. Every animation that ends, completed or cancelled, is finalized:
//!    hidden panels are invisible, shown panels are opaque and in place.
//! 4. After [`dispose`](PivotController::dispose) every operation is a
//!    no-op.

use std::rc::Rc;

use pivot_core::animation::{AnimationSlot, Finished, Outcome, Tween, ease_out_cubic};
use pivot_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, PointerEvent, PointerEventKind, PointerType,
};
use pivot_core::geometry::Point;
use pivot_core::gesture::{SwipeContext, SwipeOutcome, SwipeRecognizer};
use web_time::Duration;

use crate::collection::{
    ItemList, ListChange, Mutation, SelectionUpdate, Subscription, rebase_selection,
};
use crate::config::PivotConfig;
use crate::error::{PivotError, Result};
use crate::event::{Direction, PivotEvent};
use crate::header::{HeaderRenderer, HeaderStrip, HeaderTemplate};
use crate::header_state::{
    HeaderAnimations, HeaderContext, HeaderState, HeaderStateKind, Measurements,
};
use crate::host::{HostBinding, HostElement};
use crate::item::{Activation, ContentItem};
use crate::panel::{Panel, position_of};
use crate::probe::LayoutProbe;

/// Header-strip navigation buttons, by physical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavButton {
    /// Left button: previous item, or next in right-to-left layout.
    Left,
    /// Right button: next item, or previous in right-to-left layout.
    Right,
}

enum ItemEffect<I> {
    Hide { item: Rc<I> },
    Show { item: Rc<I>, from: f32 },
}

/// Show step waiting for the outgoing hide and the item's activation.
struct PendingShow<I> {
    item: Rc<I>,
    go_previous: bool,
    /// Generation of the hide animation still to finish.
    awaiting_hide: Option<u64>,
}

/// Pivot controller bound to one host element.
pub struct PivotController<I: ContentItem> {
    binding: HostBinding,
    config: PivotConfig,
    probe: Box<dyn LayoutProbe>,
    renderer: HeaderRenderer,

    items: ItemList<I>,
    subscription: Option<Subscription<I>>,
    pending_items: Option<ItemList<I>>,
    pending_index: Option<usize>,
    apply_scheduled: bool,

    panels: Vec<Panel<I>>,
    selected: Option<usize>,
    locked: bool,
    rtl: bool,
    animate_to_previous: bool,
    first_load: bool,
    viewport_scroll: f32,

    header_state: HeaderState,
    strip: HeaderStrip,
    measurements: Measurements,
    header_animations: HeaderAnimations,

    hide: AnimationSlot<ItemEffect<I>>,
    show: AnimationSlot<ItemEffect<I>>,
    pending_show: Option<PendingShow<I>>,

    swipe: SwipeRecognizer,
    pointer_down_slot: Option<usize>,
    events: Vec<PivotEvent<I>>,
    disposed: bool,
}

impl<I: ContentItem> std::fmt::Debug for PivotController<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PivotController")
            .field("len", &self.panels.len())
            .field("selected", &self.selected)
            .field("header_state", &self.header_state.kind())
            .field("locked", &self.locked)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl<I: ContentItem> PivotController<I> {
    /// Bind a pivot to `host` showing `items`.
    ///
    /// The items are staged; they are applied (and the first item selected)
    /// on the next [`flush`](Self::flush) or [`tick`](Self::tick).
    ///
    /// # Errors
    ///
    /// [`PivotError::AlreadyBound`] if `host` already has a pivot,
    /// [`PivotError::DuplicateItem`] if `items` contains an item twice, and
    /// [`PivotError::Config`] if `config` does not validate.
    pub fn new(
        host: &HostElement,
        items: ItemList<I>,
        probe: impl LayoutProbe + 'static,
        config: PivotConfig,
    ) -> Result<Self> {
        config.validate()?;
        ensure_unique(&items.to_vec())?;
        let binding = host.bind()?;
        let rtl = probe.is_rtl();
        let swipe = SwipeRecognizer::new(config.swipe.clone());
        Ok(Self {
            binding,
            config,
            probe: Box::new(probe),
            renderer: HeaderRenderer::default(),
            items: ItemList::new(),
            subscription: None,
            pending_items: Some(items),
            pending_index: None,
            apply_scheduled: true,
            panels: Vec::new(),
            selected: None,
            locked: false,
            rtl,
            animate_to_previous: false,
            first_load: false,
            viewport_scroll: 0.0,
            header_state: HeaderState::Nop,
            strip: HeaderStrip::default(),
            measurements: Measurements::default(),
            header_animations: HeaderAnimations::default(),
            hide: AnimationSlot::new(),
            show: AnimationSlot::new(),
            pending_show: None,
            swipe,
            pointer_down_slot: None,
            events: Vec::new(),
            disposed: false,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &PivotConfig {
        &self.config
    }

    /// The item list: the staged replacement if there is one, otherwise the
    /// bound list.
    #[must_use]
    pub fn items(&self) -> ItemList<I> {
        self.pending_items
            .as_ref()
            .unwrap_or(&self.items)
            .clone()
    }

    /// Selected index. While a replacement is staged this is the index that
    /// will be selected once it applies, clamped to the staged list.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match &self.pending_items {
            Some(items) => {
                let last = items.len().checked_sub(1)?;
                Some(self.pending_index.unwrap_or(0).min(last))
            }
            None => self.selected,
        }
    }

    /// Selected item.
    #[must_use]
    pub fn selected_item(&self) -> Option<Rc<I>> {
        let index = self.selected_index()?;
        match &self.pending_items {
            Some(items) => items.get(index),
            None => self.panels.get(index).map(|panel| Rc::clone(panel.item())),
        }
    }

    /// Whether user navigation is suppressed.
    #[inline]
    #[must_use]
    pub const fn locked(&self) -> bool {
        self.locked
    }

    /// Layout direction as of the last navigation or resize.
    #[inline]
    #[must_use]
    pub const fn rtl(&self) -> bool {
        self.rtl
    }

    /// Active header layout.
    #[must_use]
    pub fn header_state_kind(&self) -> HeaderStateKind {
        self.header_state.kind()
    }

    /// Rendered header strip.
    #[must_use]
    pub fn header_strip(&self) -> &HeaderStrip {
        &self.strip
    }

    /// Content panels in item order.
    #[must_use]
    pub fn panels(&self) -> &[Panel<I>] {
        &self.panels
    }

    /// Horizontal scroll of the panel viewport. Recentered to one viewport
    /// width before each show and on resize.
    #[inline]
    #[must_use]
    pub const fn viewport_scroll(&self) -> f32 {
        self.viewport_scroll
    }

    /// Whether any item or header animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.hide.is_running() || self.show.is_running() || self.header_animations.is_running()
    }

    /// Whether an item is waiting for its hide or activation to finish
    /// before it is shown.
    #[must_use]
    pub fn is_show_pending(&self) -> bool {
        self.pending_show.is_some()
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[inline]
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<PivotEvent<I>> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Items and selection
    // -----------------------------------------------------------------------

    /// Stage `items` as the new list. It is applied on the next flush, and
    /// selection starts at index 0 unless
    /// [`set_selected_index`](Self::set_selected_index) records another.
    ///
    /// # Errors
    ///
    /// [`PivotError::DuplicateItem`] if `items` contains an item twice.
    pub fn set_items(&mut self, items: ItemList<I>) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        ensure_unique(&items.to_vec())?;
        self.pending_items = Some(items);
        self.pending_index = None;
        self.apply_scheduled = true;
        Ok(())
    }

    /// Select `index`. Out-of-range and unchanged indices are ignored. While
    /// a replacement is staged only the intent is recorded.
    pub fn set_selected_index(&mut self, index: usize) {
        if self.disposed {
            return;
        }
        if let Some(items) = &self.pending_items {
            if index < items.len() {
                self.pending_index = Some(index);
            }
            return;
        }
        if index >= self.panels.len() || self.selected == Some(index) {
            return;
        }
        let previous = self.current_item();
        self.load_item(index, previous);
    }

    /// Select `item`. Ignored for items not in the list.
    pub fn set_selected_item(&mut self, item: &Rc<I>) {
        let index = match &self.pending_items {
            Some(items) => items.index_of(item),
            None => position_of(&self.panels, item),
        };
        if let Some(index) = index {
            self.set_selected_index(index);
        }
    }

    /// Select the next item, wrapping to the first.
    pub fn go_next(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().map_or(0, |index| (index + 1) % len);
        self.set_selected_index(next);
    }

    /// Select the previous item, wrapping to the last.
    pub fn go_previous(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let previous = self
            .selected_index()
            .map_or(0, |index| (index + len - 1) % len);
        self.animate_to_previous = true;
        self.set_selected_index(previous);
        self.animate_to_previous = false;
    }

    /// Suppress or allow user navigation (keys, swipes, header taps, and
    /// navigation buttons). Programmatic selection still works.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.swipe.reset();
            self.pointer_down_slot = None;
            self.strip.nav_buttons_visible = false;
        }
    }

    /// Replace the header template and re-render the headers.
    pub fn set_header_template(&mut self, template: impl HeaderTemplate + 'static) {
        self.renderer = HeaderRenderer::new(template);
        if !self.disposed {
            self.rerender_headers();
        }
    }

    fn len(&self) -> usize {
        self.pending_items
            .as_ref()
            .map_or(self.panels.len(), ItemList::len)
    }

    fn current_item(&self) -> Option<Rc<I>> {
        self.selected
            .and_then(|index| self.panels.get(index))
            .map(|panel| Rc::clone(panel.item()))
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Dispatch an input event. Returns whether it navigated.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize => {
                self.handle_resize();
                false
            }
        }
    }

    /// Keyboard navigation. Returns whether the key navigated.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.disposed || self.locked || key.kind == KeyEventKind::Release {
            return false;
        }
        self.rtl = self.probe.is_rtl();
        let backward = match key.code {
            KeyCode::Left | KeyCode::PageUp => !self.rtl,
            KeyCode::Right | KeyCode::PageDown => self.rtl,
            _ => return false,
        };
        if backward {
            self.go_previous();
        } else {
            self.go_next();
        }
        true
    }

    /// Pointer input: swipes, header taps, and navigation-button hover.
    /// Returns whether the pointer navigated.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.disposed {
            return false;
        }
        let (x, y) = event.position();
        let point = Point::new(x, y);
        let cx = SwipeContext {
            viewport_width: self.measurements.viewport_width(&*self.probe),
            rtl: self.rtl,
            header_bounds: self.probe.header_bounds(),
            content_swipe_enabled: self.config.content_swipe_enabled,
        };

        match event.kind {
            PointerEventKind::Enter => {
                self.swipe.process(event, &cx);
                if self.swipe.pointer_type() == Some(PointerType::Mouse) && !self.locked {
                    self.strip.nav_buttons_visible = true;
                }
                false
            }
            PointerEventKind::Leave => {
                self.swipe.process(event, &cx);
                self.strip.nav_buttons_visible = false;
                false
            }
            PointerEventKind::Down => {
                self.pointer_down_slot = self.header_slot_at(point);
                self.swipe.process(event, &cx);
                false
            }
            PointerEventKind::Up => {
                let down_slot = self.pointer_down_slot.take();
                if self.locked {
                    self.swipe.reset();
                    return false;
                }
                match self.swipe.process(event, &cx) {
                    SwipeOutcome::Next => {
                        self.go_next();
                        true
                    }
                    SwipeOutcome::Previous => {
                        self.go_previous();
                        true
                    }
                    SwipeOutcome::Unhandled => match self.header_slot_at(point) {
                        Some(slot) if down_slot == Some(slot) => self.activate_header(slot),
                        _ => false,
                    },
                }
            }
        }
    }

    /// Activate the header at `slot` as if tapped. Returns whether the
    /// selection changed.
    pub fn activate_header(&mut self, slot: usize) -> bool {
        if self.disposed || self.locked {
            return false;
        }
        let Some(activation) = self
            .header_state
            .activate_header(&self.strip, slot, self.selected)
        else {
            return false;
        };
        self.animate_to_previous = activation.go_previous;
        self.set_selected_index(activation.index);
        self.animate_to_previous = false;
        true
    }

    /// An accessibility layer toggled the selection state of the header at
    /// `slot`. Selecting a different header navigates to it; anything else
    /// is reverted to match the real selection.
    pub fn handle_header_selection_changed(&mut self, slot: usize, selected: bool) {
        if self.disposed {
            return;
        }
        if selected && self.activate_header(slot) {
            return;
        }
        if let Some(visual) = self.strip.visual_mut(slot) {
            visual.aria_selected = visual.selected;
        }
    }

    /// Press a navigation button. Returns whether it navigated.
    pub fn press_nav_button(&mut self, button: NavButton) -> bool {
        if self.disposed || self.locked || !self.strip.has_nav_buttons() {
            return false;
        }
        let backward = match button {
            NavButton::Left => !self.rtl,
            NavButton::Right => self.rtl,
        };
        if backward {
            self.go_previous();
        } else {
            self.go_next();
        }
        true
    }

    fn header_slot_at(&self, point: Point) -> Option<usize> {
        let bounds = self.probe.header_bounds();
        if !bounds.contains(point) {
            return None;
        }
        self.strip.slot_at(point.x - bounds.x)
    }

    // -----------------------------------------------------------------------
    // Layout changes
    // -----------------------------------------------------------------------

    /// The viewport or header area may have changed size. Reacts only when
    /// a measured width actually changed.
    pub fn handle_resize(&mut self) {
        if self.disposed || self.apply_scheduled {
            return;
        }
        let (old_viewport, old_area) = self.measurements.cached_widths();
        self.measurements.invalidate();
        let viewport = self.measurements.viewport_width(&*self.probe);
        let area = self.measurements.header_area_width(&*self.probe);
        self.rtl = self.probe.is_rtl();
        if old_viewport == Some(viewport) && old_area == Some(area) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "pivot.resize",
            viewport_width = viewport,
            header_area_width = area
        );

        self.cancel_item_animations();
        self.recenter();
        let (state, mut cx) = self.headers();
        state.handle_resize(&mut cx);
        self.advance_pending_show();
    }

    /// `item`'s header label changed.
    pub fn notify_header_changed(&mut self, item: &Rc<I>) {
        if self.disposed || self.apply_scheduled {
            return;
        }
        let Some(index) = position_of(&self.panels, item) else {
            return;
        };
        let (state, mut cx) = self.headers();
        state.handle_header_label_changed(&mut cx, index);
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Advance the pivot by `dt`: apply staged items, process collection
    /// changes, advance animations, and poll pending activations.
    ///
    /// # Errors
    ///
    /// [`PivotError::DuplicateItem`] if the list gained an item it already
    /// contains.
    pub fn tick(&mut self, dt: Duration) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.flush()?;

        if let Some(finished) = self.hide.tick(dt) {
            self.finish_item_animation(finished);
        }
        if let Some(finished) = self.show.tick(dt) {
            self.finish_item_animation(finished);
        }
        self.apply_item_animations();

        let finished = self.header_animations.tick(dt);
        self.header_animations.apply(&mut self.strip);
        if !finished.is_empty() {
            let (state, mut cx) = self.headers();
            for task in finished {
                state.on_animation_finished(&mut cx, task);
            }
        }

        self.advance_pending_show();
        Ok(())
    }

    /// Apply staged items and process collection changes without advancing
    /// time.
    ///
    /// # Errors
    ///
    /// See [`tick`](Self::tick).
    pub fn flush(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        loop {
            if self.apply_scheduled {
                self.apply_pending_items()?;
            }
            self.process_changes()?;
            if !self.apply_scheduled {
                return Ok(());
            }
        }
    }

    /// Tear the pivot down. Animations are finalized, the collection
    /// subscription is dropped, and the host element is released.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_item_animations();
        self.pending_show = None;
        {
            let (state, mut cx) = self.headers();
            state.reset(&mut cx);
        }
        self.header_animations.peek.cancel();
        self.subscription = None;
        self.pending_items = None;
        self.apply_scheduled = false;
        self.disposed = true;
        self.binding.release();

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "pivot.dispose", len = self.panels.len());
    }

    // -----------------------------------------------------------------------
    // Item transitions
    // -----------------------------------------------------------------------

    fn load_item(&mut self, index: usize, previous: Option<Rc<I>>) {
        let Some(item) = self.panels.get(index).map(|panel| Rc::clone(panel.item())) else {
            return;
        };
        let go_previous = self.animate_to_previous;
        self.cancel_item_animations();
        self.rtl = self.probe.is_rtl();

        let old = self.selected;
        let awaiting_hide = previous
            .filter(|previous| !Rc::ptr_eq(previous, &item))
            .and_then(|previous| self.start_hide(previous));

        self.selected = Some(index);
        {
            let (state, mut cx) = self.headers();
            state.handle_navigation(&mut cx, go_previous, index, old);
        }
        let direction = if go_previous {
            Direction::Backward
        } else {
            Direction::Forward
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "pivot.navigate",
            from = ?old,
            to = index,
            direction = ?direction
        );

        self.events.push(PivotEvent::SelectionChanged {
            index,
            direction,
            item: Rc::clone(&item),
        });
        self.pending_show = Some(PendingShow {
            item,
            go_previous,
            awaiting_hide,
        });
        self.advance_pending_show();
    }

    /// Fade `item` out. Returns the hide task's generation, or `None` if it
    /// was hidden at once.
    fn start_hide(&mut self, item: Rc<I>) -> Option<u64> {
        if !self.config.animations_enabled {
            if let Some(position) = position_of(&self.panels, &item) {
                self.panels[position].hide();
            }
            return None;
        }
        let tween = Tween::progress(self.config.item_hide());
        let (generation, superseded) = self.hide.start(tween, ItemEffect::Hide { item });
        if let Some(superseded) = superseded {
            self.finish_item_animation(superseded);
        }
        Some(generation)
    }

    /// Show the pending item once its hide has finished and it is active.
    fn advance_pending_show(&mut self) {
        let Some(pending) = &self.pending_show else {
            return;
        };
        if pending.awaiting_hide.is_some() || pending.item.activate() == Activation::Pending {
            return;
        }
        let Some(pending) = self.pending_show.take() else {
            return;
        };
        let Some(position) = position_of(&self.panels, &pending.item) else {
            return;
        };

        self.recenter();
        let negative = if self.rtl {
            !pending.go_previous
        } else {
            pending.go_previous
        };
        let offset = self.config.item_show_offset;
        let from = if negative { -offset } else { offset };
        let panel = &mut self.panels[position];
        panel.visible = true;
        panel.opacity = 0.0;
        panel.translate_x = from;
        self.events.push(PivotEvent::ItemAnimationStart);

        let effect = ItemEffect::Show {
            item: pending.item,
            from,
        };
        if self.config.animations_enabled {
            let tween = Tween::progress(self.config.item_show()).easing(ease_out_cubic);
            let (_, superseded) = self.show.start(tween, effect);
            if let Some(superseded) = superseded {
                self.finish_item_animation(superseded);
            }
        } else {
            self.finish_item_animation(Finished {
                effect,
                outcome: Outcome::Completed,
                generation: self.show.generation(),
            });
        }
    }

    fn finish_item_animation(&mut self, finished: Finished<ItemEffect<I>>) {
        match finished.effect {
            ItemEffect::Hide { item } => {
                if let Some(position) = position_of(&self.panels, &item) {
                    self.panels[position].hide();
                }
                if let Some(pending) = &mut self.pending_show
                    && pending.awaiting_hide == Some(finished.generation)
                {
                    pending.awaiting_hide = None;
                }
            }
            ItemEffect::Show { item, .. } => {
                if let Some(position) = position_of(&self.panels, &item) {
                    self.panels[position].settle();
                }
                if finished.outcome == Outcome::Completed {
                    self.events.push(PivotEvent::ItemAnimationEnd);
                }
            }
        }
    }

    fn apply_item_animations(&mut self) {
        if let (Some(progress), Some(ItemEffect::Hide { item })) =
            (self.hide.progress(), self.hide.effect())
            && let Some(position) = position_of(&self.panels, item)
        {
            self.panels[position].opacity = 1.0 - progress;
        }
        if let (Some(progress), Some(ItemEffect::Show { item, from })) =
            (self.show.progress(), self.show.effect())
            && let Some(position) = position_of(&self.panels, item)
        {
            let panel = &mut self.panels[position];
            panel.opacity = progress;
            panel.translate_x = from * (1.0 - progress);
        }
    }

    /// Cancel and finalize the hide, show, and header slide animations.
    fn cancel_item_animations(&mut self) {
        if let Some(finished) = self.hide.cancel() {
            self.finish_item_animation(finished);
        }
        if let Some(finished) = self.show.cancel() {
            self.finish_item_animation(finished);
        }
        if let Some(finished) = self.header_animations.slide.cancel() {
            let (state, mut cx) = self.headers();
            state.on_animation_finished(&mut cx, finished);
        }
    }

    fn recenter(&mut self) {
        self.viewport_scroll = self.measurements.viewport_width(&*self.probe);
    }

    // -----------------------------------------------------------------------
    // Collection adaptation
    // -----------------------------------------------------------------------

    fn apply_pending_items(&mut self) -> Result<()> {
        self.apply_scheduled = false;
        let Some(items) = self.pending_items.take() else {
            return Ok(());
        };
        let snapshot = items.to_vec();
        ensure_unique(&snapshot)?;

        self.cancel_item_animations();
        self.pending_show = None;
        self.subscription = Some(items.subscribe());
        self.items = items;
        self.panels = snapshot.into_iter().map(Panel::hidden).collect();
        self.selected = None;
        self.rtl = self.probe.is_rtl();
        self.measurements.invalidate_headers();
        {
            let (state, mut cx) = self.headers();
            state.render(&mut cx, false);
            state.refresh(&mut cx);
        }

        let pending_index = self.pending_index.take();
        if let Some(last) = self.panels.len().checked_sub(1) {
            self.first_load = true;
            self.load_item(pending_index.unwrap_or(0).min(last), None);
            self.first_load = false;
        }
        self.recenter();

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "pivot.items.apply", len = self.panels.len());
        Ok(())
    }

    fn process_changes(&mut self) -> Result<()> {
        while let Some(change) = self.subscription.as_ref().and_then(Subscription::next_change) {
            if self.apply_scheduled {
                continue;
            }
            self.apply_change(change)?;
        }
        Ok(())
    }

    fn apply_change(&mut self, change: ListChange<I>) -> Result<()> {
        let mutation = match change {
            ListChange::Reload => return self.set_items(self.items.clone()),
            ListChange::Inserted { index, value } => {
                if position_of(&self.panels, &value).is_some() {
                    return Err(PivotError::DuplicateItem { index });
                }
                let at = index.min(self.panels.len());
                self.panels.insert(at, Panel::hidden(value));
                Mutation::Inserted { index: at }
            }
            ListChange::Removed { index, value } => {
                let Some(at) = self.locate(index, &value) else {
                    return Ok(());
                };
                self.panels.remove(at);
                Mutation::Removed { index: at }
            }
            ListChange::Moved {
                old_index,
                new_index,
                value,
            } => {
                let Some(from) = self.locate(old_index, &value) else {
                    return Ok(());
                };
                let panel = self.panels.remove(from);
                let to = new_index.min(self.panels.len());
                self.panels.insert(to, panel);
                Mutation::Moved { from, to }
            }
            ListChange::Changed {
                index,
                old_value,
                new_value,
            } => {
                if Rc::ptr_eq(&old_value, &new_value) {
                    self.rerender_headers();
                    return Ok(());
                }
                if position_of(&self.panels, &new_value).is_some() {
                    return Err(PivotError::DuplicateItem { index });
                }
                let Some(at) = self.locate(index, &old_value) else {
                    return Ok(());
                };
                self.panels[at] = Panel::hidden(new_value);
                Mutation::Replaced { index: at }
            }
        };

        match rebase_selection(mutation, self.selected, self.panels.len()) {
            SelectionUpdate::Unchanged => {}
            SelectionUpdate::Shift(index) => self.selected = Some(index),
            SelectionUpdate::Reselect(index) => {
                self.selected = None;
                self.load_item(index, None);
            }
            SelectionUpdate::Clear => {
                self.cancel_item_animations();
                self.pending_show = None;
                self.selected = None;
            }
        }
        self.rerender_headers();
        Ok(())
    }

    /// Panel position of `item`, expected at `index`.
    fn locate(&self, index: usize, item: &Rc<I>) -> Option<usize> {
        if self.panels.get(index).is_some_and(|panel| panel.holds(item)) {
            Some(index)
        } else {
            position_of(&self.panels, item)
        }
    }

    // -----------------------------------------------------------------------
    // Headers
    // -----------------------------------------------------------------------

    fn headers(&mut self) -> (&mut HeaderState, HeaderContext<'_, I>) {
        let cx = HeaderContext {
            panels: &self.panels,
            selected: self.selected,
            strip: &mut self.strip,
            renderer: &self.renderer,
            probe: &*self.probe,
            config: &self.config,
            measurements: &mut self.measurements,
            animations: &mut self.header_animations,
            rtl: self.rtl,
            items_staged: self.apply_scheduled,
            first_load: self.first_load,
        };
        (&mut self.header_state, cx)
    }

    /// Full header re-render followed by the layout rule.
    fn rerender_headers(&mut self) {
        self.measurements.invalidate_headers();
        let (state, mut cx) = self.headers();
        if let Some(finished) = cx.animations.slide.cancel() {
            state.on_animation_finished(&mut cx, finished);
        }
        state.render(&mut cx, false);
        state.refresh(&mut cx);
    }
}

impl<I: ContentItem> Drop for PivotController<I> {
    fn drop(&mut self) {
        self.binding.release();
    }
}

fn ensure_unique<I>(items: &[Rc<I>]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        if items[..index].iter().any(|earlier| Rc::ptr_eq(earlier, item)) {
            return Err(PivotError::DuplicateItem { index });
        }
    }
    Ok(())
}
