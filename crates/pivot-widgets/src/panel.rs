#![forbid(unsafe_code)]

//! Per-item content panels.

use std::fmt;
use std::rc::Rc;

/// Presentation state of one item's content surface.
pub struct Panel<I: ?Sized> {
    item: Rc<I>,
    pub(crate) visible: bool,
    pub(crate) opacity: f32,
    pub(crate) translate_x: f32,
}

impl<I: ?Sized> Panel<I> {
    /// Hidden panel for `item`.
    pub(crate) fn hidden(item: Rc<I>) -> Self {
        Self {
            item,
            visible: false,
            opacity: 0.0,
            translate_x: 0.0,
        }
    }

    /// The item this panel shows.
    #[must_use]
    pub fn item(&self) -> &Rc<I> {
        &self.item
    }

    /// Whether the panel is shown.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current opacity.
    #[inline]
    #[must_use]
    pub const fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Current horizontal offset from the panel's resting position.
    #[inline]
    #[must_use]
    pub const fn translate_x(&self) -> f32 {
        self.translate_x
    }

    pub(crate) fn holds(&self, item: &Rc<I>) -> bool {
        Rc::ptr_eq(&self.item, item)
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.opacity = 0.0;
        self.translate_x = 0.0;
    }

    pub(crate) fn settle(&mut self) {
        self.visible = true;
        self.opacity = 1.0;
        self.translate_x = 0.0;
    }
}

impl<I: ?Sized> fmt::Debug for Panel<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("visible", &self.visible)
            .field("opacity", &self.opacity)
            .field("translate_x", &self.translate_x)
            .finish_non_exhaustive()
    }
}

/// Index of the panel holding `item`.
pub(crate) fn position_of<I: ?Sized>(panels: &[Panel<I>], item: &Rc<I>) -> Option<usize> {
    panels.iter().position(|panel| panel.holds(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_then_settled() {
        let mut panel = Panel::hidden(Rc::new(1));
        assert!(!panel.is_visible());
        panel.translate_x = 12.0;
        panel.settle();
        assert!(panel.is_visible());
        assert_eq!(panel.opacity(), 1.0);
        assert_eq!(panel.translate_x(), 0.0);
        panel.hide();
        assert!(!panel.is_visible());
    }

    #[test]
    fn identity_lookup() {
        let a = Rc::new("a");
        let b = Rc::new("a");
        let panels = vec![Panel::hidden(a.clone()), Panel::hidden(b.clone())];
        assert_eq!(position_of(&panels, &b), Some(1));
        assert_eq!(position_of(&panels, &Rc::new("a")), None);
    }
}
