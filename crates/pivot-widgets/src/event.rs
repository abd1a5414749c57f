#![forbid(unsafe_code)]

//! Notifications a pivot raises for its host.

use std::fmt;
use std::rc::Rc;

/// Direction of a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the next item (or a non-directional change).
    Forward,
    /// Toward the previous item.
    Backward,
}

/// Pivot notification, drained with
/// [`PivotController::take_events`](crate::PivotController::take_events).
pub enum PivotEvent<I: ?Sized> {
    /// The selection moved. Informational; it cannot be vetoed.
    SelectionChanged {
        index: usize,
        direction: Direction,
        item: Rc<I>,
    },
    /// The incoming item is about to animate in.
    ItemAnimationStart,
    /// The incoming item finished animating in.
    ItemAnimationEnd,
}

impl<I: ?Sized> PivotEvent<I> {
    /// Index carried by a selection change.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match self {
            Self::SelectionChanged { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl<I: ?Sized> Clone for PivotEvent<I> {
    fn clone(&self) -> Self {
        match self {
            Self::SelectionChanged {
                index,
                direction,
                item,
            } => Self::SelectionChanged {
                index: *index,
                direction: *direction,
                item: Rc::clone(item),
            },
            Self::ItemAnimationStart => Self::ItemAnimationStart,
            Self::ItemAnimationEnd => Self::ItemAnimationEnd,
        }
    }
}

impl<I: ?Sized> fmt::Debug for PivotEvent<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectionChanged {
                index, direction, ..
            } => f
                .debug_struct("SelectionChanged")
                .field("index", index)
                .field("direction", direction)
                .finish_non_exhaustive(),
            Self::ItemAnimationStart => f.write_str("ItemAnimationStart"),
            Self::ItemAnimationEnd => f.write_str("ItemAnimationEnd"),
        }
    }
}

impl<I: ?Sized> PartialEq for PivotEvent<I> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::SelectionChanged {
                    index: a,
                    direction: da,
                    item: ia,
                },
                Self::SelectionChanged {
                    index: b,
                    direction: db,
                    item: ib,
                },
            ) => a == b && da == db && Rc::ptr_eq(ia, ib),
            (Self::ItemAnimationStart, Self::ItemAnimationStart)
            | (Self::ItemAnimationEnd, Self::ItemAnimationEnd) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_uses_item_identity() {
        let item = Rc::new("a");
        let changed = |item: &Rc<&'static str>| PivotEvent::SelectionChanged {
            index: 0,
            direction: Direction::Forward,
            item: Rc::clone(item),
        };
        assert_eq!(changed(&item), changed(&item));
        assert_ne!(changed(&item), changed(&Rc::new("a")));
        assert_eq!(changed(&item).clone().selected_index(), Some(0));
        assert_eq!(PivotEvent::<str>::ItemAnimationEnd.selected_index(), None);
    }
}
