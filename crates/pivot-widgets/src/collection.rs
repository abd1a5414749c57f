#![forbid(unsafe_code)]

//! Observable item sequence and selection re-basing.
//!
//! [`ItemList`] is a shared, ordered list of `Rc<T>` that records every
//! mutation as a [`ListChange`] into the queue of each live [`Subscription`].
//! Subscribers drain their queue on their own schedule; dropping a
//! subscription unsubscribes it.
//!
//! [`rebase_selection`] holds the index arithmetic that keeps a selection
//! pointing at the same item across inserts, removals, moves, and
//! replacements. It is a pure function so it can be tested on its own.
//!
//! # Invariants
//!
//! 1. Each mutation is delivered to every live subscriber exactly once, in
//!    mutation order.
//! 2. Failed mutations (out-of-range indices) change nothing and emit nothing.
//! 3. After [`rebase_selection`], a selection is `None` iff the list is empty.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type ChangeQueue<T> = RefCell<VecDeque<ListChange<T>>>;

/// A change notification emitted by [`ItemList`].
pub enum ListChange<T> {
    /// The item at `index` was replaced.
    Changed {
        index: usize,
        old_value: Rc<T>,
        new_value: Rc<T>,
    },
    /// `value` was inserted at `index`.
    Inserted { index: usize, value: Rc<T> },
    /// `value` was removed from `index`.
    Removed { index: usize, value: Rc<T> },
    /// `value` moved from `old_index` to `new_index`.
    Moved {
        old_index: usize,
        new_index: usize,
        value: Rc<T>,
    },
    /// Contents changed wholesale; subscribers must re-read everything.
    Reload,
}

impl<T> Clone for ListChange<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Changed {
                index,
                old_value,
                new_value,
            } => Self::Changed {
                index: *index,
                old_value: Rc::clone(old_value),
                new_value: Rc::clone(new_value),
            },
            Self::Inserted { index, value } => Self::Inserted {
                index: *index,
                value: Rc::clone(value),
            },
            Self::Removed { index, value } => Self::Removed {
                index: *index,
                value: Rc::clone(value),
            },
            Self::Moved {
                old_index,
                new_index,
                value,
            } => Self::Moved {
                old_index: *old_index,
                new_index: *new_index,
                value: Rc::clone(value),
            },
            Self::Reload => Self::Reload,
        }
    }
}

impl<T> fmt::Debug for ListChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { index, .. } => f.debug_struct("Changed").field("index", index).finish(),
            Self::Inserted { index, .. } => {
                f.debug_struct("Inserted").field("index", index).finish()
            }
            Self::Removed { index, .. } => f.debug_struct("Removed").field("index", index).finish(),
            Self::Moved {
                old_index,
                new_index,
                ..
            } => f
                .debug_struct("Moved")
                .field("old_index", old_index)
                .field("new_index", new_index)
                .finish(),
            Self::Reload => f.write_str("Reload"),
        }
    }
}

struct ListInner<T> {
    items: Vec<Rc<T>>,
    subscribers: Vec<Weak<ChangeQueue<T>>>,
}

impl<T> ListInner<T> {
    fn emit(&mut self, change: ListChange<T>) {
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(change.clone());
                true
            }
            None => false,
        });
    }
}

/// A shared, observable, ordered list of items.
///
/// Clones are handles to the same list.
pub struct ItemList<T> {
    inner: Rc<RefCell<ListInner<T>>>,
}

impl<T> Clone for ItemList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ItemList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ItemList")
            .field("len", &inner.items.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Rc<T>> for ItemList<T> {
    fn from_iter<It: IntoIterator<Item = Rc<T>>>(iter: It) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                items: iter.into_iter().collect(),
                subscribers: Vec::new(),
            })),
        }
    }
}

impl<T> ItemList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        std::iter::empty().collect()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rc<T>> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Snapshot of all items.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Rc<T>> {
        self.inner.borrow().items.clone()
    }

    /// Index of `item` by identity.
    #[must_use]
    pub fn index_of(&self, item: &Rc<T>) -> Option<usize> {
        self.inner
            .borrow()
            .items
            .iter()
            .position(|candidate| Rc::ptr_eq(candidate, item))
    }

    /// Whether both handles refer to the same list.
    #[must_use]
    pub fn same_list(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append an item.
    pub fn push(&self, item: Rc<T>) {
        let index = self.len();
        self.insert(index, item);
    }

    /// Insert `item` at `index`. Returns `false` if `index > len`.
    pub fn insert(&self, index: usize, item: Rc<T>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if index > inner.items.len() {
            return false;
        }
        inner.items.insert(index, Rc::clone(&item));
        inner.emit(ListChange::Inserted { index, value: item });
        true
    }

    /// Remove the item at `index`.
    pub fn remove(&self, index: usize) -> Option<Rc<T>> {
        let mut inner = self.inner.borrow_mut();
        if index >= inner.items.len() {
            return None;
        }
        let value = inner.items.remove(index);
        inner.emit(ListChange::Removed {
            index,
            value: Rc::clone(&value),
        });
        Some(value)
    }

    /// Move the item at `from` so it ends up at `to`.
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        let mut inner = self.inner.borrow_mut();
        let len = inner.items.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let value = inner.items.remove(from);
        inner.items.insert(to, Rc::clone(&value));
        inner.emit(ListChange::Moved {
            old_index: from,
            new_index: to,
            value,
        });
        true
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&self, index: usize, item: Rc<T>) -> Option<Rc<T>> {
        let mut inner = self.inner.borrow_mut();
        let slot = inner.items.get_mut(index)?;
        let old_value = std::mem::replace(slot, Rc::clone(&item));
        inner.emit(ListChange::Changed {
            index,
            old_value: Rc::clone(&old_value),
            new_value: item,
        });
        Some(old_value)
    }

    /// Replace every item at once and emit [`ListChange::Reload`].
    pub fn reset(&self, items: impl IntoIterator<Item = Rc<T>>) {
        let mut inner = self.inner.borrow_mut();
        inner.items = items.into_iter().collect();
        inner.emit(ListChange::Reload);
    }

    /// Emit [`ListChange::Reload`] without changing contents.
    pub fn notify_reload(&self) {
        self.inner.borrow_mut().emit(ListChange::Reload);
    }

    /// Start receiving change notifications.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&queue));
        Subscription { queue }
    }
}

/// Receiving end of an [`ItemList`]'s notifications. Drop to unsubscribe.
pub struct Subscription<T> {
    queue: Rc<ChangeQueue<T>>,
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.pending())
            .finish()
    }
}

impl<T> Subscription<T> {
    /// Pop the oldest pending change.
    pub fn next_change(&self) -> Option<ListChange<T>> {
        self.queue.borrow_mut().pop_front()
    }

    /// Number of undelivered changes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Discard every undelivered change.
    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

// ---------------------------------------------------------------------------
// Selection re-basing
// ---------------------------------------------------------------------------

/// Positional part of a list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// An item was inserted at `index`.
    Inserted { index: usize },
    /// The item at `index` was removed.
    Removed { index: usize },
    /// An item moved from `from` to `to`.
    Moved { from: usize, to: usize },
    /// The item at `index` was replaced by another.
    Replaced { index: usize },
}

/// How a selection reacts to a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionUpdate {
    /// Same item, same index.
    Unchanged,
    /// Same item, now at this index. No item transition is needed.
    Shift(usize),
    /// The selected item is gone or was replaced; show the item now at this
    /// index.
    Reselect(usize),
    /// The list is empty.
    Clear,
}

/// Re-base `selected` across `mutation`; `len_after` is the list length once
/// the mutation has been applied.
#[must_use]
pub fn rebase_selection(
    mutation: Mutation,
    selected: Option<usize>,
    len_after: usize,
) -> SelectionUpdate {
    if len_after == 0 {
        return if selected.is_some() {
            SelectionUpdate::Clear
        } else {
            SelectionUpdate::Unchanged
        };
    }
    let Some(sel) = selected else {
        // First item to arrive becomes the selection.
        return match mutation {
            Mutation::Inserted { .. } => SelectionUpdate::Reselect(0),
            _ => SelectionUpdate::Unchanged,
        };
    };
    match mutation {
        Mutation::Inserted { index } if index <= sel => SelectionUpdate::Shift(sel + 1),
        Mutation::Removed { index } if index < sel => SelectionUpdate::Shift(sel - 1),
        Mutation::Removed { index } if index == sel => {
            SelectionUpdate::Reselect(sel.min(len_after - 1))
        }
        Mutation::Moved { from, to } if from == sel => SelectionUpdate::Shift(to),
        Mutation::Moved { from, to } if from < sel && to >= sel => SelectionUpdate::Shift(sel - 1),
        Mutation::Moved { from, to } if from > sel && to <= sel => SelectionUpdate::Shift(sel + 1),
        Mutation::Replaced { index } if index == sel => SelectionUpdate::Reselect(sel),
        _ => SelectionUpdate::Unchanged,
    }
}
