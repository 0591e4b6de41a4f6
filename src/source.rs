//! Suggestion sources and change notification
//!
//! A [`SuggestionSource`] is anything that can feed items into a field's
//! suggestion list: a fixed list of valid values, a live query, or the
//! history segment itself. Sources announce data changes to registered
//! [`DataSetObserver`]s.
//!
//! Everything here runs on the UI thread, so sharing is `Rc` based and
//! observer lists hold weak handles: dropping an observer unregisters it.

use crate::filter::filter_items;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

/// Receiver of data change notifications from a source
pub trait DataSetObserver {
    /// The source's contents changed and should be re-read
    fn on_changed(&self);

    /// The source no longer has anything to show
    fn on_invalidated(&self) {}
}

/// Weakly held set of observers
#[derive(Default)]
pub struct ObserverList {
    observers: RefCell<Vec<Weak<dyn DataSetObserver>>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`; registering the same observer twice is a no-op
    pub fn register(&self, observer: &Rc<dyn DataSetObserver>) {
        let handle = Rc::downgrade(observer);
        let mut observers = self.observers.borrow_mut();
        observers.retain(|existing| existing.strong_count() > 0);
        if !observers.iter().any(|existing| Weak::ptr_eq(existing, &handle)) {
            observers.push(handle);
        }
    }

    pub fn unregister(&self, observer: &Rc<dyn DataSetObserver>) {
        let handle = Rc::downgrade(observer);
        self.observers
            .borrow_mut()
            .retain(|existing| existing.strong_count() > 0 && !Weak::ptr_eq(existing, &handle));
    }

    /// Number of observers still alive
    pub fn len(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_changed(&self) {
        for observer in self.live() {
            observer.on_changed();
        }
    }

    pub fn notify_invalidated(&self) {
        for observer in self.live() {
            observer.on_invalidated();
        }
    }

    // Snapshot so observers may register or unregister while being notified.
    fn live(&self) -> Vec<Rc<dyn DataSetObserver>> {
        self.observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

/// A list of suggestion candidates shown under a field
pub trait SuggestionSource {
    /// Number of items currently visible
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `position`, or `None` when out of range
    fn item(&self, position: usize) -> Option<String>;

    /// Whether the item at `position` can be picked
    fn is_enabled(&self, _position: usize) -> bool {
        true
    }

    /// Stable identifier of the item at `position`
    fn item_id(&self, position: usize) -> i64 {
        position as i64
    }

    /// Text placed into the field when the item at `position` is chosen
    fn convert_to_string(&self, position: usize) -> Option<String> {
        self.item(position)
    }

    /// Narrow the visible items to those matching `constraint`
    ///
    /// `None` restores the full list. Sources that do not filter ignore it.
    fn filter(&self, _constraint: Option<&str>) {}

    fn register_observer(&self, observer: &Rc<dyn DataSetObserver>);

    fn unregister_observer(&self, observer: &Rc<dyn DataSetObserver>);

    /// All visible items in order
    fn items(&self) -> Vec<String> {
        (0..self.len()).filter_map(|position| self.item(position)).collect()
    }
}

/// In-memory, filterable list of strings
#[derive(Default)]
pub struct ArraySource {
    items: RefCell<Vec<String>>,
    visible: RefCell<Vec<String>>,
    constraint: RefCell<Option<String>>,
    disabled: RefCell<BTreeSet<String>>,
    observers: ObserverList,
}

impl ArraySource {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        Self {
            visible: RefCell::new(items.clone()),
            items: RefCell::new(items),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace every item, keeping the active filter
    pub fn set_items<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.items.borrow_mut() = items.into_iter().map(Into::into).collect();
        self.refresh();
        self.observers.notify_changed();
    }

    /// Append an item, keeping the active filter
    pub fn add<S: Into<String>>(&self, item: S) {
        self.items.borrow_mut().push(item.into());
        self.refresh();
        self.observers.notify_changed();
    }

    /// Enable or disable every occurrence of `text`
    pub fn set_enabled(&self, text: &str, enabled: bool) {
        let changed = if enabled {
            self.disabled.borrow_mut().remove(text)
        } else {
            self.disabled.borrow_mut().insert(text.to_string())
        };
        if changed {
            self.observers.notify_changed();
        }
    }

    /// Constraint applied by the last call to `filter`
    pub fn constraint(&self) -> Option<String> {
        self.constraint.borrow().clone()
    }

    /// Number of items regardless of filtering
    pub fn total_len(&self) -> usize {
        self.items.borrow().len()
    }

    fn refresh(&self) {
        let visible = filter_items(&self.items.borrow(), self.constraint.borrow().as_deref());
        *self.visible.borrow_mut() = visible;
    }
}

impl SuggestionSource for ArraySource {
    fn len(&self) -> usize {
        self.visible.borrow().len()
    }

    fn item(&self, position: usize) -> Option<String> {
        self.visible.borrow().get(position).cloned()
    }

    fn is_enabled(&self, position: usize) -> bool {
        match self.visible.borrow().get(position) {
            Some(item) => !self.disabled.borrow().contains(item),
            None => false,
        }
    }

    fn filter(&self, constraint: Option<&str>) {
        *self.constraint.borrow_mut() = constraint.filter(|c| !c.is_empty()).map(str::to_string);
        self.refresh();

        if self.is_empty() {
            self.observers.notify_invalidated();
        } else {
            self.observers.notify_changed();
        }
    }

    fn register_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.observers.unregister(observer);
    }
}
