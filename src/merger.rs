//! Merging stored history with a field's primary suggestions
//!
//! The suggestion list a field shows is either the primary source on its
//! own (no history for the tag) or a two-segment composite: the most recent
//! history values first, then every item of the primary source. The
//! composite reads both segments live, so changes in the primary source
//! show up without a rebuild, and it re-broadcasts their change
//! notifications to its own observers.

use crate::error::Error;
use crate::source::{ArraySource, DataSetObserver, ObserverList, SuggestionSource};
use crate::store::HistoryStore;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Which segment of a merged list a position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Position within the history segment
    History(usize),
    /// Position within the primary source
    Primary(usize),
}

/// Builds suggestion lists, capping history at a configured size
#[derive(Debug, Clone, Copy)]
pub struct SuggestionMerger {
    max_history_values: usize,
}

impl SuggestionMerger {
    pub fn new(max_history_values: usize) -> Self {
        Self { max_history_values }
    }

    pub fn max_history_values(&self) -> usize {
        self.max_history_values
    }

    /// Combine `history` (most recent first) with `primary`
    ///
    /// Only the first `max_history_values` history values are kept. With no
    /// history the primary source is returned as is.
    pub fn build(&self, mut history: Vec<String>, primary: Rc<dyn SuggestionSource>) -> Suggestions {
        history.truncate(self.max_history_values);
        if history.is_empty() {
            return Suggestions::Primary(primary);
        }

        debug!(history = history.len(), primary = primary.len(), "built merged suggestions");
        Suggestions::Merged(MergedSource::new(history, primary))
    }

    /// Read `tag`'s history from `store` and combine it with `primary`
    ///
    /// A failed read is logged and treated as an empty history.
    pub fn build_from_store(
        &self,
        store: &HistoryStore,
        tag: &str,
        primary: Rc<dyn SuggestionSource>,
    ) -> Suggestions {
        match store.query_by_tag(tag) {
            Ok(history) => self.build(history, primary),
            Err(e) => {
                log_read_failure(tag, &e);
                Suggestions::Primary(primary)
            }
        }
    }
}

fn log_read_failure(tag: &str, error: &Error) {
    warn!(
        tag,
        category = error.category(),
        error = %error,
        "history unavailable, showing primary suggestions only"
    );
}

/// The list handed to the field's dropdown
pub enum Suggestions {
    /// No history: the primary source itself
    Primary(Rc<dyn SuggestionSource>),
    /// History values followed by the primary source
    Merged(MergedSource),
}

impl Suggestions {
    /// Whether this list is the bare primary source
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Suggestions::Primary(_))
    }

    /// Number of visible history items at the head of the list
    pub fn history_len(&self) -> usize {
        match self {
            Suggestions::Primary(_) => 0,
            Suggestions::Merged(merged) => merged.history_len(),
        }
    }

    fn inner(&self) -> &dyn SuggestionSource {
        match self {
            Suggestions::Primary(primary) => primary.as_ref(),
            Suggestions::Merged(merged) => merged as &dyn SuggestionSource,
        }
    }
}

impl SuggestionSource for Suggestions {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn item(&self, position: usize) -> Option<String> {
        self.inner().item(position)
    }

    fn is_enabled(&self, position: usize) -> bool {
        self.inner().is_enabled(position)
    }

    fn item_id(&self, position: usize) -> i64 {
        self.inner().item_id(position)
    }

    fn convert_to_string(&self, position: usize) -> Option<String> {
        self.inner().convert_to_string(position)
    }

    fn filter(&self, constraint: Option<&str>) {
        self.inner().filter(constraint)
    }

    fn register_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.inner().register_observer(observer)
    }

    fn unregister_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.inner().unregister_observer(observer)
    }
}

/// History segment followed by the primary source
pub struct MergedSource {
    history: Rc<ArraySource>,
    primary: Rc<dyn SuggestionSource>,
    observers: Rc<ObserverList>,
    forwarder: Rc<dyn DataSetObserver>,
}

impl MergedSource {
    fn new(history: Vec<String>, primary: Rc<dyn SuggestionSource>) -> Self {
        let history = Rc::new(ArraySource::new(history));
        let observers = Rc::new(ObserverList::new());

        let history_dyn: Rc<dyn SuggestionSource> = history.clone();
        let forwarder: Rc<dyn DataSetObserver> = Rc::new(SegmentForwarder {
            history: Rc::downgrade(&history_dyn),
            primary: Rc::downgrade(&primary),
            observers: Rc::downgrade(&observers),
        });

        history.register_observer(&forwarder);
        primary.register_observer(&forwarder);

        Self {
            history,
            primary,
            observers,
            forwarder,
        }
    }

    /// Number of visible history items
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The history segment
    pub fn history(&self) -> &ArraySource {
        &self.history
    }

    /// The primary source
    pub fn primary(&self) -> &Rc<dyn SuggestionSource> {
        &self.primary
    }

    /// Map a merged position onto its segment
    pub fn segment(&self, position: usize) -> Option<Segment> {
        let history_len = self.history.len();
        if position < history_len {
            Some(Segment::History(position))
        } else if position - history_len < self.primary.len() {
            Some(Segment::Primary(position - history_len))
        } else {
            None
        }
    }
}

impl SuggestionSource for MergedSource {
    fn len(&self) -> usize {
        self.history.len() + self.primary.len()
    }

    fn item(&self, position: usize) -> Option<String> {
        match self.segment(position)? {
            Segment::History(i) => self.history.item(i),
            Segment::Primary(i) => self.primary.item(i),
        }
    }

    fn is_enabled(&self, position: usize) -> bool {
        match self.segment(position) {
            Some(Segment::History(i)) => self.history.is_enabled(i),
            Some(Segment::Primary(i)) => self.primary.is_enabled(i),
            None => false,
        }
    }

    fn item_id(&self, position: usize) -> i64 {
        match self.segment(position) {
            Some(Segment::History(i)) => self.history.item_id(i),
            Some(Segment::Primary(i)) => self.primary.item_id(i),
            None => position as i64,
        }
    }

    fn convert_to_string(&self, position: usize) -> Option<String> {
        match self.segment(position)? {
            Segment::History(i) => self.history.convert_to_string(i),
            Segment::Primary(i) => self.primary.convert_to_string(i),
        }
    }

    fn filter(&self, constraint: Option<&str>) {
        self.history.filter(constraint);
        self.primary.filter(constraint);
    }

    fn register_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Rc<dyn DataSetObserver>) {
        self.observers.unregister(observer);
    }
}

impl Drop for MergedSource {
    fn drop(&mut self) {
        self.history.unregister_observer(&self.forwarder);
        self.primary.unregister_observer(&self.forwarder);
    }
}

/// Relays segment notifications to the merged list's observers
///
/// A segment going empty only invalidates the merged list when the other
/// segment is empty too.
struct SegmentForwarder {
    history: Weak<dyn SuggestionSource>,
    primary: Weak<dyn SuggestionSource>,
    observers: Weak<ObserverList>,
}

impl SegmentForwarder {
    fn forward(&self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };

        let len = self.history.upgrade().map_or(0, |history| history.len())
            + self.primary.upgrade().map_or(0, |primary| primary.len());

        if len == 0 {
            observers.notify_invalidated();
        } else {
            observers.notify_changed();
        }
    }
}

impl DataSetObserver for SegmentForwarder {
    fn on_changed(&self) {
        self.forward();
    }

    fn on_invalidated(&self) {
        self.forward();
    }
}
