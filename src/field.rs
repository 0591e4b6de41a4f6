//! History-enabled input field
//!
//! `HistoryField` is the headless core of a text field with history: it
//! owns no widgets, only the state a UI shell needs to drive a suggestion
//! dropdown. The shell forwards focus, text and "done" events and reads the
//! current suggestions back.
//!
//! History is read lazily: nothing touches the store until the first
//! filtering trigger (focus or typed text). After that the loaded history
//! is reused until a commit or a clear forces a fresh read.

use crate::config::FieldConfig;
use crate::error::Result;
use crate::merger::{SuggestionMerger, Suggestions};
use crate::source::{ArraySource, DataSetObserver, SuggestionSource};
use crate::store::HistoryStore;
use crate::types::Tag;
use crate::validator::Validator;
use std::rc::Rc;
use tracing::debug;

/// Upper bound on the completions offered to an input method
pub const MAX_COMPLETIONS: usize = 20;

/// Whether the field has read its history yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Uninitialized,
    Loaded,
}

/// A selectable suggestion, as offered to an input method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: i64,
    pub position: usize,
    pub text: String,
}

/// Text field state combining typed text, history and primary suggestions
pub struct HistoryField {
    store: Rc<HistoryStore>,
    tag: Tag,
    config: FieldConfig,
    merger: SuggestionMerger,
    primary: Rc<dyn SuggestionSource>,
    suggestions: Option<Suggestions>,
    observer: Option<Rc<dyn DataSetObserver>>,
    validator: Option<Box<dyn Validator>>,
}

impl HistoryField {
    /// Create a field storing its history under `tag`
    ///
    /// Without a primary source the field only suggests history.
    pub fn new<T: Into<Tag>>(store: Rc<HistoryStore>, tag: T, config: FieldConfig) -> Self {
        Self {
            store,
            tag: tag.into(),
            merger: SuggestionMerger::new(config.max_history_values),
            config,
            primary: Rc::new(ArraySource::empty()),
            suggestions: None,
            observer: None,
            validator: None,
        }
    }

    /// Builder form of [`set_primary`](Self::set_primary)
    pub fn with_primary(mut self, primary: Rc<dyn SuggestionSource>) -> Self {
        self.primary = primary;
        self
    }

    /// Replace the primary suggestion source
    ///
    /// A field that already loaded its history rebuilds its list.
    pub fn set_primary(&mut self, primary: Rc<dyn SuggestionSource>) {
        self.primary = primary;
        if self.state() == FieldState::Loaded {
            self.rebuild();
        }
    }

    pub fn set_validator(&mut self, validator: Box<dyn Validator>) {
        self.validator = Some(validator);
    }

    /// Observer notified whenever the suggestion list changes or is rebuilt
    pub fn set_observer(&mut self, observer: Rc<dyn DataSetObserver>) {
        if let Some(suggestions) = &self.suggestions {
            if let Some(previous) = &self.observer {
                suggestions.unregister_observer(previous);
            }
            suggestions.register_observer(&observer);
        }
        self.observer = Some(observer);
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn state(&self) -> FieldState {
        if self.suggestions.is_some() {
            FieldState::Loaded
        } else {
            FieldState::Uninitialized
        }
    }

    /// Whether `text` is long enough to filter suggestions
    pub fn enough_to_filter(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.config.threshold
    }

    /// The field gained focus: show every suggestion
    pub fn on_focus_gained(&mut self) {
        self.perform_filtering(None);
    }

    /// The field's text changed
    ///
    /// Returns whether the suggestions were filtered by `text`. Text shorter
    /// than the threshold resets the list to unfiltered and returns `false`,
    /// meaning the dropdown should be hidden.
    pub fn on_text_changed(&mut self, text: &str) -> bool {
        if self.enough_to_filter(text) {
            self.perform_filtering(Some(text.trim()));
            true
        } else {
            self.perform_filtering(None);
            false
        }
    }

    fn perform_filtering(&mut self, constraint: Option<&str>) {
        self.suggestions().filter(constraint);
    }

    /// The "done" action: remember `text` and rebuild the suggestions
    ///
    /// Blank text is not stored but the list is still rebuilt.
    pub fn commit(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if !text.is_empty() {
            self.store.insert(&self.tag, text)?;
        }
        self.rebuild();
        Ok(())
    }

    /// Forget this field's history
    pub fn clear_history(&mut self) -> Result<usize> {
        let removed = self.store.clear(Some(self.tag.as_str()))?;
        if self.state() == FieldState::Loaded {
            self.rebuild();
        }
        Ok(removed)
    }

    /// Current suggestion list, loading history on first use
    pub fn suggestions(&mut self) -> &Suggestions {
        if self.suggestions.is_none() {
            self.rebuild();
        }
        self.suggestions.get_or_insert_with(|| Suggestions::Primary(self.primary.clone()))
    }

    /// Enabled suggestions, at most [`MAX_COMPLETIONS`] of them
    pub fn completions(&mut self) -> Vec<Completion> {
        let suggestions = self.suggestions();
        let count = suggestions.len().min(MAX_COMPLETIONS);

        (0..count)
            .filter(|&position| suggestions.is_enabled(position))
            .filter_map(|position| {
                Some(Completion {
                    id: suggestions.item_id(position),
                    position,
                    text: suggestions.convert_to_string(position)?,
                })
            })
            .collect()
    }

    /// Text to place in the field when the suggestion at `position` is chosen
    pub fn select(&mut self, position: usize) -> Option<String> {
        let suggestions = self.suggestions();
        if !suggestions.is_enabled(position) {
            return None;
        }
        suggestions.convert_to_string(position)
    }

    /// Repair `text` with the validator, if one is set
    ///
    /// Empty or valid text is returned unchanged.
    pub fn perform_validation(&self, text: &str) -> String {
        match &self.validator {
            Some(validator) if !text.is_empty() && !validator.is_valid(text) => {
                validator.fix_text(text)
            }
            _ => text.to_string(),
        }
    }

    fn rebuild(&mut self) {
        if let (Some(previous), Some(observer)) = (&self.suggestions, &self.observer) {
            previous.unregister_observer(observer);
        }

        let suggestions = self
            .merger
            .build_from_store(&self.store, &self.tag, self.primary.clone());
        debug!(
            tag = %self.tag,
            history = suggestions.history_len(),
            total = suggestions.len(),
            "rebuilt field suggestions"
        );

        if let Some(observer) = &self.observer {
            suggestions.register_observer(observer);
        }
        self.suggestions = Some(suggestions);

        if let Some(observer) = &self.observer {
            observer.on_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::counting;
    use crate::validator::ListValidator;
    use tempfile::NamedTempFile;

    const COUNTRIES: [&str; 5] = ["Belgium", "France", "Italy", "Germany", "Spain"];

    fn temp_store() -> (NamedTempFile, Rc<HistoryStore>) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = Rc::new(HistoryStore::open(temp_file.path()).unwrap());
        (temp_file, store)
    }

    fn field(store: &Rc<HistoryStore>, tag: &str) -> HistoryField {
        HistoryField::new(store.clone(), tag, FieldConfig::default())
            .with_primary(Rc::new(ArraySource::new(COUNTRIES)))
    }

    #[test]
    fn test_starts_uninitialized() {
        let (_file, store) = temp_store();
        let field = field(&store, "country");
        assert_eq!(field.state(), FieldState::Uninitialized);
    }

    #[test]
    fn test_focus_loads_history_once() {
        let (_file, store) = temp_store();
        store.insert("country", "Norway").unwrap();

        let mut field = field(&store, "country");
        field.on_focus_gained();
        assert_eq!(field.state(), FieldState::Loaded);
        assert_eq!(field.suggestions().item(0).as_deref(), Some("Norway"));

        // written behind the field's back: not visible until a rebuild
        store.insert("country", "Peru").unwrap();
        field.on_focus_gained();
        field.on_text_changed("no");
        field.on_text_changed("");
        assert_eq!(field.suggestions().history_len(), 1);
        assert_eq!(field.suggestions().item(0).as_deref(), Some("Norway"));
    }

    #[test]
    fn test_commit_rebuilds_with_fresh_history() {
        let (_file, store) = temp_store();
        let mut field = field(&store, "country");

        field.on_focus_gained();
        assert!(field.suggestions().is_pass_through());

        field.commit("  Norway ").unwrap();
        field.commit("Peru").unwrap();

        let suggestions = field.suggestions();
        assert_eq!(suggestions.history_len(), 2);
        assert_eq!(suggestions.items()[..3], ["Peru", "Norway", "Belgium"]);
    }

    #[test]
    fn test_blank_commit_stores_nothing() {
        let (_file, store) = temp_store();
        let mut field = field(&store, "country");

        field.commit("   ").unwrap();

        assert_eq!(store.count("country").unwrap(), 0);
        assert!(field.suggestions().is_pass_through());
    }

    #[test]
    fn test_history_is_capped_at_max_values() {
        let (_file, store) = temp_store();
        let config = FieldConfig {
            max_history_values: 2,
            threshold: 1,
        };
        let mut field = HistoryField::new(store.clone(), "country", config);

        for value in ["Chile", "Peru", "Cuba", "Oman"] {
            field.commit(value).unwrap();
        }

        assert_eq!(store.count("country").unwrap(), 4);
        assert_eq!(field.suggestions().items(), vec!["Oman", "Cuba"]);
    }

    #[test]
    fn test_threshold_gates_filtering() {
        let (_file, store) = temp_store();
        store.insert("country", "Finland").unwrap();
        let mut field = field(&store, "country");

        assert!(!field.on_text_changed("f"));
        assert_eq!(field.suggestions().len(), 6);

        assert!(field.on_text_changed("fr"));
        assert_eq!(field.suggestions().items(), vec!["France"]);

        assert!(field.on_text_changed("fi"));
        assert_eq!(field.suggestions().items(), vec!["Finland"]);
        assert_eq!(field.suggestions().history_len(), 1);

        assert!(!field.on_text_changed(" "));
        assert_eq!(field.suggestions().len(), 6);
    }

    #[test]
    fn test_fields_with_different_tags_are_isolated() {
        let (_file, store) = temp_store();
        let mut from = field(&store, "from");
        let mut to = field(&store, "to");

        from.commit("Lisbon").unwrap();
        to.on_focus_gained();

        assert!(to.suggestions().is_pass_through());
        assert_eq!(from.suggestions().history_len(), 1);
    }

    #[test]
    fn test_clear_history() {
        let (_file, store) = temp_store();
        store.insert("other", "kept").unwrap();
        let mut field = field(&store, "country");
        field.commit("Norway").unwrap();

        assert_eq!(field.clear_history().unwrap(), 1);
        assert!(field.suggestions().is_pass_through());
        assert_eq!(store.count("other").unwrap(), 1);
    }

    #[test]
    fn test_completions_skip_disabled_and_cap() {
        let (_file, store) = temp_store();
        let primary = Rc::new(ArraySource::new((0..30).map(|i| format!("item {i:02}"))));
        primary.set_enabled("item 01", false);
        let mut field = HistoryField::new(store.clone(), "list", FieldConfig::default())
            .with_primary(primary);
        field.commit("typed").unwrap();

        let completions = field.completions();
        assert_eq!(completions.len(), MAX_COMPLETIONS - 1);
        assert_eq!(
            completions[0],
            Completion {
                id: 0,
                position: 0,
                text: "typed".to_string()
            }
        );
        assert_eq!(completions[1].text, "item 00");
        assert_eq!(completions[2].text, "item 02");
        assert_eq!(completions[2].position, 3);
    }

    #[test]
    fn test_select() {
        let (_file, store) = temp_store();
        let primary = Rc::new(ArraySource::new(COUNTRIES));
        primary.set_enabled("Italy", false);
        let mut field = HistoryField::new(store.clone(), "country", FieldConfig::default())
            .with_primary(primary);
        field.commit("Norway").unwrap();

        assert_eq!(field.select(0).as_deref(), Some("Norway"));
        assert_eq!(field.select(2).as_deref(), Some("France"));
        assert_eq!(field.select(3), None);
        assert_eq!(field.select(40), None);
    }

    #[test]
    fn test_validation() {
        let (_file, store) = temp_store();
        let mut field = field(&store, "country");
        assert_eq!(field.perform_validation("anything"), "anything");

        field.set_validator(Box::new(ListValidator::new(COUNTRIES)));
        assert_eq!(field.perform_validation("Spain"), "Spain");
        assert_eq!(field.perform_validation("ger"), "Germany");
        assert_eq!(field.perform_validation("Atlantis"), "");
        assert_eq!(field.perform_validation(""), "");
    }

    #[test]
    fn test_observer_follows_rebuilds() {
        let (_file, store) = temp_store();
        let primary = Rc::new(ArraySource::new(COUNTRIES));
        let mut field = HistoryField::new(store.clone(), "country", FieldConfig::default())
            .with_primary(primary.clone());
        let (counter, observer) = counting();
        field.set_observer(observer);

        field.on_focus_gained();
        let after_load = counter.changed.get();
        assert!(after_load >= 1);

        field.commit("Norway").unwrap();
        let after_commit = counter.changed.get();
        assert!(after_commit > after_load);

        // one notification per change, not one per composite ever built
        primary.add("Portugal");
        assert_eq!(counter.changed.get(), after_commit + 1);
    }

    #[test]
    fn test_set_primary_after_load() {
        let (_file, store) = temp_store();
        store.insert("country", "Norway").unwrap();
        let mut field = field(&store, "country");
        field.on_focus_gained();

        field.set_primary(Rc::new(ArraySource::new(["Chile"])));

        assert_eq!(field.suggestions().items(), vec!["Norway", "Chile"]);
    }

    #[test]
    fn test_unreadable_history_degrades_to_primary() {
        let (file, store) = temp_store();
        let conn = rusqlite::Connection::open(file.path()).unwrap();
        conn.execute_batch("DROP TABLE history").unwrap();
        drop(conn);

        let mut field = field(&store, "country");
        field.on_focus_gained();
        assert_eq!(field.suggestions().len(), COUNTRIES.len());

        let err = field.commit("Norway").unwrap_err();
        assert_eq!(err.category(), "database");
    }
}
