//! fieldhist - per-field input history merged into suggestion lists
//!
//! This library provides functionality for:
//! - Remembering the values committed in text fields, keyed by a field tag
//! - Merging the most recent values ahead of a field's own suggestions
//! - Filtering suggestions as the user types
//!
//! # Examples
//!
//! ```rust
//! use fieldhist::{ArraySource, FieldConfig, HistoryField, HistoryStore, SuggestionSource};
//! use std::rc::Rc;
//!
//! let dir = std::env::temp_dir().join("fieldhist-doc");
//! let store = Rc::new(HistoryStore::open(&dir.join("history.db"))?);
//! store.clear(Some("country"))?;
//!
//! let countries = Rc::new(ArraySource::new(["Belgium", "France", "Italy"]));
//! let mut field = HistoryField::new(store, "country", FieldConfig::default())
//!     .with_primary(countries);
//!
//! field.commit("Norway")?;
//! assert_eq!(field.suggestions().item(0).as_deref(), Some("Norway"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod error;
pub mod field;
pub mod field_tui;
pub mod filter;
pub mod merger;
pub mod prelude;
pub mod source;
pub mod store;
pub mod types;
pub mod validator;

pub use config::{Config, FieldConfig};
pub use error::{Error, Result};
pub use field::{Completion, FieldState, HistoryField};
pub use merger::{MergedSource, Segment, SuggestionMerger, Suggestions};
pub use source::{ArraySource, DataSetObserver, ObserverList, SuggestionSource};
pub use store::{HistoryEntry, HistoryStore, StoreStats};
pub use types::{EntryId, Tag};
pub use validator::{ListValidator, RegexValidator, Validator};

/// The default history database file name
pub const DEFAULT_DATABASE_FILE: &str = ".fieldhist.db";

/// Get the default history database path
pub fn default_database_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
    Ok(home.join(DEFAULT_DATABASE_FILE))
}

/// Open the history store named by `config`
pub fn open_store(config: &Config) -> Result<HistoryStore> {
    HistoryStore::open(&config.database_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path() {
        let path = default_database_path().unwrap();
        assert!(path.ends_with(DEFAULT_DATABASE_FILE));
    }

    #[test]
    fn test_open_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("history.db"),
            ..Config::default()
        };

        let store = open_store(&config).unwrap();
        assert_eq!(store.path(), config.database_path.as_path());
    }
}
