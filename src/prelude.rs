//! Prelude module for fieldhist
//!
//! Re-exports the types most callers need to wire a history field.
//!
//! # Usage
//!
//! ```rust
//! use fieldhist::prelude::*;
//! ```

pub use crate::config::{Config, FieldConfig};
pub use crate::error::{Error, Result};
pub use crate::field::HistoryField;
pub use crate::source::{ArraySource, DataSetObserver, SuggestionSource};
pub use crate::store::HistoryStore;
pub use crate::types::{EntryId, Tag};

pub use chrono::{DateTime, Utc};
