//! Prefix filtering for suggestion lists
//!
//! An item matches a constraint when, ignoring case, the item starts with
//! the constraint or one of its whitespace-separated words does. "new y"
//! matches "New York", and "york" matches it too.

/// Case-insensitive prefix matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFilter {
    prefix: String,
}

impl PrefixFilter {
    /// Build a filter for `constraint`
    ///
    /// Returns `None` for an empty constraint, which matches everything.
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.is_empty() {
            return None;
        }
        Some(Self {
            prefix: constraint.to_lowercase(),
        })
    }

    /// The lowercased prefix being matched
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Check whether `item` matches
    pub fn matches(&self, item: &str) -> bool {
        let item = item.to_lowercase();
        if item.starts_with(&self.prefix) {
            return true;
        }

        item.split_whitespace()
            .skip(1)
            .any(|word| word.starts_with(&self.prefix))
    }

    /// Items of `items` that match, in their original order
    pub fn apply<'a, I>(&self, items: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}

/// Filter `items` by an optional constraint
///
/// `None` or an empty constraint keeps every item.
pub fn filter_items(items: &[String], constraint: Option<&str>) -> Vec<String> {
    match constraint.and_then(PrefixFilter::new) {
        Some(filter) => filter.apply(items),
        None => items.to_vec(),
    }
}
