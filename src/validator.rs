//! Text validation for history fields
//!
//! A validator decides whether the text in a field is acceptable and, when
//! it is not, proposes a replacement.

use crate::error::Result;
use regex::Regex;

/// Checks and repairs field text
pub trait Validator {
    /// Whether `text` is acceptable as is
    fn is_valid(&self, text: &str) -> bool;

    /// Replacement for text that failed `is_valid`
    fn fix_text(&self, invalid: &str) -> String;
}

/// Validator accepting text that matches a regular expression in full
///
/// Invalid text is replaced by the first match found inside it, or by the
/// empty string when there is none.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    full: Regex,
    partial: Regex,
}

impl RegexValidator {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            full: Regex::new(&format!("^(?:{pattern})$"))?,
            partial: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.partial.as_str()
    }
}

impl Validator for RegexValidator {
    fn is_valid(&self, text: &str) -> bool {
        self.full.is_match(text)
    }

    fn fix_text(&self, invalid: &str) -> String {
        self.partial
            .find(invalid)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Validator accepting only values from a fixed list, ignoring case
///
/// Invalid text is replaced by the first allowed value it is a prefix of,
/// or by the empty string.
#[derive(Debug, Clone)]
pub struct ListValidator {
    allowed: Vec<String>,
}

impl ListValidator {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for ListValidator {
    fn is_valid(&self, text: &str) -> bool {
        self.allowed
            .iter()
            .any(|value| value.eq_ignore_ascii_case(text.trim()))
    }

    fn fix_text(&self, invalid: &str) -> String {
        let prefix = invalid.trim().to_lowercase();
        if prefix.is_empty() {
            return String::new();
        }

        self.allowed
            .iter()
            .find(|value| value.to_lowercase().starts_with(&prefix))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_validator_full_match() {
        let validator = RegexValidator::new(r"[0-9]{5}").unwrap();
        assert!(validator.is_valid("75001"));
        assert!(!validator.is_valid("75001 Paris"));
        assert!(!validator.is_valid("750"));
    }

    #[test]
    fn test_regex_validator_fix_text() {
        let validator = RegexValidator::new(r"[0-9]{5}").unwrap();
        assert_eq!(validator.fix_text("zip 75001 Paris"), "75001");
        assert_eq!(validator.fix_text("no digits"), "");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RegexValidator::new("[unclosed").unwrap_err();
        assert_eq!(err.category(), "regex");
    }

    #[test]
    fn test_list_validator() {
        let validator = ListValidator::new(["Belgium", "France"]);
        assert!(validator.is_valid("france"));
        assert!(validator.is_valid(" Belgium "));
        assert!(!validator.is_valid("Fr"));
        assert_eq!(validator.fix_text("fr"), "France");
        assert_eq!(validator.fix_text("Spain"), "");
        assert_eq!(validator.fix_text("  "), "");
    }
}
