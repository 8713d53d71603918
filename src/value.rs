//! Value types that statements, qualifiers, and reference claims can hold.
//!
//! Equality between values is deep and exact: the reconciliation engine
//! never fuzzy-matches, so two values compare equal only when their variant
//! and every field agree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Possible values a claim can hold.
///
/// This enum covers the value types the reconciliation engine knows how to
/// compare. URL values get their own variant (rather than reusing
/// [`Value::String`]) because the de-archival transformer only fires on
/// URL-typed claims.
///
/// # Examples
///
/// ```
/// use claimsync::Value;
///
/// let url = Value::url("http://example.com");
/// let text = Value::monolingual("en", "hello");
///
/// assert!(url.is_url());
/// assert_eq!(text.language(), Some("en"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// A plain string (external identifiers, free text).
    String(String),
    /// A URL.
    Url(String),
    /// A reference to another entity by its stable ID (e.g. `Q42`).
    Item(String),
    /// Text in a specific language.
    Monolingual {
        /// BCP-47 language tag.
        language: String,
        /// The text itself.
        text: String,
    },
    /// A day-precision calendar date.
    Date(NaiveDate),
    /// An integer quantity.
    Int(i64),
}

impl Value {
    /// Creates a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a URL value.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Creates an item-reference value.
    pub fn item(id: impl Into<String>) -> Self {
        Self::Item(id.into())
    }

    /// Creates a monolingual text value.
    pub fn monolingual(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Monolingual {
            language: language.into(),
            text: text.into(),
        }
    }

    /// Returns true if this is a string value.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this is a URL value.
    #[must_use]
    pub const fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Returns true if this is an item reference.
    #[must_use]
    pub const fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Returns true if this is monolingual text.
    #[must_use]
    pub const fn is_monolingual(&self) -> bool {
        matches!(self, Self::Monolingual { .. })
    }

    /// Returns the string content, if this is a string value.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the URL, if this is a URL value.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the referenced item ID, if this is an item reference.
    #[must_use]
    pub fn as_item(&self) -> Option<&str> {
        match self {
            Self::Item(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the language tag, if this is monolingual text.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Monolingual { language, .. } => Some(language),
            _ => None,
        }
    }

    /// Returns the date, if this is a date value.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let url = Value::url("http://example.com");
        assert!(url.is_url());
        assert_eq!(url.as_url(), Some("http://example.com"));
        assert_eq!(url.as_string(), None);

        let item = Value::item("Q42");
        assert!(item.is_item());
        assert_eq!(item.as_item(), Some("Q42"));

        let n = Value::from(7i64);
        assert_eq!(n.as_int(), Some(7));
    }

    #[test]
    fn test_monolingual_language() {
        let text = Value::monolingual("de", "Hallo");
        assert!(text.is_monolingual());
        assert_eq!(text.language(), Some("de"));
        assert_eq!(Value::string("Hallo").language(), None);
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_ne!(Value::string("a"), Value::url("a"));
        assert_ne!(
            Value::monolingual("en", "hello"),
            Value::monolingual("en", "hi")
        );
        assert_ne!(
            Value::monolingual("en", "hello"),
            Value::monolingual("fr", "hello")
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let original = Value::monolingual("en", "hello");
        let json = serde_json::to_string(&original).unwrap();
        let decoded: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);

        let date = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let json = serde_json::to_string(&date).unwrap();
        assert!(json.contains("2020-01-01"));
    }
}
