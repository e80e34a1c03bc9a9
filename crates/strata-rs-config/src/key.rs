//! Composite key parsing.
//!
//! A key is either a list of segments (`["foo", "bar"]`) or a single
//! delimiter-joined string (`"foo.bar"`). Both forms resolve to the same
//! [`KeyPath`], and both flatten to the same lookup token used by the alias,
//! validator and environment tables.

use crate::ConfigError;
use std::fmt;

/// Default delimiter between nested key segments.
pub const DEFAULT_DELIMITER: &str = ".";

/// Conversion into raw key tokens, prior to delimiter handling.
pub trait IntoKeys {
    /// Produce the raw tokens as given by the caller.
    fn into_keys(self) -> Vec<String>;
}

impl IntoKeys for &str {
    fn into_keys(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoKeys for String {
    fn into_keys(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoKeys for &String {
    fn into_keys(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoKeys for &[&str] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|key| key.to_string()).collect()
    }
}

impl<const N: usize> IntoKeys for [&str; N] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|key| key.to_string()).collect()
    }
}

impl IntoKeys for &[String] {
    fn into_keys(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoKeys for Vec<&str> {
    fn into_keys(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoKeys for Vec<String> {
    fn into_keys(self) -> Vec<String> {
        self
    }
}

impl IntoKeys for &KeyPath {
    fn into_keys(self) -> Vec<String> {
        self.segments.clone()
    }
}

impl IntoKeys for KeyPath {
    fn into_keys(self) -> Vec<String> {
        self.segments
    }
}

/// Canonical, non-empty sequence of key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Resolve raw tokens into segments.
    ///
    /// A first token containing the delimiter is split and wins over any
    /// further tokens; otherwise each token is one segment.
    pub fn parse(tokens: &[String], delimiter: &str) -> Result<Self, ConfigError> {
        let segments: Vec<String> = match tokens.first() {
            Some(first) if contains_delimiter(first, delimiter) => {
                first.split(delimiter).map(str::to_string).collect()
            }
            _ => tokens.to_vec(),
        };
        if segments.is_empty() || segments == [""] {
            return Err(ConfigError::InvalidKey);
        }
        Ok(Self { segments })
    }

    /// Split an already flattened key.
    pub fn split(flattened: &str, delimiter: &str) -> Result<Self, ConfigError> {
        Self::parse(&[flattened.to_string()], delimiter)
    }

    /// Flatten raw tokens into the lookup token used by the side tables.
    pub fn flatten(tokens: &[String], delimiter: &str) -> String {
        match tokens.first() {
            Some(first) if contains_delimiter(first, delimiter) => first.clone(),
            _ => tokens.join(delimiter),
        }
    }

    /// Join the segments with the delimiter.
    pub fn join(&self, delimiter: &str) -> String {
        self.segments.join(delimiter)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment of the path.
    pub fn last(&self) -> &str {
        // Non-empty by construction.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_DELIMITER))
    }
}

fn contains_delimiter(token: &str, delimiter: &str) -> bool {
    !delimiter.is_empty() && token.contains(delimiter)
}
