//! Alias table mapping alternate keys onto canonical keys.

use crate::ConfigError;
use log::debug;
use std::collections::HashMap;

/// Flattened alias key to flattened canonical key.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as another name for `target`.
    ///
    /// `target_taken` reports whether the alias key already resolves to a
    /// value; aliasing over existing data is refused.
    pub fn insert(
        &mut self,
        target: &str,
        alias: &str,
        target_taken: bool,
    ) -> Result<(), ConfigError> {
        if alias == target {
            return Err(ConfigError::InvalidArgument(
                "Alias matches setting key".to_string(),
            ));
        }
        if target_taken {
            return Err(ConfigError::InvalidArgument(format!(
                "Setting already exists with an alias '{alias}'"
            )));
        }
        debug!("registering alias (alias={alias}, target={target})");
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(())
    }

    /// Canonical key for `alias`, if one is registered.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::AliasTable;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_registered_alias() {
        let mut table = AliasTable::new();
        table.insert("foo", "bar", false).expect("alias");
        assert_eq!(table.resolve("bar"), Some("foo"));
        assert_eq!(table.resolve("foo"), None);

        table.insert("foo", "baz", false).expect("alias");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_self_alias_and_taken_keys() {
        let mut table = AliasTable::new();
        let err = table.insert("foo", "foo", false).unwrap_err();
        assert_eq!(err.to_string(), "Alias matches setting key");

        let err = table.insert("foo", "bar", true).unwrap_err();
        assert_eq!(err.to_string(), "Setting already exists with an alias 'bar'");
        assert!(table.is_empty());
    }
}
