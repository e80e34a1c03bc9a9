//! Per-key validation rules.

use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate over a flattened key and its value; `Err` carries the reason.
pub type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Flattened key to the ordered validators registered for it.
#[derive(Clone, Default)]
pub struct ValidatorTable {
    rules: HashMap<String, Vec<Validator>>,
}

impl ValidatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validator for `key`.
    pub fn push<F>(&mut self, key: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        let rules = self.rules.entry(key.to_string()).or_default();
        rules.push(Arc::new(validator));
        debug!("registered validator (key={key}, count={})", rules.len());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Run every validator for `key`; the first rejection wins.
    pub fn check(&self, key: &str, value: &Value) -> Result<(), ConfigError> {
        let Some(rules) = self.rules.get(key) else {
            return Ok(());
        };
        for rule in rules {
            rule(key, value).map_err(|message| ConfigError::Validation {
                key: key.to_string(),
                message,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValidatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.rules.keys().collect();
        keys.sort();
        f.debug_struct("ValidatorTable").field("keys", &keys).finish()
    }
}
