//! Environment variable overlay.
//!
//! Keys can be bound to environment variables explicitly (`set_from_env`) or,
//! with autoload enabled, derive their variable name from the key path. The
//! process environment itself is reached through [`EnvSource`] so lookups can
//! be replaced in tests.

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default separator between parts of a derived variable name.
pub const DEFAULT_ENV_SEPARATOR: &str = "_";

/// Read-only view over environment variables.
pub trait EnvSource: Send + Sync {
    /// Value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Bindings from keys to environment variable names, plus naming rules.
#[derive(Clone)]
pub struct EnvOverlay {
    bindings: HashMap<String, String>,
    prefix: String,
    separator: String,
    autoload: bool,
    source: Arc<dyn EnvSource>,
}

impl EnvOverlay {
    /// Overlay reading from `source`, with no prefix and `_` as separator.
    pub fn new(source: Arc<dyn EnvSource>) -> Self {
        Self {
            bindings: HashMap::new(),
            prefix: String::new(),
            separator: DEFAULT_ENV_SEPARATOR.to_string(),
            autoload: false,
            source,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    pub fn is_autoload(&self) -> bool {
        self.autoload
    }

    pub fn set_autoload(&mut self, autoload: bool) {
        self.autoload = autoload;
    }

    pub fn set_source(&mut self, source: Arc<dyn EnvSource>) {
        self.source = source;
    }

    /// Derive a variable name from a flattened key or an explicit name.
    ///
    /// The key delimiter becomes the separator, the result is upper-cased and
    /// prefixed with `PREFIX{separator}` when a prefix is configured.
    pub fn to_env_name(&self, key: &str, delimiter: &str) -> String {
        let name = if delimiter.is_empty() {
            key.to_uppercase()
        } else {
            key.replace(delimiter, &self.separator).to_uppercase()
        };
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}{}{}", self.prefix.to_uppercase(), self.separator, name)
        }
    }

    /// Bind `key` to the variable `env_name` (already derived).
    pub fn bind(&mut self, key: &str, env_name: String) -> String {
        debug!("binding key to environment (key={key}, env={env_name})");
        self.bindings.insert(key.to_lowercase(), env_name.clone());
        env_name
    }

    /// Variable name consulted for `key`: explicit binding first, then a
    /// derived name when autoload is on.
    pub fn env_name_for(&self, key: &str, delimiter: &str) -> Option<String> {
        if let Some(name) = self.bindings.get(&key.to_lowercase()) {
            return Some(name.clone());
        }
        self.autoload.then(|| self.to_env_name(key, delimiter))
    }

    /// Read a variable through the configured source.
    pub fn lookup(&self, env_name: &str) -> Option<String> {
        self.source.var(env_name)
    }
}

impl fmt::Debug for EnvOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvOverlay")
            .field("bindings", &self.bindings)
            .field("prefix", &self.prefix)
            .field("separator", &self.separator)
            .field("autoload", &self.autoload)
            .finish_non_exhaustive()
    }
}

impl Default for EnvOverlay {
    fn default() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }
}
