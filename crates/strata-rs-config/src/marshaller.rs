//! Marshaller contract and the extension-keyed registry.

use crate::error::MarshalError;
use crate::marshallers;
use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Converts a settings snapshot to and from one file format.
pub trait Marshaller: Send + Sync {
    /// File extensions served, including the leading dot.
    fn extensions(&self) -> &[&str];

    /// Verify the backing library is usable. Only called when the
    /// marshaller is about to be used.
    fn check_dependency(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Render a settings object as file content.
    fn marshal(&self, data: &Value) -> Result<String, MarshalError>;

    /// Parse file content into a settings object.
    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError>;
}

/// Error returned by `check_dependency` when a backing library is missing.
pub fn missing_dependency(name: &str) -> ConfigError {
    ConfigError::DependencyLoad(format!("The dependency `{name}` is missing."))
}

/// Named marshallers in registration order.
#[derive(Clone, Default)]
pub struct MarshallerRegistry {
    entries: Vec<(String, Arc<dyn Marshaller>)>,
}

impl MarshallerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in marshallers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, marshaller) in marshallers::builtins() {
            registry.register(name, marshaller);
        }
        registry
    }

    /// Register a marshaller by name.
    ///
    /// Re-registering an existing name swaps the marshaller in place, so the
    /// extension scan order does not change. Returns the replaced marshaller.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        marshaller: Arc<dyn Marshaller>,
    ) -> Option<Arc<dyn Marshaller>> {
        let name = name.into();
        debug!(
            "registering marshaller (name={name}, extensions={:?})",
            marshaller.extensions()
        );
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, marshaller)),
            None => {
                self.entries.push((name, marshaller));
                None
            }
        }
    }

    /// Remove a marshaller by name; absent names are ignored.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Marshaller>> {
        let idx = self.position(name)?;
        debug!("unregistering marshaller (name={name})");
        Some(self.entries.remove(idx).1)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Fetch a marshaller by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Marshaller>> {
        self.position(name).map(|idx| Arc::clone(&self.entries[idx].1))
    }

    /// Registered names in scan order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Registered marshallers in scan order.
    pub fn marshallers(&self) -> Vec<Arc<dyn Marshaller>> {
        self.entries
            .iter()
            .map(|(_, marshaller)| Arc::clone(marshaller))
            .collect()
    }

    /// Every served extension, in scan order.
    pub fn extensions(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(_, marshaller)| marshaller.extensions().iter().map(|ext| ext.to_string()))
            .collect()
    }

    /// First marshaller, in registration order, serving `ext`.
    pub fn resolve_by_extension(&self, ext: &str) -> Option<Arc<dyn Marshaller>> {
        self.entries
            .iter()
            .find(|(_, marshaller)| marshaller.extensions().contains(&ext))
            .map(|(_, marshaller)| Arc::clone(marshaller))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == name)
    }
}

impl fmt::Debug for MarshallerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
