//! Public surface for Strata.
//!
//! This crate re-exports the settings store and provides a small logging
//! initialization helper so consumers wire up diagnostics the same way.

/// Re-export for convenience.
pub use strata_rs_config as config;
pub use strata_rs_config::{
    Config, ConfigBuilder, ConfigError, FetchOptions, ReadOptions, Source, WriteOptions,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Calling it more than once
/// is harmless.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn facade_exposes_the_store() {
        init_logging();
        init_logging();
        let config = Config::coerce(json!({"settings": {"base": "USD"}}));
        assert_eq!(
            config.fetch("settings.base").expect("fetch"),
            Some(json!("USD"))
        );
    }
}
