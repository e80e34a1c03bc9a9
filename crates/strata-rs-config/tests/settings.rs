//! Tests for in-memory settings: lookups, mutation, aliases, validation and
//! the environment overlay.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use strata_rs_config::{Config, ConfigError, FetchOptions, MapEnv, Node, Source};

/// Config reading from a fixed environment instead of the process one.
fn config_with_env(env: MapEnv) -> Config {
    Config::builder()
        .env_source(Arc::new(env))
        .build()
        .expect("config")
}

fn empty_config() -> Config {
    config_with_env(MapEnv::new())
}

fn must_be_integer(_key: &str, value: &Value) -> Result<(), String> {
    if value.is_i64() {
        Ok(())
    } else {
        Err(format!("expected an integer, got {value}"))
    }
}

/// Every key form addresses the same nested setting.
#[test]
fn key_forms_are_interchangeable() {
    let mut config = empty_config();
    config.set(["foo", "bar", "baz"], 2).expect("set");

    assert_eq!(config.fetch("foo.bar.baz").expect("fetch"), Some(json!(2)));
    assert_eq!(config.fetch(vec!["foo", "bar", "baz"]).expect("fetch"), Some(json!(2)));
    assert_eq!(config.fetch(["foo", "bar"]).expect("fetch"), Some(json!({"baz": 2})));
    assert_eq!(config.fetch("foo.unknown").expect("fetch"), None);
}

/// A dotted first token wins over the remaining tokens.
#[test]
fn dotted_first_token_wins() {
    let mut config = empty_config();
    config.set(vec!["a.b", "ignored"], "value").expect("set");
    assert_eq!(config.to_value().expect("value"), json!({"a": {"b": "value"}}));
}

/// Custom delimiters split keys instead of dots.
#[test]
fn custom_key_delimiter() {
    let mut config = Config::builder()
        .key_delimiter("/")
        .env_source(Arc::new(MapEnv::new()))
        .build()
        .expect("config");
    config.set("settings/base", "USD").expect("set");
    config.set("version.major", 1).expect("set");

    assert_eq!(
        config.to_value().expect("value"),
        json!({"settings": {"base": "USD"}, "version.major": 1})
    );
    assert_eq!(config.fetch(["settings", "base"]).expect("fetch"), Some(json!("USD")));
}

/// Empty keys are rejected.
#[test]
fn empty_key_is_invalid() {
    let mut config = empty_config();
    let err = config.set(Vec::<String>::new(), 1).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidKey));

    let err = config.set("", 1).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidKey));
    assert_eq!(config.to_value().expect("value"), json!({}));
}

/// Defaults apply only when nothing else resolves.
#[test]
fn fetch_default_and_lazy_default() {
    let mut config = empty_config();
    config.set("present", "yes").expect("set");

    let options = FetchOptions::new().with_default("fallback");
    assert_eq!(config.fetch_with("present", options).expect("fetch"), Some(json!("yes")));

    let options = FetchOptions::new().with_default("fallback");
    assert_eq!(
        config.fetch_with("missing", options).expect("fetch"),
        Some(json!("fallback"))
    );

    let options = FetchOptions::new().with_default_fn(|| json!({"computed": true}));
    assert_eq!(
        config.fetch_with("missing", options).expect("fetch"),
        Some(json!({"computed": true}))
    );
}

/// Null settings count as absent.
#[test]
fn null_setting_falls_through_to_default() {
    let mut config = empty_config();
    config.set("empty", Value::Null).expect("set");
    let options = FetchOptions::new().with_default(3);
    assert_eq!(config.fetch_with("empty", options).expect("fetch"), Some(json!(3)));
}

/// Deferred values run on each fetch and may return further deferred values.
#[test]
fn deferred_values_are_evaluated_each_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut config = empty_config();
    config
        .set_with("nested", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            strata_rs_config::Deferred::new(|| "deep")
        })
        .expect("set");

    assert_eq!(config.fetch("nested").expect("fetch"), Some(json!("deep")));
    assert_eq!(config.fetch("nested").expect("fetch"), Some(json!("deep")));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// `set_if_empty` leaves existing values untouched.
#[test]
fn set_if_empty_keeps_existing() {
    let mut config = empty_config();
    assert!(config.set_if_empty("base", "USD").expect("set").is_some());
    assert!(config.set_if_empty("base", "EUR").expect("set").is_none());
    assert_eq!(config.fetch("base").expect("fetch"), Some(json!("USD")));
}

/// Merging nests, overrides and ignores non-objects.
#[test]
fn merge_deeply() {
    let mut config = Config::coerce(json!({"a": {"b": 1, "c": 2}}));
    assert!(config.merge(json!({"a": {"c": 3, "d": 4}})));
    assert!(!config.merge(json!(["not", "an", "object"])));

    assert_eq!(
        config.to_value().expect("value"),
        json!({"a": {"b": 1, "c": 3, "d": 4}})
    );
}

/// Appending creates, extends and wraps lists.
#[test]
fn append_values() {
    let mut config = empty_config();
    config.append(["BTC", "ETH"], "coins").expect("append");
    config.append(["TRX"], "coins").expect("append");
    assert_eq!(config.fetch("coins").expect("fetch"), Some(json!(["BTC", "ETH", "TRX"])));

    config.set("single", "a").expect("set");
    config.append(["b"], "single").expect("append");
    assert_eq!(config.fetch("single").expect("fetch"), Some(json!(["a", "b"])));
}

/// Removing drops every occurrence and tolerates missing keys.
#[test]
fn remove_values() {
    let mut config = Config::coerce(json!({"coins": ["BTC", "ETH", "BTC", "TRX"]}));
    config.remove(["BTC", "DASH"], "coins").expect("remove");
    assert_eq!(config.fetch("coins").expect("fetch"), Some(json!(["ETH", "TRX"])));

    config.remove(["x"], "missing").expect("remove");
    assert_eq!(config.fetch("missing").expect("fetch"), Some(json!([])));

    let err = config.remove(["x"], Vec::<String>::new()).unwrap_err();
    assert_eq!(err.to_string(), "Need to set key to remove from");
}

/// Deleting returns the removed subtree.
#[test]
fn delete_subtree_and_missing_keys() {
    let mut config = Config::coerce(json!({"foo": {"bar": {"baz": 1}, "keep": true}}));

    let removed = config.delete("foo.bar").expect("delete");
    assert_eq!(removed, Some(Node::from(json!({"baz": 1}))));
    assert_eq!(config.to_value().expect("value"), json!({"foo": {"keep": true}}));

    assert_eq!(config.delete("foo.unknown").expect("delete"), None);
    let fallback = config
        .delete_or_else("foo.unknown", |key| Some(Node::from(format!("{key} isn't set"))))
        .expect("delete");
    assert_eq!(fallback, Some(Node::from("unknown isn't set")));
}

/// A scalar met along the path is removed even when segments remain.
#[test]
fn delete_stops_at_first_scalar() {
    let mut config = Config::coerce(json!({"foo": {"bar": "baz"}}));
    let removed = config.delete(["foo", "bar", "deeper"]).expect("delete");
    assert_eq!(removed, Some(Node::from("baz")));
    assert_eq!(config.to_value().expect("value"), json!({"foo": {}}));
}

/// Aliases resolve to the canonical key.
#[test]
fn alias_lookups() {
    let mut config = Config::coerce(json!({"foo": {"bar": "baz"}}));
    config.alias_setting("foo.bar", "bar").expect("alias");
    config.alias_setting(["foo", "bar"], ["alt", "name"]).expect("alias");

    assert_eq!(config.fetch("bar").expect("fetch"), Some(json!("baz")));
    assert_eq!(config.fetch("alt.name").expect("fetch"), Some(json!("baz")));
}

/// Aliases cannot shadow themselves or existing settings.
#[test]
fn alias_collisions() {
    let mut config = Config::coerce(json!({"foo": "a", "taken": 0}));

    let err = config.alias_setting("foo", "foo").unwrap_err();
    assert_eq!(err.to_string(), "Alias matches setting key");

    let err = config.alias_setting("foo", "taken").unwrap_err();
    assert_eq!(err.to_string(), "Setting already exists with an alias 'taken'");
}

/// A key holding `false` is free to become an alias.
#[test]
fn alias_over_false_setting() {
    let mut config = Config::coerce(json!({"foo": "a", "off": false}));
    config.alias_setting("foo", "off").expect("alias");
    assert_eq!(config.fetch("off").expect("fetch"), Some(json!("a")));
}

/// Validators reject concrete values at set time.
#[test]
fn validation_on_set() {
    let mut config = empty_config();
    config.validate("settings.top", must_be_integer);
    config.set("settings.top", 50).expect("valid");

    let err = config.set(["settings", "top"], "fifty").unwrap_err();
    assert_eq!(err.key(), Some("settings.top"));
    assert_eq!(config.fetch("settings.top").expect("fetch"), Some(json!(50)));
}

/// All validators for a key run in registration order.
#[test]
fn validators_chain() {
    let mut config = empty_config();
    config.validate("port", must_be_integer);
    config.validate("port", |_, value| match value.as_i64() {
        Some(port) if port > 1024 => Ok(()),
        _ => Err("port must be above 1024".to_string()),
    });

    assert!(config.set("port", 80).is_err());
    config.set("port", 8080).expect("valid");
}

/// Deferred values are validated when fetched, not when stored.
#[test]
fn validation_is_delayed_for_deferred_values() {
    let mut config = empty_config();
    config.validate("top", must_be_integer);
    config.set_with("top", || "not a number").expect("stored");

    let err = config.fetch("top").unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

/// Explicit environment bindings back missing settings.
#[test]
fn env_binding_fills_missing_settings() {
    let mut config = config_with_env(MapEnv::new().with("HOST", "localhost"));
    assert_eq!(config.set_from_env_as("server.host", "host"), "HOST");
    assert_eq!(config.fetch("server.host").expect("fetch"), Some(json!("localhost")));
}

/// Bindings use the configured prefix and separator.
#[test]
fn env_prefix_and_separator() {
    let mut config = Config::builder()
        .env_source(Arc::new(MapEnv::new().with("MYTOOL__FOO__BAR", "1")))
        .env_prefix("mytool")
        .env_separator("__")
        .build()
        .expect("config");

    assert_eq!(config.set_from_env("foo.bar"), "MYTOOL__FOO__BAR");
    assert_eq!(config.fetch(["foo", "bar"]).expect("fetch"), Some(json!("1")));
}

/// Autoload derives a variable for every key.
#[test]
fn autoload_env() {
    let mut config = config_with_env(MapEnv::new().with("DB_PORT", "5432"));
    assert_eq!(config.fetch("db.port").expect("fetch"), None);

    config.autoload_env();
    assert!(config.is_autoload_env());
    assert_eq!(config.fetch("db.port").expect("fetch"), Some(json!("5432")));
}

/// An autoloaded key with no variable set falls back to the default.
#[test]
fn autoload_env_falls_back_to_default() {
    let mut config = empty_config();
    config.autoload_env();

    assert_eq!(config.fetch("db.host").expect("fetch"), None);
    let options = FetchOptions::new().with_default("localhost");
    assert_eq!(
        config.fetch_with("db.host", options).expect("fetch"),
        Some(json!("localhost"))
    );
}

/// Settings win by default; the environment wins when preferred.
#[test]
fn source_precedence() {
    let mut config = config_with_env(MapEnv::new().with("BASE", "CAD"));
    config.set("base", "USD").expect("set");
    config.set_from_env("base");

    assert_eq!(config.fetch("base").expect("fetch"), Some(json!("USD")));

    config.prefer(Source::Environment);
    assert_eq!(config.preferred(), Source::Environment);
    assert_eq!(config.fetch("base").expect("fetch"), Some(json!("CAD")));

    let options = FetchOptions::new().prefer(Source::Settings);
    assert_eq!(config.fetch_with("base", options).expect("fetch"), Some(json!("USD")));
}

/// With the environment preferred and the variable unset, settings still answer.
#[test]
fn environment_preference_falls_back_to_settings() {
    let mut config = Config::builder()
        .env_source(Arc::new(MapEnv::new()))
        .prefer("env".parse().expect("source"))
        .build()
        .expect("config");
    config.set("base", "USD").expect("set");
    config.set_from_env("base");

    assert_eq!(config.fetch("base").expect("fetch"), Some(json!("USD")));
}

/// Aliased keys consult the canonical key's environment binding.
#[test]
fn alias_uses_canonical_env_binding() {
    let mut config = config_with_env(MapEnv::new().with("SERVER_PORT", "9000"));
    config.set_from_env("server.port");
    config.alias_setting("server.port", "port").expect("alias");
    assert_eq!(config.fetch("port").expect("fetch"), Some(json!("9000")));
}

/// The tree snapshot is independent of the config.
#[test]
fn to_tree_is_a_copy() {
    let mut config = Config::coerce(json!({"a": 1}));
    let snapshot = config.to_tree();
    config.set("a", 2).expect("set");

    assert_eq!(snapshot.to_value().expect("value"), json!({"a": 1}));
    assert_eq!(config.fetch("a").expect("fetch"), Some(json!(2)));
}
