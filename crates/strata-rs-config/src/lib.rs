//! Hierarchical settings store with environment overlay and file persistence.
//!
//! This crate owns the settings tree, composite keys, aliases, validators,
//! environment bindings and the marshallers that read and write config files.

mod alias;
mod config;
mod env;
mod error;
mod key;
mod locate;
mod marshaller;
pub mod marshallers;
mod options;
mod tree;
mod validate;

pub use alias::AliasTable;
/// The settings store and its builder.
pub use config::{Config, ConfigBuilder, DEFAULT_EXTNAME, DEFAULT_FILENAME};
pub use env::{DEFAULT_ENV_SEPARATOR, EnvOverlay, EnvSource, MapEnv, ProcessEnv};
/// Public error types.
pub use error::{ConfigError, MarshalError};
pub use key::{DEFAULT_DELIMITER, IntoKeys, KeyPath};
pub use locate::find_file;
/// Marshaller contract and registry.
pub use marshaller::{Marshaller, MarshallerRegistry, missing_dependency};
pub use options::{ContentHook, FetchOptions, ReadOptions, Source, WriteOptions};
pub use tree::{Deferred, Node, Tree, deep_delete, deep_get, deep_merge, deep_set};
pub use validate::{Validator, ValidatorTable};
