//! Options for fetch, read and write calls.

use crate::{ConfigError, Deferred, Node};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Value source consulted first when settings and environment disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Settings tree first, then environment, then the default.
    #[default]
    Settings,
    /// Environment first, then the settings tree.
    Environment,
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "settings" | "configuration" | "config" | "file" | "files" => Ok(Source::Settings),
            "environment" | "env" | "ENV" => Ok(Source::Environment),
            other => Err(ConfigError::UnsupportedSource(other.to_string())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Settings => f.write_str("settings"),
            Source::Environment => f.write_str("environment"),
        }
    }
}

/// Per-call overrides for [`Config::fetch_with`](crate::Config::fetch_with).
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Fallback used when neither settings nor environment hold a value.
    pub default: Option<Node>,
    /// Source precedence for this call; the config's preference otherwise.
    pub prefer: Option<Source>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed fallback value.
    pub fn with_default(mut self, default: impl Into<Node>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Compute the fallback only when it is needed.
    pub fn with_default_fn<F, T>(mut self, compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Node>,
    {
        self.default = Some(Node::Deferred(Deferred::new(compute)));
        self
    }

    pub fn prefer(mut self, source: Source) -> Self {
        self.prefer = Some(source);
        self
    }
}

/// Rewrites file content before it is parsed.
pub type ContentHook = Box<dyn FnOnce(String) -> String>;

/// Options for [`Config::read`](crate::Config::read).
#[derive(Default)]
pub struct ReadOptions {
    /// File to read; the first match in the search paths otherwise.
    pub file: Option<PathBuf>,
    /// Format name (`"yaml"`, `"toml"`, ...) overriding the file extension.
    pub format: Option<String>,
    /// Hook applied to the raw content before parsing.
    pub transform: Option<ContentHook>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a specific file.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: FnOnce(String) -> String + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("file", &self.file)
            .field("format", &self.format)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Options for [`Config::write`](crate::Config::write).
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// File to write; an existing config file or `{dir}/{filename}{extname}` otherwise.
    pub file: Option<PathBuf>,
    /// Create missing parent directories.
    pub create: bool,
    /// Overwrite an existing file.
    pub force: bool,
    /// Format name overriding the file extension.
    pub format: Option<String>,
    /// Directory to write into; replaces the directory part of `file`.
    pub path: Option<PathBuf>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write to a specific file.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}
