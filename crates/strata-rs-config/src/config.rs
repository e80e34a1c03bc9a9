//! The configuration store.
//!
//! [`Config`] owns the settings tree and the side tables around it: aliases,
//! validators, environment bindings and the marshaller registry. Lookups go
//! alias → source precedence → default → deferred evaluation; writes go
//! validation → deep set.

use crate::env::{EnvOverlay, EnvSource, ProcessEnv};
use crate::locate;
use crate::options::{FetchOptions, ReadOptions, Source, WriteOptions};
use crate::tree::{deep_delete, deep_get, deep_merge, deep_set};
use crate::{
    AliasTable, ConfigError, Deferred, IntoKeys, KeyPath, Marshaller, MarshallerRegistry, Node,
    Tree, ValidatorTable, DEFAULT_DELIMITER,
};
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default config file name, without extension.
pub const DEFAULT_FILENAME: &str = "config";
/// Default config file extension.
pub const DEFAULT_EXTNAME: &str = ".yml";
/// Extension accepted in addition to the registered ones: no extension.
const NO_EXT: &str = "";

/// Hierarchical settings with environment overlay, aliases, validation and
/// file persistence.
#[derive(Debug, Clone)]
pub struct Config {
    settings: Tree,
    location_paths: Vec<PathBuf>,
    filename: String,
    extname: String,
    key_delimiter: String,
    validators: ValidatorTable,
    aliases: AliasTable,
    env: EnvOverlay,
    preferred: Source,
    registry: MarshallerRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Empty config with the built-in marshallers and the process environment.
    pub fn new() -> Self {
        Self {
            settings: Tree::new(),
            location_paths: Vec::new(),
            filename: DEFAULT_FILENAME.to_string(),
            extname: DEFAULT_EXTNAME.to_string(),
            key_delimiter: DEFAULT_DELIMITER.to_string(),
            validators: ValidatorTable::new(),
            aliases: AliasTable::new(),
            env: EnvOverlay::new(Arc::new(ProcessEnv)),
            preferred: Source::Settings,
            registry: MarshallerRegistry::with_builtins(),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config seeded from a JSON object; other values give an empty config.
    pub fn coerce(settings: Value) -> Self {
        let mut config = Self::new();
        config.merge(settings);
        config
    }

    pub fn key_delimiter(&self) -> &str {
        &self.key_delimiter
    }

    // ---- locations and file metadata ----

    pub fn location_paths(&self) -> &[PathBuf] {
        &self.location_paths
    }

    /// Add a directory to search last.
    pub fn append_path(&mut self, path: impl AsRef<Path>) {
        self.location_paths.push(path.as_ref().to_path_buf());
    }

    /// Add a directory to search first.
    pub fn prepend_path(&mut self, path: impl AsRef<Path>) {
        self.location_paths.insert(0, path.as_ref().to_path_buf());
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    pub fn extname(&self) -> &str {
        &self.extname
    }

    /// Set the file extension; it must be served by a registered marshaller.
    pub fn set_extname(&mut self, extname: impl Into<String>) -> Result<(), ConfigError> {
        let extname = extname.into();
        if !self.extensions().contains(&extname) {
            return Err(ConfigError::UnsupportedExtension(extname));
        }
        self.extname = extname;
        Ok(())
    }

    /// Take filename and extension from `path`.
    pub fn set_file_metadata(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.set_extname(locate::extension_of(path))?;
        self.filename = locate::stem_of(path);
        Ok(())
    }

    /// First `{location}/{filename}{ext}` on disk, over every known extension.
    pub fn find_file(&self) -> Option<PathBuf> {
        locate::find_file(&self.location_paths, &self.filename, self.extensions())
    }

    /// Whether a config file can be found in the search paths.
    pub fn exists(&self) -> bool {
        self.find_file().is_some()
    }

    pub fn is_persisted(&self) -> bool {
        self.exists()
    }

    // ---- environment ----

    pub fn env_prefix(&self) -> &str {
        self.env.prefix()
    }

    pub fn set_env_prefix(&mut self, prefix: impl Into<String>) {
        self.env.set_prefix(prefix);
    }

    pub fn env_separator(&self) -> &str {
        self.env.separator()
    }

    pub fn set_env_separator(&mut self, separator: impl Into<String>) {
        self.env.set_separator(separator);
    }

    /// Derive an environment variable for every key looked up.
    pub fn autoload_env(&mut self) {
        self.env.set_autoload(true);
    }

    pub fn is_autoload_env(&self) -> bool {
        self.env.is_autoload()
    }

    /// Replace the environment used for lookups.
    pub fn set_env_source(&mut self, source: Arc<dyn EnvSource>) {
        self.env.set_source(source);
    }

    /// Bind a key to the environment variable derived from it.
    ///
    /// Returns the variable name, e.g. `FOO_BAR` for `foo.bar`.
    pub fn set_from_env(&mut self, keys: impl IntoKeys) -> String {
        let key = KeyPath::flatten(&keys.into_keys(), &self.key_delimiter);
        let env_name = self.env.to_env_name(&key, &self.key_delimiter);
        self.env.bind(&key, env_name)
    }

    /// Bind a key to an explicitly named environment variable.
    ///
    /// The configured prefix and separator still apply to `name`.
    pub fn set_from_env_as(&mut self, keys: impl IntoKeys, name: &str) -> String {
        let key = KeyPath::flatten(&keys.into_keys(), &self.key_delimiter);
        let env_name = self.env.to_env_name(name, &self.key_delimiter);
        self.env.bind(&key, env_name)
    }

    pub fn preferred(&self) -> Source {
        self.preferred
    }

    pub fn prefer(&mut self, source: Source) {
        self.preferred = source;
    }

    // ---- values ----

    /// Store a value (or a [`Deferred`] computation) under a composite key.
    ///
    /// Concrete values are validated immediately; deferred values are
    /// validated each time they are evaluated. Returns the stored node.
    pub fn set(
        &mut self,
        keys: impl IntoKeys,
        value: impl Into<Node>,
    ) -> Result<Node, ConfigError> {
        let tokens = keys.into_keys();
        let path = KeyPath::parse(&tokens, &self.key_delimiter)?;
        let key = KeyPath::flatten(&tokens, &self.key_delimiter);

        let mut node = value.into();
        if self.validators.contains(&key) {
            node = match node {
                Node::Deferred(deferred) => Node::Deferred(self.delay_validation(&key, deferred)),
                concrete => {
                    self.validators.check(&key, &concrete.to_value()?)?;
                    concrete
                }
            };
        }
        Ok(deep_set(&mut self.settings, &path, node))
    }

    /// Store a computation evaluated on every fetch.
    pub fn set_with<F, T>(&mut self, keys: impl IntoKeys, compute: F) -> Result<Node, ConfigError>
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Node>,
    {
        self.set(keys, Deferred::new(compute))
    }

    /// Store a value only when the key holds nothing yet.
    pub fn set_if_empty(
        &mut self,
        keys: impl IntoKeys,
        value: impl Into<Node>,
    ) -> Result<Option<Node>, ConfigError> {
        let tokens = keys.into_keys();
        let path = KeyPath::parse(&tokens, &self.key_delimiter)?;
        if deep_get(&self.settings, &path).is_some_and(|node| !node.is_absent()) {
            return Ok(None);
        }
        self.set(tokens, value).map(Some)
    }

    /// Look up a value; see [`Config::fetch_with`].
    pub fn fetch(&self, keys: impl IntoKeys) -> Result<Option<Value>, ConfigError> {
        self.fetch_with(keys, FetchOptions::default())
    }

    /// Look up a value.
    ///
    /// Resolution order: alias substitution, then the preferred source.
    /// Settings-first consults the tree, the bound environment variable and
    /// finally `options.default`; environment-first consults the variable and
    /// then the tree. Deferred values are evaluated, never cached. A missing
    /// key is `Ok(None)`.
    pub fn fetch_with(
        &self,
        keys: impl IntoKeys,
        options: FetchOptions,
    ) -> Result<Option<Value>, ConfigError> {
        let tokens = keys.into_keys();
        let delimiter = self.key_delimiter.as_str();
        let requested = KeyPath::flatten(&tokens, delimiter);
        let (path, key) = match self.aliases.resolve(&requested) {
            Some(real) => (KeyPath::split(real, delimiter)?, real.to_string()),
            None => (KeyPath::parse(&tokens, delimiter)?, requested),
        };
        let env_name = self.env.env_name_for(&key, delimiter);

        let from_settings = || {
            deep_get(&self.settings, &path)
                .filter(|node| !node.is_absent())
                .cloned()
        };
        let from_env = || {
            let name = env_name.as_deref()?;
            let value = self.env.lookup(name)?;
            debug!("resolved key from environment (key={key}, env={name})");
            Some(Node::Leaf(Value::String(value)))
        };

        let node = match options.prefer.unwrap_or(self.preferred) {
            Source::Settings => from_settings().or_else(from_env).or(options.default),
            Source::Environment => from_env().or_else(from_settings),
        };
        node.map(|node| node.to_value()).transpose()
    }

    /// Deep-merge a JSON object into the settings. Non-objects are ignored.
    ///
    /// Returns whether anything was merged.
    pub fn merge(&mut self, other: Value) -> bool {
        match Tree::from_value(other) {
            Some(tree) => {
                deep_merge(&mut self.settings, &tree);
                true
            }
            None => {
                warn!("ignoring merge of a non-object value");
                false
            }
        }
    }

    /// Append values to the list under `to`; a missing key starts empty and a
    /// scalar becomes a one-element list.
    pub fn append<I>(&mut self, values: I, to: impl IntoKeys) -> Result<Node, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let tokens = to.into_keys();
        let mut items = into_list(self.fetch(tokens.clone())?);
        items.extend(values.into_iter().map(Into::into));
        self.set(tokens, Value::Array(items))
    }

    /// Remove every occurrence of `values` from the list under `from`.
    pub fn remove<I>(&mut self, values: I, from: impl IntoKeys) -> Result<Node, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let tokens = from.into_keys();
        if tokens.is_empty() {
            return Err(ConfigError::InvalidArgument(
                "Need to set key to remove from".to_string(),
            ));
        }
        let unwanted: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut items = into_list(self.fetch(tokens.clone())?);
        items.retain(|item| !unwanted.contains(item));
        self.set(tokens, Value::Array(items))
    }

    /// Delete the value under a composite key, returning it.
    pub fn delete(&mut self, keys: impl IntoKeys) -> Result<Option<Node>, ConfigError> {
        self.delete_or_else(keys, |_| None)
    }

    /// Delete the value under a composite key; when it is missing, return
    /// whatever `on_missing` produces for the absent segment.
    pub fn delete_or_else<F>(
        &mut self,
        keys: impl IntoKeys,
        on_missing: F,
    ) -> Result<Option<Node>, ConfigError>
    where
        F: FnOnce(&str) -> Option<Node>,
    {
        let path = KeyPath::parse(&keys.into_keys(), &self.key_delimiter)?;
        Ok(deep_delete(&mut self.settings, path.segments(), on_missing))
    }

    /// Make `to` another name for `keys`.
    ///
    /// Fails when `to` equals `keys` or already resolves to a value other
    /// than `null` or `false`.
    pub fn alias_setting(
        &mut self,
        keys: impl IntoKeys,
        to: impl IntoKeys,
    ) -> Result<(), ConfigError> {
        let setting = KeyPath::flatten(&keys.into_keys(), &self.key_delimiter);
        let alias_tokens = to.into_keys();
        let alias = KeyPath::flatten(&alias_tokens, &self.key_delimiter);

        let taken = alias != setting
            && self
                .fetch(alias_tokens)?
                .is_some_and(|value| !matches!(value, Value::Null | Value::Bool(false)));
        self.aliases.insert(&setting, &alias, taken)
    }

    /// Register a validator for a composite key.
    ///
    /// Validators run on later `set` calls only; existing values are not
    /// re-checked.
    pub fn validate<F>(&mut self, keys: impl IntoKeys, predicate: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        let key = KeyPath::flatten(&keys.into_keys(), &self.key_delimiter);
        self.validators.push(&key, predicate);
    }

    /// Deep copy of the settings tree.
    pub fn to_tree(&self) -> Tree {
        self.settings.clone()
    }

    /// Settings as JSON, with deferred values evaluated.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        self.settings.to_value()
    }

    // ---- marshallers ----

    pub fn marshaller_registry(&self) -> &MarshallerRegistry {
        &self.registry
    }

    /// Register (or replace in place) a marshaller.
    pub fn register_marshaller(
        &mut self,
        name: impl Into<String>,
        marshaller: Arc<dyn Marshaller>,
    ) -> Option<Arc<dyn Marshaller>> {
        self.registry.register(name, marshaller)
    }

    /// Remove marshallers by name; unknown names are ignored.
    pub fn unregister_marshallers<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.registry.unregister(name);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.is_registered(name)
    }

    pub fn marshallers(&self) -> Vec<Arc<dyn Marshaller>> {
        self.registry.marshallers()
    }

    /// Every supported extension, plus the empty extension.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions = self.registry.extensions();
        extensions.push(NO_EXT.to_string());
        extensions
    }

    // ---- persistence ----

    /// Read a config file and merge it into the settings.
    pub fn read(&mut self, options: ReadOptions) -> Result<(), ConfigError> {
        let ReadOptions {
            file,
            format,
            transform,
        } = options;
        let Some(file) = file.or_else(|| self.find_file()) else {
            return Err(ConfigError::Read(
                "No file found to read configuration from!".to_string(),
            ));
        };
        if !file.exists() {
            return Err(ConfigError::Read(format!(
                "Configuration file `{}` does not exist!",
                file.display()
            )));
        }

        self.set_file_metadata(&file)?;
        let ext = self.format_extension(format.as_deref());
        info!("reading config (path={}, ext={ext})", file.display());

        let mut content = fs::read_to_string(&file).map_err(|err| {
            ConfigError::Read(format!("Failed to read `{}`: {err}", file.display()))
        })?;
        if let Some(transform) = transform {
            content = transform(content);
        }

        let value = self.unmarshal(&content, &ext)?;
        self.merge(value);
        Ok(())
    }

    /// Write the settings to a file and return the path written.
    pub fn write(&mut self, options: WriteOptions) -> Result<PathBuf, ConfigError> {
        let WriteOptions {
            file,
            create,
            force,
            format,
            path,
        } = options;
        let file = file.or_else(|| self.find_file());
        let target = self.full_path(file, path.as_deref())?;
        check_can_write(&target, force)?;

        self.set_file_metadata(&target)?;
        let ext = self.format_extension(format.as_deref());
        let content = self.marshal(&ext)?;

        create_missing_dirs(&target, create)?;
        fs::write(&target, content).map_err(|err| {
            ConfigError::Write(format!("Cannot write to {}: {err}", target.display()))
        })?;
        info!("wrote config (path={}, ext={ext})", target.display());
        Ok(target)
    }

    fn format_extension(&self, format: Option<&str>) -> String {
        match format {
            Some(format) => format!(".{format}"),
            None => self.extname.clone(),
        }
    }

    fn marshaller_for(&self, ext: &str) -> Option<Arc<dyn Marshaller>> {
        let marshaller = self.registry.resolve_by_extension(ext);
        if marshaller.is_none() {
            debug!("no marshaller registered for extension (ext={ext})");
        }
        marshaller
    }

    fn unmarshal(&self, content: &str, ext: &str) -> Result<Value, ConfigError> {
        let marshaller = self.marshaller_for(ext).ok_or_else(|| {
            ConfigError::Read(format!("Config file format `{ext}` is not supported."))
        })?;
        marshaller.check_dependency()?;
        marshaller
            .unmarshal(content)
            .map_err(|err| ConfigError::Read(format!("Failed to parse `{ext}` content: {err}")))
    }

    fn marshal(&self, ext: &str) -> Result<String, ConfigError> {
        let marshaller = self.marshaller_for(ext).ok_or_else(|| {
            ConfigError::Write(format!("Config file format `{ext}` is not supported."))
        })?;
        marshaller.check_dependency()?;
        let data = self.settings.to_value()?;
        marshaller
            .marshal(&data)
            .map_err(|err| ConfigError::Write(format!("Failed to render `{ext}` content: {err}")))
    }

    /// Target file for a write: `file` (moved into `path` when given), else
    /// `{path | first location | cwd}/{filename}{extname}`.
    fn full_path(
        &self,
        file: Option<PathBuf>,
        path: Option<&Path>,
    ) -> Result<PathBuf, ConfigError> {
        match (file, path) {
            (Some(file), Some(dir)) => Ok(match file.file_name() {
                Some(name) => dir.join(name),
                None => dir.join(&file),
            }),
            (Some(file), None) => Ok(file),
            (None, dir) => {
                let dir = dir
                    .map(Path::to_path_buf)
                    .or_else(|| self.location_paths.first().cloned());
                let dir = match dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                Ok(dir.join(format!("{}{}", self.filename, self.extname)))
            }
        }
    }

    fn delay_validation(&self, key: &str, deferred: Deferred) -> Deferred {
        let validators = self.validators.clone();
        let key = key.to_string();
        Deferred::fallible(move || {
            let node = deferred.resolve()?;
            validators.check(&key, &node.to_value()?)?;
            Ok(node)
        })
    }
}

/// Current value as a list: nothing is empty, a scalar is a single item.
fn into_list(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    }
}

fn check_can_write(target: &Path, force: bool) -> Result<(), ConfigError> {
    if !target.exists() {
        return Ok(());
    }
    if !force {
        return Err(ConfigError::Write(format!(
            "File `{}` already exists. Use the force option to overwrite.",
            target.display()
        )));
    }
    let readonly = fs::metadata(target)
        .map(|meta| meta.permissions().readonly())
        .unwrap_or(true);
    if readonly {
        return Err(ConfigError::Write(format!(
            "Cannot write to {}.",
            target.display()
        )));
    }
    Ok(())
}

fn create_missing_dirs(target: &Path, create: bool) -> Result<(), ConfigError> {
    let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }
    if !create {
        return Err(ConfigError::Write(format!(
            "Directory `{}` doesn't exist. Use the create option to create missing directories.",
            dir.display()
        )));
    }
    debug!("creating config directory (path={})", dir.display());
    fs::create_dir_all(dir).map_err(|err| {
        ConfigError::Write(format!("Cannot create directory `{}`: {err}", dir.display()))
    })
}

/// Builder for [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    settings: Option<Value>,
    key_delimiter: Option<String>,
    env_source: Option<Arc<dyn EnvSource>>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    autoload_env: bool,
    prefer: Option<Source>,
    filename: Option<String>,
    extname: Option<String>,
    locations: Vec<PathBuf>,
    registry: Option<MarshallerRegistry>,
}

impl ConfigBuilder {
    /// Initial settings (a JSON object).
    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn key_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.key_delimiter = Some(delimiter.into());
        self
    }

    pub fn env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = Some(source);
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn env_separator(mut self, separator: impl Into<String>) -> Self {
        self.env_separator = Some(separator.into());
        self
    }

    pub fn autoload_env(mut self, autoload: bool) -> Self {
        self.autoload_env = autoload;
        self
    }

    pub fn prefer(mut self, source: Source) -> Self {
        self.prefer = Some(source);
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn extname(mut self, extname: impl Into<String>) -> Self {
        self.extname = Some(extname.into());
        self
    }

    /// Add a search directory.
    pub fn location(mut self, path: impl AsRef<Path>) -> Self {
        self.locations.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the built-in marshallers.
    pub fn marshallers(mut self, registry: MarshallerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::new();
        if let Some(registry) = self.registry {
            config.registry = registry;
        }
        if let Some(delimiter) = self.key_delimiter {
            if delimiter.is_empty() {
                return Err(ConfigError::InvalidArgument(
                    "key delimiter must not be empty".to_string(),
                ));
            }
            config.key_delimiter = delimiter;
        }
        if let Some(source) = self.env_source {
            config.env.set_source(source);
        }
        if let Some(prefix) = self.env_prefix {
            config.env.set_prefix(prefix);
        }
        if let Some(separator) = self.env_separator {
            config.env.set_separator(separator);
        }
        config.env.set_autoload(self.autoload_env);
        if let Some(source) = self.prefer {
            config.preferred = source;
        }
        if let Some(filename) = self.filename {
            config.filename = filename;
        }
        if let Some(extname) = self.extname {
            config.set_extname(extname)?;
        }
        config.location_paths = self.locations;
        if let Some(settings) = self.settings {
            config.merge(settings);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapEnv;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn with_env(env: MapEnv) -> Config {
        Config::builder()
            .env_source(Arc::new(env))
            .build()
            .expect("config")
    }

    #[test]
    fn set_then_fetch_round_trips() {
        let mut config = with_env(MapEnv::new());
        config.set(["foo", "bar", "baz"], 2).expect("set");
        assert_eq!(config.fetch("foo.bar.baz").expect("fetch"), Some(json!(2)));
        assert_eq!(config.fetch(["foo", "bar"]).expect("fetch"), Some(json!({"baz": 2})));
    }

    #[test]
    fn deferred_values_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut config = with_env(MapEnv::new());
        config
            .set_with("tick", move || counter.fetch_add(1, Ordering::SeqCst) as u64 + 1)
            .expect("set");

        assert_eq!(config.fetch("tick").expect("fetch"), Some(json!(1)));
        assert_eq!(config.fetch("tick").expect("fetch"), Some(json!(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn delayed_validation_runs_on_fetch() {
        let mut config = with_env(MapEnv::new());
        config.validate("port", |_, value| {
            value.is_i64().then_some(()).ok_or_else(|| "must be an integer".to_string())
        });
        config.set_with("port", || "8080").expect("deferred values skip eager checks");

        let err = config.fetch("port").unwrap_err();
        assert_eq!(err.key(), Some("port"));
    }

    #[test]
    fn env_preference_per_call() {
        let mut config = with_env(MapEnv::new().with("SETTINGS_BASE", "CAD"));
        config.set("settings.base", "USD").expect("set");
        config.set_from_env(["settings", "base"]);

        assert_eq!(config.fetch("settings.base").expect("fetch"), Some(json!("USD")));
        let options = FetchOptions::new().prefer(Source::Environment);
        assert_eq!(
            config.fetch_with("settings.base", options).expect("fetch"),
            Some(json!("CAD"))
        );
    }

    #[test]
    fn write_path_defaults() {
        let mut config = with_env(MapEnv::new());
        config.append_path("first");
        config.set_filename("coins");
        config.set_extname(".toml").expect("ext");

        let target = config.full_path(None, None).expect("path");
        assert_eq!(target, PathBuf::from("first/coins.toml"));

        let target = config
            .full_path(Some(PathBuf::from("other/app.json")), Some(Path::new("dir")))
            .expect("path");
        assert_eq!(target, PathBuf::from("dir/app.json"));
    }

    #[test]
    fn rejects_unknown_extname() {
        let mut config = Config::new();
        let err = config.set_extname(".txt").unwrap_err();
        assert_eq!(err.to_string(), "Config file format `.txt` is not supported.");
        assert_eq!(config.extname(), DEFAULT_EXTNAME);
        config.set_extname("").expect("no extension is allowed");
    }
}
