//! Config file discovery across search directories.

use log::debug;
use std::path::{Path, PathBuf};

/// First `{dir}/{stem}{ext}` that exists, trying directories in order and,
/// within each directory, extensions in order.
pub fn find_file<D, E>(dirs: D, stem: &str, extensions: E) -> Option<PathBuf>
where
    D: IntoIterator,
    D::Item: AsRef<Path>,
    E: IntoIterator + Clone,
    E::Item: AsRef<str>,
{
    for dir in dirs {
        if let Some(found) = search_in_dir(dir.as_ref(), stem, extensions.clone()) {
            return Some(found);
        }
    }
    None
}

fn search_in_dir<E>(dir: &Path, stem: &str, extensions: E) -> Option<PathBuf>
where
    E: IntoIterator,
    E::Item: AsRef<str>,
{
    for ext in extensions {
        let candidate = dir.join(format!("{stem}{}", ext.as_ref()));
        if candidate.is_file() {
            debug!("found config file (path={})", candidate.display());
            return Some(candidate);
        }
    }
    None
}

/// Extension of `path` including the leading dot, or empty.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// File name of `path` without its extension.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
