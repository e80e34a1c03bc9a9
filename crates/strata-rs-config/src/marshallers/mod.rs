//! Built-in marshallers.
//!
//! Library-backed formats sit behind cargo features. A marshaller whose
//! feature is off stays registered, but fails its dependency check when used.

mod ini;
mod java_props;
mod json;
mod json5;
mod toml;
mod yaml;

pub use self::ini::IniMarshaller;
pub use self::java_props::JavaPropsMarshaller;
pub use self::json::JsonMarshaller;
pub use self::json5::Json5Marshaller;
pub use self::toml::TomlMarshaller;
pub use self::yaml::YamlMarshaller;

use crate::Marshaller;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Built-in marshallers in their default scan order.
pub(crate) fn builtins() -> Vec<(&'static str, Arc<dyn Marshaller>)> {
    vec![
        ("yaml", Arc::new(YamlMarshaller)),
        ("json", Arc::new(JsonMarshaller)),
        ("json5", Arc::new(Json5Marshaller)),
        ("toml", Arc::new(TomlMarshaller)),
        ("ini", Arc::new(IniMarshaller)),
        ("jprops", Arc::new(JavaPropsMarshaller)),
    ]
}

/// An empty document reads as an empty settings object.
fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Render a scalar the way line-based formats store it.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
