//! INI files.
//!
//! Top-level scalars are written first, followed by one `[section]` per
//! nested object. Deeper objects become dotted sections (`[a.b]`), which read
//! back into nested settings. Keys in a `[global]` section are lifted to the
//! top level when reading.

use super::{empty_object, scalar_text};
use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::{Map, Value};

const GLOBAL_SECTION: &str = "global";

/// INI reader and generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniMarshaller;

impl Marshaller for IniMarshaller {
    fn extensions(&self) -> &[&str] {
        &[".ini", ".cnf", ".conf", ".cfg", ".cf"]
    }

    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        let Value::Object(map) = data else {
            return Err(MarshalError::new("INI documents must be objects"));
        };
        Ok(generate(map))
    }

    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        parse(content)
    }
}

fn is_section(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

/// Arrays of objects are written as one merged section.
fn section_map(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|map| map.clone())
            .collect(),
        _ => Map::new(),
    }
}

fn generate(data: &Map<String, Value>) -> String {
    let mut entries: Vec<_> = data.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut lines = generate_values(&entries);
    if !lines.is_empty() {
        lines.push(String::new());
    }
    for (name, value) in entries.iter().filter(|(_, value)| is_section(value)) {
        generate_section(name, &section_map(value), &mut lines);
    }
    lines.join("\n")
}

fn generate_values(entries: &[(&String, &Value)]) -> Vec<String> {
    entries
        .iter()
        .filter(|(_, value)| !value.is_null() && !is_section(value))
        .map(|(key, value)| format!("{key} = {}", scalar_text(value)))
        .collect()
}

fn generate_section(name: &str, section: &Map<String, Value>, lines: &mut Vec<String>) {
    if section.is_empty() {
        return;
    }
    let mut entries: Vec<_> = section.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let values = generate_values(&entries);
    if !values.is_empty() {
        lines.push(format!("[{name}]"));
        lines.extend(values);
        lines.push(String::new());
    }
    for (key, value) in entries.iter().filter(|(_, value)| is_section(value)) {
        generate_section(&format!("{name}.{key}"), &section_map(value), lines);
    }
}

fn parse(content: &str) -> Result<Value, MarshalError> {
    let mut root = Map::new();
    let mut section: Vec<String> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            let name = name.trim();
            section = if name == GLOBAL_SECTION {
                Vec::new()
            } else {
                name.split('.').map(|part| part.trim().to_string()).collect()
            };
            continue;
        }
        let Some(split) = line.find(['=', ':']) else {
            return Err(MarshalError::new(format!(
                "could not parse line {}: `{line}`",
                idx + 1
            )));
        };
        let key = line[..split].trim();
        let value = parse_scalar(line[split + 1..].trim());
        section_entry(&mut root, &section)?.insert(key.to_string(), value);
    }

    if root.is_empty() {
        return Ok(empty_object());
    }
    Ok(Value::Object(root))
}

fn section_entry<'a>(
    root: &'a mut Map<String, Value>,
    path: &[String],
) -> Result<&'a mut Map<String, Value>, MarshalError> {
    let mut current = root;
    for part in path {
        let slot = current
            .entry(part.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = slot.as_object_mut().ok_or_else(|| {
            MarshalError::new(format!("section `{part}` conflicts with a value"))
        })?;
    }
    Ok(current)
}

fn parse_scalar(raw: &str) -> Value {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Value::String(raw[1..raw.len() - 1].to_string());
        }
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}
