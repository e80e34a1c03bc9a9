//! Java `.properties` files.
//!
//! Nested settings are written as dotted keys (`db.host=localhost`) and
//! dotted keys read back as nested settings. All values read as strings.

use super::{empty_object, scalar_text};
use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::{Map, Value};

/// Java properties reader and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaPropsMarshaller;

impl Marshaller for JavaPropsMarshaller {
    fn extensions(&self) -> &[&str] {
        &[".properties", ".props", ".prop"]
    }

    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        let Value::Object(map) = data else {
            return Err(MarshalError::new("properties documents must be objects"));
        };
        let mut lines = Vec::new();
        flatten_into("", map, &mut lines);
        Ok(lines.join("\n"))
    }

    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        let mut root = Map::new();
        for (key, value) in logical_lines(content).iter().filter_map(|line| split_pair(line)) {
            insert_dotted(&mut root, &key, Value::String(value))?;
        }
        if root.is_empty() {
            return Ok(empty_object());
        }
        Ok(Value::Object(root))
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, lines: &mut Vec<String>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Null => {}
            Value::Object(nested) => flatten_into(&full, nested, lines),
            other => lines.push(format!(
                "{}={}",
                escape(&full, true),
                escape(&scalar_text(other), false)
            )),
        }
    }
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' | ':' | ' ' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            // A leading comment marker would hide the whole line.
            '#' | '!' if is_key && idx == 0 => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Join continuation lines and drop blanks and comments.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for raw in content.lines() {
        let line = if pending.is_empty() {
            raw.trim_start()
        } else {
            raw.trim()
        };
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }
        let trailing = line.chars().rev().take_while(|ch| *ch == '\\').count();
        if trailing % 2 == 1 {
            pending.push_str(&line[..line.len() - 1]);
            continue;
        }
        pending.push_str(line);
        lines.push(std::mem::take(&mut pending));
    }
    if !pending.is_empty() {
        lines.push(pending);
    }
    lines
}

/// Split at the first unescaped `=`, `:` or whitespace.
fn split_pair(line: &str) -> Option<(String, String)> {
    let mut key = String::new();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(unescape_char(next));
                }
            }
            '=' | ':' => break,
            ch if ch.is_whitespace() => {
                while chars.peek().is_some_and(|ch| ch.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            other => key.push(other),
        }
    }
    if key.is_empty() {
        return None;
    }
    let rest: String = chars.collect();
    Some((key, unescape(rest.trim_start())))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(unescape_char(next));
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn unescape_char(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

fn insert_dotted(root: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), MarshalError> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let last = parts.pop().unwrap_or(key);
    let mut current = root;
    for part in parts {
        let slot = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = slot.as_object_mut().ok_or_else(|| {
            MarshalError::new(format!("property `{key}` conflicts with a value at `{part}`"))
        })?;
    }
    current.insert(last.to_string(), value);
    Ok(())
}
