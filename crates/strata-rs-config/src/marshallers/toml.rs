use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::Value;

/// TOML documents via the `toml` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlMarshaller;

impl Marshaller for TomlMarshaller {
    fn extensions(&self) -> &[&str] {
        &[".toml"]
    }

    fn check_dependency(&self) -> Result<(), crate::ConfigError> {
        if cfg!(feature = "toml") {
            Ok(())
        } else {
            Err(crate::missing_dependency("toml"))
        }
    }

    #[cfg(feature = "toml")]
    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        let table = match convert::to_toml(data)? {
            Some(toml::Value::Table(table)) => table,
            _ => return Err(MarshalError::new("TOML documents must be tables")),
        };
        toml::to_string(&table).map_err(MarshalError::new)
    }

    #[cfg(not(feature = "toml"))]
    fn marshal(&self, _data: &Value) -> Result<String, MarshalError> {
        Err(MarshalError::new("toml support is not enabled"))
    }

    #[cfg(feature = "toml")]
    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        let table: toml::Table = toml::from_str(content).map_err(MarshalError::new)?;
        Ok(convert::to_json(toml::Value::Table(table)))
    }

    #[cfg(not(feature = "toml"))]
    fn unmarshal(&self, _content: &str) -> Result<Value, MarshalError> {
        Err(MarshalError::new("toml support is not enabled"))
    }
}

#[cfg(feature = "toml")]
mod convert {
    //! TOML has no null; null settings are left out when writing.

    use crate::error::MarshalError;
    use serde_json::{Map, Value};

    pub(super) fn to_json(value: toml::Value) -> Value {
        match value {
            toml::Value::String(text) => Value::String(text),
            toml::Value::Integer(int) => Value::from(int),
            toml::Value::Float(float) => Value::from(float),
            toml::Value::Boolean(flag) => Value::Bool(flag),
            toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
            toml::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(key, value)| (key, to_json(value)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    pub(super) fn to_toml(value: &Value) -> Result<Option<toml::Value>, MarshalError> {
        Ok(Some(match value {
            Value::Null => return Ok(None),
            Value::Bool(flag) => toml::Value::Boolean(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => toml::Value::Integer(int),
                None => toml::Value::Float(number.as_f64().ok_or_else(|| {
                    MarshalError::new(format!("number `{number}` does not fit TOML"))
                })?),
            },
            Value::String(text) => toml::Value::String(text.clone()),
            Value::Array(items) => {
                let mut array = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(item) = to_toml(item)? {
                        array.push(item);
                    }
                }
                toml::Value::Array(array)
            }
            Value::Object(map) => {
                let mut table = toml::Table::new();
                for (key, value) in map {
                    if let Some(value) = to_toml(value)? {
                        table.insert(key.clone(), value);
                    }
                }
                toml::Value::Table(table)
            }
        }))
    }
}
