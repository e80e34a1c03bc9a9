use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::Value;

/// YAML documents via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMarshaller;

impl Marshaller for YamlMarshaller {
    fn extensions(&self) -> &[&str] {
        &[".yaml", ".yml"]
    }

    fn check_dependency(&self) -> Result<(), crate::ConfigError> {
        if cfg!(feature = "yaml") {
            Ok(())
        } else {
            Err(crate::missing_dependency("serde_yaml"))
        }
    }

    #[cfg(feature = "yaml")]
    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        serde_yaml::to_string(data).map_err(MarshalError::new)
    }

    #[cfg(not(feature = "yaml"))]
    fn marshal(&self, _data: &Value) -> Result<String, MarshalError> {
        Err(MarshalError::new("yaml support is not enabled"))
    }

    #[cfg(feature = "yaml")]
    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(MarshalError::new)?;
        match convert::to_json(document)? {
            Value::Null => Ok(super::empty_object()),
            value => Ok(value),
        }
    }

    #[cfg(not(feature = "yaml"))]
    fn unmarshal(&self, _content: &str) -> Result<Value, MarshalError> {
        Err(MarshalError::new("yaml support is not enabled"))
    }
}

#[cfg(feature = "yaml")]
mod convert {
    //! YAML allows non-string mapping keys; settings keys are always strings.

    use crate::error::MarshalError;
    use serde_json::{Map, Number, Value};
    use serde_yaml::Value as Yaml;

    pub(super) fn to_json(value: Yaml) -> Result<Value, MarshalError> {
        Ok(match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(flag) => Value::Bool(flag),
            Yaml::Number(number) => number_to_json(&number)?,
            Yaml::String(text) => Value::String(text),
            Yaml::Sequence(items) => Value::Array(
                items
                    .into_iter()
                    .map(to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut map = Map::new();
                for (key, value) in mapping {
                    map.insert(key_to_string(key)?, to_json(value)?);
                }
                Value::Object(map)
            }
            Yaml::Tagged(tagged) => to_json(tagged.value)?,
        })
    }

    fn number_to_json(number: &serde_yaml::Number) -> Result<Value, MarshalError> {
        if let Some(int) = number.as_i64() {
            return Ok(Value::from(int));
        }
        if let Some(uint) = number.as_u64() {
            return Ok(Value::from(uint));
        }
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| MarshalError::new(format!("unsupported number `{number}`")))
    }

    fn key_to_string(key: Yaml) -> Result<String, MarshalError> {
        match key {
            Yaml::String(text) => Ok(text),
            Yaml::Number(number) => Ok(number.to_string()),
            Yaml::Bool(flag) => Ok(flag.to_string()),
            Yaml::Null => Ok("null".to_string()),
            Yaml::Tagged(tagged) => key_to_string(tagged.value),
            other => Err(MarshalError::new(format!(
                "unsupported mapping key `{other:?}`"
            ))),
        }
    }
}
