use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::Value;

/// JSON5 documents, parsed with the `json5` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json5Marshaller;

impl Marshaller for Json5Marshaller {
    fn extensions(&self) -> &[&str] {
        &[".json5"]
    }

    fn check_dependency(&self) -> Result<(), crate::ConfigError> {
        if cfg!(feature = "json5") {
            Ok(())
        } else {
            Err(crate::missing_dependency("json5"))
        }
    }

    #[cfg(feature = "json5")]
    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        json5::to_string(data).map_err(MarshalError::new)
    }

    #[cfg(not(feature = "json5"))]
    fn marshal(&self, _data: &Value) -> Result<String, MarshalError> {
        Err(MarshalError::new("json5 support is not enabled"))
    }

    #[cfg(feature = "json5")]
    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        if content.trim().is_empty() {
            return Ok(super::empty_object());
        }
        json5::from_str(content).map_err(MarshalError::new)
    }

    #[cfg(not(feature = "json5"))]
    fn unmarshal(&self, _content: &str) -> Result<Value, MarshalError> {
        Err(MarshalError::new("json5 support is not enabled"))
    }
}

#[cfg(all(test, feature = "json5"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reads_comments_and_unquoted_keys() {
        let content = "{\n  // base currency\n  settings: { base: 'USD', },\n}";
        let value = Json5Marshaller.unmarshal(content).expect("value");
        assert_eq!(value, json!({"settings": {"base": "USD"}}));
    }
}
