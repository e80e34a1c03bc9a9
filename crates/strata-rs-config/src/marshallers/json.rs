use super::empty_object;
use crate::Marshaller;
use crate::error::MarshalError;
use serde_json::Value;

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller;

impl Marshaller for JsonMarshaller {
    fn extensions(&self) -> &[&str] {
        &[".json"]
    }

    fn marshal(&self, data: &Value) -> Result<String, MarshalError> {
        serde_json::to_string_pretty(data).map_err(MarshalError::new)
    }

    fn unmarshal(&self, content: &str) -> Result<Value, MarshalError> {
        if content.trim().is_empty() {
            return Ok(empty_object());
        }
        serde_json::from_str(content).map_err(MarshalError::new)
    }
}
