use serde_json::{json, Value};

use crate::errors::EnhancementError;

/// Message carried by the sentinel object returned by [`extract_json`]
pub const DECODE_ERROR_MESSAGE: &str = "JSONDecodeError: The string is not a valid JSON string.";

/// Slice from the first `{` to the last `}` inclusive
fn braced_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the JSON object embedded in `text`, surrounded by arbitrary noise.
pub fn try_extract_json(text: &str) -> Result<Value, EnhancementError> {
    let candidate = braced_slice(text)
        .ok_or_else(|| EnhancementError::Decode("no JSON object in response body".to_string()))?;

    serde_json::from_str(candidate).map_err(|e| EnhancementError::Decode(e.to_string()))
}

/// Like [`try_extract_json`], but any failure becomes the sentinel
/// `{"error": "JSONDecodeError: ..."}` object.
pub fn extract_json(text: &str) -> Value {
    try_extract_json(text).unwrap_or_else(|_| json!({ "error": DECODE_ERROR_MESSAGE }))
}

/// True when `value` is the sentinel produced by [`extract_json`]
pub fn is_decode_error(value: &Value) -> bool {
    value.get("error").and_then(Value::as_str) == Some(DECODE_ERROR_MESSAGE)
}
