//! Minimal JSONPath subset used by endpoint field mappings.

/// Extract a value from JSON using a simple path.
///
/// Supports: `$`, `$.field`, `$.nested.field`, `$.array[0].field`, `$.array[-1]`
pub fn json_extract<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    if path == "$" {
        return Some(value);
    }
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;

    for segment in path.split('.') {
        if let Some(bracket_pos) = segment.find('[') {
            let field = &segment[..bracket_pos];
            let idx_str = segment[bracket_pos + 1..].strip_suffix(']')?;

            if !field.is_empty() {
                current = current.get(field)?;
            }

            if let Some(neg) = idx_str.strip_prefix('-') {
                let offset: usize = neg.parse().ok()?;
                let arr = current.as_array()?;
                let idx = arr.len().checked_sub(offset)?;
                current = arr.get(idx)?;
            } else {
                let idx: usize = idx_str.parse().ok()?;
                current = current.get(idx)?;
            }
        } else {
            current = current.get(segment)?;
        }
    }

    Some(current)
}

/// Text form of a scalar; `Null` is empty.
pub fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
