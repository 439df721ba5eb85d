//! JSON output formatting

use serde::Serialize;

/// Serialize a value, indented when `pretty` is set
pub fn to_string<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
