use crate::extract::strip_code_fences;
use crate::types::DebugReport;

/// Parse the model's structured debug response into a [`DebugReport`].
///
/// The response is requested as `application/json` against a two-field
/// schema, but may still arrive wrapped in a markdown fence. Parsing is
/// all-or-nothing: on any failure no partial report is produced.
pub fn parse_debug_report(text: &str) -> Result<DebugReport, String> {
    let cleaned = strip_code_fences(text);

    if cleaned.is_empty() {
        return Err("Empty debug response".to_string());
    }

    serde_json::from_str(&cleaned).map_err(|e| format!("Invalid debug response JSON: {e}"))
}
