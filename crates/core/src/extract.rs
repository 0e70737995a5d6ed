/// Marker expected at the start of well-formed generated contracts.
pub const SMARTPY_IMPORT: &str = "import smartpy as sp";

/// Strip an optional surrounding markdown fence from model output.
///
/// The model is instructed not to fence its output, but sometimes does
/// anyway. Handles ```python and ```json tags as well as bare fences and
/// returns the inner text trimmed.
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    let mut text = trimmed.to_string();

    // Remove opening fence: ```python, ```json or ```
    if text.starts_with("```python") {
        text = text["```python".len()..].to_string();
        text = text.trim_start_matches('\n').to_string();
    } else if text.starts_with("```json") {
        text = text["```json".len()..].to_string();
        text = text.trim_start_matches('\n').to_string();
    } else if text.starts_with("```") {
        text = text["```".len()..].to_string();
        text = text.trim_start_matches('\n').to_string();
    }

    // Remove closing fence
    if text.ends_with("```") {
        text = text[..text.len() - "```".len()].to_string();
        text = text.trim_end_matches('\n').to_string();
    }

    text.trim().to_string()
}

/// Extract the contents of the first ```python block inside a larger text.
///
/// Used by the copy affordance: when displayed text embeds a fenced Python
/// block, only the block's contents are copied. Returns `None` when no
/// complete block exists, in which case callers copy the full text.
pub fn extract_python_block(text: &str) -> Option<String> {
    let start = text.find("```python")? + "```python".len();
    let rest = &text[start..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find("```")?;

    Some(rest[..end].trim_end_matches('\n').to_string())
}
