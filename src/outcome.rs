//! Tool call outcome classification.

/// Heuristic error classification of a tool result payload.
///
/// A call counts as failed when it produced no payload, an empty payload,
/// or a payload whose text contains "error" in any casing. This is a
/// textual heuristic, not a structured error-code check; tools that legally
/// print the word "error" will inflate the streak.
#[must_use]
pub fn is_error_outcome(result: Option<&str>) -> bool {
    match result {
        None => true,
        Some(text) => {
            let trimmed = text.trim();
            trimmed.is_empty() || trimmed.to_lowercase().contains("error")
        }
    }
}
