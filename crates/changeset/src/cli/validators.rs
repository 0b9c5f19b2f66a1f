//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time.

/// Maximum accepted node id length
pub const MAX_NODE_ID_LENGTH: usize = 256;

/// Validate a node id argument.
///
/// Ids are compared exactly against the change set, so surrounding
/// whitespace is trimmed and empty ids are rejected.
///
/// # Errors
///
/// Returns a message for empty, overlong or comma-containing ids.
pub fn validate_node_id(s: &str) -> Result<String, String> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err("Node id cannot be empty".to_string());
    }

    if trimmed.len() > MAX_NODE_ID_LENGTH {
        return Err(format!(
            "Node id cannot exceed {MAX_NODE_ID_LENGTH} characters"
        ));
    }

    if trimmed.contains(',') {
        return Err(format!("Node id cannot contain commas: '{trimmed}'"));
    }

    Ok(trimmed.to_string())
}
