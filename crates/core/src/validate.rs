//! Input validation shared by the API handlers.

use crate::error::CoreError;

/// Maximum length of a task display name.
const MAX_TASK_NAME_LEN: usize = 128;

/// Maximum length of a node name.
const MAX_NODE_NAME_LEN: usize = 128;

/// Validate a task display name.
pub fn validate_task_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Task name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TASK_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Task name must not exceed {MAX_TASK_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a node name.
///
/// Node names become shared-store key segments, so the colon used as a
/// key separator is rejected along with whitespace.
pub fn validate_node_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Node name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NODE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Node name must not exceed {MAX_NODE_NAME_LEN} characters"
        )));
    }
    if name.contains(':') || name.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Node name must not contain ':' or whitespace".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_name_rules() {
        assert!(validate_task_name("perimeter sweep").is_ok());
        assert!(validate_task_name("  ").is_err());
        assert!(validate_task_name(&"a".repeat(MAX_TASK_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn node_name_rules() {
        assert!(validate_node_name("scanner-eu-01").is_ok());
        assert!(validate_node_name("").is_err());
        assert!(validate_node_name("bad:name").is_err());
        assert!(validate_node_name("bad name").is_err());
    }
}
