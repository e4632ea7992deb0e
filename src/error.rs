use thiserror::Error;

/// Errors produced while loading a page, locating tables or interpreting them
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("No product support tables found on this page.")]
    NoProductTables,

    #[error("Could not parse any support data from the {product} table.")]
    NoSupportData { product: String },

    #[error("No product table named '{0}'")]
    ProductNotFound(String),

    #[error("No table at index {0}")]
    TableNotFound(usize),

    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters for '{tool}': {reason}")]
    InvalidParams { tool: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            MatrixError::NoProductTables.to_string(),
            "No product support tables found on this page."
        );
        let err = MatrixError::NoSupportData { product: "Elastic Agent".to_string() };
        assert_eq!(err.to_string(), "Could not parse any support data from the Elastic Agent table.");
    }
}
