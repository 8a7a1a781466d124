use thiserror::Error;

/// Top-level error type for the ltlgen pipeline
#[derive(Debug, Error)]
pub enum LtlGenError {
    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] crate::store::StoreError),

    #[error("Workflow error: {0}")]
    WorkflowError(#[from] crate::session::WorkflowError),

    #[error("Error in external tool {tool}: {message}")]
    ExternalToolError { tool: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse model output: {0}")]
    ModelOutputError(String),

    #[error("System error: {0}")]
    SystemError(String),
}

/// Result type specific to ltlgen operations
pub type LtlGenResult<T> = Result<T, LtlGenError>;
