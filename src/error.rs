use thiserror::Error;

/// Errors produced while building, executing, or re-hydrating injected scripts
#[derive(Error, Debug)]
pub enum JQueryError {
    /// A previously captured element no longer corresponds to a live DOM node.
    /// Silently filtered while converting a script result into handles;
    /// fatal when hit during a handle's own operation.
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Malformed script or an exception thrown by browser-side code
    #[error("script execution failed: {0}")]
    ExecutionFailed(String),

    /// Cursor or positional access beyond the end of the selection
    #[error("index {index} out of range for selection of {len} element(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The executor returned a result shape the operation cannot consume
    /// (e.g. a scalar where an element collection was expected)
    #[error("unexpected script result: {0}")]
    UnexpectedResult(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JQueryError>;
