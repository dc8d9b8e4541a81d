//! Error types for bridge operations

use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Closed error taxonomy surfaced to callers of the bridge
///
/// Every failure crossing the bridge boundary is one of these variants;
/// unexpected faults (including panics) are converted to [`BridgeError::RuntimeFault`]
/// at the boundary rather than propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Session or entry index is absent / out of range
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation is not defined for the entry's type
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Malformed caller input (e.g. non-object typetree JSON)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external runtime raised an unexpected fault
    #[error("runtime fault: {message}")]
    RuntimeFault {
        message: String,
        /// Diagnostic trace from the runtime, when available
        trace: Option<String>,
    },

    /// Local file/stream failure
    #[error("i/o fault: {0}")]
    IoFault(String),
}

impl BridgeError {
    /// Create a runtime fault with no trace
    pub fn runtime(message: impl Into<String>) -> Self {
        BridgeError::RuntimeFault {
            message: message.into(),
            trace: None,
        }
    }

    /// The bare human-readable message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            BridgeError::NotFound(m)
            | BridgeError::Unsupported(m)
            | BridgeError::InvalidInput(m)
            | BridgeError::IoFault(m) => m,
            BridgeError::RuntimeFault { message, .. } => message,
        }
    }

    /// Diagnostic trace string, if the fault carried one
    pub fn trace(&self) -> Option<&str> {
        match self {
            BridgeError::RuntimeFault { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }

    /// Returns a stable code identifying the variant
    pub fn error_code(&self) -> u32 {
        match self {
            BridgeError::NotFound(_) => 1,
            BridgeError::Unsupported(_) => 2,
            BridgeError::InvalidInput(_) => 3,
            BridgeError::RuntimeFault { .. } => 4,
            BridgeError::IoFault(_) => 5,
        }
    }

    /// Reconstruct an error from a code, message and optional trace
    ///
    /// Unknown codes collapse to [`BridgeError::RuntimeFault`], keeping the
    /// taxonomy closed.
    pub fn from_code(code: u32, message: String, trace: Option<String>) -> Self {
        match code {
            1 => BridgeError::NotFound(message),
            2 => BridgeError::Unsupported(message),
            3 => BridgeError::InvalidInput(message),
            5 => BridgeError::IoFault(message),
            _ => BridgeError::RuntimeFault { message, trace },
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::IoFault(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::InvalidInput(err.to_string())
    }
}
