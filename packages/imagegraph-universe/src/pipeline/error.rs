//! Backend error types

use thiserror::Error;

/// Error raised by a code generation backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Code generation failed for one method
    #[error("Compilation failed for {method}: {reason}")]
    Compilation { method: String, reason: String },

    /// Heap layout failed
    #[error("Heap layout failed: {0}")]
    HeapLayout(String),

    /// Writing the image failed
    #[error("I/O error for {path}: {reason}")]
    Io { path: String, reason: String },

    /// Internal backend error
    #[error("Internal backend error: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn compilation(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Compilation {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn heap_layout(reason: impl Into<String>) -> Self {
        Self::HeapLayout(reason.into())
    }

    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Compilation { .. } => "compilation",
            Self::HeapLayout(_) => "heap_layout",
            Self::Io { .. } => "io",
            Self::Internal(_) => "internal",
        }
    }
}
