//! Error types for engine registration.

use modkit_analyzer::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Stable error codes the engine boundary reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineErrorCode {
    /// The transport failed before the engine answered.
    Transport,
    /// The engine rejected the registration payload.
    Rejected,
    /// The engine is not reachable.
    Unavailable,
    /// Unexpected engine-side failure.
    Internal,
}

impl EngineErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "TRANSPORT",
            Self::Rejected => "REJECTED",
            Self::Unavailable => "UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the engine boundary.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct EngineError {
    pub code: EngineErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn new(code: EngineErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Transport, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Rejected, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Internal, message)
    }
}

/// Registration failure: either the metadata could not be lowered or the
/// engine refused the result.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
