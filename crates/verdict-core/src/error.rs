//! Error types for verdict-core.
//!
//! Every failure a case can produce is a value of [`VerdictError`]. Case
//! bodies and judgments return it through [`Result`]; the engine decides
//! which variants are recovered at the case boundary and which propagate.

use crate::suite::HookPhase;

/// Result type alias for engine, mock and assertion operations.
pub type Result<T> = std::result::Result<T, VerdictError>;

/// Comprehensive error type for the test engine.
#[derive(Debug, thiserror::Error)]
pub enum VerdictError {
    /// A judgment's condition did not hold.
    #[error("{prefix}{message}", prefix = negation_prefix(.negated))]
    Assertion {
        /// Human-readable description of the failed judgment.
        message: String,
        /// Negation state in effect when the predicate was evaluated.
        negated: bool,
    },

    /// A call-inspection judgment targeted something that is not a mock.
    #[error("Assertion target is not a registered Mock/Spy function.")]
    NotAMock,

    /// A pattern judgment targeted a non-textual value.
    #[error("Value must be string, got {0}")]
    NotText(String),

    /// The supplied pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A failure raised explicitly by a case body.
    #[error("{0}")]
    Failure(String),

    /// A lifecycle hook failed.
    #[error("{phase} hook failed: {message}")]
    Hook {
        /// Phase the failing hook was registered under.
        phase: HookPhase,
        /// Failure message of the hook.
        message: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A judged value could not be converted for structural comparison.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn negation_prefix(negated: &bool) -> &'static str {
    if *negated { "[NOT] " } else { "" }
}

impl VerdictError {
    /// Creates an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>, negated: bool) -> Self {
        Self::Assertion {
            message: message.into(),
            negated,
        }
    }

    /// Creates an explicit case failure.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Creates a hook failure for the given phase.
    #[must_use]
    pub fn hook(phase: HookPhase, message: impl Into<String>) -> Self {
        Self::Hook {
            phase,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if the engine recovers from this error at the case
    /// boundary. Hook failures are surfaced to the declaring caller instead.
    #[must_use]
    pub const fn is_case_local(&self) -> bool {
        !matches!(self, Self::Hook { .. } | Self::Config(_) | Self::Io(_))
    }

    /// Returns the negation flag of an assertion failure, if this is one.
    #[must_use]
    pub const fn negated(&self) -> Option<bool> {
        match self {
            Self::Assertion { negated, .. } => Some(*negated),
            _ => None,
        }
    }
}
