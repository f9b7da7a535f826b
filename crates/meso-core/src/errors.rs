//! Structured error types shared across the preparation crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PrepError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (segment names, indices, dimensions).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for initial-state preparation.
///
/// Every variant is fatal for the composition that raised it: callers are
/// expected to halt the run rather than retry with a partial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum PrepError {
    /// A segment with the same name was registered twice.
    #[error("duplicate segment: {0}")]
    DuplicateSegment(ErrorInfo),
    /// The global ordering could not be built or is not in the required phase.
    #[error("ordering error: {0}")]
    Ordering(ErrorInfo),
    /// A `(segment, local index)` pair does not name a registered orbital.
    #[error("unknown location: {0}")]
    UnknownLocation(ErrorInfo),
    /// A global position lies outside `1..=N`.
    #[error("out of range: {0}")]
    OutOfRange(ErrorInfo),
    /// The charging-energy search range has no candidate of some parity.
    #[error("empty domain: {0}")]
    EmptyDomain(ErrorInfo),
    /// The ground-state solver did not return a converged state.
    #[error("solver did not converge: {0}")]
    SolverNonConvergence(ErrorInfo),
    /// A supposedly trivial link had a dimension other than one while stitching.
    #[error("boundary dimension mismatch: {0}")]
    BoundaryDimensionMismatch(ErrorInfo),
    /// Malformed inputs detected at a component boundary.
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// Configuration loading and parsing errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and hashing errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PrepError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PrepError::DuplicateSegment(info)
            | PrepError::Ordering(info)
            | PrepError::UnknownLocation(info)
            | PrepError::OutOfRange(info)
            | PrepError::EmptyDomain(info)
            | PrepError::SolverNonConvergence(info)
            | PrepError::BoundaryDimensionMismatch(info)
            | PrepError::InvalidInput(info)
            | PrepError::Config(info)
            | PrepError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Shorthand for an [`PrepError::InvalidInput`] with the given code.
    pub fn invalid(code: &str, message: impl Into<String>) -> Self {
        PrepError::InvalidInput(ErrorInfo::new(code, message))
    }
}
