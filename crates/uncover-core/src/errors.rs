//! Structured error types shared across the uncover crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`UncoverError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (element ids, sizes, etc.).
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

/// Canonical error type for pushout-complement enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum UncoverError {
    /// Hypergraph structural errors (unknown ids, incompatible merges).
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Malformed rules whose mapping is not a partial morphism.
    #[error("rule error: {0}")]
    Rule(ErrorInfo),
    /// Failures reported by the subgraph matcher.
    #[error("matching error: {0}")]
    Matching(ErrorInfo),
    /// The rule's right side is too large for the fixed-width enumeration scheme.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(ErrorInfo),
    /// An enumerator was used after it ended or after its state was moved away.
    #[error("invalid state: {0}")]
    InvalidState(ErrorInfo),
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

impl UncoverError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            UncoverError::Graph(info)
            | UncoverError::Rule(info)
            | UncoverError::Matching(info)
            | UncoverError::CapacityExceeded(info)
            | UncoverError::InvalidState(info) => info,
        }
    }

    /// Shorthand for a [`UncoverError::Graph`] error.
    pub fn graph(code: impl Into<String>, message: impl Into<String>) -> Self {
        UncoverError::Graph(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`UncoverError::Rule`] error.
    pub fn rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        UncoverError::Rule(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`UncoverError::InvalidState`] error.
    pub fn invalid_state(code: impl Into<String>, message: impl Into<String>) -> Self {
        UncoverError::InvalidState(ErrorInfo::new(code, message))
    }

    /// Error returned by every enumerator method once its state was taken.
    pub fn moved_from(component: &str) -> Self {
        UncoverError::InvalidState(
            ErrorInfo::new("moved-from", "enumerator state was moved to another instance")
                .with_context("component", component),
        )
    }

    /// Error returned when the current element of an exhausted enumerator is requested.
    pub fn exhausted(component: &str) -> Self {
        UncoverError::InvalidState(
            ErrorInfo::new("exhausted", "enumerator has no current element")
                .with_context("component", component),
        )
    }

    /// Appends a context entry to the payload, whatever the family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            UncoverError::Graph(info) => UncoverError::Graph(info.with_context(key, value)),
            UncoverError::Rule(info) => UncoverError::Rule(info.with_context(key, value)),
            UncoverError::Matching(info) => UncoverError::Matching(info.with_context(key, value)),
            UncoverError::CapacityExceeded(info) => {
                UncoverError::CapacityExceeded(info.with_context(key, value))
            }
            UncoverError::InvalidState(info) => {
                UncoverError::InvalidState(info.with_context(key, value))
            }
        }
    }

    /// Returns whether this is an [`UncoverError::InvalidState`] error.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, UncoverError::InvalidState(_))
    }
}
