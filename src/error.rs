//! Unified error types for keymatch.
//!
//! Candidate-level anomalies never surface here: the engine recovers from
//! them locally. These errors cover what the caller must fix, such as an
//! invalid query signature or an unknown strategy name.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for keymatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KeyMatchError {
    /// A signature failed validation
    #[error("Invalid signature{}: {source}", context_suffix(.context))]
    InvalidSignature {
        context: String,
        #[source]
        source: SignatureErrorKind,
    },

    /// The caller asked for a strategy that was never registered
    #[error("Strategy not found: '{name}'{}", suggestion_suffix(.suggestion))]
    StrategyNotFound {
        name: String,
        suggestion: Option<String>,
    },

    /// A strategy definition is unusable
    #[error("Strategy error{}: {source}", context_suffix(.context))]
    Strategy {
        context: String,
        #[source]
        source: StrategyErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or YAML input
    #[error("Failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" ({context})")
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Specific signature error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SignatureErrorKind {
    #[error("signature has no populated attributes")]
    NoAttributes,

    #[error("confidence {0} is outside 0.0-1.0")]
    ConfidenceOutOfRange(String),
}

/// Specific strategy error kinds
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum StrategyErrorKind {
    #[error("Invalid threshold '{name}': {value} (must be 0.0-1.0)")]
    InvalidThreshold { name: String, value: f64 },

    #[error("possible threshold {possible} exceeds match threshold {matched}")]
    InvertedThresholds { possible: f64, matched: f64 },

    #[error("Invalid weight for attribute '{attribute}': {value}")]
    InvalidWeight { attribute: String, value: f64 },

    #[error("Invalid neutral similarity: {0} (must be 0.0-1.0)")]
    InvalidNeutral(f64),

    #[error("no attribute carries a positive weight")]
    NoWeightedAttributes,

    #[error("Invalid shape veto setting '{name}': {value}")]
    InvalidVeto { name: String, value: f64 },

    #[error("unknown base strategy '{0}'")]
    UnknownBase(String),

    #[error("weight override for unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("a strategy named '{0}' is already registered")]
    Duplicate(String),

    #[error("definition needs either 'extends' or a non-empty 'attributes' list")]
    EmptyDefinition,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for keymatch operations
pub type Result<T> = std::result::Result<T, KeyMatchError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl KeyMatchError {
    /// Create an invalid-signature error with context
    pub fn invalid_signature(context: impl Into<String>, source: SignatureErrorKind) -> Self {
        Self::InvalidSignature {
            context: context.into(),
            source,
        }
    }

    /// Create a strategy error with context
    pub fn strategy(context: impl Into<String>, source: StrategyErrorKind) -> Self {
        Self::Strategy {
            context: context.into(),
            source,
        }
    }

    /// Create a strategy-not-found error
    pub fn strategy_not_found(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::StrategyNotFound {
            name: name.into(),
            suggestion,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error is a rejected signature.
    #[must_use]
    pub const fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for KeyMatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for KeyMatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            context: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for KeyMatchError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse {
            context: "YAML".to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to whatever context the error already
/// carries, so nested calls read outermost-first:
///
/// ```ignore
/// use keymatch::error::ErrorContext;
///
/// let inventory = std::fs::read_to_string(path)
///     .with_context(|| format!("reading inventory {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<KeyMatchError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: KeyMatchError, new_ctx: &str) -> KeyMatchError {
    match err {
        KeyMatchError::InvalidSignature {
            context: existing,
            source,
        } => KeyMatchError::InvalidSignature {
            context: chain_context(new_ctx, &existing),
            source,
        },
        KeyMatchError::Strategy {
            context: existing,
            source,
        } => KeyMatchError::Strategy {
            context: chain_context(new_ctx, &existing),
            source,
        },
        KeyMatchError::Io {
            path,
            message,
            source,
        } => KeyMatchError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        KeyMatchError::Parse {
            context: existing,
            message,
        } => KeyMatchError::Parse {
            context: chain_context(new_ctx, &existing),
            message,
        },
        KeyMatchError::Validation(msg) => KeyMatchError::Validation(chain_context(new_ctx, &msg)),
        // The name and suggestion are the whole message
        other @ KeyMatchError::StrategyNotFound { .. } => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
