// error.rs — Error types for expression parsing and evaluation.

use thiserror::Error;

/// Errors from the constraint expression language.
///
/// Parse errors mean the constraint text itself is malformed; type
/// mismatches mean the expression could not be evaluated against the
/// entity's attributes. Callers must keep both distinct from a clean
/// boolean `false` — "constraint violated" and "constraint could not be
/// evaluated" are different outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExprError {
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },
}

impl ExprError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        ExprError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(message: impl Into<String>) -> Self {
        ExprError::TypeMismatch {
            message: message.into(),
        }
    }
}
