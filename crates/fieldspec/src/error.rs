//! Error types for declaration, validation and the JSON codec.
//!
//! Three fault kinds reach callers of the codec:
//! - [`ShapeError`]: a structural precondition was violated. Always fatal.
//! - [`ValidationError`]: an instance failed validation; carries every
//!   message found in one pass.
//! - [`DecodeError`]: the input text was not usable JSON.
//!
//! [`DeclarationError`] is raised while declaring model types, before any
//! instance exists.

use thiserror::Error;

/// Structural precondition violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{field} has {actual} elements but its fixed-arity list spec requires {expected}")]
    ArityMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("attribute {attribute:?} is not declared on strict model {model}")]
    UnknownAttribute { model: String, attribute: String },

    #[error("expected a JSON object for model {model}, found {found}")]
    ExpectedObject { model: String, found: &'static str },

    #[error("nesting depth exceeds maximum {max}")]
    DepthExceeded { max: usize },

    #[error("no model named {name:?} is registered")]
    UnknownModel { name: String },
}

/// An instance failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{model} failed validation: {}", .errors.join("; "))]
pub struct ValidationError {
    /// Name of the model type that was validated.
    pub model: String,
    /// Every error found, in report order.
    pub errors: Vec<String>,
}

/// Error while decoding JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    Malformed {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("integer {value} does not fit in a signed 64-bit integer")]
    IntegerOverflow { value: u64 },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Error while encoding a value tree as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{field} holds a non-finite float, which JSON cannot represent")]
    NonFiniteFloat { field: String },

    #[error("JSON encoding failed: {0}")]
    Json(String),
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json(err.to_string())
    }
}

/// Error while declaring a model type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("field {field:?} is declared twice on model {model}")]
    DuplicateField { model: String, field: String },

    #[error("list field {field:?} needs at least one element spec")]
    EmptyElementSpecs { field: String },

    #[error("field {field:?} has minimum {min} above maximum {max}")]
    InvalidBounds {
        field: String,
        min: String,
        max: String,
    },

    #[error("list field {field:?} has minimum length {min_len} above maximum length {max_len}")]
    InvalidLengthBounds {
        field: String,
        min_len: usize,
        max_len: usize,
    },

    #[error("field {field:?} of kind {kind} has a length bound, which only lists support")]
    LengthOnNonList { field: String, kind: String },

    #[error("a model named {name:?} is already registered")]
    DuplicateModel { name: String },
}

/// Error from [`serialize`](crate::codec::serialize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Error from [`deserialize`](crate::codec::deserialize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DeserializeError {
    /// Returns the validation messages if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            DeserializeError::Validation(err) => Some(&err.errors),
            _ => None,
        }
    }
}
