//! Error types.
//!
//! Two families are kept apart:
//! - [`SchemaError`]: the schema itself is broken (a programming or
//!   configuration mistake). Never path-wrapped.
//! - [`Violation`] wrapped in [`ValidationError`]: the input broke a declared
//!   constraint. Always carries the fully-qualified property path.
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ValueType;
use crate::value::BOOLEAN_LITERALS;

/// Structural schema errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("no type to be validated given for {path}")]
    MissingType { path: String },

    #[error("{name} is object and has no properties")]
    ObjectWithoutProperties { name: String },

    #[error("pattern {pattern} of {path} does not compile: {source}")]
    InvalidPattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a single value was rejected. Displayed without the property path;
/// [`ValidationError::Invalid`] adds it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("value expected, given null")]
    NullValue,

    #[error("type {expected} expected, given {given}")]
    TypeMismatch { expected: ValueType, given: &'static str },

    #[error("type boolean expected ({}), given {given}", BOOLEAN_LITERALS.join(","))]
    NotBoolean { given: &'static str },

    #[error("min items {min} expected, given items {given}")]
    MinItems { min: u64, given: usize },

    #[error("max items {max} expected, given items {given}")]
    MaxItems { max: u64, given: usize },

    #[error("min length {min} expected, given length {given}")]
    MinLength { min: u64, given: usize },

    #[error("max length {max} expected, given length {given}")]
    MaxLength { max: u64, given: usize },

    #[error("pattern {pattern} does not match, given {given}")]
    PatternMismatch { pattern: String, given: String },

    #[error("min range {min} expected, given {given}")]
    MinRange { min: f64, given: String },

    #[error("max range {max} expected, given {given}")]
    MaxRange { max: f64, given: String },

    #[error("multipleOf {divisor} expected, given {given}")]
    MultipleOf { divisor: f64, given: String },

    #[error("valid date expected, given {given}")]
    InvalidDate { given: String },

    #[error("valid email expected, given {given}")]
    InvalidEmail { given: String },
}

/// First failure of a validation call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("argument {path} required, missing")]
    Missing { path: String },

    /// Every undeclared key of one object, path-qualified, in input order.
    #[error("{} ({}) not allowed", argument_noun(.keys), .keys.join(", "))]
    NotAllowed { keys: Vec<String> },

    #[error("argument {path} invalid: {violation}")]
    Invalid { path: String, violation: Violation },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn argument_noun(keys: &[String]) -> &'static str {
    if keys.len() > 1 { "arguments" } else { "argument" }
}

impl ValidationError {
    /// True when the schema, not the input, is at fault.
    pub fn is_structural(&self) -> bool {
        matches!(self, ValidationError::Schema(_))
    }

    /// Path of the offending property, when there is exactly one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::Missing { path } | ValidationError::Invalid { path, .. } => Some(path.as_str()),
            ValidationError::Schema(SchemaError::MissingType { path })
            | ValidationError::Schema(SchemaError::InvalidPattern { path, .. }) => Some(path.as_str()),
            ValidationError::NotAllowed { .. } | ValidationError::Schema(_) => None,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failure to read or parse a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid schema at JSON path {path}: {message}")]
    Shape { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_wraps_violation_with_path() {
        let err = ValidationError::Invalid {
            path: "user.email".into(),
            violation: Violation::InvalidEmail { given: "foo".into() },
        };
        assert_eq!(err.to_string(), "argument user.email invalid: valid email expected, given foo");
        assert_eq!(err.path(), Some("user.email"));
        assert!(!err.is_structural());
    }

    #[test]
    fn not_allowed_picks_noun_by_count() {
        let one = ValidationError::NotAllowed { keys: vec!["b".into()] };
        assert_eq!(one.to_string(), "argument (b) not allowed");
        let two = ValidationError::NotAllowed { keys: vec!["b".into(), "c".into()] };
        assert_eq!(two.to_string(), "arguments (b, c) not allowed");
        assert_eq!(two.path(), None);
    }

    #[test]
    fn boolean_message_lists_literals() {
        let v = Violation::NotBoolean { given: "double" };
        assert_eq!(v.to_string(), "type boolean expected (true,false,1,0,yes,no), given double");
    }

    #[test]
    fn range_messages_print_whole_floats_bare() {
        let v = Violation::MinRange { min: 5.0, given: "3".into() };
        assert_eq!(v.to_string(), "min range 5 expected, given 3");
        let v = Violation::MultipleOf { divisor: 0.5, given: "0.3".into() };
        assert_eq!(v.to_string(), "multipleOf 0.5 expected, given 0.3");
    }

    #[test]
    fn structural_errors_pass_through() {
        let err: ValidationError = SchemaError::ObjectWithoutProperties { name: "user".into() }.into();
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "user is object and has no properties");
    }
}
