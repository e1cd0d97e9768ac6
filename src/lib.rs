//! Closed-world validation of JSON-shaped values against object value schemas.
//!
//! Build a tree of [`SchemaNode`]s (by hand or with [`loader`]) once, then
//! validate any number of values against it:
//!
//! ```
//! use object_value_schema::{SchemaNode, ValueType, validate_all};
//! use serde_json::json;
//!
//! let schemas = [SchemaNode::object(
//!     "user",
//!     vec![SchemaNode::new("email").with_type(ValueType::String).with_format("email")],
//! )];
//! let err = validate_all(&json!({ "user": { "email": "bad" } }), &schemas, None).unwrap_err();
//! assert_eq!(err.to_string(), "argument user.email invalid: valid email expected, given bad");
//! ```
pub mod error;
pub mod format;
pub mod loader;
pub mod schema;
pub mod validator;
pub mod value;

pub use error::{LoadError, SchemaError, ValidationError, ValidationResult, Violation};
pub use loader::SchemaDocument;
pub use schema::{Format, SchemaNode, ValueType};
pub use validator::{
    is_valid, is_valid_all, validate, validate_all, ObjectValueValidator, SchemaValidator,
};
