//! Recursive validation of values against schema nodes.
//!
//! Semantics:
//! - One synchronous pass; the first violation aborts the whole call.
//! - `object` nodes recurse into their children; every other node runs the
//!   checks type → array bounds → string → number → format, in that order.
//! - Objects are closed: keys without a schema are rejected, all of them in
//!   one error, and only after every required key was found.
//! - Neither the input nor the schema is mutated.
use std::collections::HashSet;

use regex::RegexBuilder;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{SchemaError, ValidationError, ValidationResult, Violation};
use crate::format;
use crate::schema::{active_bound, Format, SchemaNode, ValueType};
use crate::value;

/// Upper bound on the compiled size of a schema pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// `multipleOf` tolerance when value or divisor has a fractional part.
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

// ------------------------------- Interface -------------------------------- //

/// The four validation entry points. Implementors only provide the strict
/// forms; the boolean checks discard the error.
pub trait ObjectValueValidator {
    /// Validates one value against one schema node.
    fn validate(&self, value: &Value, schema: &SchemaNode, parent_path: Option<&str>) -> ValidationResult<()>;

    /// Validates an object body against a sibling list of schema nodes.
    fn validate_all(&self, value: &Value, schemas: &[SchemaNode], parent_path: Option<&str>) -> ValidationResult<()>;

    fn is_valid(&self, value: &Value, schema: &SchemaNode, parent_path: Option<&str>) -> bool {
        self.validate(value, schema, parent_path).is_ok()
    }

    fn is_valid_all(&self, value: &Value, schemas: &[SchemaNode], parent_path: Option<&str>) -> bool {
        self.validate_all(value, schemas, parent_path).is_ok()
    }
}

/// Stateless validator. Cheap to copy, safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self { Self }
}

impl ObjectValueValidator for SchemaValidator {
    fn validate(&self, value: &Value, schema: &SchemaNode, parent_path: Option<&str>) -> ValidationResult<()> {
        let path = property_path(parent_path, schema.name());
        trace!(path = %path, "validating property");

        if schema.value_type() == Some(ValueType::Object) {
            let Some(children) = schema.child_schemas().filter(|c| !c.is_empty()) else {
                return Err(SchemaError::ObjectWithoutProperties { name: schema.name().to_string() }.into());
            };
            if value.is_null() {
                if schema.is_nullable() {
                    return Ok(());
                }
                return Err(rejected(path, Violation::NullValue));
            }
            return self.validate_all(value, children, Some(path.as_str()));
        }

        match check_value(value, schema, &path) {
            Ok(()) => Ok(()),
            Err(Failure::Violation(violation)) => Err(rejected(path, violation)),
            Err(Failure::Schema(error)) => Err(error.into()),
        }
    }

    fn validate_all(&self, value: &Value, schemas: &[SchemaNode], parent_path: Option<&str>) -> ValidationResult<()> {
        let listed: Map<String, Value>;
        let properties = match value {
            Value::Object(map) => map,
            Value::Array(items) => {
                listed = indexed(items);
                &listed
            }
            // scalars have no keys
            _ => {
                listed = Map::new();
                &listed
            }
        };
        let mut consumed: HashSet<&str> = HashSet::with_capacity(schemas.len());

        for schema in schemas {
            let name = schema.name();
            let input = properties.get(name).filter(|_| !consumed.contains(name));
            match input {
                Some(input) => {
                    self.validate(input, schema, parent_path)?;
                    consumed.insert(name);
                }
                None if !schema.is_optional() => {
                    let path = property_path(parent_path, name);
                    debug!(path = %path, "required property missing");
                    return Err(ValidationError::Missing { path });
                }
                None => {}
            }
        }

        let keys: Vec<String> = properties
            .keys()
            .filter(|key| !consumed.contains(key.as_str()))
            .map(|key| property_path(parent_path, key))
            .collect();
        if !keys.is_empty() {
            debug!(?keys, "undeclared properties");
            return Err(ValidationError::NotAllowed { keys });
        }
        Ok(())
    }
}

// ---------------------------- Free functions ------------------------------ //

pub fn validate(value: &Value, schema: &SchemaNode, parent_path: Option<&str>) -> ValidationResult<()> {
    SchemaValidator.validate(value, schema, parent_path)
}

pub fn is_valid(value: &Value, schema: &SchemaNode, parent_path: Option<&str>) -> bool {
    SchemaValidator.is_valid(value, schema, parent_path)
}

pub fn validate_all(value: &Value, schemas: &[SchemaNode], parent_path: Option<&str>) -> ValidationResult<()> {
    SchemaValidator.validate_all(value, schemas, parent_path)
}

pub fn is_valid_all(value: &Value, schemas: &[SchemaNode], parent_path: Option<&str>) -> bool {
    SchemaValidator.is_valid_all(value, schemas, parent_path)
}

/// A list read as a mapping keyed by item index (`"0"`, `"1"`, ...).
fn indexed(items: &[Value]) -> Map<String, Value> {
    items.iter().enumerate().map(|(index, item)| (index.to_string(), item.clone())).collect()
}

/// `parent.name`, or just `name` at the top level.
pub fn property_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) if !parent.is_empty() => format!("{parent}.{name}"),
        _ => name.to_string(),
    }
}

fn rejected(path: String, violation: Violation) -> ValidationError {
    debug!(path = %path, %violation, "property rejected");
    ValidationError::Invalid { path, violation }
}

// --------------------------------- Checks --------------------------------- //

enum Failure {
    Violation(Violation),
    Schema(SchemaError),
}

impl From<Violation> for Failure {
    fn from(v: Violation) -> Self { Failure::Violation(v) }
}

impl From<SchemaError> for Failure {
    fn from(e: SchemaError) -> Self { Failure::Schema(e) }
}

fn check_value(value: &Value, schema: &SchemaNode, path: &str) -> Result<(), Failure> {
    check_content_type(value, schema.is_nullable(), schema.value_type(), path)?;
    check_array(value, schema)?;
    check_string(value, schema, path)?;
    check_number(value, schema)?;
    check_format(value, schema.format())?;
    Ok(())
}

/// Null short-circuits here when allowed; the later checks all skip null.
fn check_content_type(value: &Value, nullable: bool, expected: Option<ValueType>, path: &str) -> Result<(), Failure> {
    let Some(expected) = expected else {
        return Err(SchemaError::MissingType { path: path.to_string() }.into());
    };
    if value.is_null() {
        return if nullable { Ok(()) } else { Err(Violation::NullValue.into()) };
    }
    if value::has_native_kind(value, expected) {
        return Ok(());
    }

    let given = value::kind_name(value);
    match (expected, value) {
        (ValueType::Number, Value::Number(_)) => Ok(()),
        (ValueType::Number, Value::String(s)) if value::is_canonical_integer(s) => Ok(()),
        (ValueType::Boolean, Value::String(s)) if value::is_boolean_literal(s) => Ok(()),
        (ValueType::Boolean, Value::Number(n)) if n.as_i64().is_some_and(|i| i == 0 || i == 1) => Ok(()),
        (ValueType::Boolean, _) => Err(Violation::NotBoolean { given }.into()),
        _ => Err(Violation::TypeMismatch { expected, given }.into()),
    }
}

/// Bounds only constrain actual arrays.
fn check_array(value: &Value, schema: &SchemaNode) -> Result<(), Failure> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    let given = items.len();
    if let Some(min) = active_bound(schema.min_items()) {
        if (given as u64) < min {
            return Err(Violation::MinItems { min, given }.into());
        }
    }
    if let Some(max) = active_bound(schema.max_items()) {
        if (given as u64) > max {
            return Err(Violation::MaxItems { max, given }.into());
        }
    }
    Ok(())
}

/// Length in bytes, then an unanchored pattern search.
fn check_string(value: &Value, schema: &SchemaNode, path: &str) -> Result<(), Failure> {
    let Some(text) = value::scalar_text(value) else {
        return Ok(());
    };
    let given = text.len();
    if let Some(min) = active_bound(schema.min_length()) {
        if (given as u64) < min {
            return Err(Violation::MinLength { min, given }.into());
        }
    }
    if let Some(max) = active_bound(schema.max_length()) {
        if (given as u64) > max {
            return Err(Violation::MaxLength { max, given }.into());
        }
    }
    if let Some(pattern) = schema.pattern().filter(|p| !p.is_empty()) {
        let regex = RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|source| SchemaError::InvalidPattern {
                path: path.to_string(),
                pattern: pattern.to_string(),
                source,
            })?;
        if !regex.is_match(&text) {
            return Err(Violation::PatternMismatch {
                pattern: pattern.to_string(),
                given: text.into_owned(),
            }
            .into());
        }
    }
    Ok(())
}

fn check_number(value: &Value, schema: &SchemaNode) -> Result<(), Failure> {
    let Some(number) = value::numeric(value) else {
        return Ok(());
    };
    let given = || value::scalar_text(value).map(|t| t.into_owned()).unwrap_or_default();
    if let Some(min) = active_bound(schema.min_range()) {
        if number < min {
            return Err(Violation::MinRange { min, given: given() }.into());
        }
    }
    if let Some(max) = active_bound(schema.max_range()) {
        if number > max {
            return Err(Violation::MaxRange { max, given: given() }.into());
        }
    }
    if let Some(divisor) = active_bound(schema.multiple_of()) {
        if !is_multiple_of(number, divisor) {
            return Err(Violation::MultipleOf { divisor, given: given() }.into());
        }
    }
    Ok(())
}

/// Integral operands use exact remainder; otherwise the quotient has to be
/// within [`MULTIPLE_OF_EPSILON`] of a whole number.
fn is_multiple_of(number: f64, divisor: f64) -> bool {
    if number.fract() == 0.0 && divisor.fract() == 0.0 {
        return number % divisor == 0.0;
    }
    let quotient = number / divisor;
    (quotient - quotient.round()).abs() <= MULTIPLE_OF_EPSILON
}

fn check_format(value: &Value, wanted: Option<&Format>) -> Result<(), Failure> {
    let Some(text) = value::scalar_text(value) else {
        return Ok(());
    };
    match wanted {
        Some(Format::Date) if !format::is_date(&text) => {
            Err(Violation::InvalidDate { given: text.into_owned() }.into())
        }
        Some(Format::Email) if !format::is_email(&text) => {
            Err(Violation::InvalidEmail { given: text.into_owned() }.into())
        }
        _ => Ok(()),
    }
}
