//! Schema nodes: named constraint bundles describing one value slot.
//!
//! A node is plain data. It is built once (by hand with the `with_*` setters,
//! or parsed from a schema file via [`crate::loader`]) and then shared by
//! reference across any number of validation calls. Nothing here validates;
//! see [`crate::validator`] for that.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ------------------------------- Vocabulary ------------------------------- //

/// Expected type of a value slot.
///
/// `Object` is special: it is never checked against the value's native kind,
/// it dispatches into the node's child schemas instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Object,
    Number,
    Boolean,
    String,
    Array,
    Integer,
    Double,
}

impl ValueType {
    pub const ALL: [ValueType; 7] = [
        ValueType::Object,
        ValueType::Number,
        ValueType::Boolean,
        ValueType::String,
        ValueType::Array,
        ValueType::Integer,
        ValueType::Double,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Object => "object",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Integer => "integer",
            ValueType::Double => "double",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown value type `{s}`"))
    }
}

/// Named string format. Only `date` and `email` carry a check; any other
/// name is kept verbatim and ignored during validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    /// Strict `YYYY-MM-DD`.
    Date,
    Email,
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Format::Date => "date",
            Format::Email => "email",
            Format::Other(name) => name,
        }
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        match name.as_str() {
            "date" => Format::Date,
            "email" => Format::Email,
            _ => Format::Other(name),
        }
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Format::from(name.to_string())
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        match format {
            Format::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------- SchemaNode ------------------------------- //

/// One named value slot and its constraints.
///
/// Field names serialize in the camelCase vocabulary of schema files
/// (`minLength`, `childSchemas`, ...). `pattern` also accepts the legacy key
/// `patterns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaNode {
    name: String,
    #[serde(default = "default_optional")]
    optional: bool,
    #[serde(default)]
    nullable: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    value_type: Option<ValueType>,
    #[serde(default, alias = "patterns", skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<Format>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    child_schemas: Option<Vec<SchemaNode>>,
}

fn default_optional() -> bool { true }

impl SchemaNode {
    /// An optional, non-nullable slot with no type and no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            nullable: false,
            value_type: None,
            pattern: None,
            format: None,
            min_length: None,
            max_length: None,
            min_items: None,
            max_items: None,
            min_range: None,
            max_range: None,
            multiple_of: None,
            child_schemas: None,
        }
    }

    /// Shorthand for an `object` slot with the given properties.
    pub fn object(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self::new(name)
            .with_type(ValueType::Object)
            .with_child_schemas(children)
    }

    // -- setters (fluent) --

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<Format>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_min_length(mut self, min_length: u64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_min_items(mut self, min_items: u64) -> Self {
        self.min_items = Some(min_items);
        self
    }

    pub fn with_max_items(mut self, max_items: u64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn with_min_range(mut self, min_range: f64) -> Self {
        self.min_range = Some(min_range);
        self
    }

    pub fn with_max_range(mut self, max_range: f64) -> Self {
        self.max_range = Some(max_range);
        self
    }

    pub fn with_multiple_of(mut self, multiple_of: f64) -> Self {
        self.multiple_of = Some(multiple_of);
        self
    }

    pub fn with_child_schemas(mut self, child_schemas: Vec<SchemaNode>) -> Self {
        self.child_schemas = Some(child_schemas);
        self
    }

    // -- in-place setters; `None` clears the constraint --

    pub fn set_pattern(&mut self, pattern: Option<String>) -> &mut Self {
        self.pattern = pattern;
        self
    }

    pub fn set_format(&mut self, format: Option<Format>) -> &mut Self {
        self.format = format;
        self
    }

    pub fn set_min_length(&mut self, min_length: Option<u64>) -> &mut Self {
        self.min_length = min_length;
        self
    }

    pub fn set_max_length(&mut self, max_length: Option<u64>) -> &mut Self {
        self.max_length = max_length;
        self
    }

    pub fn set_min_items(&mut self, min_items: Option<u64>) -> &mut Self {
        self.min_items = min_items;
        self
    }

    pub fn set_max_items(&mut self, max_items: Option<u64>) -> &mut Self {
        self.max_items = max_items;
        self
    }

    pub fn set_min_range(&mut self, min_range: Option<f64>) -> &mut Self {
        self.min_range = min_range;
        self
    }

    pub fn set_max_range(&mut self, max_range: Option<f64>) -> &mut Self {
        self.max_range = max_range;
        self
    }

    pub fn set_multiple_of(&mut self, multiple_of: Option<f64>) -> &mut Self {
        self.multiple_of = multiple_of;
        self
    }

    pub fn set_child_schemas(&mut self, child_schemas: Option<Vec<SchemaNode>>) -> &mut Self {
        self.child_schemas = child_schemas;
        self
    }

    // -- getters --

    pub fn name(&self) -> &str { &self.name }
    pub fn is_optional(&self) -> bool { self.optional }
    pub fn is_nullable(&self) -> bool { self.nullable }
    pub fn value_type(&self) -> Option<ValueType> { self.value_type }
    pub fn pattern(&self) -> Option<&str> { self.pattern.as_deref() }
    pub fn format(&self) -> Option<&Format> { self.format.as_ref() }
    pub fn min_length(&self) -> Option<u64> { self.min_length }
    pub fn max_length(&self) -> Option<u64> { self.max_length }
    pub fn min_items(&self) -> Option<u64> { self.min_items }
    pub fn max_items(&self) -> Option<u64> { self.max_items }
    pub fn min_range(&self) -> Option<f64> { self.min_range }
    pub fn max_range(&self) -> Option<f64> { self.max_range }
    pub fn multiple_of(&self) -> Option<f64> { self.multiple_of }

    pub fn child_schemas(&self) -> Option<&[SchemaNode]> {
        self.child_schemas.as_deref()
    }

    /// True iff child schemas are set and non-empty.
    pub fn has_child_schemas(&self) -> bool {
        self.child_schemas.as_ref().is_some_and(|children| !children.is_empty())
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// --------------------------------- Bounds --------------------------------- //

/// Effective value of a numeric bound.
///
/// Known quirk, kept on purpose: a bound of zero counts as *unset*, so
/// `maxLength: 0` accepts every string and `minRange: 0` admits negative
/// numbers. Existing schemas rely on this; a real zero bound cannot be
/// expressed.
pub fn active_bound<T>(bound: Option<T>) -> Option<T>
where
    T: Copy + Default + PartialEq,
{
    bound.filter(|b| *b != T::default())
}
