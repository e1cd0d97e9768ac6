//! Schema documents from JSON.
//!
//! A document is either one node object or an array of sibling nodes (the
//! body of an implicit top-level object). Shape errors report the JSON path
//! of the offending key.
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{LoadError, ValidationResult};
use crate::schema::SchemaNode;
use crate::validator::{ObjectValueValidator, SchemaValidator};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaDocument {
    Node(SchemaNode),
    List(Vec<SchemaNode>),
}

impl SchemaDocument {
    /// `validate` for a single node, `validate_all` for a list.
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        match self {
            SchemaDocument::Node(node) => SchemaValidator.validate(value, node, None),
            SchemaDocument::List(nodes) => SchemaValidator.validate_all(value, nodes, None),
        }
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        match self {
            SchemaDocument::Node(node) => std::slice::from_ref(node),
            SchemaDocument::List(nodes) => nodes,
        }
    }
}

pub fn from_str(src: &str) -> Result<SchemaDocument, LoadError> {
    from_value(serde_json::from_str(src)?)
}

pub fn from_slice(bytes: &[u8]) -> Result<SchemaDocument, LoadError> {
    from_value(serde_json::from_slice(bytes)?)
}

pub fn from_path(path: impl AsRef<Path>) -> Result<SchemaDocument, LoadError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading schema");
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_slice(&bytes)
}

pub fn from_value(value: Value) -> Result<SchemaDocument, LoadError> {
    if value.is_array() {
        deserialize_with_path(value).map(SchemaDocument::List)
    } else {
        deserialize_with_path(value).map(SchemaDocument::Node)
    }
}

fn deserialize_with_path<T: DeserializeOwned>(value: Value) -> Result<T, LoadError> {
    serde_path_to_error::deserialize(value).map_err(|err| LoadError::Shape {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
