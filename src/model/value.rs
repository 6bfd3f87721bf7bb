// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Raw values handed to the mappers

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;

/// Runtime type names of the built-in value kinds
pub mod type_names {
    /// Boolean
    pub const BOOLEAN: &str = "Boolean";
    /// 32-bit integer
    pub const INT32: &str = "Int32";
    /// 64-bit integer
    pub const INT64: &str = "Int64";
    /// 64-bit floating point
    pub const DOUBLE: &str = "Double";
    /// Arbitrary precision decimal
    pub const DECIMAL: &str = "Decimal";
    /// UTF-8 string
    pub const STRING: &str = "String";
    /// UTC timestamp
    pub const DATE: &str = "Date";
    /// Object identifier
    pub const OBJECT_ID: &str = "ObjectId";
    /// Binary blob
    pub const BINARY: &str = "Binary";
    /// Ordered sequence
    pub const LIST: &str = "List";
    /// Key/value map
    pub const MAP: &str = "Map";
}

/// A language-level value, carrying its concrete runtime type
///
/// Objects name their concrete type explicitly so the mapper can decide
/// whether a document needs a type discriminator on write.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Boolean(bool),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Double(f64),

    /// Arbitrary precision decimal
    Decimal(Decimal),

    /// String value
    String(String),

    /// Timestamp in UTC
    Date(DateTime<Utc>),

    /// Object identifier as 24 hex characters
    ObjectId(String),

    /// Binary data
    Binary(Vec<u8>),

    /// Enum constant
    Enum {
        /// Enum type name
        type_name: String,
        /// Constant name
        variant: String,
    },

    /// Ordered sequence of values
    List(Vec<Value>),

    /// Map with domain keys
    Map(IndexMap<String, Value>),

    /// Structured object of a named type
    Object(Object),
}

impl Value {
    /// Start building an object of the given concrete type
    pub fn object(type_name: impl Into<String>) -> Object {
        Object::new(type_name)
    }

    /// Create an enum constant
    pub fn enumeration(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }

    /// Create a list value
    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Self::List(values.into_iter().collect())
    }

    /// Create a map value
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the value is a structured object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Name of the concrete runtime type, `None` for null
    pub fn type_name(&self) -> Option<&str> {
        let name: &str = match self {
            Self::Null => return None,
            Self::Boolean(_) => type_names::BOOLEAN,
            Self::Int32(_) => type_names::INT32,
            Self::Int64(_) => type_names::INT64,
            Self::Double(_) => type_names::DOUBLE,
            Self::Decimal(_) => type_names::DECIMAL,
            Self::String(_) => type_names::STRING,
            Self::Date(_) => type_names::DATE,
            Self::ObjectId(_) => type_names::OBJECT_ID,
            Self::Binary(_) => type_names::BINARY,
            Self::Enum { type_name, .. } => type_name,
            Self::List(_) => type_names::LIST,
            Self::Map(_) => type_names::MAP,
            Self::Object(object) => object.type_name(),
        };
        Some(name)
    }

    /// Borrow the object if this is one
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::ObjectId(id) => write!(f, "ObjectId({id})"),
            Self::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
            Self::Enum { type_name, variant } => write!(f, "{type_name}::{variant}"),
            Self::List(items) => write!(f, "List({} items)", items.len()),
            Self::Map(entries) => write!(f, "Map({} entries)", entries.len()),
            Self::Object(object) => write!(f, "{}{{..}}", object.type_name()),
        }
    }
}

/// Structured value of a named type
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    type_name: String,
    fields: IndexMap<String, Value>,
}

impl Object {
    /// Create an object without fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field, builder style
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Concrete type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the object has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// JSON objects become maps, since JSON carries no type identity
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i32::try_from(i).map_or(Self::Int64(i), Self::Int32)
                } else {
                    Self::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
