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

//! Declared type descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::type_names;

/// Types the document format represents natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleType {
    /// Boolean value (true/false)
    Boolean,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// 64-bit floating point
    Double,
    /// Arbitrary precision decimal
    Decimal,
    /// String value
    String,
    /// UTC timestamp
    Date,
    /// Object identifier
    ObjectId,
    /// Binary data
    Binary,
}

impl SimpleType {
    /// Runtime type name of values of this type
    pub fn type_name(&self) -> &'static str {
        match self {
            SimpleType::Boolean => type_names::BOOLEAN,
            SimpleType::Int32 => type_names::INT32,
            SimpleType::Int64 => type_names::INT64,
            SimpleType::Double => type_names::DOUBLE,
            SimpleType::Decimal => type_names::DECIMAL,
            SimpleType::String => type_names::STRING,
            SimpleType::Date => type_names::DATE,
            SimpleType::ObjectId => type_names::OBJECT_ID,
            SimpleType::Binary => type_names::BINARY,
        }
    }
}

/// Declared type of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Natively representable scalar
    Simple(SimpleType),

    /// Enum type, stored by constant name
    Enum(String),

    /// Concrete structured type
    Entity(String),

    /// Interface or abstract base type
    Abstract(String),

    /// Ordered collection with element type
    List(Box<TypeDescriptor>),

    /// Map with string keys and the given value type
    Map(Box<TypeDescriptor>),

    /// Unconstrained type
    Any,
}

impl TypeDescriptor {
    /// Create a list type
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::List(Box::new(element))
    }

    /// Create a map type
    pub fn map_of(value: TypeDescriptor) -> Self {
        Self::Map(Box::new(value))
    }

    /// Create a concrete entity type
    pub fn entity(name: impl Into<String>) -> Self {
        Self::Entity(name.into())
    }

    /// Create an abstract type
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::Abstract(name.into())
    }

    /// Check if this is a collection type
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Element type for lists, value type for maps
    ///
    /// Other types are their own element type, which lets a single value be
    /// pushed onto a list-typed property.
    pub fn element_type(&self) -> &TypeDescriptor {
        match self {
            Self::List(element) | Self::Map(element) => element,
            other => other,
        }
    }

    /// Innermost named structured type, looking through lists and maps
    pub fn structured_name(&self) -> Option<&str> {
        match self {
            Self::Entity(name) | Self::Abstract(name) => Some(name.as_str()),
            Self::List(element) | Self::Map(element) => element.structured_name(),
            _ => None,
        }
    }

    /// Check whether a value of the given runtime type is exactly of this type
    pub fn matches_type_name(&self, type_name: &str) -> bool {
        match self {
            Self::Simple(simple) => simple.type_name() == type_name,
            Self::Enum(name) | Self::Entity(name) => name == type_name,
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(simple) => write!(f, "{}", simple.type_name()),
            Self::Enum(name) | Self::Entity(name) => write!(f, "{name}"),
            Self::Abstract(name) => write!(f, "abstract {name}"),
            Self::List(element) => write!(f, "List<{element}>"),
            Self::Map(value) => write!(f, "Map<String, {value}>"),
            Self::Any => write!(f, "Any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type() {
        let list = TypeDescriptor::list_of(TypeDescriptor::abstract_type("AbstractChild"));
        assert_eq!(
            list.element_type(),
            &TypeDescriptor::abstract_type("AbstractChild")
        );
        assert_eq!(list.structured_name(), Some("AbstractChild"));

        let scalar = TypeDescriptor::Simple(SimpleType::String);
        assert_eq!(scalar.element_type(), &scalar);
        assert_eq!(scalar.structured_name(), None);
    }

    #[test]
    fn test_matches_type_name() {
        assert!(TypeDescriptor::entity("Address").matches_type_name("Address"));
        assert!(!TypeDescriptor::abstract_type("Model").matches_type_name("Model"));
        assert!(TypeDescriptor::Simple(SimpleType::Int32).matches_type_name("Int32"));
        assert!(!TypeDescriptor::Any.matches_type_name("Int32"));
    }

    #[test]
    fn test_serde_representation() {
        let ty: TypeDescriptor =
            serde_json::from_str(r#"{ "list": { "abstract": "AbstractChild" } }"#).unwrap();
        assert_eq!(
            ty,
            TypeDescriptor::list_of(TypeDescriptor::abstract_type("AbstractChild"))
        );

        let simple: TypeDescriptor = serde_json::from_str(r#"{ "simple": "object_id" }"#).unwrap();
        assert_eq!(simple, TypeDescriptor::Simple(SimpleType::ObjectId));

        let any: TypeDescriptor = serde_json::from_str(r#""any""#).unwrap();
        assert_eq!(any, TypeDescriptor::Any);
        assert_eq!(ty.to_string(), "List<abstract AbstractChild>");
    }
}
