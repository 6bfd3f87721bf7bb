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

//! Entity and property descriptors

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::TypeDescriptor;

/// Persistent property of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name as declared
    pub name: String,

    /// Document key, if it differs from the declared name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Declared type
    #[serde(rename = "type")]
    pub declared_type: TypeDescriptor,

    /// Whether this is the identifier property
    #[serde(default)]
    pub id: bool,
}

impl PropertyDescriptor {
    /// Create a property stored under its own name
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            field_name: None,
            declared_type,
            id: false,
        }
    }

    /// Create the identifier property
    pub fn id(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            id: true,
            ..Self::new(name, declared_type)
        }
    }

    /// Store the property under a different document key
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Document key of the property
    ///
    /// Identifier properties without an explicit key use `id_key`.
    pub fn document_key<'a>(&'a self, id_key: &'a str) -> &'a str {
        match &self.field_name {
            Some(field_name) => field_name,
            None if self.id => id_key,
            None => &self.name,
        }
    }
}

/// Structured type with persistent properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Type name
    pub name: String,

    /// Identifier written into discriminators instead of the type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Discriminator key override for this entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator_key: Option<String>,

    /// Whether the type is abstract or an interface
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Properties in declaration order
    #[serde(default, with = "property_list")]
    properties: IndexMap<String, PropertyDescriptor>,
}

impl EntityDescriptor {
    /// Create an entity without properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            discriminator_key: None,
            is_abstract: false,
            properties: IndexMap::new(),
        }
    }

    /// Create an abstract entity or interface
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(name)
        }
    }

    /// Add a property, builder style
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Set the discriminator alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Override the discriminator key
    pub fn with_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = Some(key.into());
        self
    }

    /// Property declared under the given name
    pub fn property_by_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Property stored under the given document key
    pub fn property_by_key(&self, key: &str, id_key: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .values()
            .find(|property| property.document_key(id_key) == key)
    }

    /// Properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Identifier written into discriminators
    pub fn type_identifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

mod property_list {
    use super::PropertyDescriptor;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        properties: &IndexMap<String, PropertyDescriptor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(properties.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, PropertyDescriptor>, D::Error> {
        let list = Vec::<PropertyDescriptor>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|p| (p.name.clone(), p)).collect())
    }
}
