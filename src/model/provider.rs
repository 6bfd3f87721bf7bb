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

//! Entity metadata providers
//!
//! The mappers never inspect a value's structure to learn about its type;
//! they ask an [`EntityMetadataProvider`] instead.

use indexmap::IndexMap;

use super::entity::{EntityDescriptor, PropertyDescriptor};
use super::types::TypeDescriptor;
use crate::error::{MappingError, Result};

/// Source of entity descriptors
pub trait EntityMetadataProvider: Send + Sync {
    /// Descriptor of the named entity
    fn entity(&self, name: &str) -> Option<&EntityDescriptor>;

    /// Property of an entity by declared name
    fn property_by_name<'a>(
        &self,
        entity: &'a EntityDescriptor,
        name: &str,
    ) -> Option<&'a PropertyDescriptor> {
        entity.property_by_name(name)
    }

    /// Descriptor of the structured type behind a declared type
    ///
    /// Looks through lists and maps to their element type.
    fn entity_descriptor_of(&self, declared: &TypeDescriptor) -> Option<&EntityDescriptor> {
        declared.structured_name().and_then(|name| self.entity(name))
    }
}

/// In-memory entity graph, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct MappingMetadata {
    entities: IndexMap<String, EntityDescriptor>,
}

impl MappingMetadata {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, builder style
    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.register(entity);
        self
    }

    /// Register an entity, replacing any previous one of the same name
    pub fn register(&mut self, entity: EntityDescriptor) {
        self.entities.insert(entity.name.clone(), entity);
    }

    /// Load a graph from a JSON array of entity descriptors
    pub fn from_json_str(input: &str) -> Result<Self> {
        let entities: Vec<EntityDescriptor> =
            serde_json::from_str(input).map_err(|err| MappingError::metadata(err.to_string()))?;

        let mut metadata = Self::new();
        for entity in entities {
            if metadata.entities.contains_key(&entity.name) {
                return Err(MappingError::metadata(format!(
                    "entity '{}' is declared more than once",
                    entity.name
                )));
            }
            metadata.register(entity);
        }
        Ok(metadata)
    }

    /// Find the entity whose discriminator alias or name is `identifier`
    pub fn entity_by_identifier(&self, identifier: &str) -> Option<&EntityDescriptor> {
        self.entities
            .values()
            .find(|entity| entity.type_identifier() == identifier)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entity is registered
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityMetadataProvider for MappingMetadata {
    fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }
}
