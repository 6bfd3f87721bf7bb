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

//! Update mapping with type retention

use std::sync::Arc;

use super::context::MappingContext;
use super::converter::TypeHints;
use super::tagging::TypeTaggingPolicy;
use super::DocumentMapper;
use crate::error::Result;
use crate::model::{EntityDescriptor, MappedDocument};
use crate::spec::Specification;

/// Maps update specifications, writing discriminators for structured values
#[derive(Clone)]
pub struct UpdateMapper {
    inner: DocumentMapper<TypeTaggingPolicy>,
}

impl UpdateMapper {
    /// Create an update mapper over a shared context
    pub fn new(context: Arc<MappingContext>) -> Self {
        let policy = TypeTaggingPolicy::new(context.registry_handle(), context.converter_handle());
        Self {
            inner: DocumentMapper::new(context, policy, TypeHints::Retain),
        }
    }

    /// Map an update against an optional root entity
    pub fn map_update<S: AsRef<Specification>>(
        &self,
        update: S,
        root: Option<&EntityDescriptor>,
    ) -> Result<MappedDocument> {
        self.inner.map_specification(update, root)
    }

    /// Map an update against the named entity
    pub fn map_update_for<S: AsRef<Specification>>(
        &self,
        update: S,
        entity_name: &str,
    ) -> Result<MappedDocument> {
        self.inner.map_for_entity(update, entity_name)
    }

    /// Shared mapping context
    pub fn context(&self) -> &Arc<MappingContext> {
        self.inner.context()
    }

    /// Underlying engine
    pub fn engine(&self) -> &DocumentMapper<TypeTaggingPolicy> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::model::{MappingMetadata, PropertyDescriptor, SimpleType, TypeDescriptor, Value};
    use crate::spec::Update;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapper() -> UpdateMapper {
        let metadata = MappingMetadata::new()
            .with_entity(EntityDescriptor::new("Garage").property(PropertyDescriptor::new(
                "vehicle",
                TypeDescriptor::abstract_type("Vehicle"),
            )))
            .with_entity(EntityDescriptor::abstract_type("Vehicle"))
            .with_entity(
                EntityDescriptor::new("Car")
                    .with_alias("car")
                    .property(PropertyDescriptor::new(
                        "doors",
                        TypeDescriptor::Simple(SimpleType::Int32),
                    )),
            );
        let context = MappingContext::new(MapperConfig::default(), metadata).unwrap();
        UpdateMapper::new(Arc::new(context))
    }

    #[test]
    fn test_set_of_polymorphic_value_is_tagged_with_alias() {
        let mapper = mapper();
        let update = Update::update("vehicle", Value::object("Car").field("doors", 3));

        let document = mapper.map_update_for(&update, "Garage").unwrap();

        assert_eq!(
            document.to_json(),
            json!({ "$set": { "vehicle": { "doors": 3, "_class": "car" } } })
        );
    }

    #[test]
    fn test_unset_value_is_not_tagged() {
        let mapper = mapper();
        let document = mapper
            .map_update_for(Update::new().unset("vehicle"), "Garage")
            .unwrap();

        assert_eq!(document.to_json(), json!({ "$unset": { "vehicle": 1 } }));
    }
}
