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

//! Type registry: terminality and type identifiers

use std::sync::Arc;

use super::conversions::CustomConversions;
use crate::config::DEFAULT_DISCRIMINATOR_KEY;
use crate::model::{EntityMetadataProvider, TypeDescriptor, Value};

/// Answers type questions for the mappers
pub trait TypeRegistry: Send + Sync {
    /// Whether values of the declared type are written without decomposition
    fn is_terminal(&self, declared: &TypeDescriptor) -> bool;

    /// Identifier written into a discriminator for `value`, `None` for null
    fn type_identifier_of(&self, value: &Value) -> Option<String>;

    /// Default discriminator key
    fn discriminator_key(&self) -> &str;
}

/// Registry backed by entity metadata and the registered custom conversions
///
/// Simple and enum types are terminal. Structured types are terminal only
/// when a custom converter is registered for them.
#[derive(Clone)]
pub struct DefaultTypeRegistry {
    discriminator_key: String,
    metadata: Arc<dyn EntityMetadataProvider>,
    custom: CustomConversions,
}

impl DefaultTypeRegistry {
    /// Create a registry using the default discriminator key
    pub fn new(metadata: Arc<dyn EntityMetadataProvider>, custom: CustomConversions) -> Self {
        Self {
            discriminator_key: DEFAULT_DISCRIMINATOR_KEY.to_string(),
            metadata,
            custom,
        }
    }

    /// Use a different discriminator key
    pub fn with_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = key.into();
        self
    }
}

impl TypeRegistry for DefaultTypeRegistry {
    fn is_terminal(&self, declared: &TypeDescriptor) -> bool {
        match declared {
            TypeDescriptor::Simple(_) | TypeDescriptor::Enum(_) => true,
            TypeDescriptor::Entity(name) | TypeDescriptor::Abstract(name) => {
                self.custom.contains(name)
            }
            TypeDescriptor::List(_) | TypeDescriptor::Map(_) | TypeDescriptor::Any => false,
        }
    }

    fn type_identifier_of(&self, value: &Value) -> Option<String> {
        match value {
            Value::Object(object) => {
                let identifier = self
                    .metadata
                    .entity(object.type_name())
                    .map_or(object.type_name(), |entity| entity.type_identifier());
                Some(identifier.to_string())
            }
            other => other.type_name().map(str::to_string),
        }
    }

    fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityDescriptor, Fragment, MappingMetadata, SimpleType};

    fn registry() -> DefaultTypeRegistry {
        let metadata = MappingMetadata::new()
            .with_entity(EntityDescriptor::new("ConcreteChildClass").with_alias("child"));
        let custom = CustomConversions::new().with("Money", |_| Ok(Fragment::Null));
        DefaultTypeRegistry::new(Arc::new(metadata), custom)
    }

    #[test]
    fn test_is_terminal() {
        let registry = registry();
        assert!(registry.is_terminal(&TypeDescriptor::Simple(SimpleType::Date)));
        assert!(registry.is_terminal(&TypeDescriptor::Enum("Status".into())));
        assert!(registry.is_terminal(&TypeDescriptor::entity("Money")));
        assert!(!registry.is_terminal(&TypeDescriptor::abstract_type("Model")));
        assert!(!registry.is_terminal(&TypeDescriptor::list_of(TypeDescriptor::Simple(
            SimpleType::String
        ))));
        assert!(!registry.is_terminal(&TypeDescriptor::Any));
    }

    #[test]
    fn test_type_identifier_uses_alias() {
        let registry = registry();
        assert_eq!(
            registry.type_identifier_of(&Value::from(Value::object("ConcreteChildClass"))),
            Some("child".to_string())
        );
        assert_eq!(
            registry.type_identifier_of(&Value::from(Value::object("Unregistered"))),
            Some("Unregistered".to_string())
        );
        assert_eq!(registry.type_identifier_of(&Value::Null), None);
        assert_eq!(registry.discriminator_key(), "_class");
        assert_eq!(
            registry.with_discriminator_key("_t").discriminator_key(),
            "_t"
        );
    }
}
