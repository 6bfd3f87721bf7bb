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

//! Shared, read-only mapping context

use std::fmt;
use std::sync::Arc;

use crate::config::MapperConfig;
use crate::error::Result;
use crate::model::{EntityDescriptor, EntityMetadataProvider, TypeDescriptor, Value};
use crate::registry::{
    CustomConversions, DefaultTypeRegistry, StandardConverter, TerminalValueConverter,
    TypeRegistry,
};

/// Everything a mapper consults, built once and shared across threads
#[derive(Clone)]
pub struct MappingContext {
    config: MapperConfig,
    metadata: Arc<dyn EntityMetadataProvider>,
    registry: Arc<dyn TypeRegistry>,
    converter: Arc<dyn TerminalValueConverter>,
}

impl MappingContext {
    /// Create a context with the standard registry and converter
    pub fn new(config: MapperConfig, metadata: impl EntityMetadataProvider + 'static) -> Result<Self> {
        Self::with_conversions(config, metadata, CustomConversions::new())
    }

    /// Create a context that also applies the given custom conversions
    pub fn with_conversions(
        config: MapperConfig,
        metadata: impl EntityMetadataProvider + 'static,
        custom: CustomConversions,
    ) -> Result<Self> {
        config.validate()?;

        let metadata: Arc<dyn EntityMetadataProvider> = Arc::new(metadata);
        let registry = DefaultTypeRegistry::new(Arc::clone(&metadata), custom.clone())
            .with_discriminator_key(config.discriminator_key.clone());

        Ok(Self {
            config,
            metadata,
            registry: Arc::new(registry),
            converter: Arc::new(StandardConverter::with_custom(custom)),
        })
    }

    /// Assemble a context from caller supplied collaborators
    pub fn from_parts(
        config: MapperConfig,
        metadata: Arc<dyn EntityMetadataProvider>,
        registry: Arc<dyn TypeRegistry>,
        converter: Arc<dyn TerminalValueConverter>,
    ) -> Self {
        Self {
            config,
            metadata,
            registry,
            converter,
        }
    }

    /// Mapper configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Entity metadata
    pub fn metadata(&self) -> &dyn EntityMetadataProvider {
        self.metadata.as_ref()
    }

    /// Type registry
    pub fn registry(&self) -> &dyn TypeRegistry {
        self.registry.as_ref()
    }

    /// Terminal value converter
    pub fn converter(&self) -> &dyn TerminalValueConverter {
        self.converter.as_ref()
    }

    /// Shared handle to the type registry
    pub fn registry_handle(&self) -> Arc<dyn TypeRegistry> {
        Arc::clone(&self.registry)
    }

    /// Shared handle to the terminal value converter
    pub fn converter_handle(&self) -> Arc<dyn TerminalValueConverter> {
        Arc::clone(&self.converter)
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.metadata.entity(name)
    }

    /// Discriminator key for `value` written where `declared` is expected
    ///
    /// The declared entity's override wins, then the concrete entity's
    /// override, then the registry key. Top-level tags and nested hints both
    /// use this, so a type is tagged under the same key wherever it sits.
    pub fn discriminator_key(&self, declared: Option<&TypeDescriptor>, value: &Value) -> &str {
        let declared_key = declared
            .and_then(|declared| self.metadata.entity_descriptor_of(declared))
            .and_then(|entity| entity.discriminator_key.as_deref());
        let concrete_key = || {
            value
                .as_object()
                .and_then(|object| self.metadata.entity(object.type_name()))
                .and_then(|entity| entity.discriminator_key.as_deref())
        };

        declared_key
            .or_else(concrete_key)
            .unwrap_or_else(|| self.registry.discriminator_key())
    }

    /// Whether `declared` names exactly the concrete type `type_name`
    ///
    /// Abstract entities never match, so their values always carry a hint.
    pub fn is_exact_type(&self, declared: &TypeDescriptor, type_name: &str) -> bool {
        declared.matches_type_name(type_name)
            && !self
                .metadata
                .entity_descriptor_of(declared)
                .is_some_and(|entity| entity.is_abstract)
    }
}

impl fmt::Debug for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
