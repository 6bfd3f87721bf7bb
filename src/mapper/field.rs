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

//! Field path resolution against entity metadata
//!
//! Resolution is best-effort: a path that does not match the metadata is
//! passed through unchanged so ad hoc field names keep working.

use super::context::MappingContext;
use crate::model::{EntityDescriptor, PropertyDescriptor, TypeDescriptor, Value};

/// Resolved field path
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    path: String,
    mapped_key: String,
    segments: Vec<String>,
    property: Option<&'a PropertyDescriptor>,
    declared_type: Option<&'a TypeDescriptor>,
    value_entity: Option<&'a EntityDescriptor>,
    discriminator_key: &'a str,
}

impl<'a> Field<'a> {
    /// Raw path as given
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Document key to write
    pub fn mapped_key(&self) -> &str {
        &self.mapped_key
    }

    /// Raw path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Property the last segment resolved to
    pub fn property(&self) -> Option<&'a PropertyDescriptor> {
        self.property
    }

    /// Declared type of the addressed value
    ///
    /// After a positional segment this is the collection's element type.
    pub fn declared_type(&self) -> Option<&'a TypeDescriptor> {
        self.declared_type
    }

    /// Entity of the addressed value, if it is structured
    pub fn value_entity(&self) -> Option<&'a EntityDescriptor> {
        self.value_entity
    }

    /// Discriminator key for the addressed value by its declared type
    ///
    /// A concrete type's own override only applies when the declared type
    /// has none; see [`MappingContext::discriminator_key`].
    pub fn discriminator_key(&self) -> &'a str {
        self.discriminator_key
    }

    /// Whether the path matched entity metadata
    pub fn is_mapped(&self) -> bool {
        self.property.is_some()
    }
}

/// Resolves dotted paths to document keys
#[derive(Debug, Clone, Copy)]
pub struct FieldPathResolver<'a> {
    context: &'a MappingContext,
}

impl<'a> FieldPathResolver<'a> {
    /// Create a resolver over the given context
    pub fn new(context: &'a MappingContext) -> Self {
        Self { context }
    }

    /// Resolve `path` starting at `root`
    pub fn resolve(&self, path: &str, root: Option<&'a EntityDescriptor>) -> Field<'a> {
        let config = self.context.config();
        let segments: Vec<String> = path
            .split(config.path_separator)
            .map(str::to_string)
            .collect();

        let Some(root) = root else {
            return self.unmapped(path, &segments);
        };

        let mut current = Some(root);
        let mut property: Option<&'a PropertyDescriptor> = None;
        let mut declared: Option<&'a TypeDescriptor> = None;
        let mut mapped: Vec<&str> = Vec::with_capacity(segments.len());

        for segment in &segments {
            if self.is_positional(segment, declared) {
                mapped.push(segment);
                declared = declared.map(TypeDescriptor::element_type);
                continue;
            }

            let Some(found) = current.and_then(|entity| self.lookup(entity, segment)) else {
                log::debug!(
                    "Segment '{}' of '{}' does not match {}, passing path through",
                    segment,
                    path,
                    current.map_or("untyped value", |entity| entity.name.as_str())
                );
                return self.unmapped(path, &segments);
            };

            mapped.push(found.document_key(&config.id_key));
            current = if self.context.registry().is_terminal(&found.declared_type) {
                None
            } else {
                self.context.metadata().entity_descriptor_of(&found.declared_type)
            };
            property = Some(found);
            declared = Some(&found.declared_type);
        }

        let mapped_key = mapped.join(config.path_separator.to_string().as_str());
        let discriminator_key = self.context.discriminator_key(declared, &Value::Null);

        Field {
            path: path.to_string(),
            mapped_key,
            segments,
            property,
            declared_type: declared,
            value_entity: current,
            discriminator_key,
        }
    }

    fn lookup(&self, entity: &'a EntityDescriptor, segment: &str) -> Option<&'a PropertyDescriptor> {
        self.context
            .metadata()
            .property_by_name(entity, segment)
            .or_else(|| entity.property_by_key(segment, &self.context.config().id_key))
    }

    fn is_positional(&self, segment: &str, declared: Option<&TypeDescriptor>) -> bool {
        if !self.context.config().positional_segments
            || !declared.is_some_and(TypeDescriptor::is_collection)
        {
            return false;
        }

        let is_index = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
        let is_operator =
            segment == "$" || (segment.starts_with("$[") && segment.ends_with(']'));
        is_index || is_operator
    }

    fn unmapped(&self, path: &str, segments: &[String]) -> Field<'a> {
        Field {
            path: path.to_string(),
            mapped_key: path.to_string(),
            segments: segments.to_vec(),
            property: None,
            declared_type: None,
            value_entity: None,
            discriminator_key: self.context.discriminator_key(None, &Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::model::{MappingMetadata, SimpleType};

    fn string() -> TypeDescriptor {
        TypeDescriptor::Simple(SimpleType::String)
    }

    fn context() -> MappingContext {
        let metadata = MappingMetadata::new()
            .with_entity(
                EntityDescriptor::new("Order")
                    .property(PropertyDescriptor::id("id", TypeDescriptor::Simple(SimpleType::ObjectId)))
                    .property(
                        PropertyDescriptor::new("customer", TypeDescriptor::entity("Customer"))
                            .with_field_name("cust"),
                    )
                    .property(PropertyDescriptor::new(
                        "lines",
                        TypeDescriptor::list_of(TypeDescriptor::entity("OrderLine")),
                    ))
                    .property(PropertyDescriptor::new(
                        "tags",
                        TypeDescriptor::list_of(string()),
                    )),
            )
            .with_entity(
                EntityDescriptor::new("Customer")
                    .property(PropertyDescriptor::new("name", string()).with_field_name("n")),
            )
            .with_entity(
                EntityDescriptor::new("OrderLine")
                    .with_discriminator_key("_line_type")
                    .property(PropertyDescriptor::new("sku", string()).with_field_name("s")),
            );
        MappingContext::new(MapperConfig::default(), metadata).unwrap()
    }

    #[test]
    fn test_resolves_nested_document_keys() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);
        let field = resolver.resolve("customer.name", context.entity("Order"));

        assert_eq!(field.mapped_key(), "cust.n");
        assert_eq!(field.segments(), ["customer", "name"]);
        assert_eq!(field.declared_type(), Some(&string()));
        assert!(field.value_entity().is_none());
        assert!(field.is_mapped());
    }

    #[test]
    fn test_id_property_maps_to_id_key() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);

        assert_eq!(resolver.resolve("id", context.entity("Order")).mapped_key(), "_id");
        assert_eq!(resolver.resolve("_id", context.entity("Order")).mapped_key(), "_id");
    }

    #[test]
    fn test_carries_structured_entity_forward() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);
        let field = resolver.resolve("customer", context.entity("Order"));

        assert_eq!(field.value_entity().map(|e| e.name.as_str()), Some("Customer"));
        assert_eq!(field.discriminator_key(), "_class");
    }

    #[test]
    fn test_positional_segments_step_into_elements() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);

        let field = resolver.resolve("lines.$.sku", context.entity("Order"));
        assert_eq!(field.mapped_key(), "lines.$.s");

        let field = resolver.resolve("lines.3", context.entity("Order"));
        assert_eq!(field.mapped_key(), "lines.3");
        assert_eq!(field.declared_type(), Some(&TypeDescriptor::entity("OrderLine")));
        assert_eq!(field.discriminator_key(), "_line_type");

        let field = resolver.resolve("lines.$[item].sku", context.entity("Order"));
        assert_eq!(field.mapped_key(), "lines.$[item].s");
    }

    #[test]
    fn test_unknown_segment_passes_path_through() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);

        let field = resolver.resolve("customer.address.city", context.entity("Order"));
        assert_eq!(field.mapped_key(), "customer.address.city");
        assert!(field.declared_type().is_none());
        assert!(!field.is_mapped());

        // Terminal values have no nested properties
        let field = resolver.resolve("tags.0.x", context.entity("Order"));
        assert_eq!(field.mapped_key(), "tags.0.x");
    }

    #[test]
    fn test_absent_root_passes_path_through() {
        let context = context();
        let resolver = FieldPathResolver::new(&context);
        let field = resolver.resolve("customer.name", None);

        assert_eq!(field.mapped_key(), "customer.name");
        assert_eq!(field.path(), "customer.name");
        assert!(field.property().is_none());
    }

    #[test]
    fn test_positional_segments_can_be_disabled() {
        let mut config = MapperConfig::default();
        config.positional_segments = false;
        let context = MappingContext::new(config, MappingMetadata::new()).unwrap();
        let resolver = FieldPathResolver::new(&context);

        assert!(!resolver.is_positional("0", Some(&TypeDescriptor::list_of(string()))));
    }
}
