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

//! Recursive conversion of raw values into document fragments

use super::context::MappingContext;
use crate::error::ConversionError;
use crate::model::{Fragment, Object, Tree, TypeDescriptor, Value};

/// Treatment of type information on nested objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHints {
    /// Write a discriminator on nested objects whose type differs from the declared one
    Retain,
    /// Never write discriminators on nested objects
    Strip,
}

/// Converts raw values into fragments
#[derive(Debug, Clone, Copy)]
pub struct ValueConverter<'a> {
    context: &'a MappingContext,
    hints: TypeHints,
}

impl<'a> ValueConverter<'a> {
    /// Create a converter over the given context
    pub fn new(context: &'a MappingContext, hints: TypeHints) -> Self {
        Self { context, hints }
    }

    /// Convert `raw` in the context of its declared type
    ///
    /// The returned fragment itself never carries a discriminator; that
    /// decision belongs to the tagging policy. Nested objects may.
    pub fn convert(
        &self,
        raw: &Value,
        declared: Option<&TypeDescriptor>,
    ) -> Result<Fragment, ConversionError> {
        match raw {
            Value::Null => Ok(Fragment::Null),
            Value::List(items) => {
                let element = declared.map(TypeDescriptor::element_type);
                items
                    .iter()
                    .map(|item| self.convert_nested(item, element))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Fragment::Seq)
            }
            Value::Map(entries) => {
                let value_type = match declared {
                    Some(TypeDescriptor::Map(value_type)) => Some(&**value_type),
                    _ => None,
                };
                let mut tree = Tree::with_capacity(entries.len());
                for (key, value) in entries {
                    tree.insert(key.clone(), self.convert_nested(value, value_type)?);
                }
                Ok(Fragment::Tree(tree))
            }
            Value::Object(object) if !self.context.converter().can_convert(raw) => {
                self.decompose(object)
            }
            _ => self.context.converter().to_document_value(raw),
        }
    }

    fn convert_nested(
        &self,
        raw: &Value,
        declared: Option<&TypeDescriptor>,
    ) -> Result<Fragment, ConversionError> {
        let mut fragment = self.convert(raw, declared)?;
        if self.hints == TypeHints::Retain {
            self.write_nested_hint(raw, declared, &mut fragment);
        }
        Ok(fragment)
    }

    fn decompose(&self, object: &Object) -> Result<Fragment, ConversionError> {
        let config = self.context.config();
        let entity = self.context.entity(object.type_name());
        let mut tree = Tree::with_capacity(object.len());

        if let Some(entity) = entity {
            for property in entity.properties() {
                let Some(value) = object.get(&property.name) else {
                    continue;
                };
                if value.is_null() && !config.write_null_properties {
                    continue;
                }
                let fragment = self.convert_nested(value, Some(&property.declared_type))?;
                tree.insert(property.document_key(&config.id_key).to_string(), fragment);
            }
        }

        // Fields the metadata does not know about keep their raw names
        for (name, value) in object.fields() {
            if entity.is_some_and(|entity| entity.property_by_name(name).is_some()) {
                continue;
            }
            if value.is_null() && !config.write_null_properties {
                continue;
            }
            if tree.contains_key(name) {
                log::debug!(
                    "Undeclared field '{}' of '{}' collides with a declared document key, skipping",
                    name,
                    object.type_name()
                );
                continue;
            }
            tree.insert(name.to_string(), self.convert_nested(value, None)?);
        }

        Ok(Fragment::Tree(tree))
    }

    fn write_nested_hint(&self, raw: &Value, declared: Option<&TypeDescriptor>, fragment: &mut Fragment) {
        let Value::Object(object) = raw else {
            return;
        };
        if self.context.converter().can_convert(raw) {
            return;
        }
        if declared.is_some_and(|declared| {
            self.context.is_exact_type(declared, object.type_name())
                || self.context.registry().is_terminal(declared)
        }) {
            return;
        }
        let Some(tree) = fragment.as_tree_mut() else {
            return;
        };

        let key = self.context.discriminator_key(declared, raw);
        if tree.contains_key(key) {
            return;
        }
        if let Some(identifier) = self.context.registry().type_identifier_of(raw) {
            tree.insert(key.to_string(), Fragment::from(identifier.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::model::{EntityDescriptor, MappingMetadata, PropertyDescriptor, SimpleType};
    use crate::registry::CustomConversions;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn string() -> TypeDescriptor {
        TypeDescriptor::Simple(SimpleType::String)
    }

    fn context(config: MapperConfig) -> MappingContext {
        let metadata = MappingMetadata::new()
            .with_entity(
                EntityDescriptor::new("Zoo")
                    .property(PropertyDescriptor::new("name", string()))
                    .property(PropertyDescriptor::new(
                        "keeper",
                        TypeDescriptor::entity("Person"),
                    ))
                    .property(PropertyDescriptor::new(
                        "animals",
                        TypeDescriptor::list_of(TypeDescriptor::abstract_type("Animal")),
                    ))
                    .property(PropertyDescriptor::new(
                        "byName",
                        TypeDescriptor::map_of(TypeDescriptor::abstract_type("Animal")),
                    ))
                    .property(PropertyDescriptor::new("logo", TypeDescriptor::entity("Shape"))),
            )
            .with_entity(EntityDescriptor::abstract_type("Shape"))
            .with_entity(
                EntityDescriptor::new("Person")
                    .property(PropertyDescriptor::new("name", string()).with_field_name("n")),
            )
            .with_entity(EntityDescriptor::new("Lion").property(PropertyDescriptor::new("name", string())))
            .with_entity(EntityDescriptor::new("Owl").with_alias("owl"));
        let custom = CustomConversions::new().with("Money", |_| Ok(Fragment::from("1 EUR")));
        MappingContext::with_conversions(config, metadata, custom).unwrap()
    }

    fn zoo() -> Value {
        Value::object("Zoo")
            .field("name", "City Zoo")
            .field("keeper", Value::object("Person").field("name", "Ann"))
            .field(
                "animals",
                Value::list([
                    Value::from(Value::object("Lion").field("name", "Leo")),
                    Value::from(Value::object("Owl")),
                ]),
            )
            .field(
                "byName",
                Value::map([("leo", Value::from(Value::object("Lion").field("name", "Leo")))]),
            )
            .field("budget", Value::object("Money"))
            .field("closed", Value::Null)
            .into()
    }

    #[test]
    fn test_retains_nested_type_hints() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Retain);
        let fragment = converter.convert(&zoo(), Some(&TypeDescriptor::entity("Zoo"))).unwrap();

        assert_eq!(
            fragment.to_json(),
            json!({
                "name": "City Zoo",
                "keeper": { "n": "Ann" },
                "animals": [
                    { "name": "Leo", "_class": "Lion" },
                    { "_class": "owl" }
                ],
                "byName": { "leo": { "name": "Leo", "_class": "Lion" } },
                "budget": "1 EUR"
            })
        );
        // The top-level fragment is left to the tagging policy
        assert!(fragment.get("_class").is_none());
    }

    #[test]
    fn test_strips_nested_type_hints() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Strip);
        let fragment = converter.convert(&zoo(), None).unwrap();

        assert_eq!(
            fragment.get("animals").unwrap().to_json(),
            json!([{ "name": "Leo" }, {}])
        );
    }

    #[test]
    fn test_null_properties_written_when_enabled() {
        let context = context(MapperConfig::default().with_null_properties(true));
        let converter = ValueConverter::new(&context, TypeHints::Retain);
        let fragment = converter.convert(&zoo(), None).unwrap();

        assert_eq!(fragment.get("closed"), Some(&Fragment::Null));
    }

    #[test]
    fn test_scalars_and_null() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Retain);

        assert_eq!(converter.convert(&Value::Null, None).unwrap(), Fragment::Null);
        assert_eq!(
            converter.convert(&Value::from(1), Some(&string())).unwrap(),
            Fragment::from(1)
        );
        assert!(matches!(
            converter.convert(&Value::list([Value::ObjectId("zz".into())]), None),
            Err(ConversionError::InvalidObjectId { .. })
        ));
    }

    #[test]
    fn test_element_type_applies_to_single_value() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Retain);
        let declared = TypeDescriptor::list_of(TypeDescriptor::abstract_type("Animal"));

        // Lists convert elements against the element type
        let fragment = converter
            .convert(&Value::list([Value::from(Value::object("Lion"))]), Some(&declared))
            .unwrap();
        assert_eq!(fragment.to_json(), json!([{ "_class": "Lion" }]));

        // A map of domain keys is never a discriminator site itself
        let fragment = converter
            .convert(&Value::map([("a", Value::from(1))]), Some(&declared))
            .unwrap();
        assert_eq!(fragment.to_json(), json!({ "a": 1 }));
    }

    #[test]
    fn test_undeclared_field_never_overwrites_declared_key() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Retain);
        let person = Value::object("Person")
            .field("name", "Ann")
            .field("n", "nick")
            .field("age", 41);

        let fragment = converter
            .convert(&Value::from(person), Some(&TypeDescriptor::entity("Person")))
            .unwrap();

        assert_eq!(fragment.to_json(), json!({ "n": "Ann", "age": 41 }));
    }

    #[test]
    fn test_abstract_declared_entity_is_always_hinted() {
        let context = context(MapperConfig::default());
        let converter = ValueConverter::new(&context, TypeHints::Retain);
        let zoo = Value::object("Zoo")
            .field("logo", Value::object("Shape").field("sides", 3))
            .field("keeper", Value::object("Person").field("name", "Ann"));

        let fragment = converter.convert(&Value::from(zoo), None).unwrap();

        assert_eq!(
            fragment.to_json(),
            json!({
                "keeper": { "n": "Ann" },
                "logo": { "sides": 3, "_class": "Shape" }
            })
        );
    }
}
