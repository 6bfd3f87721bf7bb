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

//! Document mapping for schema-less document stores
//!
//! Translates update and query specifications over a typed object graph into
//! ordered document trees, keeping type discriminators on polymorphic values
//! so they can be read back as the right concrete type.
//!
//! ```
//! use std::sync::Arc;
//! use docmapper::{
//!     EntityDescriptor, MapperConfig, MappingContext, MappingMetadata, PropertyDescriptor,
//!     TypeDescriptor, Update, UpdateMapper, Value,
//! };
//!
//! let metadata = MappingMetadata::new()
//!     .with_entity(EntityDescriptor::new("Shelter").property(PropertyDescriptor::new(
//!         "pet",
//!         TypeDescriptor::abstract_type("Pet"),
//!     )))
//!     .with_entity(EntityDescriptor::new("Cat"));
//! let context = Arc::new(MappingContext::new(MapperConfig::default(), metadata).unwrap());
//!
//! let update = Update::update("pet", Value::object("Cat").field("name", "Tom"));
//! let document = UpdateMapper::new(context).map_update_for(&update, "Shelter").unwrap();
//!
//! assert_eq!(
//!     document.to_json().to_string(),
//!     r#"{"$set":{"pet":{"name":"Tom","_class":"Cat"}}}"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod spec;

pub use config::MapperConfig;
pub use error::{ConversionError, MappingError, Result};
pub use mapper::{
    DocumentMapper, Field, FieldPathResolver, MappingContext, NoTypeTagging, QueryMapper,
    TagDecision, TaggingPolicy, TypeHints, TypeTaggingPolicy, UpdateMapper, ValueConverter,
};
pub use model::{
    EntityDescriptor, EntityMetadataProvider, Fragment, MappedDocument, MappingMetadata, Object,
    PropertyDescriptor, Scalar, SimpleType, Tree, TypeDescriptor, Value,
};
pub use registry::{
    CustomConversions, DefaultTypeRegistry, StandardConverter, TerminalValueConverter,
    TypeRegistry,
};
pub use spec::{Query, Specification, Update, UpdateOperator};
