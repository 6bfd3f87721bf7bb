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

//! Shared fixtures for the mapper integration tests

#![allow(dead_code)]

use docmapper::{
    ConversionError, CustomConversions, Fragment, MapperConfig, MappingContext, MappingMetadata,
    Object, Tree, Value,
};
use std::sync::Arc;

/// Entity graph used across the integration tests
pub const METADATA: &str = r#"[
    {
        "name": "ParentClass",
        "properties": [
            { "name": "id", "type": { "simple": "string" }, "id": true },
            { "name": "list", "type": { "list": { "abstract": "AbstractChild" } } }
        ]
    },
    { "name": "AbstractChild", "abstract": true },
    {
        "name": "ConcreteChild",
        "properties": [
            { "name": "id", "type": { "simple": "string" } },
            { "name": "value", "type": { "simple": "string" } }
        ]
    },
    {
        "name": "ModelWrapper",
        "properties": [
            { "name": "model", "type": { "abstract": "Model" } }
        ]
    },
    { "name": "Model", "abstract": true },
    {
        "name": "ModelImpl",
        "properties": [
            { "name": "value", "type": { "simple": "int32" } }
        ]
    },
    {
        "name": "Event",
        "properties": [
            { "name": "id", "type": { "simple": "object_id" }, "id": true },
            { "name": "title", "type": { "simple": "string" }, "field_name": "t" },
            { "name": "startsAt", "type": { "simple": "date" } },
            { "name": "status", "type": { "enum": "Status" } },
            { "name": "location", "type": { "entity": "GeoPoint" } },
            { "name": "attributes", "type": { "map": { "simple": "string" } } },
            { "name": "organizer", "type": { "entity": "Organizer" } },
            { "name": "ticket", "type": { "abstract": "Ticket" } },
            { "name": "holder", "type": { "entity": "Holder" } }
        ]
    },
    {
        "name": "Holder",
        "properties": [
            { "name": "ticket", "type": { "abstract": "Ticket" } }
        ]
    },
    {
        "name": "Organizer",
        "properties": [
            { "name": "name", "type": { "simple": "string" }, "field_name": "n" },
            { "name": "contact", "type": { "abstract": "Contact" } }
        ]
    },
    { "name": "Contact", "abstract": true },
    { "name": "EmailContact", "alias": "email" },
    { "name": "SpecialContact", "discriminator_key": "_ct" },
    { "name": "Ticket", "abstract": true, "discriminator_key": "_kind" },
    {
        "name": "VipTicket",
        "properties": [
            { "name": "seat", "type": { "simple": "string" } }
        ]
    },
    {
        "name": "Archive",
        "discriminator_key": "_archive",
        "properties": [
            { "name": "model", "type": { "abstract": "Model" } }
        ]
    }
]"#;

/// Load the fixture entity graph
pub fn metadata() -> MappingMetadata {
    MappingMetadata::from_json_str(METADATA).expect("fixture metadata is valid")
}

/// Custom conversions registered for the fixtures
pub fn conversions() -> CustomConversions {
    CustomConversions::new().with("GeoPoint", geo_point)
}

fn geo_point(object: &Object) -> Result<Fragment, ConversionError> {
    let coordinate = |name: &str| match object.get(name) {
        Some(Value::Double(value)) => Ok(*value),
        _ => Err(ConversionError::custom(
            "GeoPoint",
            format!("missing coordinate '{name}'"),
        )),
    };
    let (x, y) = (coordinate("x")?, coordinate("y")?);

    let mut tree = Tree::new();
    tree.insert("type".into(), Fragment::from("Point"));
    tree.insert(
        "coordinates".into(),
        Fragment::Seq(vec![
            Fragment::Scalar(docmapper::Scalar::Double(x)),
            Fragment::Scalar(docmapper::Scalar::Double(y)),
        ]),
    );
    Ok(Fragment::Tree(tree))
}

/// Context with the default configuration
pub fn context() -> Arc<MappingContext> {
    context_with(MapperConfig::default())
}

/// Context with a custom configuration
pub fn context_with(config: MapperConfig) -> Arc<MappingContext> {
    init_logging();
    Arc::new(
        MappingContext::with_conversions(config, metadata(), conversions())
            .expect("fixture context is valid"),
    )
}

pub fn concrete_child(id: &str, value: &str) -> Value {
    Value::object("ConcreteChild")
        .field("id", id)
        .field("value", value)
        .into()
}

pub fn model_impl(value: i32) -> Value {
    Value::object("ModelImpl").field("value", value).into()
}

pub fn vip_ticket(seat: &str) -> Value {
    Value::object("VipTicket").field("seat", seat).into()
}

pub fn geo(x: f64, y: f64) -> Value {
    Value::object("GeoPoint").field("x", x).field("y", y).into()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
