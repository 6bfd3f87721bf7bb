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

//! Terminal value conversion
//!
//! Scalars, enum constants and objects with a registered custom converter are
//! converted here in one step. Everything else is decomposed by the
//! [`ValueConverter`](crate::mapper::ValueConverter).

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::model::{Fragment, Object, Scalar, Value};

/// Converts values that need no structural decomposition
pub trait TerminalValueConverter: Send + Sync {
    /// Whether the concrete type of `value` has a direct conversion
    fn can_convert(&self, value: &Value) -> bool;

    /// Convert a value for which [`can_convert`](Self::can_convert) holds
    fn to_document_value(&self, value: &Value) -> Result<Fragment, ConversionError>;
}

type ConverterFn = dyn Fn(&Object) -> Result<Fragment, ConversionError> + Send + Sync;

/// Custom converters keyed by concrete type name
#[derive(Clone, Default)]
pub struct CustomConversions {
    converters: IndexMap<String, Arc<ConverterFn>>,
}

impl CustomConversions {
    /// Create an empty set of conversions
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for objects of `type_name`
    pub fn register<F>(&mut self, type_name: impl Into<String>, converter: F)
    where
        F: Fn(&Object) -> Result<Fragment, ConversionError> + Send + Sync + 'static,
    {
        self.converters.insert(type_name.into(), Arc::new(converter));
    }

    /// Register a converter, builder style
    pub fn with<F>(mut self, type_name: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&Object) -> Result<Fragment, ConversionError> + Send + Sync + 'static,
    {
        self.register(type_name, converter);
        self
    }

    /// Check if a converter is registered for `type_name`
    pub fn contains(&self, type_name: &str) -> bool {
        self.converters.contains_key(type_name)
    }

    fn get(&self, type_name: &str) -> Option<&Arc<ConverterFn>> {
        self.converters.get(type_name)
    }
}

impl fmt::Debug for CustomConversions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConversions")
            .field("types", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Built-in scalar conversions plus registered custom converters
#[derive(Debug, Clone, Default)]
pub struct StandardConverter {
    custom: CustomConversions,
}

impl StandardConverter {
    /// Create a converter with built-in conversions only
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter that also applies the given custom conversions
    pub fn with_custom(custom: CustomConversions) -> Self {
        Self { custom }
    }

    /// Registered custom conversions
    pub fn custom(&self) -> &CustomConversions {
        &self.custom
    }
}

impl TerminalValueConverter for StandardConverter {
    fn can_convert(&self, value: &Value) -> bool {
        match value {
            Value::Null | Value::List(_) | Value::Map(_) => false,
            Value::Object(object) => self.custom.contains(object.type_name()),
            _ => true,
        }
    }

    fn to_document_value(&self, value: &Value) -> Result<Fragment, ConversionError> {
        let scalar = match value {
            Value::Null => return Ok(Fragment::Null),
            Value::Boolean(b) => Scalar::Boolean(*b),
            Value::Int32(i) => Scalar::Int32(*i),
            Value::Int64(i) => Scalar::Int64(*i),
            Value::Double(d) => Scalar::Double(*d),
            Value::Decimal(d) => Scalar::Decimal(*d),
            Value::String(s) => Scalar::String(s.clone()),
            Value::Date(d) => Scalar::DateTime(*d),
            Value::ObjectId(id) => Scalar::ObjectId(parse_object_id(id)?),
            Value::Binary(bytes) => Scalar::Binary(bytes.clone()),
            Value::Enum { variant, .. } => Scalar::String(variant.clone()),
            Value::Object(object) => {
                return match self.custom.get(object.type_name()) {
                    Some(converter) => {
                        log::debug!("Applying custom converter for '{}'", object.type_name());
                        converter(object)
                    }
                    None => Err(ConversionError::unsupported(
                        object.type_name(),
                        value.to_string(),
                    )),
                };
            }
            Value::List(_) | Value::Map(_) => {
                return Err(ConversionError::unsupported(
                    value.type_name().unwrap_or_default(),
                    value.to_string(),
                ));
            }
        };
        Ok(Fragment::Scalar(scalar))
    }
}

fn parse_object_id(id: &str) -> Result<[u8; 12], ConversionError> {
    let mut bytes = [0u8; 12];
    hex::decode_to_slice(id, &mut bytes).map_err(|_| ConversionError::invalid_object_id(id))?;
    Ok(bytes)
}
