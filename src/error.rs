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

//! Error types for document mapping

use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Failure to represent a single value in document form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Object identifier that is not 12 bytes of hex
    #[error("Invalid object id '{value}': expected 24 hexadecimal characters")]
    InvalidObjectId {
        /// The offending identifier
        value: String,
    },

    /// Value has no terminal representation
    #[error("No terminal conversion for value of type '{type_name}': {value}")]
    Unsupported {
        /// Concrete type of the value
        type_name: String,
        /// Debug rendering of the value
        value: String,
    },

    /// Custom converter rejected the value
    #[error("Custom converter for '{type_name}' failed: {message}")]
    Custom {
        /// Type the converter is registered for
        type_name: String,
        /// Converter supplied reason
        message: String,
    },
}

impl ConversionError {
    /// Create an invalid object id error
    pub fn invalid_object_id(value: impl Into<String>) -> Self {
        Self::InvalidObjectId {
            value: value.into(),
        }
    }

    /// Create an unsupported value error
    pub fn unsupported(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Create a custom converter error
    pub fn custom(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the mappers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A value in the specification could not be converted
    #[error("Cannot map '{path}' under '{operator}': {source}")]
    Conversion {
        /// Operator the entry belongs to
        operator: String,
        /// Raw field path of the entry
        path: String,
        /// Underlying conversion failure
        #[source]
        source: ConversionError,
    },

    /// Invalid mapper configuration
    #[error("Invalid mapper configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid entity metadata
    #[error("Invalid entity metadata: {message}")]
    Metadata {
        /// Error message
        message: String,
    },
}

impl MappingError {
    /// Attach the entry location to a conversion failure
    pub fn conversion(
        operator: impl Into<String>,
        path: impl Into<String>,
        source: ConversionError,
    ) -> Self {
        Self::Conversion {
            operator: operator.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a metadata error
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }
}
