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

//! Mapper configuration options

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// Default key under which type discriminators are written
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "_class";

/// Default document key of identifier properties
pub const DEFAULT_ID_KEY: &str = "_id";

/// Configuration shared by every mapper built from one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Key used for type discriminators unless an entity overrides it
    pub discriminator_key: String,

    /// Separator between field path segments
    pub path_separator: char,

    /// Document key of properties flagged as identifiers
    pub id_key: String,

    /// Whether null-valued properties of nested objects are written
    pub write_null_properties: bool,

    /// Whether index and `$` segments are passed through during path resolution
    pub positional_segments: bool,
}

impl MapperConfig {
    /// Parse a configuration from JSON, filling absent options with defaults
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| MappingError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Use a different discriminator key
    pub fn with_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = key.into();
        self
    }

    /// Use a different path separator
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    /// Write null-valued properties of nested objects
    pub fn with_null_properties(mut self, enabled: bool) -> Self {
        self.write_null_properties = enabled;
        self
    }

    /// Check the options for values the mapper cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.discriminator_key.is_empty() {
            return Err(MappingError::config("discriminator_key must not be empty"));
        }
        if self.id_key.is_empty() {
            return Err(MappingError::config("id_key must not be empty"));
        }
        if self.discriminator_key.contains(self.path_separator) {
            return Err(MappingError::config(format!(
                "discriminator_key '{}' contains the path separator '{}'",
                self.discriminator_key, self.path_separator
            )));
        }
        Ok(())
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            discriminator_key: DEFAULT_DISCRIMINATOR_KEY.to_string(),
            path_separator: '.',
            id_key: DEFAULT_ID_KEY.to_string(),
            write_null_properties: false,
            positional_segments: true,
        }
    }
}
