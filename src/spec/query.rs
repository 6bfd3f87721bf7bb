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

//! Query criteria builder

use indexmap::IndexMap;

use crate::model::Value;

/// Ordered field path to value criteria
///
/// Values are opaque: operator documents such as `{"$gt": 5}` are plain
/// maps and keys starting with `$` are passed through as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    criteria: IndexMap<String, Value>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion, builder style
    pub fn with(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.insert(path.into(), value.into());
        self
    }

    /// Criteria in input order
    pub fn criteria(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Check if the query has no criteria
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}
