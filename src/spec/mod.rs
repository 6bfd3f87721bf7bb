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

//! Query and update specifications

pub mod query;
pub mod update;

pub use query::Query;
pub use update::{PopPosition, Update, UpdateOperator};

use indexmap::IndexMap;

use crate::model::Value;

/// Ordered operator to field path to raw value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    operators: IndexMap<String, IndexMap<String, Value>>,
}

impl Specification {
    /// Create an empty specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with(
        mut self,
        operator: impl Into<String>,
        path: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(operator, path, value);
        self
    }

    /// Add an entry; an existing path under the same operator keeps its position
    pub fn insert(
        &mut self,
        operator: impl Into<String>,
        path: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.operators
            .entry(operator.into())
            .or_default()
            .insert(path.into(), value.into());
    }

    /// Entries of one operator
    pub fn get(&self, operator: &str) -> Option<&IndexMap<String, Value>> {
        self.operators.get(operator)
    }

    /// Operator names in input order
    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// All `(operator, path, value)` entries in input order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.operators.iter().flat_map(|(operator, fields)| {
            fields
                .iter()
                .map(move |(path, value)| (operator.as_str(), path.as_str(), value))
        })
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.operators.values().map(IndexMap::len).sum()
    }

    /// Check if the specification has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<Specification> for Specification {
    fn as_ref(&self) -> &Specification {
        self
    }
}
