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

//! Document fragments produced by the mappers
//!
//! Fragments serialize to MongoDB extended JSON, so a mapped document can be
//! handed to any serde based encoder.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Ordered key/value tree
pub type Tree = IndexMap<String, Fragment>;

/// Terminal document value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value
    Boolean(bool),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// 64-bit floating point
    Double(f64),
    /// 128-bit decimal
    Decimal(Decimal),
    /// UTF-8 string
    String(String),
    /// UTC timestamp
    DateTime(DateTime<Utc>),
    /// 12-byte object identifier
    ObjectId([u8; 12]),
    /// Binary data
    Binary(Vec<u8>),
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Boolean(b) => serializer.serialize_bool(*b),
            Scalar::Int32(i) => serializer.serialize_i32(*i),
            Scalar::Int64(i) => serializer.serialize_i64(*i),
            Scalar::Double(d) => serializer.serialize_f64(*d),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Decimal(d) => single_entry(serializer, "$numberDecimal", &d.to_string()),
            Scalar::DateTime(dt) => single_entry(
                serializer,
                "$date",
                &dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            Scalar::ObjectId(bytes) => single_entry(serializer, "$oid", &hex::encode(bytes)),
            Scalar::Binary(bytes) => {
                let mut binary = IndexMap::new();
                binary.insert("base64", BASE64.encode(bytes));
                binary.insert("subType", "00".to_string());
                single_entry(serializer, "$binary", &binary)
            }
        }
    }
}

fn single_entry<S: Serializer, V: Serialize + ?Sized>(
    serializer: S,
    key: &str,
    value: &V,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

/// Converted document value for one input value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fragment {
    /// Null
    Null,
    /// Terminal value
    Scalar(Scalar),
    /// Ordered sequence
    Seq(Vec<Fragment>),
    /// Key/value tree
    Tree(Tree),
}

impl Fragment {
    /// Create an empty tree
    pub fn tree() -> Self {
        Self::Tree(Tree::new())
    }

    /// Check if the fragment is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the fragment is a key/value tree
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    /// Borrow the tree if this is one
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Mutably borrow the tree if this is one
    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Look up a key when this is a tree
    pub fn get(&self, key: &str) -> Option<&Fragment> {
        self.as_tree().and_then(|tree| tree.get(key))
    }

    /// Render as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing scalars and ordered maps into serde_json cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<Scalar> for Fragment {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<i32> for Fragment {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Int32(value))
    }
}

impl From<bool> for Fragment {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Boolean(value))
    }
}

impl From<Tree> for Fragment {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

/// Final mapper output: operator name to key/value tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MappedDocument {
    operators: IndexMap<String, Tree>,
}

impl MappedDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fragment under an operator, keeping first-occurrence order
    pub fn insert(
        &mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        fragment: Fragment,
    ) {
        self.operators
            .entry(operator.into())
            .or_default()
            .insert(key.into(), fragment);
    }

    /// Register an operator without entries
    pub fn ensure_operator(&mut self, operator: impl Into<String>) {
        self.operators.entry(operator.into()).or_default();
    }

    /// Tree of the given operator
    pub fn get(&self, operator: &str) -> Option<&Tree> {
        self.operators.get(operator)
    }

    /// Operator names in input order
    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Iterate operators with their trees
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.operators.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if the document has no operators
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Take ownership of the operator trees
    pub fn into_inner(self) -> IndexMap<String, Tree> {
        self.operators
    }

    /// Render as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
