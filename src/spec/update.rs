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

//! Update specification builder

use std::fmt;

use super::Specification;
use crate::model::Value;

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    /// Set a field
    Set,
    /// Set a field only when inserting
    SetOnInsert,
    /// Remove a field
    Unset,
    /// Increment a number
    Inc,
    /// Multiply a number
    Mul,
    /// Keep the smaller value
    Min,
    /// Keep the larger value
    Max,
    /// Append to an array
    Push,
    /// Append to an array unless present
    AddToSet,
    /// Remove the first or last array element
    Pop,
    /// Remove matching array elements
    Pull,
    /// Remove all listed array elements
    PullAll,
    /// Rename a field
    Rename,
    /// Set a field to the current date
    CurrentDate,
}

impl UpdateOperator {
    /// Operator key as written into the document
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOperator::Set => "$set",
            UpdateOperator::SetOnInsert => "$setOnInsert",
            UpdateOperator::Unset => "$unset",
            UpdateOperator::Inc => "$inc",
            UpdateOperator::Mul => "$mul",
            UpdateOperator::Min => "$min",
            UpdateOperator::Max => "$max",
            UpdateOperator::Push => "$push",
            UpdateOperator::AddToSet => "$addToSet",
            UpdateOperator::Pop => "$pop",
            UpdateOperator::Pull => "$pull",
            UpdateOperator::PullAll => "$pullAll",
            UpdateOperator::Rename => "$rename",
            UpdateOperator::CurrentDate => "$currentDate",
        }
    }
}

impl fmt::Display for UpdateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// End of the array `$pop` removes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopPosition {
    /// Remove the first element
    First,
    /// Remove the last element
    Last,
}

/// Builder for update specifications
///
/// ```
/// use docmapper::spec::Update;
///
/// let update = Update::update("name", "Ada").inc("visits", 1).unset("legacy");
/// assert_eq!(update.specification().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    spec: Specification,
}

impl Update {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an update setting a single field
    pub fn update(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().set(key, value)
    }

    fn op(mut self, operator: UpdateOperator, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.insert(operator.as_str(), key, value);
        self
    }

    /// `$set`
    pub fn set(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Set, key, value)
    }

    /// `$setOnInsert`
    pub fn set_on_insert(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::SetOnInsert, key, value)
    }

    /// `$unset`
    pub fn unset(self, key: impl Into<String>) -> Self {
        self.op(UpdateOperator::Unset, key, 1)
    }

    /// `$inc`
    pub fn inc(self, key: impl Into<String>, amount: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Inc, key, amount)
    }

    /// `$mul`
    pub fn mul(self, key: impl Into<String>, factor: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Mul, key, factor)
    }

    /// `$min`
    pub fn min(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Min, key, value)
    }

    /// `$max`
    pub fn max(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Max, key, value)
    }

    /// `$push` of a single element
    pub fn push(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Push, key, value)
    }

    /// `$push` of several elements using `$each`
    pub fn push_each(self, key: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        self.op(UpdateOperator::Push, key, each(values))
    }

    /// `$addToSet` of a single element
    pub fn add_to_set(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::AddToSet, key, value)
    }

    /// `$addToSet` of several elements using `$each`
    pub fn add_to_set_each(
        self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.op(UpdateOperator::AddToSet, key, each(values))
    }

    /// `$pop`
    pub fn pop(self, key: impl Into<String>, position: PopPosition) -> Self {
        let end = match position {
            PopPosition::First => -1,
            PopPosition::Last => 1,
        };
        self.op(UpdateOperator::Pop, key, end)
    }

    /// `$pull`
    pub fn pull(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(UpdateOperator::Pull, key, value)
    }

    /// `$pullAll`
    pub fn pull_all(self, key: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        self.op(UpdateOperator::PullAll, key, Value::list(values))
    }

    /// `$rename`
    pub fn rename(self, old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        self.op(UpdateOperator::Rename, old_name, Value::String(new_name.into()))
    }

    /// `$currentDate`
    pub fn current_date(self, key: impl Into<String>) -> Self {
        self.op(UpdateOperator::CurrentDate, key, true)
    }

    /// Underlying specification
    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    /// Take ownership of the specification
    pub fn into_specification(self) -> Specification {
        self.spec
    }
}

fn each(values: impl IntoIterator<Item = Value>) -> Value {
    Value::map([("$each", Value::list(values))])
}

impl AsRef<Specification> for Update {
    fn as_ref(&self) -> &Specification {
        &self.spec
    }
}

impl From<Update> for Specification {
    fn from(update: Update) -> Self {
        update.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_groups_by_operator() {
        let update = Update::update("a", 1)
            .push("list", "x")
            .set("b", 2)
            .pop("queue", PopPosition::First)
            .rename("old", "new");

        let spec = update.specification();
        assert_eq!(
            spec.operators().collect::<Vec<_>>(),
            vec!["$set", "$push", "$pop", "$rename"]
        );
        assert_eq!(spec.get("$set").unwrap().len(), 2);
        assert_eq!(spec.get("$pop").unwrap()["queue"], Value::Int32(-1));
        assert_eq!(spec.get("$rename").unwrap()["old"], Value::from("new"));
    }

    #[test]
    fn test_push_each_wraps_values() {
        let update = Update::new().push_each("tags", [Value::from("a"), Value::from("b")]);
        let value = &update.specification().get("$push").unwrap()["tags"];

        assert_eq!(
            value,
            &Value::map([("$each", Value::list([Value::from("a"), Value::from("b")]))])
        );
    }
}
