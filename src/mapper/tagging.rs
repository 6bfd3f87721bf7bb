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

//! Type discriminator decisions for top-level field values
//!
//! A discriminator is written only when every one of these holds:
//!
//! 1. the raw value is not null
//! 2. the mapped key is not the discriminator key itself
//! 3. the converted fragment is a key/value tree
//! 4. the raw value is not a map of domain keys
//! 5. the raw value's concrete type has no direct terminal conversion
//!
//! Rule 5 looks at converter registration for the concrete type, not at the
//! declared type of the field. Registering a custom converter for a type
//! therefore also switches off its discriminator.

use std::fmt;
use std::sync::Arc;

use crate::model::{Fragment, Value};
use crate::registry::{TerminalValueConverter, TypeRegistry};

/// Why no discriminator was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Raw value is null
    NullValue,
    /// The field is the discriminator field
    DiscriminatorField,
    /// Fragment is a scalar or a sequence
    NotATree,
    /// Raw value is a map of domain keys
    DomainMap,
    /// Concrete type converts directly
    DirectConversion,
    /// Registry could not name the type
    UnknownType,
    /// Policy never tags
    Disabled,
}

/// Outcome of a tagging decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    /// Discriminator written with the given type identifier
    Written(String),
    /// Key already present in the tree, left untouched
    AlreadyPresent,
    /// No discriminator written
    Skipped(SkipReason),
}

impl TagDecision {
    /// Whether a discriminator was written
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

impl fmt::Display for TagDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written(identifier) => write!(f, "tagged as '{identifier}'"),
            Self::AlreadyPresent => write!(f, "discriminator already present"),
            Self::Skipped(reason) => write!(f, "not tagged ({reason:?})"),
        }
    }
}

/// Decides whether a field's fragment carries a type discriminator
pub trait TaggingPolicy: Send + Sync {
    /// Write a discriminator into `fragment` if required
    fn maybe_tag(
        &self,
        raw: &Value,
        mapped_key: &str,
        fragment: &mut Fragment,
        discriminator_key: &str,
    ) -> TagDecision;
}

/// Policy used for updates: retains type information of structured values
#[derive(Clone)]
pub struct TypeTaggingPolicy {
    registry: Arc<dyn TypeRegistry>,
    converter: Arc<dyn TerminalValueConverter>,
}

impl TypeTaggingPolicy {
    /// Create a policy over the given registry and converter
    pub fn new(registry: Arc<dyn TypeRegistry>, converter: Arc<dyn TerminalValueConverter>) -> Self {
        Self {
            registry,
            converter,
        }
    }
}

impl TaggingPolicy for TypeTaggingPolicy {
    fn maybe_tag(
        &self,
        raw: &Value,
        mapped_key: &str,
        fragment: &mut Fragment,
        discriminator_key: &str,
    ) -> TagDecision {
        if raw.is_null() {
            return TagDecision::Skipped(SkipReason::NullValue);
        }
        if mapped_key == discriminator_key {
            return TagDecision::Skipped(SkipReason::DiscriminatorField);
        }
        let Some(tree) = fragment.as_tree_mut() else {
            return TagDecision::Skipped(SkipReason::NotATree);
        };
        if matches!(raw, Value::Map(_)) {
            return TagDecision::Skipped(SkipReason::DomainMap);
        }
        if self.converter.can_convert(raw) {
            return TagDecision::Skipped(SkipReason::DirectConversion);
        }
        if tree.contains_key(discriminator_key) {
            return TagDecision::AlreadyPresent;
        }
        let Some(identifier) = self.registry.type_identifier_of(raw) else {
            return TagDecision::Skipped(SkipReason::UnknownType);
        };

        tree.insert(
            discriminator_key.to_string(),
            Fragment::from(identifier.as_str()),
        );
        TagDecision::Written(identifier)
    }
}

/// Policy used for queries: never writes a discriminator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeTagging;

impl TaggingPolicy for NoTypeTagging {
    fn maybe_tag(&self, _: &Value, _: &str, _: &mut Fragment, _: &str) -> TagDecision {
        TagDecision::Skipped(SkipReason::Disabled)
    }
}
