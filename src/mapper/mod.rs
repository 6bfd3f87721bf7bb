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

//! Mapping of specifications into operator documents
//!
//! Every entry goes through the same steps: resolve the field path, convert
//! the value, let the tagging policy decide on a discriminator and write the
//! result under the mapped key. Update and query mapping only differ in the
//! policy and in how nested type hints are treated.

pub mod context;
pub mod converter;
pub mod field;
pub mod query;
pub mod tagging;
pub mod update;

pub use context::MappingContext;
pub use converter::{TypeHints, ValueConverter};
pub use field::{Field, FieldPathResolver};
pub use query::QueryMapper;
pub use tagging::{NoTypeTagging, SkipReason, TagDecision, TaggingPolicy, TypeTaggingPolicy};
pub use update::UpdateMapper;

use std::sync::Arc;

use crate::error::{MappingError, Result};
use crate::model::{EntityDescriptor, Fragment, MappedDocument, Value};
use crate::spec::Specification;

/// Mapping engine parameterised by its tagging policy
#[derive(Debug, Clone)]
pub struct DocumentMapper<P> {
    context: Arc<MappingContext>,
    policy: P,
    hints: TypeHints,
}

impl<P: TaggingPolicy> DocumentMapper<P> {
    /// Create a mapper over a shared context
    pub fn new(context: Arc<MappingContext>, policy: P, hints: TypeHints) -> Self {
        Self {
            context,
            policy,
            hints,
        }
    }

    /// Shared mapping context
    pub fn context(&self) -> &Arc<MappingContext> {
        &self.context
    }

    /// Tagging policy in use
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Field path resolver over this mapper's context
    pub fn resolver(&self) -> FieldPathResolver<'_> {
        FieldPathResolver::new(&self.context)
    }

    /// Value converter over this mapper's context
    pub fn converter(&self) -> ValueConverter<'_> {
        ValueConverter::new(&self.context, self.hints)
    }

    /// Map every entry of `spec` against `root`
    ///
    /// Operators and fields keep their input order. Operators without
    /// entries still appear with an empty tree. The first conversion failure
    /// aborts the call.
    pub fn map_specification<S: AsRef<Specification>>(
        &self,
        spec: S,
        root: Option<&EntityDescriptor>,
    ) -> Result<MappedDocument> {
        let spec = spec.as_ref();
        let mut document = MappedDocument::new();

        for operator in spec.operators() {
            document.ensure_operator(operator);
        }
        for (operator, path, raw) in spec.entries() {
            let (key, fragment) = self.map_entry(operator, path, raw, root)?;
            document.insert(operator, key, fragment);
        }

        Ok(document)
    }

    /// Map `spec` against the named entity; unknown names map untyped
    pub fn map_for_entity<S: AsRef<Specification>>(
        &self,
        spec: S,
        entity_name: &str,
    ) -> Result<MappedDocument> {
        let root = self.context.entity(entity_name);
        if root.is_none() {
            log::debug!("No metadata for entity '{entity_name}', mapping untyped");
        }
        self.map_specification(spec, root)
    }

    /// Map a single entry, returning the document key and fragment
    pub fn map_entry(
        &self,
        operator: &str,
        path: &str,
        raw: &Value,
        root: Option<&EntityDescriptor>,
    ) -> Result<(String, Fragment)> {
        let field = self.resolver().resolve(path, root);
        let mut fragment = self
            .converter()
            .convert(raw, field.declared_type())
            .map_err(|err| MappingError::conversion(operator, path, err))?;

        let discriminator_key = self.context.discriminator_key(field.declared_type(), raw);
        let decision = self.policy.maybe_tag(
            raw,
            field.mapped_key(),
            &mut fragment,
            discriminator_key,
        );
        log::trace!(
            "{} '{}' -> '{}': {}",
            operator,
            path,
            field.mapped_key(),
            decision
        );

        Ok((field.mapped_key().to_string(), fragment))
    }
}
