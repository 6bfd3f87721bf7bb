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

//! Query mapping without type information

use std::sync::Arc;

use super::context::MappingContext;
use super::converter::TypeHints;
use super::tagging::NoTypeTagging;
use super::DocumentMapper;
use crate::error::{MappingError, Result};
use crate::model::{EntityDescriptor, MappedDocument, Tree};
use crate::spec::{Query, Specification};

const CRITERIA_OPERATOR: &str = "criteria";

/// Maps query criteria; never writes discriminators
#[derive(Debug, Clone)]
pub struct QueryMapper {
    inner: DocumentMapper<NoTypeTagging>,
}

impl QueryMapper {
    /// Create a query mapper over a shared context
    pub fn new(context: Arc<MappingContext>) -> Self {
        Self {
            inner: DocumentMapper::new(context, NoTypeTagging, TypeHints::Strip),
        }
    }

    /// Map an operator keyed specification
    pub fn map_specification<S: AsRef<Specification>>(
        &self,
        spec: S,
        root: Option<&EntityDescriptor>,
    ) -> Result<MappedDocument> {
        self.inner.map_specification(spec, root)
    }

    /// Map flat criteria into a single tree
    ///
    /// Keys starting with `$` are top-level query operators and are copied
    /// as given; their values are converted without type information.
    pub fn map_criteria(&self, query: &Query, root: Option<&EntityDescriptor>) -> Result<Tree> {
        let mut tree = Tree::with_capacity(query.len());

        for (path, raw) in query.criteria() {
            if path.starts_with('$') {
                let fragment = self
                    .inner
                    .converter()
                    .convert(raw, None)
                    .map_err(|err| MappingError::conversion(CRITERIA_OPERATOR, path, err))?;
                tree.insert(path.to_string(), fragment);
                continue;
            }

            let (key, fragment) = self.inner.map_entry(CRITERIA_OPERATOR, path, raw, root)?;
            tree.insert(key, fragment);
        }

        Ok(tree)
    }

    /// Shared mapping context
    pub fn context(&self) -> &Arc<MappingContext> {
        self.inner.context()
    }
}
