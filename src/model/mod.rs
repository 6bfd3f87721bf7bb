//! Value, type and document model
//!
//! Raw [`Value`]s go in, [`Fragment`]s come out. Entity metadata describes
//! how the two relate.

#![warn(missing_docs)]

pub mod document;
pub mod entity;
pub mod provider;
pub mod types;
pub mod value;

pub use document::{Fragment, MappedDocument, Scalar, Tree};
pub use entity::{EntityDescriptor, PropertyDescriptor};
pub use provider::{EntityMetadataProvider, MappingMetadata};
pub use types::{SimpleType, TypeDescriptor};
pub use value::{Object, Value};
