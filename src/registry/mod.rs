//! Type registry and terminal value conversions
//!
//! Both are configured once and shared read-only by every mapping call.

pub mod conversions;
pub mod types;

pub use conversions::{CustomConversions, StandardConverter, TerminalValueConverter};
pub use types::{DefaultTypeRegistry, TypeRegistry};
