//! Framework and standard-library type catalog.
//!
//! Symbols outside the source set (the `std` and `sui` packages) are
//! described by a JSON catalog: modules with their structs, function
//! signatures and constants, types spelled in surface syntax. A catalog for
//! the common std and framework modules is bundled and parsed on first use.
//!
//! The inference engine consults the [`FrameworkProvider`] only after a
//! name failed to resolve locally, so local declarations shadow it.

mod catalog;
mod error;
mod provider;
mod signature;

pub use catalog::{ConstantInfo, FunctionInfo, ModuleInfo};
pub use error::{CatalogError, SignatureError};
pub use provider::{FrameworkProvider, SearchHit, SearchKind};
pub use signature::{parse_abilities, parse_type, parse_type_param, SignatureContext};
