//! Type inference for the Mova analysis engine.
//!
//! Inference is a memoized recursive descent: asking for the type of a node
//! consults the [`TypeCache`](mova_cache::TypeCache), and on a miss
//! dispatches on the node's kind, recursing into sub-nodes (which consult
//! the cache in turn), resolving names through the
//! [`SymbolResolver`](mova_ir::SymbolResolver), falling back to the
//! framework catalog for library symbols, and substituting and unifying
//! types as the rules require.
//!
//! The engine is total. It answers `Unknown` whenever it cannot determine a
//! type and never reports diagnostics; callers decide what an `Unknown` or
//! an assignability failure means in their own domain.

mod config;
mod constraints;
mod context;
mod engine;
mod expr;

#[cfg(test)]
mod test_helpers;

pub use config::InferConfig;
pub use constraints::ConstraintViolation;
pub use context::InferContext;
pub use engine::{EngineStats, InferEngine};
