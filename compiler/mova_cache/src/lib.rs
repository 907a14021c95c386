//! Type cache for the Mova analysis engine.
//!
//! Memoizes the inferred type of each syntax node for an analysis session.
//! Results are keyed by [`NodeId`](mova_ir::NodeId) and invalidated per
//! file: replacing a file's tree drops its entries and the entries of other
//! files derived from it. A side index holds the [`TypeHierarchyInfo`] of
//! named types for ability queries.
//!
//! Failed inference is never cached, so a query that could not be answered
//! is retried the next time it is asked.
//!
//! [`TypeHierarchyInfo`]: mova_types::TypeHierarchyInfo

mod cache;
mod config;
mod stats;

pub use cache::{Cached, FileDeps, TypeCache};
pub use config::CacheConfig;
pub use stats::CacheStats;
