//! Mova IR - syntax trees and name resolution for the analysis engine.
//!
//! This crate contains the data the type engine reads:
//! - Names for interned identifiers, and the sharded interner behind them
//! - Node identity (`FileId`, `NodeId`, `NodeRange`) and spans
//! - Flat per-file syntax trees and the builder the parser targets
//! - The live source set (`SourceDb`) and its immutable snapshots
//! - Name resolution (`SymbolResolver`, `ScopeResolver`)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`
//! - **Flatten Everything**: children are `NodeId` indices, lists are `NodeRange`s
//! - **Share Immutably**: analyses read `Arc`'d trees from a snapshot, never a lock

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod address;
pub mod ast;
mod ids;
mod interner;
mod name;
pub mod resolve;
mod source_db;
mod span;
mod tree;

pub use address::AddressAliases;
pub use ast::{BinaryOp, ItemPath, Node, NodeKind, OpCategory, UnaryOp};
pub use ids::{FileId, NodeId, NodeRange};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use resolve::{Namespace, ScopeResolver, SymbolResolver};
pub use source_db::{SourceDb, SourceSnapshot};
pub use span::Span;
pub use tree::{SyntaxTree, TreeBuilder};

static_assert_size!(Name, 4);
static_assert_size!(NodeId, 8);
static_assert_size!(Span, 8);
