//! Type model for the Mova analysis engine.
//!
//! Types are immutable, structurally compared values. This crate answers
//! the questions asked of them without touching any syntax:
//!
//! - [`is_assignable_to`]: may a value of one type be used as another?
//! - [`has_ability`] / [`abilities_of`]: which abilities does a type carry?
//! - [`unify_types`]: combine two types from different branches.
//! - [`resolve_type_variables`] / [`Substitution`]: instantiate generics.
//!
//! Nominal types need declaration metadata ([`TypeHierarchyInfo`]); it is
//! supplied through the [`HierarchyLookup`] trait so the cache index, the
//! framework catalog and the engine can each provide it.

mod ability;
mod hierarchy;
mod predicates;
mod primitive;
mod subst;
mod ty;
mod unify;

pub use ability::{Ability, AbilitySet};
pub use hierarchy::{FieldInfo, HierarchyLookup, NoHierarchy, TypeHierarchyInfo, TypeParamInfo};
pub use predicates::{abilities_of, check_ability_constraints, has_ability, is_assignable_to};
pub use primitive::PrimitiveKind;
pub use subst::{resolve_type_variables, Substitution};
pub use ty::{QualifiedName, Type};
pub use unify::{unify_all, unify_types};

mova_ir::static_assert_size!(QualifiedName, 20);
