//! Per-kind inference rules.
//!
//! [`infer_node`] is the single dispatch over [`NodeKind`]; each family of
//! kinds delegates to its own module:
//!
//! - Literals → lexical classification
//! - Paths and declarations → resolver, then the declaration's type
//! - Calls and struct literals → signature lookup and generic substitution
//! - Operators → per-category typing rules
//! - Blocks, `if`, loops → control flow and branch unification
//! - Vectors, tuples, indexing → sequences
//! - Type annotations → lowering

mod calls;
mod control_flow;
mod identifiers;
mod literals;
mod operators;
mod sequences;
mod structs;
mod type_resolution;

pub(crate) use calls::{infer_args, resolve_callee};
pub(crate) use type_resolution::lower_type;

use mova_ir::{NodeId, NodeKind};
use mova_types::Type;

use crate::InferEngine;

/// Compute the type of `node` without consulting the cache for it.
pub(crate) fn infer_node(engine: &mut InferEngine<'_>, node: NodeId) -> Option<Type> {
    let kind = engine.cx.snapshot.kind(node)?;
    let file = node.file();
    let ty = match kind {
        // === Expressions ===
        NodeKind::Literal { text } => literals::classify(engine.cx.interner.lookup(text)),
        NodeKind::Path { type_args, .. } => identifiers::infer_path(engine, node, type_args),
        NodeKind::Call { callee, args } => calls::infer_call(engine, callee, args),
        NodeKind::Binary { op, lhs, rhs } => operators::infer_binary(engine, op, lhs, rhs),
        NodeKind::Unary { op, operand } => operators::infer_unary(engine, op, operand),
        NodeKind::Pack { path, fields } => structs::infer_pack(engine, path, fields),
        NodeKind::FieldInit { value, .. } => engine.infer(value),
        NodeKind::Vector { elem_ty, elems } => {
            sequences::infer_vector(engine, node, elem_ty, elems)
        }
        NodeKind::Tuple { elems } => sequences::infer_tuple(engine, file, elems),
        NodeKind::Index { base, .. } => sequences::infer_index(engine, base),
        NodeKind::Block { stmts } => control_flow::infer_block(engine, file, stmts),
        NodeKind::If {
            then_branch,
            else_branch,
            ..
        } => control_flow::infer_if(engine, then_branch, else_branch),
        NodeKind::While { .. } | NodeKind::Loop { .. } | NodeKind::Assign { .. } => Type::UNIT,
        // Diverging: compatible with whatever the context expects.
        NodeKind::Return { .. } | NodeKind::Abort { .. } | NodeKind::Break | NodeKind::Continue => {
            Type::Unknown
        }
        NodeKind::Cast { ty, .. } => engine.lower(ty),
        NodeKind::FieldAccess { base, field } => structs::infer_field(engine, base, field),

        // === Declarations ===
        NodeKind::Function { .. } => identifiers::function_type(engine, node)?,
        NodeKind::Struct { .. } => structs::struct_type(engine, node)?,
        NodeKind::Const { ty, value, .. } => identifiers::annotated_or_inferred(engine, ty, value),
        NodeKind::Param { ty, .. } => ty.map_or(Type::Unknown, |ty| engine.lower(ty)),
        NodeKind::TypeParam {
            name, constraints, ..
        } => Type::type_var(name, engine.cx.abilities(file, constraints)),
        NodeKind::FieldDecl { ty, .. } => engine.lower(ty),
        NodeKind::BindName { .. } => identifiers::binding_type(engine, node),

        // === Type annotations ===
        NodeKind::TypePath { .. } | NodeKind::TypeRef { .. } | NodeKind::TypeTuple { .. } => {
            engine.lower(node)
        }

        NodeKind::Error => Type::Unknown,
        NodeKind::Module { .. }
        | NodeKind::Use { .. }
        | NodeKind::Ability { .. }
        | NodeKind::Let { .. }
        | NodeKind::BindTuple { .. }
        | NodeKind::ExprStmt { .. } => return None,
    };
    Some(ty)
}
