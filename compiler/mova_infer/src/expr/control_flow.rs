//! Control flow inference: blocks and `if`.

use mova_ir::{FileId, NodeId, NodeKind, NodeRange};
use mova_stack::DepthLimit;
use mova_types::{unify_types, Type};

use crate::InferEngine;

/// A block is unit unless its last statement is an expression without a
/// trailing `;`, in which case it has that expression's type.
pub(crate) fn infer_block(engine: &mut InferEngine<'_>, file: FileId, stmts: NodeRange) -> Type {
    match engine.list(file, stmts).last() {
        Some(last) => match tail_expr(engine, *last) {
            Some(expr) => engine.infer(expr),
            None => Type::UNIT,
        },
        None => Type::UNIT,
    }
}

/// The value-producing expression of a trailing statement.
fn tail_expr(engine: &InferEngine<'_>, stmt: NodeId) -> Option<NodeId> {
    match engine.kind(stmt)? {
        NodeKind::ExprStmt {
            expr,
            terminated: false,
        } => Some(expr),
        kind if kind.is_expr() => Some(stmt),
        _ => None,
    }
}

/// Unification of both branch types; a missing `else` yields unit. A
/// branch that always diverges takes no part, so `if (c) x else abort 1`
/// has the type of `x`.
pub(crate) fn infer_if(
    engine: &mut InferEngine<'_>,
    then_branch: NodeId,
    else_branch: Option<NodeId>,
) -> Type {
    let then_diverges = diverges(engine, then_branch, 0);
    let else_diverges = else_branch.is_some_and(|e| diverges(engine, e, 0));
    let mut branch = |node: Option<NodeId>| node.map_or(Type::UNIT, |n| engine.infer(n));
    match (then_diverges, else_diverges) {
        (true, true) => Type::Unknown,
        (true, false) => branch(else_branch),
        (false, true) => branch(Some(then_branch)),
        (false, false) => {
            let then_ty = branch(Some(then_branch));
            let else_ty = branch(else_branch);
            unify_types(&then_ty, &else_ty).unwrap_or(Type::Unknown)
        }
    }
}

/// Whether evaluating `node` never completes normally: `return`, `abort`,
/// `break`, `continue`, a block ending in one, or an `if` whose branches
/// both diverge.
fn diverges(engine: &InferEngine<'_>, node: NodeId, depth: usize) -> bool {
    if !DepthLimit::DEFAULT.allows(depth) {
        return false;
    }
    let Some(kind) = engine.kind(node) else {
        return false;
    };
    match kind {
        _ if kind.is_diverging() => true,
        NodeKind::Block { stmts } => engine
            .list(node.file(), stmts)
            .last()
            .is_some_and(|last| diverges(engine, *last, depth + 1)),
        NodeKind::ExprStmt { expr, .. } => diverges(engine, expr, depth + 1),
        NodeKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => diverges(engine, then_branch, depth + 1) && diverges(engine, else_branch, depth + 1),
        _ => false,
    }
}
