//! Operator inference: binary and unary operators.

use mova_ir::{BinaryOp, NodeId, NodeKind, OpCategory, UnaryOp};
use mova_types::Type;

use super::literals::is_unsuffixed_integer;
use crate::InferEngine;

/// Infer the type of a binary operation.
///
/// Arithmetic and bitwise operators need two equal integer operands and
/// yield that type; comparisons always yield `bool`; `&&`/`||` need `bool`
/// operands. There is no implicit widening, but an unsuffixed literal takes
/// the integer type of the other operand (`x + 1` with `x: u8` is `u8`).
pub(crate) fn infer_binary(engine: &mut InferEngine<'_>, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> Type {
    match op.category() {
        OpCategory::Arithmetic | OpCategory::Bitwise => {
            let (left, right) = operand_types(engine, lhs, rhs);
            if left == right && left.is_integer() {
                left
            } else {
                Type::Unknown
            }
        }
        OpCategory::Comparison => {
            // Operand mismatch is a diagnostic concern; still infer both so
            // their types are cached.
            engine.infer(lhs);
            engine.infer(rhs);
            Type::BOOL
        }
        OpCategory::Logical => {
            let left = engine.infer(lhs);
            let right = engine.infer(rhs);
            if left == Type::BOOL && right == Type::BOOL {
                Type::BOOL
            } else {
                Type::Unknown
            }
        }
        // The shift amount is a `u8`; the result has the shifted operand's type.
        OpCategory::Shift => {
            let left = engine.infer(lhs);
            let right = engine.infer(rhs);
            let amount_ok = right == Type::U8 || is_untyped_integer(engine, rhs);
            if left.is_integer() && amount_ok {
                left
            } else {
                Type::Unknown
            }
        }
    }
}

/// Both operand types, with an unsuffixed literal on one side adopting the
/// integer type of the other.
fn operand_types(engine: &mut InferEngine<'_>, lhs: NodeId, rhs: NodeId) -> (Type, Type) {
    let left = engine.infer(lhs);
    let right = engine.infer(rhs);
    match (is_untyped_integer(engine, lhs), is_untyped_integer(engine, rhs)) {
        (true, false) if right.is_integer() => (right.clone(), right),
        (false, true) if left.is_integer() => (left.clone(), left),
        _ => (left, right),
    }
}

pub(crate) fn is_untyped_integer(engine: &InferEngine<'_>, node: NodeId) -> bool {
    match engine.kind(node) {
        Some(NodeKind::Literal { text }) => is_unsuffixed_integer(engine.cx.interner.lookup(text)),
        _ => false,
    }
}

/// Infer the type of a unary operation.
pub(crate) fn infer_unary(engine: &mut InferEngine<'_>, op: UnaryOp, operand: NodeId) -> Type {
    let ty = engine.infer(operand);
    match op {
        UnaryOp::Not if ty == Type::BOOL => ty,
        UnaryOp::Neg if ty.is_integer() => ty,
        UnaryOp::Deref => match ty {
            Type::Reference { inner, .. } => *inner,
            _ => Type::Unknown,
        },
        UnaryOp::Borrow => Type::reference(ty, false),
        UnaryOp::BorrowMut => Type::reference(ty, true),
        UnaryOp::Move | UnaryOp::Copy => ty,
        UnaryOp::Not | UnaryOp::Neg => Type::Unknown,
    }
}
