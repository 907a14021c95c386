//! Name references and declarations.

use mova_ir::{NodeId, NodeKind, NodeRange};
use mova_types::{resolve_type_variables, QualifiedName, Type};

use super::calls::local_signature;
use crate::InferEngine;

/// A name reference: the type of the declaration it resolves to, with
/// explicit type arguments applied (`f<u64>`). Names that leave the source
/// set are looked up among framework constants and functions.
pub(crate) fn infer_path(engine: &mut InferEngine<'_>, node: NodeId, type_args: NodeRange) -> Type {
    let explicit: Vec<Type> = engine
        .list(node.file(), type_args)
        .iter()
        .map(|ty| engine.lower(*ty))
        .collect();
    let Some(decl) = engine.cx.resolver.resolve(node) else {
        return framework_value(engine, node, &explicit);
    };
    let ty = engine.infer(decl);
    if explicit.is_empty() {
        return ty;
    }
    match engine.kind(decl) {
        Some(
            NodeKind::Function { type_params, .. } | NodeKind::Struct { type_params, .. },
        ) => {
            let names: Vec<_> = engine
                .cx
                .type_params(decl.file(), type_params)
                .iter()
                .map(|p| p.name)
                .collect();
            resolve_type_variables(&ty, &explicit, &names)
        }
        _ => ty,
    }
}

fn framework_value(engine: &InferEngine<'_>, node: NodeId, explicit: &[Type]) -> Type {
    let Some(path) = engine.cx.resolver.canonical_path(node) else {
        return Type::Unknown;
    };
    let name = QualifiedName::from(path);
    if let Some(ty) = engine.cx.framework.constant(&name) {
        return ty;
    }
    engine.cx.framework.function(&name).map_or(Type::Unknown, |f| {
        resolve_type_variables(&f.signature(), explicit, &f.type_param_names())
    })
}

/// `fun f(params): ret` as a `Function` type.
pub(crate) fn function_type(engine: &mut InferEngine<'_>, decl: NodeId) -> Option<Type> {
    local_signature(engine, decl).map(|sig| sig.into_type())
}

/// A constant or binding: its annotation if present, else its initializer.
pub(crate) fn annotated_or_inferred(
    engine: &mut InferEngine<'_>,
    ty: Option<NodeId>,
    init: Option<NodeId>,
) -> Type {
    match (ty, init) {
        (Some(ty), _) => engine.lower(ty),
        (None, Some(init)) => engine.infer(init),
        (None, None) => Type::Unknown,
    }
}

/// Type of a name bound by a `let` pattern. Names inside tuple patterns take
/// the matching element of the bound tuple type.
pub(crate) fn binding_type(engine: &mut InferEngine<'_>, bind: NodeId) -> Type {
    let mut positions = Vec::new();
    let mut current = bind;
    let (ty, init) = loop {
        let Some(parent) = engine.cx.snapshot.parent(current) else {
            return Type::Unknown;
        };
        match engine.kind(parent) {
            Some(NodeKind::BindTuple { elems }) => {
                let Some(idx) = engine
                    .list(parent.file(), elems)
                    .iter()
                    .position(|e| *e == current)
                else {
                    return Type::Unknown;
                };
                positions.push(idx);
                current = parent;
            }
            Some(NodeKind::Let { pattern, ty, init }) if pattern == current => break (ty, init),
            _ => return Type::Unknown,
        }
    };
    positions
        .iter()
        .rev()
        .fold(annotated_or_inferred(engine, ty, init), |ty, idx| match ty {
            Type::Tuple(mut elems) if *idx < elems.len() => elems.swap_remove(*idx),
            _ => Type::Unknown,
        })
}
