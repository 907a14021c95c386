//! Sequence inference: vector literals, tuples, indexing.

use mova_ir::{FileId, NodeId, NodeKind, NodeRange};
use mova_types::{unify_all, Type};

use super::operators::is_untyped_integer;
use crate::InferEngine;

/// `vector[e, ..]`.
///
/// An explicit element type wins. Otherwise every element must unify with
/// the others; unsuffixed integer literals take the integer type of the
/// first typed element. An empty literal needs an annotation at its use
/// site (`let v: vector<u64> = vector[];`).
pub(crate) fn infer_vector(
    engine: &mut InferEngine<'_>,
    node: NodeId,
    elem_ty: Option<NodeId>,
    elems: NodeRange,
) -> Type {
    let elems = engine.list(node.file(), elems);
    if let Some(elem_ty) = elem_ty {
        for elem in elems {
            engine.infer(*elem);
        }
        return Type::vector(engine.lower(elem_ty));
    }
    if elems.is_empty() {
        return annotation_at_use_site(engine, node)
            .filter(|ty| ty.vector_element().is_some())
            .unwrap_or(Type::Unknown);
    }

    let mut types = Vec::with_capacity(elems.len());
    let mut untyped = Vec::with_capacity(elems.len());
    for elem in elems {
        types.push(engine.infer(*elem));
        untyped.push(is_untyped_integer(engine, *elem));
    }
    let adopted = types
        .iter()
        .zip(&untyped)
        .find(|(ty, untyped)| !**untyped && ty.is_integer())
        .map(|(ty, _)| ty.clone());
    if let Some(adopted) = adopted {
        for (ty, untyped) in types.iter_mut().zip(&untyped) {
            if *untyped {
                *ty = adopted.clone();
            }
        }
    }
    unify_all(&types).map_or(Type::Unknown, Type::vector)
}

/// Annotation of the `let` a literal initialises.
fn annotation_at_use_site(engine: &mut InferEngine<'_>, node: NodeId) -> Option<Type> {
    let parent = engine.cx.snapshot.parent(node)?;
    match engine.kind(parent)? {
        NodeKind::Let {
            ty: Some(ty),
            init: Some(init),
            ..
        } if init == node => Some(engine.lower(ty)),
        _ => None,
    }
}

/// `(a, b)`; `()` is unit.
pub(crate) fn infer_tuple(engine: &mut InferEngine<'_>, file: FileId, elems: NodeRange) -> Type {
    Type::tuple(
        engine
            .list(file, elems)
            .iter()
            .map(|elem| engine.infer(*elem))
            .collect(),
    )
}

/// `base[i]` on a vector, directly or through references.
pub(crate) fn infer_index(engine: &mut InferEngine<'_>, base: NodeId) -> Type {
    engine
        .infer(base)
        .vector_element()
        .cloned()
        .unwrap_or(Type::Unknown)
}
