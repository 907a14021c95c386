//! Struct inference: declarations, literals, field access.

use std::sync::Arc;

use mova_ir::{Name, NodeId, NodeKind, NodeRange};
use mova_types::{HierarchyLookup, QualifiedName, Substitution, Type, TypeHierarchyInfo};

use crate::InferEngine;

/// A struct declaration's own type: `Named`, or `Generic` over its type
/// parameters.
pub(crate) fn struct_type(engine: &InferEngine<'_>, decl: NodeId) -> Option<Type> {
    engine
        .cx
        .local_struct_info(decl)
        .map(|info| info.declared_type())
}

/// `S { f: e, .. }` has the qualified type of `S`.
///
/// Type arguments come from the path (`S<u64> { .. }`) when written;
/// otherwise they are bound by matching the declared field types against
/// the initialisers, and parameters nothing binds stay type variables.
pub(crate) fn infer_pack(engine: &mut InferEngine<'_>, path: NodeId, fields: NodeRange) -> Type {
    let inits: Vec<(Name, Type)> = engine
        .list(path.file(), fields)
        .iter()
        .filter_map(|field| match engine.kind(*field) {
            Some(NodeKind::FieldInit { name, value }) => Some((name, engine.infer(value))),
            _ => None,
        })
        .collect();
    let Some(NodeKind::Path { type_args, .. }) = engine.kind(path) else {
        return Type::Unknown;
    };
    let Some(info) = pack_target(engine, path) else {
        return Type::Unknown;
    };
    let explicit: Vec<Type> = engine
        .list(path.file(), type_args)
        .iter()
        .map(|ty| engine.lower(*ty))
        .collect();
    if !explicit.is_empty() || info.type_params.is_empty() {
        return Type::named(info.name, explicit);
    }

    let names: Vec<Name> = info.type_params.iter().map(|p| p.name).collect();
    let mut subst = Substitution::new();
    for (name, ty) in &inits {
        if let Some(field) = info.field(*name) {
            subst.match_types(&names, &field.ty, ty);
        }
    }
    subst.apply(&info.declared_type())
}

/// Hierarchy record of the struct a literal's path names.
fn pack_target(engine: &mut InferEngine<'_>, path: NodeId) -> Option<Arc<TypeHierarchyInfo>> {
    match engine.cx.resolver.resolve(path) {
        Some(decl) => {
            engine.note_file(decl.file());
            engine.cx.local_struct_info(decl).map(Arc::new)
        }
        None => {
            let path = engine.cx.resolver.canonical_path(path)?;
            engine.cx.framework.struct_info(&QualifiedName::from(path))
        }
    }
}

/// `base.field`, looking through references to the struct's declared field
/// type with the struct's type arguments substituted.
pub(crate) fn infer_field(engine: &mut InferEngine<'_>, base: NodeId, field: Name) -> Type {
    let base_ty = engine.infer(base);
    let Some((name, args)) = base_ty.nominal() else {
        return Type::Unknown;
    };
    engine
        .cx
        .lookup(name)
        .and_then(|info| info.field_type(field, args))
        .unwrap_or(Type::Unknown)
}
