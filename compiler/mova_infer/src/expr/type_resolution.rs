//! Lowering of type annotations to [`Type`].

use mova_cache::FileDeps;
use mova_ir::{FileId, Name, NodeId, NodeKind};
use mova_stack::DepthLimit;
use mova_types::{PrimitiveKind, QualifiedName, Type};

use crate::InferContext;

/// The type an annotation node denotes.
///
/// Primitives and `vector` are keywords. Other names go through the
/// resolver: type parameters become type variables carrying their bounds,
/// structs become their qualified identity, and names that leave the source
/// set are looked up in the framework catalog. Files of the struct
/// declarations used are added to `deps`.
pub(crate) fn lower_type(cx: &InferContext<'_>, node: NodeId, deps: &mut FileDeps) -> Type {
    lower_at(cx, node, deps, 0)
}

fn lower_at(cx: &InferContext<'_>, node: NodeId, deps: &mut FileDeps, depth: usize) -> Type {
    if !DepthLimit::DEFAULT.allows(depth) {
        return Type::Unknown;
    }
    let Some(kind) = cx.snapshot.kind(node) else {
        return Type::Unknown;
    };
    let file = node.file();
    match kind {
        NodeKind::TypeRef { mutable, inner } => {
            Type::reference(lower_at(cx, inner, deps, depth + 1), mutable)
        }
        NodeKind::TypeTuple { elems } => Type::tuple(
            cx.snapshot
                .list(file, elems)
                .iter()
                .map(|elem| lower_at(cx, *elem, deps, depth + 1))
                .collect(),
        ),
        NodeKind::TypePath { path, args } => {
            let args: Vec<Type> = cx
                .snapshot
                .list(file, args)
                .iter()
                .map(|arg| lower_at(cx, *arg, deps, depth + 1))
                .collect();
            if path.is_simple() {
                if let Some(ty) = keyword_type(path.name, &args) {
                    return ty;
                }
            }
            lower_named(cx, node, args, deps)
        }
        _ => Type::Unknown,
    }
}

fn keyword_type(name: Name, args: &[Type]) -> Option<Type> {
    if name == Name::VECTOR {
        return Some(Type::Generic {
            base: QualifiedName::VECTOR,
            args: args.to_vec(),
        });
    }
    PrimitiveKind::from_name(name).map(Type::Primitive)
}

fn lower_named(cx: &InferContext<'_>, node: NodeId, args: Vec<Type>, deps: &mut FileDeps) -> Type {
    let decl = cx
        .resolver
        .resolve(node)
        .and_then(|decl| Some((decl, cx.snapshot.kind(decl)?)));
    match decl {
        Some((decl, NodeKind::TypeParam { name, constraints, .. })) => {
            Type::type_var(name, cx.abilities(decl.file(), constraints))
        }
        Some((decl, NodeKind::Struct { .. })) => {
            note(deps, decl.file());
            cx.item_name(decl)
                .map_or(Type::Unknown, |name| Type::named(name, args))
        }
        _ => framework_type(cx, node, args),
    }
}

/// A type that only the framework catalog knows.
fn framework_type(cx: &InferContext<'_>, node: NodeId, args: Vec<Type>) -> Type {
    let Some(path) = cx.resolver.canonical_path(node) else {
        return Type::Unknown;
    };
    let name = QualifiedName::from(path);
    if let Some(kind) = cx.framework.primitive_alias(&name) {
        return Type::Primitive(kind);
    }
    if name.is_std_string() || cx.framework.is_framework_type(&name) {
        return Type::named(name, args);
    }
    Type::Unknown
}

fn note(deps: &mut FileDeps, file: FileId) {
    if !deps.contains(&file) {
        deps.push(file);
    }
}
