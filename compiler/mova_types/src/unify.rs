//! Single-pass pairwise unification.
//!
//! Used for vector element consistency and `if` branch typing. There is no
//! occurs check and no constraint solving: a type variable simply yields to
//! the other side.

use crate::Type;

/// Combine two types into one, or `None` when they are incompatible.
pub fn unify_types(a: &Type, b: &Type) -> Option<Type> {
    if a == b {
        return Some(a.clone());
    }
    match (a, b) {
        (Type::TypeVariable { .. }, other) | (other, Type::TypeVariable { .. }) => {
            Some(other.clone())
        }
        (
            Type::Generic { base, args },
            Type::Generic {
                base: other_base,
                args: other_args,
            },
        ) if base == other_base && args.len() == other_args.len() => {
            let args = args
                .iter()
                .zip(other_args)
                .map(|(x, y)| unify_types(x, y))
                .collect::<Option<Vec<_>>>()?;
            Some(Type::Generic { base: *base, args })
        }
        _ => None,
    }
}

/// Fold `unify_types` over a sequence. `None` for an empty sequence or on
/// the first failure.
pub fn unify_all<'a>(types: impl IntoIterator<Item = &'a Type>) -> Option<Type> {
    let mut iter = types.into_iter();
    let first = iter.next()?.clone();
    iter.try_fold(first, |acc, ty| unify_types(&acc, ty))
}
