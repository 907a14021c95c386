//! The two pure questions asked of types: assignability and abilities.

use crate::{Ability, AbilitySet, HierarchyLookup, QualifiedName, Type};

/// Whether a value of type `source` may be used where `target` is expected.
///
/// There is no subtyping: apart from `Unknown`, which is compatible with
/// everything, and `&mut T` being usable as `&T`, types must be equal.
pub fn is_assignable_to(source: &Type, target: &Type) -> bool {
    if source == target {
        return true;
    }
    match (source, target) {
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (
            Type::Reference {
                inner: source_inner,
                mutable: source_mut,
            },
            Type::Reference {
                inner: target_inner,
                mutable: target_mut,
            },
        ) => (*source_mut || !*target_mut) && is_assignable_to(source_inner, target_inner),
        _ => false,
    }
}

/// The full ability set of a type.
pub fn abilities_of(ty: &Type, hierarchy: &dyn HierarchyLookup) -> AbilitySet {
    match ty {
        Type::Primitive(kind) => kind.abilities(),
        Type::Reference { .. } => AbilitySet::REFERENCE,
        Type::Tuple(elems) => elems
            .iter()
            .fold(AbilitySet::all(), |set, elem| set & abilities_of(elem, hierarchy)),
        Type::Named(name) => hierarchy
            .lookup(name)
            .map_or(AbilitySet::empty(), |info| info.abilities),
        Type::Generic { base, args } => generic_abilities(base, args, hierarchy),
        Type::TypeVariable { constraints, .. } => *constraints,
        Type::Function { .. } => AbilitySet::empty(),
        Type::Unknown => AbilitySet::all(),
    }
}

/// `vector<T>` has whatever of `copy + drop + store` its element has.
/// Other generic structs keep a declared ability only if every non-phantom
/// argument has the matching ability (`store` for `key`).
fn generic_abilities(base: &QualifiedName, args: &[Type], hierarchy: &dyn HierarchyLookup) -> AbilitySet {
    if *base == QualifiedName::VECTOR {
        let elem = args
            .iter()
            .fold(AbilitySet::all(), |set, arg| set & abilities_of(arg, hierarchy));
        return AbilitySet::PRIMITIVE & elem;
    }
    let Some(info) = hierarchy.lookup(base) else {
        return AbilitySet::empty();
    };
    let arg_sets: Vec<AbilitySet> = args
        .iter()
        .enumerate()
        .filter(|(idx, _)| !info.is_phantom_param(*idx))
        .map(|(_, arg)| abilities_of(arg, hierarchy))
        .collect();
    info.abilities
        .abilities()
        .filter(|ability| {
            let required = ability.required_of_arguments();
            arg_sets.iter().all(|set| set.has(required))
        })
        .collect()
}

/// Whether `ty` has `ability`. Unresolved nominal types have none.
pub fn has_ability(ty: &Type, ability: Ability, hierarchy: &dyn HierarchyLookup) -> bool {
    abilities_of(ty, hierarchy).has(ability)
}

/// Whether `ty` has every ability in `required`.
pub fn check_ability_constraints(ty: &Type, required: AbilitySet, hierarchy: &dyn HierarchyLookup) -> bool {
    abilities_of(ty, hierarchy).contains(required)
}

#[cfg(test)]
mod tests;
