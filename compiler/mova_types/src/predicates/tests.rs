use std::sync::Arc;

use super::*;
use crate::{NoHierarchy, TypeHierarchyInfo, TypeParamInfo};
use mova_ir::{Name, StringInterner};
use rustc_hash::FxHashMap;

type Index = FxHashMap<QualifiedName, Arc<TypeHierarchyInfo>>;

struct World {
    index: Index,
    coin: QualifiedName,
    pair: QualifiedName,
    ticket: QualifiedName,
}

fn world(interner: &StringInterner) -> World {
    let module = interner.intern("m");
    let coin = QualifiedName::new(Name::ADDR_0X2, module, interner.intern("Coin"));
    let pair = QualifiedName::new(Name::ADDR_0X2, module, interner.intern("Pair"));
    let ticket = QualifiedName::new(Name::ADDR_0X2, module, interner.intern("Ticket"));
    let param = |name: &str, is_phantom| TypeParamInfo {
        name: interner.intern(name),
        constraints: AbilitySet::empty(),
        is_phantom,
    };

    let mut index = Index::default();
    index.insert(
        coin,
        Arc::new(
            TypeHierarchyInfo::new(coin, AbilitySet::KEY | AbilitySet::STORE)
                .with_type_params(vec![param("T", true)]),
        ),
    );
    index.insert(
        pair,
        Arc::new(
            TypeHierarchyInfo::new(pair, AbilitySet::PRIMITIVE | AbilitySet::KEY)
                .with_type_params(vec![param("A", false), param("B", false)]),
        ),
    );
    index.insert(ticket, Arc::new(TypeHierarchyInfo::new(ticket, AbilitySet::KEY)));
    World {
        index,
        coin,
        pair,
        ticket,
    }
}

#[test]
fn references_need_matching_mutability() {
    let shared = Type::reference(Type::U64, false);
    let unique = Type::reference(Type::U64, true);
    assert!(is_assignable_to(&unique, &shared));
    assert!(!is_assignable_to(&shared, &unique));
    assert!(!is_assignable_to(&Type::reference(Type::U8, true), &shared));
}

#[test]
fn no_implicit_widening() {
    assert!(!is_assignable_to(&Type::U8, &Type::U64));
    assert!(!is_assignable_to(&Type::vector(Type::U8), &Type::vector(Type::U64)));
    assert!(is_assignable_to(&Type::Unknown, &Type::vector(Type::U64)));
    assert!(is_assignable_to(&Type::SIGNER, &Type::Unknown));
}

#[test]
fn fixed_ability_sets() {
    let none = NoHierarchy;
    assert!(has_ability(&Type::U8, Ability::Store, &none));
    assert!(!has_ability(&Type::SIGNER, Ability::Copy, &none));
    assert!(has_ability(&Type::SIGNER, Ability::Drop, &none));
    let borrowed_signer = Type::reference(Type::SIGNER, false);
    assert_eq!(abilities_of(&borrowed_signer, &none), AbilitySet::REFERENCE);
    assert_eq!(
        abilities_of(&Type::tuple(vec![Type::U8, Type::SIGNER]), &none),
        AbilitySet::DROP
    );
    assert_eq!(
        abilities_of(&Type::function(vec![], Type::UNIT), &none),
        AbilitySet::empty()
    );
    assert_eq!(abilities_of(&Type::Unknown, &none), AbilitySet::all());
}

#[test]
fn vector_abilities_follow_element() {
    let none = NoHierarchy;
    assert_eq!(abilities_of(&Type::vector(Type::U8), &none), AbilitySet::PRIMITIVE);
    assert_eq!(abilities_of(&Type::vector(Type::SIGNER), &none), AbilitySet::DROP);
    let t = Type::type_var(Name::from_raw(700), AbilitySet::COPY | AbilitySet::KEY);
    assert_eq!(abilities_of(&Type::vector(t), &none), AbilitySet::COPY);
}

#[test]
fn named_types_use_the_hierarchy() {
    let interner = StringInterner::new();
    let w = world(&interner);
    assert!(has_ability(&Type::Named(w.ticket), Ability::Key, &w.index));
    assert!(!has_ability(&Type::Named(w.ticket), Ability::Drop, &w.index));
    assert!(!has_ability(&Type::Named(w.ticket), Ability::Key, &NoHierarchy));
}

#[test]
fn generic_struct_abilities() {
    let interner = StringInterner::new();
    let w = world(&interner);
    // Phantom argument: no constraint from `signer`.
    let coin = Type::named(w.coin, vec![Type::SIGNER]);
    assert!(check_ability_constraints(
        &coin,
        AbilitySet::KEY | AbilitySet::STORE,
        &w.index
    ));

    let plain = Type::named(w.pair, vec![Type::U8, Type::ADDRESS]);
    assert_eq!(abilities_of(&plain, &w.index), AbilitySet::all());

    // `Ticket` has only `key`: it blocks copy/drop/store, and also `key` (needs store).
    let blocked = Type::named(w.pair, vec![Type::U8, Type::Named(w.ticket)]);
    assert_eq!(abilities_of(&blocked, &w.index), AbilitySet::empty());

    let signer_pair = Type::named(w.pair, vec![Type::SIGNER, Type::U8]);
    assert_eq!(abilities_of(&signer_pair, &w.index), AbilitySet::DROP);
}
