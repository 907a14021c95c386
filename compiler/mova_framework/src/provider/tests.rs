use super::*;
use mova_types::{AbilitySet, PrimitiveKind};
use pretty_assertions::assert_eq;

fn provider() -> (SharedInterner, FrameworkProvider) {
    let interner = SharedInterner::new();
    let provider = FrameworkProvider::bundled(interner.clone());
    (interner, provider)
}

fn qualified(interner: &SharedInterner, address: &str, module: &str, name: &str) -> QualifiedName {
    QualifiedName::new(
        interner.intern(address),
        interner.intern(module),
        interner.intern(name),
    )
}

#[test]
fn bundled_catalog_loads() {
    let (interner, provider) = provider();
    let modules: Vec<String> = provider
        .get_all_modules()
        .iter()
        .map(|m| format!("{}::{}", interner.lookup(m.address), interner.lookup(m.name)))
        .collect();
    for expected in ["0x1::vector", "0x1::option", "0x1::string", "0x2::coin", "0x2::transfer"] {
        assert!(modules.iter().any(|m| m == expected), "missing {expected}");
    }
    let mut sorted = modules.clone();
    sorted.sort();
    assert_eq!(modules, sorted);
}

#[test]
fn modules_resolve_through_aliases() {
    let (interner, provider) = provider();
    let coin = interner.intern("coin");
    let by_alias = provider.get_module(Name::SUI, coin).map(|m| m.address);
    let by_hex = provider.get_module(interner.intern("0x0002"), coin).map(|m| m.address);
    assert_eq!(by_alias, Some(Name::ADDR_0X2));
    assert_eq!(by_hex, Some(Name::ADDR_0X2));
    assert!(provider.get_module(Name::STD, coin).is_none());
}

#[test]
fn struct_records_carry_abilities_and_phantoms() {
    let (interner, provider) = provider();
    let coin = provider
        .struct_info(&qualified(&interner, "sui", "coin", "Coin"))
        .unwrap();
    assert_eq!(coin.abilities, AbilitySet::KEY | AbilitySet::STORE);
    assert!(coin.is_phantom_param(0));

    let balance_field = coin.field(interner.intern("balance")).unwrap();
    let balance = qualified(&interner, "0x2", "balance", "Balance");
    assert!(matches!(balance_field.ty.nominal(), Some((name, _)) if *name == balance));
    assert!(provider.is_framework_type(&balance));
    assert!(!provider.is_framework_type(&qualified(&interner, "0x2", "balance", "Nope")));
}

#[test]
fn function_signatures_are_typed() {
    let (interner, provider) = provider();
    let split = provider
        .function(&qualified(&interner, "0x2", "coin", "split"))
        .unwrap();
    assert_eq!(split.params.len(), 3);
    let t = split.type_params[0].name;
    let coin_t = Type::named(
        qualified(&interner, "0x2", "coin", "Coin"),
        vec![Type::type_var(t, AbilitySet::empty())],
    );
    assert_eq!(split.ret, coin_t);
    assert_eq!(split.params[0], Type::reference(coin_t, true));

    let transfer = provider
        .function(&qualified(&interner, "sui", "transfer", "public_transfer"))
        .unwrap();
    assert_eq!(
        transfer.type_params[0].constraints,
        AbilitySet::KEY | AbilitySet::STORE
    );
    assert_eq!(transfer.ret, Type::UNIT);
}

#[test]
fn string_is_a_primitive_alias() {
    let (interner, provider) = provider();
    let string = qualified(&interner, "std", "string", "String");
    assert_eq!(provider.primitive_alias(&string), Some(PrimitiveKind::String));
    let utf8 = provider
        .function(&qualified(&interner, "0x1", "string", "utf8"))
        .unwrap();
    assert_eq!(utf8.ret, Type::STRING);
}

#[test]
fn constants_are_typed() {
    let (interner, provider) = provider();
    let name = qualified(&interner, "0x1", "vector", "EINDEX_OUT_OF_BOUNDS");
    assert_eq!(provider.constant(&name), Some(Type::U64));
}

#[test]
fn search_is_case_insensitive_and_sorted() {
    let (_, provider) = provider();
    let hits = provider.search_by_name("TREASURY");
    assert_eq!(
        hits,
        vec![SearchHit {
            path: "0x2::coin::TreasuryCap".to_owned(),
            kind: SearchKind::Struct,
        }]
    );
    let hits = provider.search_by_name("option");
    assert!(hits.contains(&SearchHit {
        path: "0x1::option".to_owned(),
        kind: SearchKind::Module,
    }));
    assert!(hits.windows(2).all(|w| w[0] <= w[1]));
    assert!(provider.search_by_name("zzz_nothing").is_empty());
}

#[test]
fn custom_catalogs_add_aliases() {
    let interner = SharedInterner::new();
    let json = r#"{
        "aliases": { "me": "0x42" },
        "modules": [{
            "address": "me",
            "name": "pool",
            "structs": [{ "name": "Pool", "abilities": ["key"], "type_params": ["phantom A"] }],
            "functions": [{ "name": "create", "type_params": ["A"], "ret": "Pool<A>" }]
        }]
    }"#;
    let provider = FrameworkProvider::from_json(interner.clone(), json).unwrap();
    assert_eq!(provider.aliases().get(interner.intern("me")), Some(interner.intern("0x42")));
    let pool = qualified(&interner, "0x42", "pool", "Pool");
    assert!(provider.is_framework_type(&pool));
    assert!(provider.function(&qualified(&interner, "me", "pool", "create")).is_some());
}

#[test]
fn malformed_catalogs_are_errors() {
    let interner = SharedInterner::new();
    let bad_json = FrameworkProvider::from_json(interner.clone(), "{ not json");
    assert!(matches!(bad_json, Err(CatalogError::Json(_))));

    let bad_type = r#"{ "modules": [{ "address": "0x9", "name": "m",
        "functions": [{ "name": "f", "params": ["Missing"] }] }] }"#;
    let err = FrameworkProvider::from_json(interner.clone(), bad_type).err().unwrap();
    assert!(matches!(err, CatalogError::Signature { ref item, .. } if item == "0x9::m::f"));

    let duplicate = r#"{ "modules": [
        { "address": "0x9", "name": "m" }, { "address": "0x09", "name": "m" }
    ] }"#;
    assert!(matches!(
        FrameworkProvider::from_json(interner, duplicate),
        Err(CatalogError::DuplicateModule { .. })
    ));
}

#[test]
fn empty_provider_knows_nothing() {
    let (interner, _) = provider();
    let provider = FrameworkProvider::empty(interner.clone());
    assert!(provider.get_all_modules().is_empty());
    assert!(provider
        .struct_info(&qualified(&interner, "0x2", "coin", "Coin"))
        .is_none());
}
