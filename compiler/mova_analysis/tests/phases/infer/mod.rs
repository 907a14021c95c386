//! Inference over complete programs.

use mova_ir::{BinaryOp, ItemPath, NodeId};
use mova_types::{Ability, AbilitySet, Type};
use pretty_assertions::assert_eq;

use crate::common::{app, host, named, qualified, shapes};

#[test]
fn literal_and_operator_examples() {
    let host = host(false);
    let file = host.alloc_file();
    let mut b = host.builder(file);
    let lits: Vec<NodeId> = ["true", "0x1", "42", "42u8", "b\"hi\""]
        .iter()
        .map(|text| b.literal(text))
        .collect();
    let (l, r) = (b.literal("1u8"), b.literal("2u8"));
    let same = b.binary(BinaryOp::Add, l, r);
    let (l, r) = (b.literal("1u8"), b.literal("2u64"));
    let mixed = b.binary(BinaryOp::Add, l, r);
    let (l, r) = (b.literal("1u64"), b.literal("2u64"));
    let vector = b.vector(None, &[l, r]);
    let (l, r) = (b.literal("1u64"), b.literal("true"));
    let clash = b.vector(None, &[l, r]);
    host.set_file(b.finish());

    let types: Vec<Option<Type>> = lits.iter().map(|n| host.infer_type(*n)).collect();
    assert_eq!(
        types,
        vec![
            Some(Type::BOOL),
            Some(Type::ADDRESS),
            Some(Type::U64),
            Some(Type::U8),
            Some(Type::vector(Type::U8)),
        ]
    );
    assert_eq!(host.infer_type(same), Some(Type::U8));
    assert_eq!(host.infer_type(mixed), Some(Type::Unknown));
    assert_eq!(host.infer_type(vector), Some(Type::vector(Type::U64)));
    assert_eq!(host.infer_type(clash), Some(Type::Unknown));
}

#[test]
fn field_access_through_a_reference_across_files() {
    let host = host(false);
    let (lib, user) = (host.alloc_file(), host.alloc_file());
    host.set_file(shapes(&host, lib, "u64"));
    let app = app(&host, user);
    host.set_file(app.tree);

    assert_eq!(host.infer_type(app.access), Some(Type::U64));
    assert_eq!(host.infer_type(app.sum), Some(Type::U64));
}

#[test]
fn add_and_identity() {
    let host = host(false);
    let file = host.alloc_file();
    let mut b = host.builder(file);

    // fun add(a: u64, b: u64): u64 { a + b }
    let (a_ty, b_ty, ret) = (b.ty("u64"), b.ty("u64"), b.ty("u64"));
    let a_param = b.param("a", a_ty);
    let b_param = b.param("b", b_ty);
    let (a, bb) = (b.path("a"), b.path("b"));
    let sum = b.binary(BinaryOp::Add, a, bb);
    let tail = b.expr_stmt(sum, false);
    let body = b.block(&[tail]);
    let add = b.function("add", &[], &[a_param, b_param], Some(ret), Some(body));

    // fun identity<T>(x: T): T { x }
    let t = b.type_param("T", &[], false);
    let (x_ty, t_ret) = (b.ty("T"), b.ty("T"));
    let x_param = b.param("x", x_ty);
    let x = b.path("x");
    let tail = b.expr_stmt(x, false);
    let body = b.block(&[tail]);
    let identity = b.function("identity", &[t], &[x_param], Some(t_ret), Some(body));

    // fun test() { let x = add(1, 2); let y = identity(42u64); let z = identity<bool>(true); }
    let (one, two) = (b.literal("1"), b.literal("2"));
    let add_call = b.call_named("add", &[one, two]);
    let let_x = b.let_stmt("x", None, Some(add_call));
    let arg = b.literal("42u64");
    let identity_call = b.call_named("identity", &[arg]);
    let let_y = b.let_stmt("y", None, Some(identity_call));
    let bool_ty = b.ty("bool");
    let callee = b.path_node(ItemPath::simple(b.name("identity")), &[bool_ty]);
    let yes = b.literal("true");
    let explicit_call = b.call(callee, &[yes]);
    let let_z = b.let_stmt("z", None, Some(explicit_call));
    let body = b.block(&[let_x, let_y, let_z]);
    let test = b.function("test", &[], &[], None, Some(body));
    b.module("0x5", "m", &[add, identity, test]);
    host.set_file(b.finish());

    assert_eq!(host.infer_type(add_call), Some(Type::U64));
    assert_eq!(host.infer_type(identity_call), Some(Type::U64));
    assert_eq!(host.infer_type(explicit_call), Some(Type::BOOL));
}

#[test]
fn framework_types_and_abilities() {
    let host = host(false);
    let file = host.alloc_file();
    let mut b = host.builder(file);
    let use_coin = b.use_decl("sui", "coin", None, None);
    let use_coin_ty = b.use_decl("sui", "coin", Some("Coin"), None);
    let use_ctx = b.use_decl("sui", "tx_context", Some("TxContext"), None);
    let t = b.type_param("T", &[], false);
    let t_arg = b.ty("T");
    let coin_ty = b.ty_generic("Coin", &[t_arg]);
    let coin_ref = b.ty_ref(coin_ty, true);
    let coin_param = b.param("c", coin_ref);
    let ctx_ty = b.ty("TxContext");
    let ctx_ref = b.ty_ref(ctx_ty, true);
    let ctx_param = b.param("ctx", ctx_ref);

    // coin::split(c, 10, ctx)
    let split = b.module_path("coin", "split");
    let (c, amount, ctx) = (b.path("c"), b.literal("10"), b.path("ctx"));
    let split_call = b.call(split, &[c, amount, ctx]);
    // coin::value(c)
    let value = b.module_path("coin", "value");
    let c = b.path("c");
    let value_call = b.call(value, &[c]);
    let s1 = b.expr_stmt(split_call, true);
    let s2 = b.expr_stmt(value_call, true);
    let body = b.block(&[s1, s2]);
    let fun = b.function("take", &[t], &[coin_param, ctx_param], None, Some(body));
    b.module("0x5", "wallet", &[use_coin, use_coin_ty, use_ctx, fun]);
    host.set_file(b.finish());

    let t_var = Type::type_var(host.interner().intern("T"), AbilitySet::empty());
    let coin_of_t = Type::named(qualified(&host, "0x2", "coin", "Coin"), vec![t_var]);
    assert_eq!(host.infer_type(split_call), Some(coin_of_t.clone()));
    assert_eq!(host.infer_type(value_call), Some(Type::U64));

    assert!(host.has_ability(&coin_of_t, Ability::Key));
    assert!(host.has_ability(&coin_of_t, Ability::Store));
    assert!(!host.has_ability(&coin_of_t, Ability::Copy));
    let ctx = named(&host, "0x2", "tx_context", "TxContext");
    assert!(host.has_ability(&ctx, Ability::Drop));
}

#[test]
fn assignability_predicates() {
    let host = host(false);
    let point = named(&host, "0x5", "shapes", "Point");
    let mutable = Type::reference(point.clone(), true);
    let shared = Type::reference(point.clone(), false);

    assert!(host.is_assignable(&point, &point));
    assert!(host.is_assignable(&Type::Unknown, &point));
    assert!(host.is_assignable(&point, &Type::Unknown));
    assert!(host.is_assignable(&mutable, &shared));
    assert!(!host.is_assignable(&shared, &mutable));
    assert!(!host.is_assignable(&Type::U8, &Type::U64));
}

#[test]
fn call_site_bounds() {
    let host = host(false);
    let file = host.alloc_file();
    let mut b = host.builder(file);
    let id_ty = b.ty("u64");
    let ticket = b.struct_decl("Ticket", &[], &["key"], &[("id", id_ty)]);
    let ticket_ty = b.ty("Ticket");
    let param = b.param("t", ticket_ty);
    let callee = b.module_path("transfer", "public_transfer");
    let (t, to) = (b.path("t"), b.literal("@0xa"));
    let call = b.call(callee, &[t, to]);
    let stmt = b.expr_stmt(call, true);
    let body = b.block(&[stmt]);
    let fun = b.function("give", &[], &[param], None, Some(body));
    b.module("0x5", "tickets", &[ticket, fun]);
    host.set_file(b.finish());

    let violations = host.check_call_constraints(call);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].missing, AbilitySet::STORE);
    assert_eq!(violations[0].ty, named(&host, "0x5", "tickets", "Ticket"));
    assert!(!host.check_ability_constraints(
        &violations[0].ty,
        AbilitySet::KEY | AbilitySet::STORE
    ));
}
