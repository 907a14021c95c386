use mova_ir::{BinaryOp, FileId, NodeId, SharedInterner, SyntaxTree, TreeBuilder, UnaryOp};
use mova_types::{Ability, AbilitySet, Type};
use pretty_assertions::assert_eq;

use crate::test_helpers::World;
use crate::{ConstraintViolation, EngineStats, InferConfig};

/// `fun add(a: u64, b: u64): u64 { a + b }` and a call `add(1, 2)`.
fn add_program(interner: &SharedInterner) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(FileId::new(0), interner);
    let (a_ty, b_ty, ret) = (b.ty("u64"), b.ty("u64"), b.ty("u64"));
    let a_param = b.param("a", a_ty);
    let b_param = b.param("b", b_ty);
    let (a, bb) = (b.path("a"), b.path("b"));
    let sum = b.binary(BinaryOp::Add, a, bb);
    let tail = b.expr_stmt(sum, false);
    let body = b.block(&[tail]);
    let add = b.function("add", &[], &[a_param, b_param], Some(ret), Some(body));
    let (one, two) = (b.literal("1"), b.literal("2"));
    let call = b.call_named("add", &[one, two]);
    let stmt = b.let_stmt("x", None, Some(call));
    let test_body = b.block(&[stmt]);
    let test = b.function("test", &[], &[], None, Some(test_body));
    b.module("0x5", "m", &[add, test]);
    (b.finish(), call)
}

#[test]
fn second_query_is_served_from_cache() {
    let interner = SharedInterner::new();
    let (tree, call) = add_program(&interner);
    let world = World::new(&interner, [tree]);

    let (first, first_stats) = world.with_engine(&InferConfig::default(), |engine| {
        (engine.infer_type(call), engine.stats())
    });
    let (second, second_stats) = world.with_engine(&InferConfig::default(), |engine| {
        (engine.infer_type(call), engine.stats())
    });

    assert_eq!(first, Some(Type::U64));
    assert_eq!(first, second);
    assert!(first_stats.computed > 0);
    assert_eq!(
        second_stats,
        EngineStats {
            queries: 1,
            ..EngineStats::default()
        }
    );
    assert_eq!(world.cache.get(call), Some(Type::U64));
}

#[test]
fn repeated_queries_in_one_engine_do_not_recompute() {
    let interner = SharedInterner::new();
    let (tree, call) = add_program(&interner);
    let world = World::new(&interner, [tree]);

    world.with_engine(&InferConfig::default(), |engine| {
        engine.infer_type(call);
        let computed = engine.stats().computed;
        assert_eq!(engine.infer_type(call), Some(Type::U64));
        assert_eq!(engine.stats().computed, computed);
    });
}

#[test]
fn invalidation_forces_recomputation() {
    let interner = SharedInterner::new();
    let (tree, call) = add_program(&interner);
    let world = World::new(&interner, [tree]);

    assert_eq!(world.infer(call), Some(Type::U64));
    world.cache.invalidate_file(FileId::new(0));
    assert_eq!(world.cache.get(call), None);

    let recomputed = world.with_engine(&InferConfig::default(), |engine| {
        (engine.infer_type(call), engine.stats().computed)
    });
    assert_eq!(recomputed.0, Some(Type::U64));
    assert!(recomputed.1 > 0);
}

/// File 0 declares `0x5::shapes::Point`; file 1 reads a field of one.
fn two_files(interner: &SharedInterner) -> (SyntaxTree, SyntaxTree, NodeId, NodeId) {
    let mut lib = TreeBuilder::new(FileId::new(0), interner);
    let x_ty = lib.ty("u64");
    let point = lib.struct_decl("Point", &[], &["copy", "drop"], &[("x", x_ty)]);
    lib.module("0x5", "shapes", &[point]);

    let mut app = TreeBuilder::new(FileId::new(1), interner);
    let import = app.use_decl("0x5", "shapes", Some("Point"), None);
    let point_ty = app.ty("Point");
    let param = app.param("p", point_ty);
    let p = app.path("p");
    let access = app.field(p, "x");
    let tail = app.expr_stmt(access, false);
    let local = app.literal("3u8");
    let other = app.expr_stmt(local, true);
    let body = app.block(&[other, tail]);
    let fun = app.function("read", &[], &[param], None, Some(body));
    app.module("0x5", "app", &[import, fun]);
    (lib.finish(), app.finish(), access, local)
}

#[test]
fn dependencies_cross_files() {
    let interner = SharedInterner::new();
    let (lib, app, access, local) = two_files(&interner);
    let world = World::new(&interner, [lib, app]);

    assert_eq!(world.infer(access), Some(Type::U64));
    assert_eq!(world.infer(local), Some(Type::U8));
    let entry = world.cache.get_entry(access);
    assert!(entry.is_some_and(|e| e.deps.contains(&FileId::new(0))));

    // Editing the declaring file drops the dependent entry only.
    world.cache.invalidate_file(FileId::new(0));
    assert_eq!(world.cache.get(access), None);
    assert_eq!(world.cache.get(local), Some(Type::U8));
}

#[test]
fn resolved_structs_are_indexed() {
    let interner = SharedInterner::new();
    let (lib, app, access, _) = two_files(&interner);
    let world = World::new(&interner, [lib, app]);
    let point = world.qualified("0x5", "shapes", "Point");

    assert!(world.cache.get_type_hierarchy(&point).is_none());
    world.infer(access);
    let info = world.cache.get_type_hierarchy(&point);
    assert_eq!(
        info.map(|i| i.abilities),
        Some(AbilitySet::COPY | AbilitySet::DROP)
    );
}

#[test]
fn foreign_nodes_have_no_type() {
    let interner = SharedInterner::new();
    let (tree, _) = add_program(&interner);
    let world = World::new(&interner, [tree]);

    assert_eq!(world.infer(NodeId::new(FileId::new(9), 0)), None);
    assert_eq!(world.infer(NodeId::new(FileId::new(0), 10_000)), None);
}

#[test]
fn cyclic_constants_cut_off() {
    let interner = SharedInterner::new();
    let mut b = TreeBuilder::new(FileId::new(0), &interner);
    let b_ref = b.path("B");
    let a = b.const_decl("A", None, Some(b_ref));
    let a_ref = b.path("A");
    let c = b.const_decl("B", None, Some(a_ref));
    b.module("0x5", "m", &[a, c]);
    let world = World::new(&interner, [b.finish()]);

    let (ty, stats) = world.with_engine(&InferConfig::default(), |engine| {
        (engine.infer_type(a), engine.stats())
    });
    assert_eq!(ty, Some(Type::Unknown));
    assert_eq!(stats.cycles, 1);
    // Indeterminate results stay out of the cache.
    assert_eq!(world.cache.get(a), None);
}

#[test]
fn depth_bound_yields_unknown() {
    let interner = SharedInterner::new();
    let mut b = TreeBuilder::new(FileId::new(0), &interner);
    let mut expr = b.literal("1u8");
    for _ in 0..6 {
        let rhs = b.literal("1u8");
        expr = b.binary(BinaryOp::Add, expr, rhs);
    }
    let world = World::new(&interner, [b.finish()]);

    let shallow = InferConfig { max_depth: 3 };
    let (ty, stats) = world.with_engine(&shallow, |engine| (engine.infer_type(expr), engine.stats()));
    assert_eq!(ty, Some(Type::Unknown));
    assert!(stats.depth_cutoffs > 0);

    assert_eq!(world.infer(expr), Some(Type::U8));
}

/// `callee(t, @0x1)`
fn send_call(b: &mut TreeBuilder<'_>, module: Option<&str>, name: &str) -> NodeId {
    let callee = match module {
        Some(module) => b.module_path(module, name),
        None => b.path(name),
    };
    let arg = b.path("t");
    let recipient = b.literal("@0x1");
    b.call(callee, &[arg, recipient])
}

/// `struct Ticket has key`, moved with `transfer::public_transfer` and
/// `transfer::transfer`, and passed to a local `fun keep<T: copy>(x: T, to: address)`.
fn ticket_program(interner: &SharedInterner) -> (SyntaxTree, [NodeId; 4]) {
    let mut b = TreeBuilder::new(FileId::new(0), interner);
    let id_ty = b.ty("u64");
    let ticket = b.struct_decl("Ticket", &[], &["key"], &[("id", id_ty)]);
    let t = b.type_param("T", &["copy"], false);
    let t_ty = b.ty("T");
    let to_ty = b.ty("address");
    let x = b.param("x", t_ty);
    let to = b.param("to", to_ty);
    let keep = b.function("keep", &[t], &[x, to], None, None);

    let ticket_ty = b.ty("Ticket");
    let param = b.param("t", ticket_ty);
    let public = send_call(&mut b, Some("transfer"), "public_transfer");
    let private = send_call(&mut b, Some("transfer"), "transfer");
    let local = send_call(&mut b, None, "keep");
    let one = b.literal("1");
    let not_a_call = b.unary(UnaryOp::Neg, one);
    let stmts: Vec<NodeId> = [public, private, local, not_a_call]
        .iter()
        .map(|e| b.expr_stmt(*e, true))
        .collect();
    let body = b.block(&stmts);
    let send = b.function("send", &[], &[param], None, Some(body));
    b.module("0x5", "m", &[ticket, keep, send]);
    (b.finish(), [public, private, local, not_a_call])
}

#[test]
fn call_constraints_report_missing_abilities() {
    let interner = SharedInterner::new();
    let (tree, [public, private, local, not_a_call]) = ticket_program(&interner);
    let world = World::new(&interner, [tree]);
    let ticket = Type::named(world.qualified("0x5", "m", "Ticket"), vec![]);
    let t = world.interner.intern("T");

    world.with_engine(&InferConfig::default(), |engine| {
        assert_eq!(
            engine.check_call_constraints(public),
            vec![ConstraintViolation {
                call: public,
                param: t,
                ty: ticket.clone(),
                required: AbilitySet::KEY | AbilitySet::STORE,
                missing: AbilitySet::STORE,
            }]
        );
        assert_eq!(engine.check_call_constraints(private), vec![]);
        assert_eq!(
            engine.check_call_constraints(local),
            vec![ConstraintViolation {
                call: local,
                param: t,
                ty: ticket.clone(),
                required: AbilitySet::COPY,
                missing: AbilitySet::COPY,
            }]
        );
        assert_eq!(engine.check_call_constraints(not_a_call), vec![]);
    });
}

#[test]
fn ability_predicates_chain_local_and_framework() {
    let interner = SharedInterner::new();
    let (tree, _) = ticket_program(&interner);
    let world = World::new(&interner, [tree]);
    let ticket = Type::named(world.qualified("0x5", "m", "Ticket"), vec![]);
    let sui = Type::named(world.qualified("0x2", "sui", "SUI"), vec![]);
    let coin = Type::named(world.qualified("0x2", "coin", "Coin"), vec![sui]);

    world.with_engine(&InferConfig::default(), |engine| {
        assert!(engine.has_ability(&ticket, Ability::Key));
        assert!(!engine.has_ability(&ticket, Ability::Store));
        assert!(engine.check_ability_constraints(&coin, AbilitySet::KEY | AbilitySet::STORE));
        assert!(!engine.check_ability_constraints(&coin, AbilitySet::COPY));
        assert_eq!(
            engine.abilities_of(&Type::tuple(vec![Type::U8, ticket.clone()])),
            AbilitySet::empty()
        );
        assert!(engine.is_assignable(&Type::reference(ticket.clone(), true), &Type::reference(ticket, false)));
    });
}
