//! Edits, invalidation, batches and statistics.

use mova_ir::{FileId, ItemPath, NodeId, SyntaxTree};
use mova_types::{Ability, Type};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{app, host, named, qualified, shapes, App};

/// `shapes` in one file and `app` in another, both installed.
fn two_files(parallel: bool) -> (mova_analysis::AnalysisHost, FileId, App) {
    let host = host(parallel);
    let (lib, user) = (host.alloc_file(), host.alloc_file());
    host.set_file(shapes(&host, lib, "u64"));
    let app = app(&host, user);
    host.set_file(app.tree.clone());
    (host, lib, app)
}

#[test]
fn repeated_queries_hit_the_cache() {
    let (host, _, app) = two_files(false);
    assert_eq!(host.infer_type(app.sum), Some(Type::U64));
    let before = host.stats();
    assert_eq!(host.infer_type(app.sum), Some(Type::U64));
    let after = host.stats();

    assert_eq!(after.cache.hits, before.cache.hits + 1);
    assert_eq!(after.engine.computed, before.engine.computed);
    assert_eq!(after.cache.entries, before.cache.entries);
}

#[test]
fn editing_a_declaration_updates_its_readers() {
    let (host, lib, app) = two_files(false);
    assert_eq!(host.infer_type(app.access), Some(Type::U64));
    assert_eq!(host.infer_type(app.local), Some(Type::U16));
    let local_before = host.cache().get_entry(app.local);
    assert!(local_before.is_some());

    host.set_file(shapes(&host, lib, "u8"));

    // Readers of the edited file are recomputed, independent nodes survive.
    assert_eq!(host.cache().get(app.access), None);
    assert_eq!(host.cache().get_entry(app.local), local_before);
    assert_eq!(host.infer_type(app.access), Some(Type::U8));
    assert_eq!(host.infer_type(app.sum), Some(Type::U8));
}

/// `module 0x1::vector { }`, optionally declaring
/// `fun length(v: &vector<u64>): bool;`.
fn local_vector(host: &mova_analysis::AnalysisHost, file: FileId, with_length: bool) -> SyntaxTree {
    let mut b = host.builder(file);
    let mut items = Vec::new();
    if with_length {
        let elem = b.ty("u64");
        let vec_ty = b.ty_generic("vector", &[elem]);
        let vec_ref = b.ty_ref(vec_ty, false);
        let param = b.param("v", vec_ref);
        let ret = b.ty("bool");
        items.push(b.function("length", &[], &[param], Some(ret), None));
    }
    b.module("0x1", "vector", &items);
    b.finish()
}

#[test]
fn declaring_a_member_shadows_the_framework_after_an_edit() {
    let host = host(false);
    let (lib, user) = (host.alloc_file(), host.alloc_file());
    host.set_file(local_vector(&host, lib, false));

    // module 0x5::app { fun count(v: &vector<u64>): u64 { 0x1::vector::length(v) } }
    let mut b = host.builder(user);
    let elem = b.ty("u64");
    let vec_ty = b.ty_generic("vector", &[elem]);
    let vec_ref = b.ty_ref(vec_ty, false);
    let param = b.param("v", vec_ref);
    let path = ItemPath::qualified(b.name("0x1"), b.name("vector"), b.name("length"));
    let callee = b.path_node(path, &[]);
    let v = b.path("v");
    let call = b.call(callee, &[v]);
    let tail = b.expr_stmt(call, false);
    let body = b.block(&[tail]);
    let fun = b.function("count", &[], &[param], None, Some(body));
    b.module("0x5", "app", &[fun]);
    host.set_file(b.finish());

    assert_eq!(host.infer_type(call), Some(Type::U64));
    assert_eq!(host.cache().get(call), Some(Type::U64));

    host.set_file(local_vector(&host, lib, true));

    assert_eq!(host.cache().get(call), None);
    assert_eq!(host.infer_type(call), Some(Type::BOOL));
    host.reload();
    assert_eq!(host.infer_type(call), Some(Type::BOOL));
}

#[test]
fn body_edits_keep_results_of_other_files() {
    let (host, lib, app) = two_files(false);
    assert_eq!(host.infer_type(app.local), Some(Type::U16));
    let generation = host.cache().generation();

    // Same item names, different field type.
    host.set_file(shapes(&host, lib, "u128"));

    assert!(host.cache().generation() > generation);
    assert_eq!(host.cache().get(app.local), Some(Type::U16));
    assert_eq!(host.infer_type(app.access), Some(Type::U128));
}

#[test]
fn removing_a_file_unresolves_its_names() {
    let (host, lib, app) = two_files(false);
    let point = qualified(&host, "0x5", "shapes", "Point");
    assert_eq!(host.infer_type(app.access), Some(Type::U64));
    assert!(host.cache().get_type_hierarchy(&point).is_some());

    assert!(host.remove_file(lib));
    assert!(!host.remove_file(lib));

    assert!(host.cache().get_type_hierarchy(&point).is_none());
    assert_eq!(host.infer_type(app.access), Some(Type::Unknown));
    assert_eq!(host.files().len(), 1);
}

#[test]
fn adding_a_file_resolves_pending_names() {
    let host = host(false);
    let (user, lib) = (host.alloc_file(), host.alloc_file());
    let app = app(&host, user);
    host.set_file(app.tree);
    assert_eq!(host.infer_type(app.access), Some(Type::Unknown));
    assert_eq!(host.infer_type(app.local), Some(Type::U16));

    host.set_file(shapes(&host, lib, "u32"));

    assert_eq!(host.infer_type(app.access), Some(Type::U32));
    let point = named(&host, "0x5", "shapes", "Point");
    assert!(host.has_ability(&point, Ability::Copy));
    assert!(!host.has_ability(&point, Ability::Key));
}

#[test]
fn reload_drops_every_result() {
    let (host, _, app) = two_files(false);
    assert_eq!(host.infer_type(app.sum), Some(Type::U64));
    let generation = host.cache().generation();

    host.reload();

    assert!(host.cache().generation() > generation);
    assert_eq!(host.cache().get(app.sum), None);
    // The hierarchy index is rebuilt from the live trees.
    assert!(host
        .cache()
        .get_type_hierarchy(&qualified(&host, "0x5", "shapes", "Point"))
        .is_some());
    assert_eq!(host.infer_type(app.sum), Some(Type::U64));
}

#[test]
fn whole_file_inference() {
    let (host, lib, app) = two_files(false);
    let types = host.infer_file(app.access.file());

    let lookup = |node: NodeId| {
        types
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, ty)| ty.clone())
    };
    assert_eq!(lookup(app.local), Some(Type::U16));
    assert_eq!(lookup(app.sum), Some(Type::U64));
    assert_eq!(lookup(app.access), Some(Type::U64));
    assert!(types.windows(2).all(|pair| pair[0].0 < pair[1].0));

    // A file with only declarations has no expressions.
    assert!(host.infer_file(lib).is_empty());
}

#[test]
fn batch_keeps_request_order_across_files() {
    let (host, lib, app) = two_files(true);
    let mut b = host.builder(host.alloc_file());
    let flag = b.literal("true");
    let other = b.finish();
    host.set_file(other);

    let foreign = NodeId::new(lib, 10_000);
    let types = host.infer_batch(&[app.sum, flag, foreign, app.local, app.access]);
    assert_eq!(
        types,
        vec![
            Some(Type::U64),
            Some(Type::BOOL),
            None,
            Some(Type::U16),
            Some(Type::U64),
        ]
    );
    assert!(host.stats().engine.queries >= 5);
}

#[test]
fn stats_render_for_logs() {
    let (host, _, app) = two_files(false);
    host.infer_type(app.local);
    host.infer_type(app.local);
    let stats = host.stats();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.engine.cycles, 0);
    let line = stats.to_string();
    assert!(line.starts_with("2 files, "), "{line}");
    assert!(line.contains("1 hits"), "{line}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_batches_match_sequential(picks in prop::collection::vec(0usize..3, 0..12)) {
        let (sequential, _, seq_app) = two_files(false);
        let (parallel, _, par_app) = two_files(true);
        let seq_nodes = [seq_app.local, seq_app.sum, seq_app.access];
        let par_nodes = [par_app.local, par_app.sum, par_app.access];

        let seq: Vec<NodeId> = picks.iter().map(|i| seq_nodes[*i]).collect();
        let par: Vec<NodeId> = picks.iter().map(|i| par_nodes[*i]).collect();
        prop_assert_eq!(sequential.infer_batch(&seq), parallel.infer_batch(&par));
    }
}
