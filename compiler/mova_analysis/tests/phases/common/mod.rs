//! Shared program builders for phase tests.

use mova_analysis::{init_tracing, AnalysisConfig, AnalysisHost};
use mova_ir::{BinaryOp, FileId, NodeId, SyntaxTree};
use mova_types::{QualifiedName, Type};

/// A session with default settings. `parallel` selects batch execution.
pub fn host(parallel: bool) -> AnalysisHost {
    init_tracing();
    AnalysisHost::new(AnalysisConfig {
        parallel,
        ..AnalysisConfig::default()
    })
}

/// A qualified name as the engine spells it.
pub fn qualified(host: &AnalysisHost, address: &str, module: &str, name: &str) -> QualifiedName {
    let interner = host.interner();
    let address = host
        .framework()
        .aliases()
        .normalize(interner.intern(address), interner);
    QualifiedName::new(address, interner.intern(module), interner.intern(name))
}

pub fn named(host: &AnalysisHost, address: &str, module: &str, name: &str) -> Type {
    Type::named(qualified(host, address, module, name), vec![])
}

/// `module 0x5::shapes { struct Point has copy, drop { x: <x_ty> } }`
pub fn shapes(host: &AnalysisHost, file: FileId, x_ty: &str) -> SyntaxTree {
    let mut b = host.builder(file);
    let x = b.ty(x_ty);
    let point = b.struct_decl("Point", &[], &["copy", "drop"], &[("x", x)]);
    b.module("0x5", "shapes", &[point]);
    b.finish()
}

/// Reads of `0x5::shapes::Point` from another module.
pub struct App {
    pub tree: SyntaxTree,
    /// `p.x` with `p: &Point`
    pub access: NodeId,
    /// `p.x + 1`
    pub sum: NodeId,
    /// `7u16`, independent of other files
    pub local: NodeId,
}

/// ```text
/// module 0x5::app {
///     use 0x5::shapes::Point;
///     fun read(p: &Point) { 7u16; p.x + 1; p.x }
/// }
/// ```
pub fn app(host: &AnalysisHost, file: FileId) -> App {
    let mut b = host.builder(file);
    let import = b.use_decl("0x5", "shapes", Some("Point"), None);
    let point = b.ty("Point");
    let point_ref = b.ty_ref(point, false);
    let param = b.param("p", point_ref);
    let local = b.literal("7u16");
    let p = b.path("p");
    let x = b.field(p, "x");
    let one = b.literal("1");
    let sum = b.binary(BinaryOp::Add, x, one);
    let p = b.path("p");
    let access = b.field(p, "x");
    let s1 = b.expr_stmt(local, true);
    let s2 = b.expr_stmt(sum, true);
    let tail = b.expr_stmt(access, false);
    let body = b.block(&[s1, s2, tail]);
    let fun = b.function("read", &[], &[param], None, Some(body));
    b.module("0x5", "app", &[import, fun]);
    App {
        tree: b.finish(),
        access,
        sum,
        local,
    }
}
