//! Syntax node kinds.
//!
//! The tree is flat: every node lives in its file's arena and refers to its
//! children by [`NodeId`] or, for lists, by [`NodeRange`] into the tree's
//! flattened child list. `NodeKind` is `Copy`, so reading a node never
//! allocates.
//!
//! The parser is an external collaborator; it produces these nodes through
//! [`TreeBuilder`](crate::TreeBuilder). Nodes carry syntax only: ability
//! keywords are kept as [`NodeKind::Ability`] nodes and literal text is kept
//! verbatim, leaving interpretation to the type engine.

mod operators;

pub use operators::{BinaryOp, OpCategory, UnaryOp};

use crate::{Name, NodeId, NodeRange, Span};

/// A possibly-qualified path as written in source.
///
/// `Coin`, `coin::Coin`, `0x2::coin::Coin` and `sui::coin::Coin` are all
/// paths; `address` and `module` are absent when not written.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ItemPath {
    pub address: Option<Name>,
    pub module: Option<Name>,
    pub name: Name,
}

impl ItemPath {
    /// An unqualified path.
    pub const fn simple(name: Name) -> Self {
        ItemPath {
            address: None,
            module: None,
            name,
        }
    }

    /// A `module::name` path.
    pub const fn in_module(module: Name, name: Name) -> Self {
        ItemPath {
            address: None,
            module: Some(module),
            name,
        }
    }

    /// A fully qualified `address::module::name` path.
    pub const fn qualified(address: Name, module: Name, name: Name) -> Self {
        ItemPath {
            address: Some(address),
            module: Some(module),
            name,
        }
    }

    #[inline]
    pub const fn is_simple(&self) -> bool {
        self.address.is_none() && self.module.is_none()
    }
}

/// A syntax node: kind, source location and parent link.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Syntactic kind of a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // === Items ===
    /// `module address::name { items }`
    Module {
        address: Name,
        name: Name,
        items: NodeRange,
    },
    /// `use address::module;`, `use address::module::member as alias;`
    Use {
        address: Name,
        module: Name,
        member: Option<Name>,
        alias: Option<Name>,
    },
    /// `fun name<type_params>(params): ret { body }`
    Function {
        name: Name,
        type_params: NodeRange,
        params: NodeRange,
        ret: Option<NodeId>,
        body: Option<NodeId>,
    },
    /// `name: ty`
    Param { name: Name, ty: Option<NodeId> },
    /// `T: copy + drop`, optionally `phantom T`
    TypeParam {
        name: Name,
        constraints: NodeRange,
        phantom: bool,
    },
    /// `struct Name<type_params> has abilities { fields }`
    Struct {
        name: Name,
        type_params: NodeRange,
        abilities: NodeRange,
        fields: NodeRange,
        is_enum: bool,
    },
    /// `name: ty` inside a struct.
    FieldDecl { name: Name, ty: NodeId },
    /// `const NAME: ty = value;`
    Const {
        name: Name,
        ty: Option<NodeId>,
        value: Option<NodeId>,
    },
    /// An ability keyword (`copy`, `drop`, `store`, `key`) as written.
    Ability { name: Name },

    // === Statements and patterns ===
    /// `let pattern: ty = init;`
    Let {
        pattern: NodeId,
        ty: Option<NodeId>,
        init: Option<NodeId>,
    },
    /// A single binding in a pattern.
    BindName { name: Name },
    /// `(a, b)` pattern.
    BindTuple { elems: NodeRange },
    /// An expression used as a statement. `terminated` is true when a `;` follows.
    ExprStmt { expr: NodeId, terminated: bool },

    // === Expressions ===
    /// Literal with its source text (`42u8`, `true`, `@0x1`, `b"hi"`).
    Literal { text: Name },
    /// Name reference, with explicit type arguments (`f<u64>`).
    Path { path: ItemPath, type_args: NodeRange },
    /// `callee(args)`; the callee is a `Path`.
    Call { callee: NodeId, args: NodeRange },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary { op: UnaryOp, operand: NodeId },
    /// Struct literal `S { f: e }`; `path` is a `Path` node.
    Pack { path: NodeId, fields: NodeRange },
    /// `name: value` inside a struct literal.
    FieldInit { name: Name, value: NodeId },
    /// `vector[e, ..]` or `vector<T>[e, ..]`.
    Vector {
        elem_ty: Option<NodeId>,
        elems: NodeRange,
    },
    /// `(a, b)`; `()` is the unit value.
    Tuple { elems: NodeRange },
    /// `{ stmts }`
    Block { stmts: NodeRange },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While { cond: NodeId, body: NodeId },
    Loop { body: NodeId },
    Return { value: Option<NodeId> },
    Abort { code: NodeId },
    Break,
    Continue,
    /// `target = value`
    Assign { target: NodeId, value: NodeId },
    /// `(expr as ty)`
    Cast { expr: NodeId, ty: NodeId },
    /// `base.field`
    FieldAccess { base: NodeId, field: Name },
    /// `base[index]`
    Index { base: NodeId, index: NodeId },

    // === Type annotations ===
    /// `u64`, `vector<T>`, `coin::Coin<SUI>`, `T`
    TypePath { path: ItemPath, args: NodeRange },
    /// `&T`, `&mut T`
    TypeRef { mutable: bool, inner: NodeId },
    /// `(A, B)`
    TypeTuple { elems: NodeRange },

    /// Placeholder produced by parser error recovery.
    Error,
}

impl NodeKind {
    /// Whether this node is an expression (as opposed to an item, statement,
    /// pattern or type annotation).
    pub const fn is_expr(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal { .. }
                | NodeKind::Path { .. }
                | NodeKind::Call { .. }
                | NodeKind::Binary { .. }
                | NodeKind::Unary { .. }
                | NodeKind::Pack { .. }
                | NodeKind::Vector { .. }
                | NodeKind::Tuple { .. }
                | NodeKind::Block { .. }
                | NodeKind::If { .. }
                | NodeKind::While { .. }
                | NodeKind::Loop { .. }
                | NodeKind::Return { .. }
                | NodeKind::Abort { .. }
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Assign { .. }
                | NodeKind::Cast { .. }
                | NodeKind::FieldAccess { .. }
                | NodeKind::Index { .. }
        )
    }

    /// Whether this node is a type annotation.
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::TypePath { .. } | NodeKind::TypeRef { .. } | NodeKind::TypeTuple { .. }
        )
    }

    /// Expressions that never produce a value.
    pub const fn is_diverging(&self) -> bool {
        matches!(
            self,
            NodeKind::Return { .. } | NodeKind::Abort { .. } | NodeKind::Break | NodeKind::Continue
        )
    }

    /// Name introduced by a declaration node, if any.
    pub const fn declared_name(&self) -> Option<Name> {
        match self {
            NodeKind::Module { name, .. }
            | NodeKind::Function { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::TypeParam { name, .. }
            | NodeKind::Struct { name, .. }
            | NodeKind::FieldDecl { name, .. }
            | NodeKind::Const { name, .. }
            | NodeKind::BindName { name } => Some(*name),
            _ => None,
        }
    }
}
