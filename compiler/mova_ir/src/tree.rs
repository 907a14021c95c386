//! Per-file syntax tree arena and its builder.

use crate::ast::{BinaryOp, ItemPath, Node, NodeKind, UnaryOp};
use crate::{FileId, Name, NodeId, NodeRange, Span, StringInterner};

/// The syntax tree of one file.
///
/// Nodes live in a flat arena indexed by [`NodeId::index`]; list children live
/// in `child_lists` and are addressed by [`NodeRange`]. Parent links are
/// computed once when the tree is built.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    file: FileId,
    revision: u64,
    nodes: Vec<Node>,
    child_lists: Vec<NodeId>,
    roots: Vec<NodeId>,
}

impl SyntaxTree {
    #[inline]
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Modification stamp assigned by the source set when the tree was installed.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    /// Whether `id` names a node of this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.file() == self.file && id.index() < self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id.file() != self.file {
            return None;
        }
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// The nodes of a child list. Out-of-range lists read as empty.
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        self.child_lists.get(range.indices()).unwrap_or(&[])
    }

    /// Parentless nodes (normally the file's modules), in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Module declarations at the top level of this file.
    pub fn modules(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|id| matches!(self.kind(*id), Some(NodeKind::Module { .. })))
    }

    /// `(address, module, item)` for every named item of every module, sorted.
    ///
    /// Two revisions of a file with equal item names resolve qualified paths
    /// from other files to the same declarations.
    pub fn item_names(&self) -> Vec<(Name, Name, Name)> {
        let mut names: Vec<(Name, Name, Name)> = self
            .modules()
            .filter_map(|module| match self.kind(module) {
                Some(NodeKind::Module {
                    address,
                    name,
                    items,
                }) => Some((address, name, items)),
                _ => None,
            })
            .flat_map(|(address, module, items)| {
                self.list(items)
                    .iter()
                    .filter_map(move |item| Some((address, module, self.kind(*item)?.declared_name()?)))
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node IDs in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let file = self.file;
        (0..self.nodes.len()).filter_map(move |idx| u32::try_from(idx).ok().map(|i| NodeId::new(file, i)))
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// The innermost module containing `id` (or `id` itself when it is a module).
    pub fn enclosing_module(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| matches!(self.kind(*n), Some(NodeKind::Module { .. })))
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(kind) = self.kind(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        self.collect_children(&kind, &mut out);
        out
    }

    fn collect_children(&self, kind: &NodeKind, out: &mut Vec<NodeId>) {
        let one = |id: Option<NodeId>, out: &mut Vec<NodeId>| out.extend(id);
        match *kind {
            NodeKind::Module { items, .. } => out.extend_from_slice(self.list(items)),
            NodeKind::Function {
                type_params,
                params,
                ret,
                body,
                ..
            } => {
                out.extend_from_slice(self.list(type_params));
                out.extend_from_slice(self.list(params));
                one(ret, out);
                one(body, out);
            }
            NodeKind::Param { ty, .. } => one(ty, out),
            NodeKind::TypeParam { constraints, .. } => {
                out.extend_from_slice(self.list(constraints));
            }
            NodeKind::Struct {
                type_params,
                abilities,
                fields,
                ..
            } => {
                out.extend_from_slice(self.list(type_params));
                out.extend_from_slice(self.list(abilities));
                out.extend_from_slice(self.list(fields));
            }
            NodeKind::FieldDecl { ty, .. } => out.push(ty),
            NodeKind::Const { ty, value, .. } => {
                one(ty, out);
                one(value, out);
            }
            NodeKind::Let { pattern, ty, init } => {
                out.push(pattern);
                one(ty, out);
                one(init, out);
            }
            NodeKind::BindTuple { elems }
            | NodeKind::Tuple { elems }
            | NodeKind::TypeTuple { elems } => out.extend_from_slice(self.list(elems)),
            NodeKind::ExprStmt { expr, .. } => out.push(expr),
            NodeKind::Path { type_args, .. } => out.extend_from_slice(self.list(type_args)),
            NodeKind::Call { callee, args } => {
                out.push(callee);
                out.extend_from_slice(self.list(args));
            }
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(lhs);
                out.push(rhs);
            }
            NodeKind::Unary { operand, .. } => out.push(operand),
            NodeKind::Pack { path, fields } => {
                out.push(path);
                out.extend_from_slice(self.list(fields));
            }
            NodeKind::FieldInit { value, .. } => out.push(value),
            NodeKind::Vector { elem_ty, elems } => {
                one(elem_ty, out);
                out.extend_from_slice(self.list(elems));
            }
            NodeKind::Block { stmts } => out.extend_from_slice(self.list(stmts)),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(cond);
                out.push(then_branch);
                one(else_branch, out);
            }
            NodeKind::While { cond, body } => {
                out.push(cond);
                out.push(body);
            }
            NodeKind::Loop { body } => out.push(body),
            NodeKind::Return { value } => one(value, out),
            NodeKind::Abort { code } => out.push(code),
            NodeKind::Assign { target, value } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::Cast { expr, ty } => {
                out.push(expr);
                out.push(ty);
            }
            NodeKind::FieldAccess { base, .. } => out.push(base),
            NodeKind::Index { base, index } => {
                out.push(base);
                out.push(index);
            }
            NodeKind::TypePath { args, .. } => out.extend_from_slice(self.list(args)),
            NodeKind::TypeRef { inner, .. } => out.push(inner),
            NodeKind::Use { .. }
            | NodeKind::Ability { .. }
            | NodeKind::BindName { .. }
            | NodeKind::Literal { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Error => {}
        }
    }
}

/// Builds a [`SyntaxTree`] bottom-up: children are allocated before the
/// node that refers to them.
///
/// This is the surface the external parser targets; the convenience
/// constructors below also make hand-built trees in tests readable.
pub struct TreeBuilder<'i> {
    file: FileId,
    interner: &'i StringInterner,
    nodes: Vec<Node>,
    child_lists: Vec<NodeId>,
}

impl<'i> TreeBuilder<'i> {
    pub fn new(file: FileId, interner: &'i StringInterner) -> Self {
        Self {
            file,
            interner,
            nodes: Vec::new(),
            child_lists: Vec::new(),
        }
    }

    #[inline]
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Intern a name.
    #[inline]
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Allocate a node with a dummy span.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.alloc_at(kind, Span::DUMMY)
    }

    /// Allocate a node at a source location.
    pub fn alloc_at(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let local = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        NodeId::new(self.file, local)
    }

    /// Store a child list. Lists longer than `u16::MAX` are truncated.
    pub fn list(&mut self, ids: &[NodeId]) -> NodeRange {
        let start = u32::try_from(self.child_lists.len()).unwrap_or(u32::MAX);
        let len = u16::try_from(ids.len()).unwrap_or(u16::MAX);
        if usize::from(len) < ids.len() {
            tracing::warn!(len = ids.len(), "child list truncated");
        }
        self.child_lists.extend_from_slice(&ids[..usize::from(len)]);
        NodeRange::new(start, len)
    }

    /// Finish the tree: link parents and collect roots.
    pub fn finish(self) -> SyntaxTree {
        let mut tree = SyntaxTree {
            file: self.file,
            revision: 0,
            nodes: self.nodes,
            child_lists: self.child_lists,
            roots: Vec::new(),
        };

        let ids: Vec<NodeId> = tree.node_ids().collect();
        for id in &ids {
            for child in tree.children(*id) {
                if let Some(node) = tree.nodes.get_mut(child.index()) {
                    node.parent = Some(*id);
                }
            }
        }
        tree.roots = ids
            .into_iter()
            .filter(|id| tree.parent(*id).is_none())
            .collect();
        tree
    }

    // === Items ===

    pub fn module(&mut self, address: &str, name: &str, items: &[NodeId]) -> NodeId {
        let address = self.name(address);
        let name = self.name(name);
        let items = self.list(items);
        self.alloc(NodeKind::Module {
            address,
            name,
            items,
        })
    }

    /// `use address::module::member as alias;` (`member`/`alias` optional).
    pub fn use_decl(
        &mut self,
        address: &str,
        module: &str,
        member: Option<&str>,
        alias: Option<&str>,
    ) -> NodeId {
        let kind = NodeKind::Use {
            address: self.name(address),
            module: self.name(module),
            member: member.map(|m| self.name(m)),
            alias: alias.map(|a| self.name(a)),
        };
        self.alloc(kind)
    }

    pub fn function(
        &mut self,
        name: &str,
        type_params: &[NodeId],
        params: &[NodeId],
        ret: Option<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = self.name(name);
        let type_params = self.list(type_params);
        let params = self.list(params);
        self.alloc(NodeKind::Function {
            name,
            type_params,
            params,
            ret,
            body,
        })
    }

    pub fn param(&mut self, name: &str, ty: NodeId) -> NodeId {
        let name = self.name(name);
        self.alloc(NodeKind::Param { name, ty: Some(ty) })
    }

    pub fn type_param(&mut self, name: &str, constraints: &[&str], phantom: bool) -> NodeId {
        let name = self.name(name);
        let constraints = self.abilities(constraints);
        self.alloc(NodeKind::TypeParam {
            name,
            constraints,
            phantom,
        })
    }

    pub fn struct_decl(
        &mut self,
        name: &str,
        type_params: &[NodeId],
        abilities: &[&str],
        fields: &[(&str, NodeId)],
    ) -> NodeId {
        let name = self.name(name);
        let type_params = self.list(type_params);
        let abilities = self.abilities(abilities);
        let field_ids: Vec<NodeId> = fields
            .iter()
            .map(|(field, ty)| {
                let field = self.name(field);
                self.alloc(NodeKind::FieldDecl {
                    name: field,
                    ty: *ty,
                })
            })
            .collect();
        let fields = self.list(&field_ids);
        self.alloc(NodeKind::Struct {
            name,
            type_params,
            abilities,
            fields,
            is_enum: false,
        })
    }

    pub fn const_decl(&mut self, name: &str, ty: Option<NodeId>, value: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.alloc(NodeKind::Const { name, ty, value })
    }

    fn abilities(&mut self, names: &[&str]) -> NodeRange {
        let ids: Vec<NodeId> = names
            .iter()
            .map(|ability| {
                let name = self.name(ability);
                self.alloc(NodeKind::Ability { name })
            })
            .collect();
        self.list(&ids)
    }

    // === Statements ===

    /// `let name: ty = init;` Returns the `Let` node; the binding is its pattern.
    pub fn let_stmt(&mut self, name: &str, ty: Option<NodeId>, init: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        let pattern = self.alloc(NodeKind::BindName { name });
        self.alloc(NodeKind::Let { pattern, ty, init })
    }

    /// `let (a, b, ..) = init;`
    pub fn let_tuple(&mut self, names: &[&str], ty: Option<NodeId>, init: Option<NodeId>) -> NodeId {
        let binds: Vec<NodeId> = names
            .iter()
            .map(|n| {
                let name = self.name(n);
                self.alloc(NodeKind::BindName { name })
            })
            .collect();
        let elems = self.list(&binds);
        let pattern = self.alloc(NodeKind::BindTuple { elems });
        self.alloc(NodeKind::Let { pattern, ty, init })
    }

    pub fn expr_stmt(&mut self, expr: NodeId, terminated: bool) -> NodeId {
        self.alloc(NodeKind::ExprStmt { expr, terminated })
    }

    // === Expressions ===

    pub fn literal(&mut self, text: &str) -> NodeId {
        let text = self.name(text);
        self.alloc(NodeKind::Literal { text })
    }

    /// An unqualified name reference.
    pub fn path(&mut self, name: &str) -> NodeId {
        let path = ItemPath::simple(self.name(name));
        self.path_node(path, &[])
    }

    /// A `module::name` reference.
    pub fn module_path(&mut self, module: &str, name: &str) -> NodeId {
        let path = ItemPath::in_module(self.name(module), self.name(name));
        self.path_node(path, &[])
    }

    pub fn path_node(&mut self, path: ItemPath, type_args: &[NodeId]) -> NodeId {
        let type_args = self.list(type_args);
        self.alloc(NodeKind::Path { path, type_args })
    }

    pub fn call(&mut self, callee: NodeId, args: &[NodeId]) -> NodeId {
        let args = self.list(args);
        self.alloc(NodeKind::Call { callee, args })
    }

    /// `name(args)` with an unqualified callee.
    pub fn call_named(&mut self, name: &str, args: &[NodeId]) -> NodeId {
        let callee = self.path(name);
        self.call(callee, args)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(NodeKind::Binary { op, lhs, rhs })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.alloc(NodeKind::Unary { op, operand })
    }

    /// `Name { field: value, .. }`
    pub fn pack(&mut self, name: &str, fields: &[(&str, NodeId)]) -> NodeId {
        let path = self.path(name);
        let inits: Vec<NodeId> = fields
            .iter()
            .map(|(field, value)| {
                let name = self.name(field);
                self.alloc(NodeKind::FieldInit {
                    name,
                    value: *value,
                })
            })
            .collect();
        let fields = self.list(&inits);
        self.alloc(NodeKind::Pack { path, fields })
    }

    pub fn vector(&mut self, elem_ty: Option<NodeId>, elems: &[NodeId]) -> NodeId {
        let elems = self.list(elems);
        self.alloc(NodeKind::Vector { elem_ty, elems })
    }

    pub fn tuple(&mut self, elems: &[NodeId]) -> NodeId {
        let elems = self.list(elems);
        self.alloc(NodeKind::Tuple { elems })
    }

    pub fn block(&mut self, stmts: &[NodeId]) -> NodeId {
        let stmts = self.list(stmts);
        self.alloc(NodeKind::Block { stmts })
    }

    pub fn if_expr(&mut self, cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn field(&mut self, base: NodeId, field: &str) -> NodeId {
        let field = self.name(field);
        self.alloc(NodeKind::FieldAccess { base, field })
    }

    pub fn index(&mut self, base: NodeId, index: NodeId) -> NodeId {
        self.alloc(NodeKind::Index { base, index })
    }

    pub fn cast(&mut self, expr: NodeId, ty: NodeId) -> NodeId {
        self.alloc(NodeKind::Cast { expr, ty })
    }

    // === Type annotations ===

    /// A simple named type (`u64`, `T`, `Coin`).
    pub fn ty(&mut self, name: &str) -> NodeId {
        self.ty_generic(name, &[])
    }

    /// A named type with arguments (`vector<u8>`, `Coin<T>`).
    pub fn ty_generic(&mut self, name: &str, args: &[NodeId]) -> NodeId {
        let path = ItemPath::simple(self.name(name));
        self.ty_path(path, args)
    }

    pub fn ty_path(&mut self, path: ItemPath, args: &[NodeId]) -> NodeId {
        let args = self.list(args);
        self.alloc(NodeKind::TypePath { path, args })
    }

    pub fn ty_ref(&mut self, inner: NodeId, mutable: bool) -> NodeId {
        self.alloc(NodeKind::TypeRef { mutable, inner })
    }

    pub fn ty_tuple(&mut self, elems: &[NodeId]) -> NodeId {
        let elems = self.list(elems);
        self.alloc(NodeKind::TypeTuple { elems })
    }
}
