//! Name resolution.
//!
//! The type engine asks one question of the resolver: which declaration does
//! this reference node denote? [`SymbolResolver`] is that seam; the editor
//! integration may supply its own, and [`ScopeResolver`] is the lexical
//! resolver over a [`SourceSnapshot`] used everywhere else.
//!
//! References that leave the live source set (framework modules) do not
//! resolve to a node, but [`SymbolResolver::canonical_path`] still reports
//! their fully qualified path so callers can consult the framework catalog.

use crate::address::AddressAliases;
use crate::ast::{ItemPath, NodeKind};
use crate::source_db::SourceSnapshot;
use crate::{Name, NodeId, StringInterner, SyntaxTree};

/// Which declarations a path may name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Namespace {
    /// Functions, constants, parameters and local bindings.
    Value,
    /// Structs, enums and type parameters.
    Type,
}

/// Maps reference nodes to the declarations they denote.
pub trait SymbolResolver: Send + Sync {
    /// Declaration node for a `Path` or `TypePath` reference.
    fn resolve(&self, reference: NodeId) -> Option<NodeId>;

    /// Fully qualified path of a module-level reference, with the address
    /// normalised. `None` for locals and for references that cannot be
    /// qualified.
    fn canonical_path(&self, _reference: NodeId) -> Option<ItemPath> {
        None
    }
}

/// Members every module sees without a `use`.
const PRELUDE: &[(&str, &str, Option<&str>)] = &[
    ("0x1", "vector", None),
    ("0x1", "option", None),
    ("0x1", "option", Some("Option")),
    ("0x2", "object", None),
    ("0x2", "object", Some("UID")),
    ("0x2", "object", Some("ID")),
    ("0x2", "transfer", None),
    ("0x2", "tx_context", None),
    ("0x2", "tx_context", Some("TxContext")),
];

/// A `use` declaration, flattened.
#[derive(Copy, Clone, Debug)]
struct Import {
    address: Name,
    module: Name,
    /// `None` for module imports (`use a::m;`, `use a::m::Self;`).
    member: Option<Name>,
    /// Name the import is visible under.
    visible: Name,
}

impl Import {
    fn from_kind(kind: NodeKind) -> Option<Import> {
        let NodeKind::Use {
            address,
            module,
            member,
            alias,
        } = kind
        else {
            return None;
        };
        let member = member.filter(|m| *m != Name::SELF_MODULE);
        let visible = alias.or(member).unwrap_or(module);
        Some(Import {
            address,
            module,
            member,
            visible,
        })
    }
}

/// Lexical resolver over a snapshot of the live source set.
pub struct ScopeResolver<'a> {
    snapshot: &'a SourceSnapshot,
    interner: &'a StringInterner,
    aliases: &'a AddressAliases,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(
        snapshot: &'a SourceSnapshot,
        interner: &'a StringInterner,
        aliases: &'a AddressAliases,
    ) -> Self {
        Self {
            snapshot,
            interner,
            aliases,
        }
    }

    /// Resolve `path` as seen from node `from`.
    ///
    /// Simple names search, innermost first: `let` bindings that precede
    /// the reference in each enclosing block (the latest binding wins),
    /// function parameters or type parameters, then the items and imports of
    /// the enclosing module.
    pub fn resolve_path(&self, from: NodeId, path: ItemPath, ns: Namespace) -> Option<NodeId> {
        let tree = self.snapshot.tree(from.file())?;
        match (path.address, path.module) {
            (None, None) => self.resolve_simple(tree, from, path.name, ns),
            (address, Some(module)) => {
                let target = self.target_module(tree, from, address, module)?;
                self.module_item(target, path.name, ns)
            }
            (Some(_), None) => None,
        }
    }

    /// The path a reference node spells, with its namespace.
    pub fn reference_path(&self, reference: NodeId) -> Option<(ItemPath, Namespace)> {
        match self.snapshot.kind(reference)? {
            NodeKind::Path { path, .. } => {
                let in_pack = self.snapshot.parent(reference).is_some_and(|parent| {
                    matches!(self.snapshot.kind(parent), Some(NodeKind::Pack { path, .. }) if path == reference)
                });
                let ns = if in_pack {
                    Namespace::Type
                } else {
                    Namespace::Value
                };
                Some((path, ns))
            }
            NodeKind::TypePath { path, .. } => Some((path, Namespace::Type)),
            _ => None,
        }
    }

    /// Item `name` declared directly in `module`.
    pub fn module_item(&self, module: NodeId, name: Name, ns: Namespace) -> Option<NodeId> {
        let Some(NodeKind::Module { items, .. }) = self.snapshot.kind(module) else {
            return None;
        };
        self.snapshot
            .list(module.file(), items)
            .iter()
            .copied()
            .find(|item| match (self.snapshot.kind(*item), ns) {
                (
                    Some(NodeKind::Function { name: decl, .. } | NodeKind::Const { name: decl, .. }),
                    Namespace::Value,
                )
                | (Some(NodeKind::Struct { name: decl, .. }), Namespace::Type) => decl == name,
                _ => false,
            })
    }

    fn resolve_simple(
        &self,
        tree: &SyntaxTree,
        from: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Option<NodeId> {
        let mut child = from;
        for scope in tree.ancestors(from) {
            let found = match tree.kind(scope)? {
                NodeKind::Block { stmts } if ns == Namespace::Value => {
                    find_in_block(tree, tree.list(stmts), child, name)
                }
                NodeKind::Function {
                    type_params,
                    params,
                    ..
                } => match ns {
                    Namespace::Value => find_decl(tree, tree.list(params), name),
                    Namespace::Type => find_decl(tree, tree.list(type_params), name),
                },
                NodeKind::Struct { type_params, .. } if ns == Namespace::Type => {
                    find_decl(tree, tree.list(type_params), name)
                }
                NodeKind::Module { .. } => {
                    return self
                        .module_item(scope, name, ns)
                        .or_else(|| self.imported_member(tree, scope, name, ns));
                }
                _ => None,
            };
            if found.is_some() {
                return found;
            }
            child = scope;
        }
        None
    }

    fn imported_member(
        &self,
        tree: &SyntaxTree,
        module: NodeId,
        name: Name,
        ns: Namespace,
    ) -> Option<NodeId> {
        self.imports(tree, module)
            .filter(|import| import.visible == name)
            .find_map(|import| {
                let member = import.member?;
                let target = self.snapshot.find_module(
                    Some(import.address),
                    import.module,
                    self.aliases,
                    self.interner,
                )?;
                self.module_item(target, member, ns)
            })
    }

    /// Module named by the `module` segment of a path, seen from `from`.
    fn target_module(
        &self,
        tree: &SyntaxTree,
        from: NodeId,
        address: Option<Name>,
        module: Name,
    ) -> Option<NodeId> {
        if address.is_some() {
            return self
                .snapshot
                .find_module(address, module, self.aliases, self.interner);
        }
        let enclosing = tree.enclosing_module(from)?;
        if module == Name::SELF_MODULE {
            return Some(enclosing);
        }
        if let Some(import) = self
            .imports(tree, enclosing)
            .find(|import| import.member.is_none() && import.visible == module)
        {
            return self.snapshot.find_module(
                Some(import.address),
                import.module,
                self.aliases,
                self.interner,
            );
        }
        if self.snapshot.module_identity(enclosing).map(|(_, n)| n) == Some(module) {
            return Some(enclosing);
        }
        self.snapshot
            .find_module(None, module, self.aliases, self.interner)
    }

    fn imports<'t>(
        &self,
        tree: &'t SyntaxTree,
        module: NodeId,
    ) -> impl Iterator<Item = Import> + 't {
        let items = match tree.kind(module) {
            Some(NodeKind::Module { items, .. }) => tree.list(items),
            _ => &[],
        };
        items
            .iter()
            .filter_map(move |item| tree.kind(*item).and_then(Import::from_kind))
    }

    /// Address and real module name for a module segment, seen from `from`.
    fn qualify_module(&self, tree: &SyntaxTree, from: NodeId, module: Name) -> Option<(Name, Name)> {
        let enclosing = tree.enclosing_module(from);
        if let Some(enclosing) = enclosing {
            if module == Name::SELF_MODULE {
                return self.snapshot.module_identity(enclosing);
            }
            if let Some(import) = self
                .imports(tree, enclosing)
                .find(|import| import.member.is_none() && import.visible == module)
            {
                return Some((import.address, import.module));
            }
            if let Some((address, name)) = self.snapshot.module_identity(enclosing) {
                if name == module {
                    return Some((address, name));
                }
            }
        }
        let text = self.interner.lookup(module);
        if let Some((address, _, _)) = PRELUDE
            .iter()
            .find(|(_, m, member)| member.is_none() && *m == text)
        {
            return Some((self.interner.intern(address), module));
        }
        let live = self
            .snapshot
            .find_module(None, module, self.aliases, self.interner)?;
        self.snapshot.module_identity(live)
    }

    /// Qualified path for a simple name brought in by `use` or the prelude.
    fn qualify_simple(&self, tree: &SyntaxTree, from: NodeId, name: Name) -> Option<ItemPath> {
        if let Some(enclosing) = tree.enclosing_module(from) {
            if let Some((import, member)) = self
                .imports(tree, enclosing)
                .find_map(|import| Some((import, import.member?)).filter(|_| import.visible == name))
            {
                return Some(ItemPath::qualified(import.address, import.module, member));
            }
        }
        let text = self.interner.lookup(name);
        PRELUDE
            .iter()
            .find(|(_, _, member)| *member == Some(text))
            .map(|(address, module, _)| {
                ItemPath::qualified(
                    self.interner.intern(address),
                    self.interner.intern(module),
                    name,
                )
            })
    }

    fn normalized(&self, path: ItemPath) -> ItemPath {
        ItemPath {
            address: path.address.map(|a| self.aliases.normalize(a, self.interner)),
            ..path
        }
    }
}

impl SymbolResolver for ScopeResolver<'_> {
    #[tracing::instrument(level = "trace", skip(self))]
    fn resolve(&self, reference: NodeId) -> Option<NodeId> {
        let (path, ns) = self.reference_path(reference)?;
        self.resolve_path(reference, path, ns)
    }

    fn canonical_path(&self, reference: NodeId) -> Option<ItemPath> {
        let (path, ns) = self.reference_path(reference)?;
        let tree = self.snapshot.tree(reference.file())?;
        let qualified = match (path.address, path.module) {
            (Some(address), Some(module)) => ItemPath::qualified(address, module, path.name),
            (None, Some(module)) => {
                let (address, module) = self.qualify_module(tree, reference, module)?;
                ItemPath::qualified(address, module, path.name)
            }
            (None, None) => match self.resolve_simple(tree, reference, path.name, ns) {
                Some(decl) => {
                    let module = self.snapshot.parent(decl)?;
                    let (address, module) = self.snapshot.module_identity(module)?;
                    ItemPath::qualified(address, module, path.name)
                }
                None => self.qualify_simple(tree, reference, path.name)?,
            },
            (Some(_), None) => return None,
        };
        Some(self.normalized(qualified))
    }
}

/// Latest `let` binding of `name` among the statements before `child`.
fn find_in_block(tree: &SyntaxTree, stmts: &[NodeId], child: NodeId, name: Name) -> Option<NodeId> {
    let end = stmts.iter().position(|s| *s == child).unwrap_or(stmts.len());
    stmts[..end].iter().rev().find_map(|stmt| match tree.kind(*stmt) {
        Some(NodeKind::Let { pattern, .. }) => find_binding(tree, pattern, name),
        _ => None,
    })
}

fn find_binding(tree: &SyntaxTree, pattern: NodeId, name: Name) -> Option<NodeId> {
    match tree.kind(pattern)? {
        NodeKind::BindName { name: bound } if bound == name => Some(pattern),
        NodeKind::BindTuple { elems } => tree
            .list(elems)
            .iter()
            .rev()
            .find_map(|elem| find_binding(tree, *elem, name)),
        _ => None,
    }
}

fn find_decl(tree: &SyntaxTree, decls: &[NodeId], name: Name) -> Option<NodeId> {
    decls
        .iter()
        .copied()
        .find(|decl| tree.kind(*decl).and_then(|k| k.declared_name()) == Some(name))
}
