//! The set of live syntax trees.
//!
//! `SourceDb` is the mutable registry an editor session updates as files
//! change. Analysis never reads it directly: it takes a [`SourceSnapshot`],
//! an immutable map of `Arc`'d trees, so one inference pass sees a single
//! consistent version of every file without holding a lock. Taking a
//! snapshot shares the current map; an edit copies it only while an older
//! snapshot is still alive.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::address::AddressAliases;
use crate::ast::{Node, NodeKind};
use crate::{FileId, Name, NodeId, NodeRange, StringInterner, SyntaxTree};

type TreeMap = FxHashMap<FileId, Arc<SyntaxTree>>;

/// Registry of live trees, keyed by file.
pub struct SourceDb {
    files: RwLock<Arc<TreeMap>>,
    next_file: AtomicU32,
    next_revision: AtomicU64,
}

impl SourceDb {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Arc::default()),
            next_file: AtomicU32::new(0),
            next_revision: AtomicU64::new(1),
        }
    }

    /// Reserve a fresh file identity.
    pub fn alloc_file(&self) -> FileId {
        FileId::new(self.next_file.fetch_add(1, Ordering::Relaxed))
    }

    /// Install (or replace) the tree of `tree.file()`. Returns the new revision.
    pub fn set_tree(&self, mut tree: SyntaxTree) -> u64 {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed);
        tree.set_revision(revision);
        let file = tree.file();
        Arc::make_mut(&mut *self.files.write()).insert(file, Arc::new(tree));
        tracing::debug!(?file, revision, "syntax tree installed");
        revision
    }

    /// Drop a file from the live set. Returns whether it was present.
    pub fn remove(&self, file: FileId) -> bool {
        let mut files = self.files.write();
        files.contains_key(&file) && Arc::make_mut(&mut *files).remove(&file).is_some()
    }

    pub fn tree(&self, file: FileId) -> Option<Arc<SyntaxTree>> {
        self.files.read().get(&file).cloned()
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.files.read().contains_key(&file)
    }

    /// Live files, sorted.
    pub fn files(&self) -> Vec<FileId> {
        let mut files: Vec<FileId> = self.files.read().keys().copied().collect();
        files.sort_unstable();
        files
    }

    /// Immutable view of every live tree.
    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            trees: Arc::clone(&*self.files.read()),
        }
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the live trees at one point in time.
#[derive(Clone, Default)]
pub struct SourceSnapshot {
    trees: Arc<TreeMap>,
}

impl SourceSnapshot {
    /// Snapshot of a fixed set of trees (tests, one-off analyses).
    pub fn from_trees(trees: impl IntoIterator<Item = SyntaxTree>) -> Self {
        Self {
            trees: Arc::new(trees.into_iter().map(|t| (t.file(), Arc::new(t))).collect()),
        }
    }

    #[inline]
    pub fn tree(&self, file: FileId) -> Option<&SyntaxTree> {
        self.trees.get(&file).map(AsRef::as_ref)
    }

    /// Whether `id` belongs to a live tree of this snapshot.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree(id.file()).is_some_and(|t| t.contains(id))
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree(id.file())?.node(id)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Child list of a node in `file`.
    pub fn list(&self, file: FileId, range: NodeRange) -> &[NodeId] {
        self.tree(file).map_or(&[], |t| t.list(range))
    }

    /// Revision of a file's tree, if live.
    pub fn revision(&self, file: FileId) -> Option<u64> {
        self.tree(file).map(SyntaxTree::revision)
    }

    /// Live files, sorted.
    pub fn files(&self) -> Vec<FileId> {
        let mut files: Vec<FileId> = self.trees.keys().copied().collect();
        files.sort_unstable();
        files
    }

    /// All module declarations across live files.
    pub fn modules(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.trees.values().flat_map(|tree| tree.modules())
    }

    /// Find `address::module` among live files.
    ///
    /// Addresses are compared after alias normalisation, so `std::vector`
    /// finds `module 0x1::vector`. A missing `address` matches any address.
    pub fn find_module(
        &self,
        address: Option<Name>,
        module: Name,
        aliases: &AddressAliases,
        interner: &StringInterner,
    ) -> Option<NodeId> {
        let wanted = address.map(|a| aliases.normalize(a, interner));
        self.modules().find(|id| match self.kind(*id) {
            Some(NodeKind::Module {
                address: decl_address,
                name,
                ..
            }) => {
                name == module
                    && wanted.map_or(true, |w| aliases.normalize(decl_address, interner) == w)
            }
            _ => false,
        })
    }

    /// Struct `name` declared in `address::module`.
    pub fn find_struct(
        &self,
        address: Option<Name>,
        module: Name,
        name: Name,
        aliases: &AddressAliases,
        interner: &StringInterner,
    ) -> Option<NodeId> {
        let module = self.find_module(address, module, aliases, interner)?;
        let Some(NodeKind::Module { items, .. }) = self.kind(module) else {
            return None;
        };
        self.list(module.file(), items)
            .iter()
            .copied()
            .find(|item| matches!(self.kind(*item), Some(NodeKind::Struct { name: decl, .. }) if decl == name))
    }

    /// Address and name of a module node, if it is one.
    pub fn module_identity(&self, module: NodeId) -> Option<(Name, Name)> {
        match self.kind(module)? {
            NodeKind::Module { address, name, .. } => Some((address, name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeBuilder;

    fn module_tree(db: &SourceDb, interner: &StringInterner, address: &str) -> SyntaxTree {
        let mut b = TreeBuilder::new(db.alloc_file(), interner);
        let u64_ty = b.ty("u64");
        let s = b.struct_decl("Coin", &[], &["store"], &[("value", u64_ty)]);
        b.module(address, "coin", &[s]);
        b.finish()
    }

    #[test]
    fn revisions_increase_per_install() {
        let interner = StringInterner::new();
        let db = SourceDb::new();
        let tree = module_tree(&db, &interner, "0x2");
        let file = tree.file();
        let first = db.set_tree(tree.clone());
        let second = db.set_tree(tree);
        assert!(second > first);
        assert_eq!(db.tree(file).map(|t| t.revision()), Some(second));
        assert_eq!(db.files(), vec![file]);
    }

    #[test]
    fn snapshots_are_isolated_from_later_edits() {
        let interner = StringInterner::new();
        let db = SourceDb::new();
        let tree = module_tree(&db, &interner, "0x2");
        let file = tree.file();
        db.set_tree(tree);
        let snapshot = db.snapshot();
        assert!(db.remove(file));
        assert!(!db.contains(file));
        assert!(snapshot.tree(file).is_some());
        assert!(db.snapshot().tree(file).is_none());
    }

    #[test]
    fn snapshots_share_the_map_until_an_edit() {
        let interner = StringInterner::new();
        let db = SourceDb::new();
        let tree = module_tree(&db, &interner, "0x2");
        let file = tree.file();
        db.set_tree(tree.clone());
        let (first, second) = (db.snapshot(), db.snapshot());
        assert!(Arc::ptr_eq(&first.trees, &second.trees));

        db.set_tree(tree);
        let third = db.snapshot();
        assert!(!Arc::ptr_eq(&first.trees, &third.trees));
        assert!(first.revision(file) < third.revision(file));
        assert_eq!(first.revision(file), second.revision(file));
    }

    #[test]
    fn structs_are_found_through_address_aliases() {
        let interner = StringInterner::new();
        let db = SourceDb::new();
        db.set_tree(module_tree(&db, &interner, "0x0002"));
        let snapshot = db.snapshot();
        let aliases = AddressAliases::standard();
        let coin_module = interner.intern("coin");
        let coin = interner.intern("Coin");

        let found = snapshot.find_struct(Some(Name::SUI), coin_module, coin, &aliases, &interner);
        assert!(matches!(
            found.and_then(|id| snapshot.kind(id)),
            Some(NodeKind::Struct { .. })
        ));
        assert_eq!(
            snapshot.find_struct(Some(Name::STD), coin_module, coin, &aliases, &interner),
            None
        );
    }
}
