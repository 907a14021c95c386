//! The read-only world an inference runs against.
//!
//! [`InferContext`] bundles one source snapshot with the collaborators that
//! answer questions about it. It is `Copy` and holds no mutable state of its
//! own, so it doubles as the engine's [`HierarchyLookup`]: named types are
//! looked up in the cache's hierarchy index first, then among the live
//! struct declarations (indexing them on the way), then in the framework
//! catalog. Local declarations therefore shadow library ones.

use std::sync::Arc;

use mova_cache::{FileDeps, TypeCache};
use mova_framework::FrameworkProvider;
use mova_ir::{FileId, NodeId, NodeKind, NodeRange, SourceSnapshot, StringInterner, SymbolResolver};
use mova_types::{
    Ability, AbilitySet, FieldInfo, HierarchyLookup, QualifiedName, TypeHierarchyInfo,
    TypeParamInfo,
};

use crate::expr::lower_type;

/// Everything an inference reads.
#[derive(Copy, Clone)]
pub struct InferContext<'a> {
    pub snapshot: &'a SourceSnapshot,
    pub resolver: &'a dyn SymbolResolver,
    pub cache: &'a TypeCache,
    pub framework: &'a FrameworkProvider,
    pub interner: &'a StringInterner,
    /// Cache generation read before `snapshot` was taken.
    pub generation: u64,
}

impl InferContext<'_> {
    /// Ability set spelled by a list of `Ability` nodes. Unknown keywords
    /// are skipped.
    pub(crate) fn abilities(&self, file: FileId, range: NodeRange) -> AbilitySet {
        self.snapshot
            .list(file, range)
            .iter()
            .filter_map(|id| match self.snapshot.kind(*id) {
                Some(NodeKind::Ability { name }) => Ability::from_name(name),
                _ => None,
            })
            .collect()
    }

    /// Declared type parameters of an item.
    pub(crate) fn type_params(&self, file: FileId, range: NodeRange) -> Vec<TypeParamInfo> {
        self.snapshot
            .list(file, range)
            .iter()
            .filter_map(|id| match self.snapshot.kind(*id) {
                Some(NodeKind::TypeParam {
                    name,
                    constraints,
                    phantom,
                }) => Some(TypeParamInfo {
                    name,
                    constraints: self.abilities(file, constraints),
                    is_phantom: phantom,
                }),
                _ => None,
            })
            .collect()
    }

    /// Qualified name of a module item, with the address normalised.
    pub(crate) fn item_name(&self, decl: NodeId) -> Option<QualifiedName> {
        let name = self.snapshot.kind(decl)?.declared_name()?;
        let module = self.snapshot.parent(decl)?;
        let (address, module) = self.snapshot.module_identity(module)?;
        let address = self.framework.aliases().normalize(address, self.interner);
        Some(QualifiedName::new(address, module, name))
    }

    /// Hierarchy record built from a live struct declaration.
    pub(crate) fn local_struct_info(&self, decl: NodeId) -> Option<TypeHierarchyInfo> {
        let NodeKind::Struct {
            type_params,
            abilities,
            fields,
            is_enum,
            ..
        } = self.snapshot.kind(decl)?
        else {
            return None;
        };
        let file = decl.file();
        let name = self.item_name(decl)?;
        // Field types only feed the record; dependencies are tracked by
        // whoever resolved the struct itself.
        let mut deps = FileDeps::new();
        let fields = self
            .snapshot
            .list(file, fields)
            .iter()
            .filter_map(|field| match self.snapshot.kind(*field) {
                Some(NodeKind::FieldDecl { name, ty }) => Some(FieldInfo {
                    name,
                    ty: lower_type(self, ty, &mut deps),
                }),
                _ => None,
            })
            .collect();
        let mut info = TypeHierarchyInfo::new(name, self.abilities(file, abilities))
            .with_type_params(self.type_params(file, type_params))
            .with_fields(fields);
        info.is_enum = is_enum;
        Some(info)
    }

    /// Hierarchy records of the structs declared in `file`'s modules.
    pub fn declared_structs(&self, file: FileId) -> Vec<TypeHierarchyInfo> {
        let Some(tree) = self.snapshot.tree(file) else {
            return Vec::new();
        };
        tree.modules()
            .filter_map(|module| match tree.kind(module) {
                Some(NodeKind::Module { items, .. }) => Some(tree.list(items)),
                _ => None,
            })
            .flatten()
            .filter_map(|item| self.local_struct_info(*item))
            .collect()
    }

    fn find_local_struct(&self, name: &QualifiedName) -> Option<NodeId> {
        self.snapshot.find_struct(
            name.address,
            name.module?,
            name.name,
            self.framework.aliases(),
            self.interner,
        )
    }
}

impl HierarchyLookup for InferContext<'_> {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        if let Some(info) = self.cache.get_type_hierarchy(name) {
            return Some(info);
        }
        if let Some(decl) = self.find_local_struct(name) {
            let info = self.local_struct_info(decl)?;
            self.cache.index_type_at(*name, info.clone(), self.generation);
            return Some(Arc::new(info));
        }
        self.framework.struct_info(name)
    }
}
