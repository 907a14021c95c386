//! Read-mostly view of the framework catalog.

use std::sync::{Arc, OnceLock};

use mova_ir::{AddressAliases, Name, SharedInterner};
use mova_types::{HierarchyLookup, PrimitiveKind, QualifiedName, Type, TypeHierarchyInfo};

use crate::catalog::{Catalog, FunctionInfo, ModuleInfo};
use crate::error::CatalogError;

const BUNDLED: &str = include_str!("../data/framework.json");

struct Loaded {
    catalog: Catalog,
    aliases: AddressAliases,
}

/// What a [`FrameworkProvider::search_by_name`] hit names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchKind {
    Module,
    Struct,
    Function,
}

/// One search result: the kind and the `address::module[::member]` path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchHit {
    pub path: String,
    pub kind: SearchKind,
}

/// Type and signature information for symbols outside the source set.
///
/// The bundled catalog is parsed on the first query; a provider built from
/// caller-supplied JSON is loaded up front so errors surface immediately.
/// Once loaded the catalog never changes.
pub struct FrameworkProvider {
    interner: SharedInterner,
    loaded: OnceLock<Loaded>,
}

impl FrameworkProvider {
    /// Provider over the bundled std and framework catalog.
    pub fn bundled(interner: SharedInterner) -> Self {
        FrameworkProvider {
            interner,
            loaded: OnceLock::new(),
        }
    }

    /// Provider over a caller-supplied catalog.
    pub fn from_json(interner: SharedInterner, json: &str) -> Result<Self, CatalogError> {
        let mut aliases = AddressAliases::standard();
        let catalog = Catalog::from_json(json, &interner, &mut aliases)?;
        tracing::debug!(modules = catalog.modules.len(), "framework catalog loaded");
        Ok(Self::preloaded(interner, catalog, aliases))
    }

    /// Provider that knows no library symbols.
    pub fn empty(interner: SharedInterner) -> Self {
        Self::preloaded(interner, Catalog::default(), AddressAliases::standard())
    }

    fn preloaded(interner: SharedInterner, catalog: Catalog, aliases: AddressAliases) -> Self {
        let loaded = OnceLock::new();
        let _ = loaded.set(Loaded { catalog, aliases });
        FrameworkProvider { interner, loaded }
    }

    fn loaded(&self) -> &Loaded {
        self.loaded.get_or_init(|| {
            let mut aliases = AddressAliases::standard();
            match Catalog::from_json(BUNDLED, &self.interner, &mut aliases) {
                Ok(catalog) => {
                    tracing::debug!(modules = catalog.modules.len(), "bundled catalog loaded");
                    Loaded { catalog, aliases }
                }
                Err(error) => {
                    tracing::error!(%error, "bundled catalog is malformed; continuing without it");
                    Loaded {
                        catalog: Catalog::default(),
                        aliases: AddressAliases::standard(),
                    }
                }
            }
        })
    }

    /// Address aliases known to the catalog (`std`, `sui`, and any it adds).
    pub fn aliases(&self) -> &AddressAliases {
        &self.loaded().aliases
    }

    // === Modules ===

    /// Module `address::name`; the address may be an alias.
    pub fn get_module(&self, address: Name, name: Name) -> Option<&ModuleInfo> {
        let loaded = self.loaded();
        let address = loaded.aliases.normalize(address, &self.interner);
        let idx = *loaded.catalog.by_module.get(&(address, name))?;
        loaded.catalog.modules.get(idx)
    }

    /// Every module, ordered by address then name.
    pub fn get_all_modules(&self) -> &[ModuleInfo] {
        &self.loaded().catalog.modules
    }

    /// Whether `name` is a struct declared by the catalog.
    pub fn is_framework_type(&self, name: &QualifiedName) -> bool {
        let name = self.normalize(name);
        self.loaded().catalog.structs.contains_key(&name)
    }

    /// Modules, structs and functions whose name contains `query`,
    /// ignoring case.
    pub fn search_by_name(&self, query: &str) -> Vec<SearchHit> {
        let query = query.to_lowercase();
        let matches = |name: Name| self.interner.lookup(name).to_lowercase().contains(&query);
        let mut hits = Vec::new();
        for module in self.get_all_modules() {
            let prefix = format!(
                "{}::{}",
                self.interner.lookup(module.address),
                self.interner.lookup(module.name)
            );
            if matches(module.name) {
                hits.push(SearchHit {
                    path: prefix.clone(),
                    kind: SearchKind::Module,
                });
            }
            let structs = module.structs.iter().map(|s| (s.name.name, SearchKind::Struct));
            let functions = module
                .functions
                .iter()
                .map(|f| (f.name.name, SearchKind::Function));
            for (name, kind) in structs.chain(functions).filter(|(name, _)| matches(*name)) {
                hits.push(SearchHit {
                    path: format!("{prefix}::{}", self.interner.lookup(name)),
                    kind,
                });
            }
        }
        hits.sort();
        hits
    }

    // === Members ===

    pub fn function(&self, name: &QualifiedName) -> Option<Arc<FunctionInfo>> {
        let name = self.normalize(name);
        self.loaded().catalog.functions.get(&name).cloned()
    }

    pub fn constant(&self, name: &QualifiedName) -> Option<Type> {
        let name = self.normalize(name);
        self.loaded().catalog.constants.get(&name).cloned()
    }

    pub fn struct_info(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        let name = self.normalize(name);
        self.loaded().catalog.structs.get(&name).cloned()
    }

    /// Primitive a library struct stands for, e.g. `0x1::string::String`.
    pub fn primitive_alias(&self, name: &QualifiedName) -> Option<PrimitiveKind> {
        let name = self.normalize(name);
        self.loaded().catalog.primitives.get(&name).copied()
    }

    fn normalize(&self, name: &QualifiedName) -> QualifiedName {
        QualifiedName {
            address: name
                .address
                .map(|a| self.aliases().normalize(a, &self.interner)),
            ..*name
        }
    }
}

impl HierarchyLookup for FrameworkProvider {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        self.struct_info(name)
    }
}

#[cfg(test)]
mod tests;
