//! The analysis session.
//!
//! [`AnalysisHost`] owns the live source set and everything derived from it.
//! Edits go through [`set_file`](AnalysisHost::set_file) and
//! [`remove_file`](AnalysisHost::remove_file), which keep the type cache and
//! the struct hierarchy index in step with the trees. Queries take a
//! snapshot and run an [`InferEngine`] over it; any number of queries may run
//! concurrently with each other, and with edits.

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use mova_cache::TypeCache;
use mova_framework::FrameworkProvider;
use mova_infer::{ConstraintViolation, EngineStats, InferContext, InferEngine};
use mova_ir::{
    FileId, NodeId, ScopeResolver, SharedInterner, SourceDb, SourceSnapshot, SyntaxTree,
    TreeBuilder,
};
use mova_types::{is_assignable_to, Ability, AbilitySet, QualifiedName, Type};

use crate::batch;
use crate::config::AnalysisConfig;
use crate::stats::AnalysisStats;

/// One editor session over a set of source files.
pub struct AnalysisHost {
    interner: SharedInterner,
    sources: SourceDb,
    cache: TypeCache,
    framework: FrameworkProvider,
    config: AnalysisConfig,
    /// Struct names each file contributed to the hierarchy index.
    indexed: Mutex<FxHashMap<FileId, Vec<QualifiedName>>>,
    engine_stats: Mutex<EngineStats>,
}

impl AnalysisHost {
    /// A session with the bundled framework catalog.
    pub fn new(config: AnalysisConfig) -> Self {
        let interner = SharedInterner::new();
        let framework = FrameworkProvider::bundled(interner.clone());
        Self::with_framework(config, interner, framework)
    }

    /// A session over a custom catalog. `framework` must intern into
    /// `interner`.
    pub fn with_framework(
        config: AnalysisConfig,
        interner: SharedInterner,
        framework: FrameworkProvider,
    ) -> Self {
        AnalysisHost {
            cache: TypeCache::new(config.cache.clone()),
            interner,
            sources: SourceDb::new(),
            framework,
            config,
            indexed: Mutex::new(FxHashMap::default()),
            engine_stats: Mutex::new(EngineStats::default()),
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    #[inline]
    pub fn framework(&self) -> &FrameworkProvider {
        &self.framework
    }

    /// Reserve an identity for a new file.
    pub fn alloc_file(&self) -> FileId {
        self.sources.alloc_file()
    }

    /// A builder for the tree of `file`, interning into this session.
    pub fn builder(&self, file: FileId) -> TreeBuilder<'_> {
        TreeBuilder::new(file, &self.interner)
    }

    pub fn files(&self) -> Vec<FileId> {
        self.sources.files()
    }

    // === Edits ===

    /// Install or replace the tree of `tree.file()`.
    ///
    /// Replacing a file drops the cached types of its nodes and of every
    /// node derived from it. A qualified path that found no member in a live
    /// module falls back to the framework without depending on that module's
    /// file, so a new file, or an edit that changes a file's item names,
    /// resets the whole cache.
    #[tracing::instrument(level = "debug", skip_all, fields(file = ?tree.file()))]
    pub fn set_file(&self, tree: SyntaxTree) {
        let file = tree.file();
        let items = tree.item_names();
        let previous = self.sources.tree(file);
        self.sources.set_tree(tree);
        match previous {
            Some(old) if old.item_names() == items => {
                self.cache.invalidate_file(file);
                self.reindex(file);
            }
            Some(_) => {
                tracing::debug!(?file, "item names changed");
                self.cache.invalidate_all();
                self.reindex_all();
            }
            None => {
                self.cache.revive_file(file);
                self.cache.invalidate_all();
                self.reindex_all();
            }
        }
    }

    /// Drop a file from the session. Returns whether it was present.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn remove_file(&self, file: FileId) -> bool {
        if !self.sources.remove(file) {
            return false;
        }
        self.cache.retire_file(file);
        if let Some(names) = self.indexed.lock().remove(&file) {
            for name in &names {
                self.cache.remove_type(name);
            }
        }
        true
    }

    /// Forget every cached result and rebuild the hierarchy index.
    pub fn reload(&self) {
        self.cache.invalidate_all();
        self.reindex_all();
    }

    /// Reclaim cache entries of stale and removed files.
    pub fn sweep(&self) -> usize {
        self.cache.sweep()
    }

    fn reindex_all(&self) {
        self.indexed.lock().clear();
        for file in self.sources.files() {
            self.reindex(file);
        }
    }

    /// Replace the hierarchy records of `file`'s structs, un-indexing the
    /// ones that are gone.
    fn reindex(&self, file: FileId) {
        let records = self.with_context(|cx| cx.declared_structs(file));
        let names: Vec<QualifiedName> = records.iter().map(|info| info.name).collect();
        let current: FxHashSet<QualifiedName> = names.iter().copied().collect();

        let mut indexed = self.indexed.lock();
        let previous = indexed.insert(file, names).unwrap_or_default();
        let removed: Vec<&QualifiedName> = previous
            .iter()
            .filter(|name| !current.contains(*name))
            .collect();
        for gone in &removed {
            self.cache.remove_type(gone);
        }
        for info in records {
            self.cache.index_type(info.name, info);
        }
        tracing::debug!(
            ?file,
            structs = current.len(),
            removed = removed.len(),
            "hierarchy reindexed"
        );
    }

    // === Queries ===

    /// Type of `node` in the current sources.
    pub fn infer_type(&self, node: NodeId) -> Option<Type> {
        self.with_engine(|engine| engine.infer_type(node))
    }

    /// Types of many nodes, in input order. Nodes are grouped by file and,
    /// when the session is configured for it, the groups run in parallel.
    pub fn infer_batch(&self, nodes: &[NodeId]) -> Vec<Option<Type>> {
        let generation = self.cache.generation();
        let snapshot = self.sources.snapshot();
        let (types, stats) = batch::infer_grouped(self, &snapshot, generation, nodes);
        *self.engine_stats.lock() += stats;
        types
    }

    /// Every expression of `file` with its type, in arena order.
    pub fn infer_file(&self, file: FileId) -> Vec<(NodeId, Type)> {
        self.with_engine(|engine| {
            let Some(tree) = engine.context().snapshot.tree(file) else {
                return Vec::new();
            };
            let expressions: Vec<NodeId> = tree
                .node_ids()
                .filter(|id| tree.kind(*id).is_some_and(|kind| kind.is_expr()))
                .collect();
            expressions
                .into_iter()
                .filter_map(|id| Some((id, engine.infer_type(id)?)))
                .collect()
        })
    }

    pub fn is_assignable(&self, source: &Type, target: &Type) -> bool {
        is_assignable_to(source, target)
    }

    pub fn has_ability(&self, ty: &Type, ability: Ability) -> bool {
        self.with_engine(|engine| engine.has_ability(ty, ability))
    }

    pub fn check_ability_constraints(&self, ty: &Type, required: AbilitySet) -> bool {
        self.with_engine(|engine| engine.check_ability_constraints(ty, required))
    }

    /// Ability bound violations of the type arguments at a call site.
    pub fn check_call_constraints(&self, call: NodeId) -> Vec<ConstraintViolation> {
        self.with_engine(|engine| engine.check_call_constraints(call))
    }

    /// Counters of the cache and of every engine this session ran.
    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            cache: self.cache.stats(),
            engine: *self.engine_stats.lock(),
            files: self.sources.files().len(),
        }
    }

    // === Internals ===

    /// Run `f` over a context for the current sources.
    fn with_context<R>(&self, f: impl FnOnce(InferContext<'_>) -> R) -> R {
        let generation = self.cache.generation();
        let snapshot = self.sources.snapshot();
        let resolver = self.resolver(&snapshot);
        f(self.context(&snapshot, &resolver, generation))
    }

    /// Run `f` with a fresh engine, folding its counters into the session's.
    fn with_engine<R>(&self, f: impl FnOnce(&mut InferEngine<'_>) -> R) -> R {
        let (out, stats) = self.with_context(|cx| {
            let mut engine = InferEngine::new(cx, &self.config.infer);
            let out = f(&mut engine);
            (out, engine.stats())
        });
        *self.engine_stats.lock() += stats;
        out
    }

    pub(crate) fn resolver<'a>(&'a self, snapshot: &'a SourceSnapshot) -> ScopeResolver<'a> {
        ScopeResolver::new(snapshot, &self.interner, self.framework.aliases())
    }

    pub(crate) fn context<'a>(
        &'a self,
        snapshot: &'a SourceSnapshot,
        resolver: &'a ScopeResolver<'a>,
        generation: u64,
    ) -> InferContext<'a> {
        InferContext {
            snapshot,
            resolver,
            cache: &self.cache,
            framework: &self.framework,
            interner: &self.interner,
            generation,
        }
    }
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
