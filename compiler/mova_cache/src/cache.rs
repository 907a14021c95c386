//! The node type cache.
//!
//! # Validity
//!
//! Every invalidation bumps a global generation counter and records, per
//! file, the generation at which the file was last invalidated. A caller
//! reads [`TypeCache::generation`] *before* taking the source snapshot it
//! computes from, and stores results under that generation. An entry is
//! valid while neither its own file nor any file it depends on has been
//! invalidated after that generation, so a result computed from a tree that
//! was replaced mid-computation is never served.
//!
//! # Concurrency
//!
//! Entries live in a `DashMap`; computations run outside any map lock, so
//! nested lookups from inside a computation cannot deadlock. Two threads
//! missing on the same node both compute and one result wins the install.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use mova_ir::{FileId, NodeId};
use mova_types::{HierarchyLookup, QualifiedName, Type, TypeHierarchyInfo};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::config::CacheConfig;
use crate::stats::{CacheStats, Counters};

/// Files a cached result was derived from, besides the node's own file.
pub type FileDeps = SmallVec<[FileId; 2]>;

struct CacheEntry {
    ty: Type,
    generation: u64,
    deps: FileDeps,
    last_used: AtomicU64,
}

/// A cached type with the files it was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cached {
    pub ty: Type,
    pub deps: FileDeps,
}

/// Concurrent map from syntax node to inferred type, plus the hierarchy
/// index of named types.
pub struct TypeCache {
    config: CacheConfig,
    entries: DashMap<NodeId, CacheEntry>,
    /// Generation at which each file was last invalidated.
    invalidated_at: DashMap<FileId, u64>,
    /// Files removed from the source set.
    retired: DashMap<FileId, u64>,
    /// file -> nodes of other files whose cached types depend on it.
    dependents: DashMap<FileId, FxHashSet<NodeId>>,
    hierarchy: DashMap<QualifiedName, Arc<TypeHierarchyInfo>>,
    generation: AtomicU64,
    cleared_at: AtomicU64,
    tick: AtomicU64,
    sweep_lock: Mutex<()>,
    counters: Counters,
}

impl TypeCache {
    pub fn new(config: CacheConfig) -> Self {
        TypeCache {
            config,
            entries: DashMap::new(),
            invalidated_at: DashMap::new(),
            retired: DashMap::new(),
            dependents: DashMap::new(),
            hierarchy: DashMap::new(),
            generation: AtomicU64::new(1),
            cleared_at: AtomicU64::new(0),
            tick: AtomicU64::new(0),
            sweep_lock: Mutex::new(()),
            counters: Counters::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The current generation. Read it before taking the snapshot that
    /// results will be computed from.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // === Lookup ===

    /// Cached type of `node`, without computing anything.
    pub fn get(&self, node: NodeId) -> Option<Type> {
        self.get_entry(node).map(|cached| cached.ty)
    }

    /// Cached type of `node` together with its dependencies. A stale entry
    /// is removed and reported as a miss.
    pub fn get_entry(&self, node: NodeId) -> Option<Cached> {
        let valid = self.entries.get(&node).map(|entry| {
            if self.is_valid(node.file(), entry.generation, &entry.deps) {
                entry
                    .last_used
                    .store(self.next_tick(), Ordering::Relaxed);
                Some(Cached {
                    ty: entry.ty.clone(),
                    deps: entry.deps.clone(),
                })
            } else {
                None
            }
        });
        match valid {
            Some(Some(cached)) => {
                Counters::bump(&self.counters.hits);
                Some(cached)
            }
            Some(None) => {
                self.entries.remove(&node);
                Counters::bump(&self.counters.misses);
                None
            }
            None => {
                Counters::bump(&self.counters.misses);
                None
            }
        }
    }

    /// Cached value if present, otherwise `compute` it and store a usable
    /// result. Absent and indeterminate results are returned but not
    /// stored, so a later query retries.
    pub fn get_or_compute(&self, node: NodeId, compute: impl FnOnce() -> Option<Type>) -> Option<Type> {
        if let Some(ty) = self.get(node) {
            return Some(ty);
        }
        let generation = self.generation();
        let ty = compute()?;
        self.insert(node, ty.clone(), generation, FileDeps::new());
        Some(ty)
    }

    /// Like [`get_or_compute`](Self::get_or_compute) for callers that track
    /// cross-file dependencies: `compute` reports the files its result was
    /// derived from, and the dependencies of a hit are returned as well.
    pub fn get_or_compute_tracked(
        &self,
        node: NodeId,
        generation: u64,
        compute: impl FnOnce() -> (Option<Type>, FileDeps),
    ) -> (Option<Type>, FileDeps) {
        if let Some(cached) = self.get_entry(node) {
            return (Some(cached.ty), cached.deps);
        }
        let (ty, deps) = compute();
        if let Some(ty) = &ty {
            self.insert(node, ty.clone(), generation, deps.clone());
        }
        (ty, deps)
    }

    // === Install ===

    /// Store a result computed under `generation`. Returns whether it was
    /// admitted: types containing `Unknown` and results derived from
    /// since-invalidated files are dropped.
    pub fn insert(&self, node: NodeId, ty: Type, generation: u64, mut deps: FileDeps) -> bool {
        deps.retain(|dep| *dep != node.file());
        deps.sort_unstable();
        deps.dedup();
        if ty.contains_unknown() || !self.is_valid(node.file(), generation, &deps) {
            Counters::bump(&self.counters.rejected);
            return false;
        }
        if self.entries.len() >= self.config.max_entries {
            self.sweep();
        }
        for dep in &deps {
            self.dependents.entry(*dep).or_default().insert(node);
        }
        self.entries.insert(
            node,
            CacheEntry {
                ty,
                generation,
                deps,
                last_used: AtomicU64::new(self.next_tick()),
            },
        );
        Counters::bump(&self.counters.inserts);
        true
    }

    // === Invalidation ===

    /// Drop every entry of `file` and every entry derived from it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn invalidate_file(&self, file: FileId) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.invalidated_at.insert(file, generation);

        let before = self.entries.len();
        self.entries.retain(|node, _| node.file() != file);
        if let Some((_, nodes)) = self.dependents.remove(&file) {
            for node in nodes {
                self.entries.remove(&node);
            }
        }
        Counters::bump(&self.counters.invalidations);
        tracing::debug!(
            dropped = before.saturating_sub(self.entries.len()),
            generation,
            "file invalidated"
        );
    }

    /// Invalidate a file that left the source set. Late results for its
    /// nodes are rejected and any stragglers are swept.
    pub fn retire_file(&self, file: FileId) {
        self.invalidate_file(file);
        self.retired.insert(file, self.generation());
    }

    /// Whether `file` was retired and not revived since.
    pub fn is_retired(&self, file: FileId) -> bool {
        self.retired.contains_key(&file)
    }

    /// Forget a retirement, for a file that comes back.
    pub fn revive_file(&self, file: FileId) {
        self.retired.remove(&file);
    }

    /// Full reset: every entry and the whole hierarchy index.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn invalidate_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.cleared_at.store(generation, Ordering::Release);
        self.entries.clear();
        self.dependents.clear();
        self.hierarchy.clear();
        Counters::bump(&self.counters.invalidations);
        tracing::debug!(generation, "cache cleared");
    }

    // === Eviction ===

    /// Shrink the cache: drop stale entries and entries of retired files,
    /// then least-recently-used entries down to the low watermark. Returns
    /// the number of entries removed. Only one sweep runs at a time; a
    /// concurrent call returns 0 immediately.
    pub fn sweep(&self) -> usize {
        let Some(_guard) = self.sweep_lock.try_lock() else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|node, entry| {
            !self.is_retired(node.file()) && self.is_valid(node.file(), entry.generation, &entry.deps)
        });
        let dead = before.saturating_sub(self.entries.len());
        self.dependents.retain(|_, nodes| {
            nodes.retain(|node| self.entries.contains_key(node));
            !nodes.is_empty()
        });

        let low = self.config.low_watermark();
        let mut evicted = 0;
        if self.entries.len() > low {
            let mut by_age: Vec<(u64, NodeId)> = self
                .entries
                .iter()
                .map(|e| (e.value().last_used.load(Ordering::Relaxed), *e.key()))
                .collect();
            by_age.sort_unstable();
            let excess = self.entries.len().saturating_sub(low);
            for (_, node) in by_age.into_iter().take(excess) {
                if self.entries.remove(&node).is_some() {
                    evicted += 1;
                }
            }
        }
        Counters::add(&self.counters.evictions, dead + evicted);
        Counters::bump(&self.counters.sweeps);
        tracing::debug!(dead, evicted, remaining = self.entries.len(), "cache swept");
        dead + evicted
    }

    // === Hierarchy index ===

    /// Index (or replace) the hierarchy record of a named type.
    pub fn index_type(&self, name: QualifiedName, info: TypeHierarchyInfo) {
        self.hierarchy.insert(name, Arc::new(info));
    }

    /// Index a record read from trees of cache generation `generation`.
    ///
    /// Returns false and leaves the name un-indexed when an invalidation
    /// ran before or during the insert.
    pub fn index_type_at(
        &self,
        name: QualifiedName,
        info: TypeHierarchyInfo,
        generation: u64,
    ) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.hierarchy.insert(name, Arc::new(info));
        if self.generation() != generation {
            self.remove_type(&name);
            return false;
        }
        true
    }

    pub fn get_type_hierarchy(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        self.hierarchy.get(name).map(|info| Arc::clone(info.value()))
    }

    /// Un-index a named type whose declaration disappeared.
    pub fn remove_type(&self, name: &QualifiedName) -> bool {
        self.hierarchy.remove(name).is_some()
    }

    /// Names currently indexed.
    pub fn indexed_types(&self) -> Vec<QualifiedName> {
        self.hierarchy.iter().map(|e| *e.key()).collect()
    }

    // === Statistics ===

    pub fn stats(&self) -> CacheStats {
        CacheStats::load(&self.counters, self.entries.len(), self.hierarchy.len())
    }

    // === Internals ===

    fn is_valid(&self, file: FileId, generation: u64, deps: &[FileId]) -> bool {
        if generation < self.cleared_at.load(Ordering::Acquire) {
            return false;
        }
        std::iter::once(&file).chain(deps).all(|f| {
            self.invalidated_at
                .get(f)
                .map_or(true, |at| *at <= generation)
        })
    }

    #[inline]
    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl HierarchyLookup for TypeCache {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        self.get_type_hierarchy(name)
    }
}
