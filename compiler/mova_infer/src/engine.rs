//! The inference engine: cache-first entry point, cycle and depth guards,
//! dependency tracking.

use mova_cache::FileDeps;
use mova_ir::{FileId, NodeId, NodeKind, NodeRange};
use mova_stack::{ensure_sufficient_stack, DepthLimit};
use mova_types::{
    abilities_of, check_ability_constraints, has_ability, is_assignable_to, Ability, AbilitySet,
    Type,
};

use crate::config::InferConfig;
use crate::context::InferContext;
use crate::expr;

/// Counters for one engine's lifetime.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct EngineStats {
    /// Calls to [`InferEngine::infer_type`], nested ones included.
    pub queries: u64,
    /// Queries that missed the cache and ran a computation.
    pub computed: u64,
    /// Re-entrant queries cut off with `Unknown`.
    pub cycles: u64,
    /// Queries cut off by the depth bound.
    pub depth_cutoffs: u64,
}

impl std::ops::AddAssign for EngineStats {
    fn add_assign(&mut self, other: Self) {
        self.queries += other.queries;
        self.computed += other.computed;
        self.cycles += other.cycles;
        self.depth_cutoffs += other.depth_cutoffs;
    }
}

/// Memoized recursive type inference over one source snapshot.
///
/// An engine is cheap to create and is used from one thread; parallel
/// analyses create one engine per worker over the same context. All of them
/// share the [`TypeCache`](mova_cache::TypeCache) in the context.
///
/// Every query first consults the cache. On a miss the node is dispatched on
/// its kind; the files the result was derived from are collected while
/// computing and stored with it, so an edit to any of them drops the entry.
pub struct InferEngine<'a> {
    pub(crate) cx: InferContext<'a>,
    limit: DepthLimit,
    /// Nodes currently being inferred, outermost first.
    active: Vec<NodeId>,
    /// Files contributing to the innermost computation.
    pub(crate) deps: FileDeps,
    stats: EngineStats,
}

impl<'a> InferEngine<'a> {
    pub fn new(cx: InferContext<'a>, config: &InferConfig) -> Self {
        InferEngine {
            cx,
            limit: config.depth_limit(),
            active: Vec::new(),
            deps: FileDeps::new(),
            stats: EngineStats::default(),
        }
    }

    #[inline]
    pub fn context(&self) -> InferContext<'a> {
        self.cx
    }

    #[inline]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Type of `node`.
    ///
    /// `None` when the node is not part of the snapshot or is of a kind
    /// that has no type (modules, `use` declarations, statements). Any other
    /// node gets a type, `Unknown` when inference cannot determine it.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn infer_type(&mut self, node: NodeId) -> Option<Type> {
        self.stats.queries += 1;
        if !self.cx.snapshot.contains(node) {
            return None;
        }
        if self.active.contains(&node) {
            self.stats.cycles += 1;
            tracing::debug!(?node, "inference cycle cut off");
            return Some(Type::Unknown);
        }
        if !self.limit.allows(self.active.len()) {
            self.stats.depth_cutoffs += 1;
            tracing::debug!(?node, limit = self.limit.get(), "inference depth exceeded");
            return Some(Type::Unknown);
        }

        let cache = self.cx.cache;
        let (ty, deps) = cache.get_or_compute_tracked(node, self.cx.generation, || {
            let outer = std::mem::take(&mut self.deps);
            self.active.push(node);
            self.stats.computed += 1;
            let ty = ensure_sufficient_stack(|| expr::infer_node(self, node));
            self.active.pop();
            (ty, std::mem::replace(&mut self.deps, outer))
        });
        self.note_file(node.file());
        for dep in deps {
            self.note_file(dep);
        }
        ty
    }

    /// Type of a sub-node, `Unknown` when it has none.
    pub(crate) fn infer(&mut self, node: NodeId) -> Type {
        self.infer_type(node).unwrap_or(Type::Unknown)
    }

    /// Record that the current computation read `file`.
    pub(crate) fn note_file(&mut self, file: FileId) {
        if !self.deps.contains(&file) {
            self.deps.push(file);
        }
    }

    /// The type an annotation node denotes.
    pub(crate) fn lower(&mut self, ty: NodeId) -> Type {
        expr::lower_type(&self.cx, ty, &mut self.deps)
    }

    #[inline]
    pub(crate) fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.cx.snapshot.kind(node)
    }

    /// A child list, borrowed from the snapshot rather than the engine.
    #[inline]
    pub(crate) fn list(&self, file: FileId, range: NodeRange) -> &'a [NodeId] {
        self.cx.snapshot.list(file, range)
    }

    // === Predicates over the chained hierarchy ===

    pub fn is_assignable(&self, source: &Type, target: &Type) -> bool {
        is_assignable_to(source, target)
    }

    pub fn abilities_of(&self, ty: &Type) -> AbilitySet {
        abilities_of(ty, &self.cx)
    }

    pub fn has_ability(&self, ty: &Type, ability: Ability) -> bool {
        has_ability(ty, ability, &self.cx)
    }

    /// Whether `ty` has every ability in `required`.
    pub fn check_ability_constraints(&self, ty: &Type, required: AbilitySet) -> bool {
        check_ability_constraints(ty, required, &self.cx)
    }
}

#[cfg(test)]
mod tests;
