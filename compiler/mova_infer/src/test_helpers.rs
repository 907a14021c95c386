//! Test helpers: a source set with a cache and the bundled framework.

use mova_cache::TypeCache;
use mova_framework::FrameworkProvider;
use mova_ir::{NodeId, ScopeResolver, SharedInterner, SourceSnapshot, SyntaxTree};
use mova_types::{QualifiedName, Type};

use crate::{InferConfig, InferContext, InferEngine};

/// Everything an engine needs, owned in one place.
pub struct World {
    pub interner: SharedInterner,
    pub snapshot: SourceSnapshot,
    pub cache: TypeCache,
    pub framework: FrameworkProvider,
}

impl World {
    pub fn new(interner: &SharedInterner, trees: impl IntoIterator<Item = SyntaxTree>) -> Self {
        World {
            interner: interner.clone(),
            snapshot: SourceSnapshot::from_trees(trees),
            cache: TypeCache::default(),
            framework: FrameworkProvider::bundled(interner.clone()),
        }
    }

    /// Run `f` against a fresh engine over this world.
    pub fn with_engine<R>(&self, config: &InferConfig, f: impl FnOnce(&mut InferEngine<'_>) -> R) -> R {
        let resolver = ScopeResolver::new(&self.snapshot, &self.interner, self.framework.aliases());
        let cx = InferContext {
            snapshot: &self.snapshot,
            resolver: &resolver,
            cache: &self.cache,
            framework: &self.framework,
            interner: &self.interner,
            generation: self.cache.generation(),
        };
        let mut engine = InferEngine::new(cx, config);
        f(&mut engine)
    }

    pub fn infer(&self, node: NodeId) -> Option<Type> {
        self.with_engine(&InferConfig::default(), |engine| engine.infer_type(node))
    }

    /// A qualified name with its address normalised the way the engine does.
    pub fn qualified(&self, address: &str, module: &str, name: &str) -> QualifiedName {
        let address = self
            .framework
            .aliases()
            .normalize(self.interner.intern(address), &self.interner);
        QualifiedName::new(address, self.interner.intern(module), self.interner.intern(name))
    }
}
