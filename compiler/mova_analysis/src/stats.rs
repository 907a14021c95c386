//! Session counters.

use mova_cache::CacheStats;
use mova_infer::EngineStats;

/// A point-in-time view of a session's counters.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct AnalysisStats {
    pub cache: CacheStats,
    /// Summed over every engine the session has run.
    pub engine: EngineStats,
    /// Live files.
    pub files: usize,
}

impl std::fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files, {} cached types ({} hits, {} misses), {} queries, {} computed, {} cycles, {} depth cut-offs",
            self.files,
            self.cache.entries,
            self.cache.hits,
            self.cache.misses,
            self.engine.queries,
            self.engine.computed,
            self.engine.cycles,
            self.engine.depth_cutoffs,
        )
    }
}
