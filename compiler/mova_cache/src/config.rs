//! Cache sizing.

use serde::Deserialize;

/// Bounds for the node cache.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Entry count above which a sweep runs before admitting more entries.
    pub max_entries: usize,
    /// Size a sweep shrinks to, as a percentage of `max_entries`.
    pub low_watermark_percent: usize,
}

impl CacheConfig {
    pub const DEFAULT_MAX_ENTRIES: usize = 100_000;
    pub const DEFAULT_LOW_WATERMARK_PERCENT: usize = 75;

    /// Entry count a sweep evicts down to.
    pub fn low_watermark(&self) -> usize {
        self.max_entries
            .saturating_mul(self.low_watermark_percent.min(100))
            / 100
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: Self::DEFAULT_MAX_ENTRIES,
            low_watermark_percent: Self::DEFAULT_LOW_WATERMARK_PERCENT,
        }
    }
}
