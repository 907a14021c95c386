//! Engine settings.

use mova_stack::DepthLimit;
use serde::Deserialize;

/// Inference engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferConfig {
    /// Deepest chain of nested inferences one query may open before the
    /// engine gives up with `Unknown`.
    pub max_depth: u32,
}

impl InferConfig {
    pub fn depth_limit(&self) -> DepthLimit {
        DepthLimit::new(self.max_depth)
    }
}

impl Default for InferConfig {
    fn default() -> Self {
        InferConfig {
            max_depth: DepthLimit::DEFAULT.get(),
        }
    }
}
