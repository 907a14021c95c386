//! Mova analysis sessions.
//!
//! The entry point for editor tooling. An [`AnalysisHost`] holds the live
//! syntax trees of a workspace, the type cache and the framework catalog,
//! and answers type queries against them:
//!
//! - [`AnalysisHost::set_file`] / [`AnalysisHost::remove_file`] apply edits
//! - [`AnalysisHost::infer_type`] answers a single node, cached
//! - [`AnalysisHost::infer_batch`] answers many nodes, files in parallel
//! - ability and assignability predicates for annotators and inspections
//!
//! Settings come from [`AnalysisConfig`]: editor JSON, then environment
//! overrides.

use std::sync::Once;

mod batch;
mod config;
mod host;
mod stats;

pub use config::{
    AnalysisConfig, ConfigError, ENV_CACHE_LOW_WATERMARK, ENV_CACHE_MAX_ENTRIES,
    ENV_MAX_INFER_DEPTH, ENV_PARALLEL,
};
pub use host::AnalysisHost;
pub use stats::AnalysisStats;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=mova_cache=debug` or `RUST_LOG=mova_infer=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
