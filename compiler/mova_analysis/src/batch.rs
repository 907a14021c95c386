//! Batch inference across files.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use mova_infer::{EngineStats, InferEngine};
use mova_ir::{FileId, NodeId, SourceSnapshot};
use mova_types::Type;

use crate::AnalysisHost;

/// Worker stack size. Deep trees still grow the stack on demand.
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Nodes of one file, with their positions in the request.
type Group = Vec<(usize, NodeId)>;
type GroupResult = (Vec<(usize, Option<Type>)>, EngineStats);

/// Infer `nodes` against `snapshot`, one engine per file.
///
/// All engines share the session cache, so work done for one file (a
/// struct declaration, a callee's signature) is reused by the others.
pub(crate) fn infer_grouped(
    host: &AnalysisHost,
    snapshot: &SourceSnapshot,
    generation: u64,
    nodes: &[NodeId],
) -> (Vec<Option<Type>>, EngineStats) {
    let mut by_file: FxHashMap<FileId, Group> = FxHashMap::default();
    for (idx, node) in nodes.iter().enumerate() {
        by_file.entry(node.file()).or_default().push((idx, *node));
    }
    let mut groups: Vec<(FileId, Group)> = by_file.into_iter().collect();
    groups.sort_unstable_by_key(|(file, _)| *file);

    let run = |group: &Group| -> GroupResult {
        let resolver = host.resolver(snapshot);
        let cx = host.context(snapshot, &resolver, generation);
        let mut engine = InferEngine::new(cx, &host.config().infer);
        let types = group
            .iter()
            .map(|(idx, node)| (*idx, engine.infer_type(*node)))
            .collect();
        (types, engine.stats())
    };

    let results = if host.config().parallel && groups.len() > 1 {
        run_parallel(&groups, &run)
    } else {
        groups.iter().map(|(_, group)| run(group)).collect()
    };

    let mut types = vec![None; nodes.len()];
    let mut stats = EngineStats::default();
    for (group, group_stats) in results {
        for (idx, ty) in group {
            if let Some(slot) = types.get_mut(idx) {
                *slot = ty;
            }
        }
        stats += group_stats;
    }
    tracing::debug!(
        nodes = nodes.len(),
        files = groups.len(),
        computed = stats.computed,
        "batch inferred"
    );
    (types, stats)
}

/// Run each group on a scoped pool that is torn down before returning.
fn run_parallel<F>(groups: &[(FileId, Group)], run: &F) -> Vec<GroupResult>
where
    F: Fn(&Group) -> GroupResult + Sync,
{
    rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK_SIZE)
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                groups
                    .par_iter()
                    .map(|(_, group)| run(group))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            groups.iter().map(|(_, group)| run(group)).collect()
        })
}
