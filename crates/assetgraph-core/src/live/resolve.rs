//! Upstream status resolution over an explicit stack.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::trace;

use crate::graph::GraphData;

use super::{ComputeStatus, LiveData};

/// Resolve every `unknown` status in `data`.
///
/// Returns the resolved status for each node that started out `unknown`;
/// `data` itself is left untouched. Upstream ids missing from `data` count
/// as `good`. An upstream that is still being resolved when it is reached
/// again (a cycle) also counts as `good`.
pub(super) fn resolve_all(graph: &GraphData, data: &LiveData) -> BTreeMap<String, ComputeStatus> {
    let mut memo: HashMap<&str, ComputeStatus> = data
        .iter()
        .filter(|(_, node)| node.compute_status != ComputeStatus::Unknown)
        .map(|(id, node)| (id.as_str(), node.compute_status))
        .collect();

    let mut resolved = BTreeMap::new();
    for (id, node) in data {
        if node.compute_status != ComputeStatus::Unknown {
            continue;
        }
        let status = resolve(graph, data, &mut memo, id);
        resolved.insert(id.clone(), status);
    }
    resolved
}

fn resolve<'a>(
    graph: &'a GraphData,
    data: &'a LiveData,
    memo: &mut HashMap<&'a str, ComputeStatus>,
    root: &'a str,
) -> ComputeStatus {
    let mut stack: Vec<&'a str> = vec![root];
    let mut visiting: HashSet<&'a str> = HashSet::from([root]);

    while let Some(&id) = stack.last() {
        if memo.contains_key(id) {
            stack.pop();
            visiting.remove(id);
            continue;
        }
        let Some(node) = data.get(id) else {
            memo.insert(id, ComputeStatus::Good);
            continue;
        };

        let upstream: Vec<&'a str> = graph
            .upstream_of(id)
            .filter(|u| data.contains_key(*u))
            .collect();

        let newer_upstream = upstream
            .iter()
            .any(|u| data.get(*u).is_some_and(|up| up.last_step_start > node.last_step_start));
        let stale_upstream = upstream
            .iter()
            .any(|u| memo.get(u).is_some_and(|s| *s != ComputeStatus::Good));
        if newer_upstream || stale_upstream {
            memo.insert(id, ComputeStatus::Old);
            continue;
        }

        let pending = upstream
            .iter()
            .copied()
            .find(|u| !memo.contains_key(u) && !visiting.contains(u));
        if let Some(next) = pending {
            visiting.insert(next);
            stack.push(next);
            continue;
        }

        let cyclic = upstream.iter().filter(|u| visiting.contains(*u)).count();
        if cyclic > 0 {
            trace!(id, cyclic, "upstream cycle while resolving status, treating as good");
        }
        memo.insert(id, ComputeStatus::Good);
    }

    memo.get(root).copied().unwrap_or(ComputeStatus::Good)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph_data;
    use crate::key::AssetKey;
    use crate::live::LiveDataForNode;
    use crate::model::AssetDefinition;

    fn chain(len: usize) -> (GraphData, LiveData) {
        let defs: Vec<AssetDefinition> = (0..len)
            .map(|i| {
                let mut d = AssetDefinition::foreign(AssetKey::new([format!("n{i}")]));
                d.op_name = Some(format!("n{i}"));
                if i > 0 {
                    d.dependency_keys = vec![AssetKey::new([format!("n{}", i - 1)])];
                }
                d
            })
            .collect();
        let graph = build_graph_data(&defs);
        let data = defs
            .iter()
            .map(|d| {
                (
                    d.id(),
                    LiveDataForNode {
                        compute_status: ComputeStatus::Unknown,
                        unstarted_run_ids: Vec::new(),
                        in_progress_run_ids: Vec::new(),
                        last_materialization: None,
                        last_step_start: 1.0,
                    },
                )
            })
            .collect();
        (graph, data)
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let (graph, data) = chain(100_000);
        let resolved = resolve_all(&graph, &data);
        assert_eq!(resolved.len(), 100_000);
        assert!(resolved.values().all(|s| *s == ComputeStatus::Good));
    }

    #[test]
    fn stale_root_spreads_down_a_deep_chain() {
        let (graph, mut data) = chain(10_000);
        let root = AssetKey::new(["n0"]).to_id();
        if let Some(node) = data.get_mut(&root) {
            node.compute_status = ComputeStatus::None;
        }
        let resolved = resolve_all(&graph, &data);
        assert!(!resolved.contains_key(&root));
        assert!(resolved.values().all(|s| *s == ComputeStatus::Old));
    }

    #[test]
    fn input_is_not_mutated() {
        let (graph, data) = chain(3);
        let before = data.clone();
        let _ = resolve_all(&graph, &data);
        assert_eq!(data, before);
    }
}
