//! Shared builders and strategies for the integration tests.
#![allow(dead_code)]

use assetgraph_core::{AssetDefinition, AssetKey};
use proptest::prelude::*;

/// An asset with an op (a real node) depending on `deps`.
pub fn asset(name: &str, deps: &[&str]) -> AssetDefinition {
    let mut def = AssetDefinition::foreign(AssetKey::new([name]));
    def.op_name = Some(name.to_string());
    def.dependency_keys = deps.iter().map(|d| AssetKey::new([*d])).collect();
    def
}

/// An asset without an op.
pub fn foreign(name: &str, deps: &[&str]) -> AssetDefinition {
    let mut def = asset(name, deps);
    def.op_name = None;
    def
}

pub fn id(name: &str) -> String {
    AssetKey::new([name]).to_id()
}

/// Random definitions over `n{i}` names. Dependencies may point at names
/// that are never defined and may form cycles.
pub fn arb_definitions() -> impl Strategy<Value = Vec<AssetDefinition>> {
    (1_usize..24).prop_flat_map(|n| {
        prop::collection::vec(
            (
                any::<bool>(),
                prop::collection::vec(0..n + 4, 0..4),
            ),
            n,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (real, deps))| {
                    let deps: Vec<String> = deps.iter().map(|d| format!("n{d}")).collect();
                    let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                    let name = format!("n{i}");
                    if real { asset(&name, &deps) } else { foreign(&name, &deps) }
                })
                .collect()
        })
    })
}

/// Random acyclic definitions: `n{i}` only depends on `n{j}` with `j < i`.
pub fn arb_dag() -> impl Strategy<Value = Vec<AssetDefinition>> {
    (1_usize..24).prop_flat_map(|n| {
        prop::collection::vec((any::<bool>(), prop::collection::vec(any::<prop::sample::Index>(), 0..3)), n)
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (real, picks))| {
                        let deps: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            picks.iter().map(|p| format!("n{}", p.index(i))).collect()
                        };
                        let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                        let name = format!("n{i}");
                        if real { asset(&name, &deps) } else { foreign(&name, &deps) }
                    })
                    .collect()
            })
    })
}
