//! Include-order resolution.
//!
//! Repeated frontier extraction: every round scans the unresolved items in
//! key order and resolves those whose known dependencies are already
//! resolved. Quadratic, which is fine for a few hundred headers.

use std::collections::{BTreeMap, BTreeSet};

/// The items left over when a round makes no progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved<K: Ord> {
    pub remaining: BTreeSet<K>,
}

/// Order `graph` keys so that each one follows all of its dependencies.
///
/// Dependencies that are not keys of `graph` are ignored. Items resolved
/// earlier in the same round already count as resolved.
pub fn resolve_order<K>(graph: &BTreeMap<K, BTreeSet<K>>) -> Result<Vec<K>, Unresolved<K>>
where
    K: Ord + Clone,
{
    let mut unresolved: BTreeSet<K> = graph.keys().cloned().collect();
    let mut resolved: BTreeSet<K> = BTreeSet::new();
    let mut order = Vec::with_capacity(graph.len());

    while !unresolved.is_empty() {
        let mut progressed = false;
        for key in &unresolved {
            let ready = graph[key]
                .iter()
                .filter(|dep| graph.contains_key(*dep))
                .all(|dep| resolved.contains(dep));
            if ready {
                resolved.insert(key.clone());
                order.push(key.clone());
                progressed = true;
            }
        }
        if !progressed {
            return Err(Unresolved {
                remaining: unresolved,
            });
        }
        unresolved.retain(|key| !resolved.contains(key));
    }

    Ok(order)
}
