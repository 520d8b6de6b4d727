// cascade.rs — The policy cascade: root-to-entity policy accumulation.
//
// For every level from the root ancestor down to the entity itself, the
// level contributes its explicit policies first, then its tag-activated
// mixins. Composition is purely additive — a child never removes or
// replaces an ancestor's policy, it only appends more specific ones.
// Cascade construction cannot fail: no ancestors and no tags simply
// yields an empty list.

use cma_model::{MeshNode, Policy, Snapshot};

use crate::hierarchy::Resolved;
use crate::mixin;

/// One hierarchy level's own contribution: explicit policies in
/// declaration order, then mixin policies in activation order.
fn local_policies(node: &dyn MeshNode) -> Vec<Policy> {
    let mut policies = node.policies().to_vec();
    policies.extend(mixin::policies_for_tags(node.tags()));
    policies
}

/// The effective policy set for an entity: each ancestor's local
/// policies root-first, then the entity's own, in deterministic order.
///
/// Ancestors that cannot be resolved (dangling parent references)
/// simply do not contribute — the entity degrades to a rootless
/// cascade rather than failing.
pub fn effective_policies(
    node: &dyn MeshNode,
    resolved: &Resolved,
    snapshot: &Snapshot,
) -> Vec<Policy> {
    let mut policies = Vec::new();
    for (kind, id) in resolved.ancestors_of(node.id()) {
        if let Some(ancestor) = snapshot.get(*kind, id) {
            policies.extend(local_policies(ancestor));
        }
    }
    policies.extend(local_policies(node));
    policies
}
