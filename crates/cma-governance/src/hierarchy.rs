// hierarchy.rs — Resolves the flat snapshot into ancestor chains.
//
// The Organization → Mesh → Domain → Product → Component chain cannot
// cycle: each parent-reference field is typed to the level above, so a
// plain upward walk terminates. What CAN cycle are the same-level
// graphs — Component/Product dependsOn and Component template — and
// those get a three-color DFS.
//
// A missing parent reference is not an error (standalone entities are
// permitted, they just get an empty cascade). A dangling one is a
// structural error, but the entity still degrades gracefully to a
// rootless cascade rather than being dropped from evaluation.

use std::collections::{BTreeMap, BTreeSet};

use cma_model::{EntityKind, Snapshot};

use crate::errors::StructuralError;
use crate::graph::find_cycle;

/// The resolved hierarchy: ancestor chains plus structural findings.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    /// Per entity id, ancestors ordered root-first down to the
    /// immediate parent. Entities without ancestors map to an empty
    /// chain (or no entry at all).
    ancestors: BTreeMap<String, Vec<(EntityKind, String)>>,
    errors: Vec<StructuralError>,
    /// Entities whose structure is too broken to evaluate (cycles,
    /// template chains, ambiguous ids). Dangling parent references are
    /// deliberately NOT in here — those degrade to rootless.
    skipped: BTreeSet<String>,
}

impl Resolved {
    /// Root-to-parent ancestor chain for an entity. Empty for roots,
    /// standalone entities, and entities whose parent ref dangles.
    pub fn ancestors_of(&self, id: &str) -> &[(EntityKind, String)] {
        self.ancestors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn errors(&self) -> &[StructuralError] {
        &self.errors
    }

    /// Whether this entity must be excluded from cascade/constraint
    /// evaluation (its structure cannot be trusted).
    pub fn is_skipped(&self, id: &str) -> bool {
        self.skipped.contains(id)
    }

    pub(crate) fn skip(&mut self, id: &str) {
        self.skipped.insert(id.to_string());
    }

    pub(crate) fn push_error(&mut self, error: StructuralError) {
        self.errors.push(error);
    }
}

/// Resolve parent/child links over a snapshot and run all same-level
/// cycle checks. Never fails — all findings are collected in the
/// returned [`Resolved`].
pub fn resolve(snapshot: &Snapshot) -> Resolved {
    let mut resolved = Resolved::default();

    check_key_id_agreement(snapshot, &mut resolved);
    check_required_fields(snapshot, &mut resolved);
    check_duplicate_ids(snapshot, &mut resolved);
    build_ancestor_chains(snapshot, &mut resolved);
    check_component_membership(snapshot, &mut resolved);
    check_depends_on_cycles(snapshot, &mut resolved);
    check_templates(snapshot, &mut resolved);

    if !resolved.errors.is_empty() {
        tracing::warn!(
            errors = resolved.errors.len(),
            skipped = resolved.skipped.len(),
            "hierarchy resolution found structural errors"
        );
    }
    resolved
}

fn check_key_id_agreement(snapshot: &Snapshot, resolved: &mut Resolved) {
    macro_rules! check {
        ($collection:expr, $kind:expr) => {
            for (key, entity) in $collection {
                if key != &entity.id {
                    resolved.push_error(StructuralError::IdMismatch {
                        kind: $kind,
                        key: key.clone(),
                        id: entity.id.clone(),
                    });
                    resolved.skip(&entity.id);
                }
            }
        };
    }
    check!(&snapshot.organizations, EntityKind::Organization);
    check!(&snapshot.meshes, EntityKind::Mesh);
    check!(&snapshot.domains, EntityKind::Domain);
    check!(&snapshot.products, EntityKind::Product);
    check!(&snapshot.components, EntityKind::Component);
}

/// `id` and `name` must be non-empty, and every declared policy must
/// carry at least one constraint.
fn check_required_fields(snapshot: &Snapshot, resolved: &mut Resolved) {
    for node in snapshot.iter_nodes() {
        for (field, value) in [("id", node.id()), ("name", node.name())] {
            if value.is_empty() {
                resolved.push_error(StructuralError::EmptyField {
                    kind: node.kind(),
                    id: node.id().to_string(),
                    field: field.to_string(),
                });
                resolved.skip(node.id());
            }
        }
        for policy in node.policies() {
            if policy.constraints.is_empty() {
                let error = StructuralError::ConstraintlessPolicy {
                    kind: node.kind(),
                    id: node.id().to_string(),
                    policy: policy.id.clone(),
                };
                resolved.skip(error.entity_id());
                resolved.push_error(error);
            }
        }
    }
}

fn check_duplicate_ids(snapshot: &Snapshot, resolved: &mut Resolved) {
    for (id, kinds) in snapshot.duplicate_ids() {
        resolved.skip(&id);
        resolved.push_error(StructuralError::DuplicateId { id, kinds });
    }
}

fn build_ancestor_chains(snapshot: &Snapshot, resolved: &mut Resolved) {
    for node in snapshot.iter_nodes() {
        // Report a dangling parent once, on the entity declaring it.
        if let Some((parent_kind, parent_id)) = node.parent_ref() {
            if snapshot.get(parent_kind, parent_id).is_none() {
                resolved.push_error(StructuralError::DanglingReference {
                    kind: node.kind(),
                    id: node.id().to_string(),
                    field: parent_field_name(node.kind()).to_string(),
                    target: parent_id.to_string(),
                });
            }
        }

        // Walk upward, truncating at any break in the chain. The fixed
        // level typing bounds this walk at depth 4.
        let mut chain = Vec::new();
        let mut cursor = node.parent_ref();
        while let Some((kind, id)) = cursor {
            match snapshot.get(kind, id) {
                Some(parent) => {
                    chain.push((kind, id.to_string()));
                    cursor = parent.parent_ref();
                }
                None => break,
            }
        }
        chain.reverse(); // root first
        if !chain.is_empty() {
            resolved.ancestors.insert(node.id().to_string(), chain);
        }
    }
}

fn parent_field_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Organization => "(none)",
        EntityKind::Mesh => "organizationId",
        EntityKind::Domain => "meshId",
        EntityKind::Product => "domainId",
        EntityKind::Component => "productId",
    }
}

/// Product.components entries must name existing Components.
fn check_component_membership(snapshot: &Snapshot, resolved: &mut Resolved) {
    for product in snapshot.products.values() {
        for component_id in &product.components {
            if !snapshot.components.contains_key(component_id) {
                resolved.push_error(StructuralError::DanglingReference {
                    kind: EntityKind::Product,
                    id: product.id.clone(),
                    field: "components".to_string(),
                    target: component_id.clone(),
                });
            }
        }
    }
}

fn check_depends_on_cycles(snapshot: &Snapshot, resolved: &mut Resolved) {
    // Products and Components each form their own dependsOn graph.
    // Dangling dependsOn ids are the taint propagator's concern; the
    // DFS simply skips ids it has no node for.
    let product_ids: Vec<String> = snapshot.products.keys().cloned().collect();
    let product_edges: BTreeMap<String, Vec<String>> = snapshot
        .products
        .iter()
        .map(|(id, p)| (id.clone(), p.depends_on.clone()))
        .collect();
    if let Some(cycle) = find_cycle(&product_ids, &product_edges) {
        for id in &cycle {
            resolved.skip(id);
        }
        resolved.push_error(StructuralError::CyclicDependency {
            kind: EntityKind::Product,
            cycle,
        });
    }

    let component_ids: Vec<String> = snapshot.components.keys().cloned().collect();
    let component_edges: BTreeMap<String, Vec<String>> = snapshot
        .components
        .iter()
        .map(|(id, c)| (id.clone(), c.depends_on.clone()))
        .collect();
    if let Some(cycle) = find_cycle(&component_ids, &component_edges) {
        for id in &cycle {
            resolved.skip(id);
        }
        resolved.push_error(StructuralError::CyclicDependency {
            kind: EntityKind::Component,
            cycle,
        });
    }
}

/// Template references must resolve, and must point at actual templates
/// (components without a template of their own) — one level only.
fn check_templates(snapshot: &Snapshot, resolved: &mut Resolved) {
    for component in snapshot.components.values() {
        let Some(template_id) = component.template.as_deref() else {
            continue;
        };
        match snapshot.components.get(template_id) {
            None => {
                resolved.push_error(StructuralError::DanglingReference {
                    kind: EntityKind::Component,
                    id: component.id.clone(),
                    field: "template".to_string(),
                    target: template_id.to_string(),
                });
            }
            Some(target) if !target.is_template() => {
                resolved.skip(&component.id);
                resolved.push_error(StructuralError::TemplateChain {
                    component: component.id.clone(),
                    template: template_id.to_string(),
                });
            }
            Some(_) => {}
        }
    }
}
