// report.rs — Full-snapshot validation and the aggregated report.
//
// `validate` is the one entry point callers need: it resolves the
// hierarchy, checks port shapes and component wiring, evaluates every
// entity's effective constraints, and runs taint propagation, then
// folds everything into a single serializable report. Nothing in the
// pipeline fails fast — a report always comes back, listing every
// finding at once.

use serde::Serialize;

use cma_model::{Enforcement, EntityKind, MeshNode, Snapshot};

use crate::cascade;
use crate::errors::StructuralError;
use crate::evaluate::{self, ConstraintResult, Outcome};
use crate::graph;
use crate::hierarchy;
use crate::taint::{self, DanglingDependency, TaintWarning};

/// A port declares fields belonging to another port family. Advisory:
/// the stray fields are ignored, not errors.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortWarning {
    pub owner: String,
    pub port: String,
    pub stray: Vec<String>,
}

/// One entity's evaluation results, partitioned by what the caller
/// should do about them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityReport {
    pub id: String,
    pub kind: EntityKind,
    /// Policy ids in cascade order, root-first.
    pub effective_policies: Vec<String>,
    /// Failures that make the snapshot non-compliant.
    pub blocking_failures: Vec<ConstraintResult>,
    /// Failures gated from blocking by enforcement or severity.
    pub warnings: Vec<ConstraintResult>,
    /// Failures under audit enforcement, recorded without judgement.
    pub audit_entries: Vec<ConstraintResult>,
    /// Constraints that could not be evaluated at all.
    pub evaluation_errors: Vec<ConstraintResult>,
    pub passed: usize,
}

/// Everything validation found across one snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub structural_errors: Vec<StructuralError>,
    pub graph_errors: Vec<crate::errors::GraphError>,
    /// One report per evaluated entity, level order then id order.
    /// Structurally broken entities (cycles, template chains) are
    /// absent here and explained in `structural_errors`.
    pub entities: Vec<EntityReport>,
    pub taint_warnings: Vec<TaintWarning>,
    pub dangling_dependencies: Vec<DanglingDependency>,
    pub port_warnings: Vec<PortWarning>,
}

impl ValidationReport {
    /// A snapshot is compliant when its structure is sound, its wiring
    /// is sound, and no blocking constraint failed. Warnings, audit
    /// entries, taint findings, and evaluation errors are reported but
    /// do not fail the run.
    pub fn compliant(&self) -> bool {
        self.structural_errors.is_empty()
            && self.graph_errors.is_empty()
            && self.entities.iter().all(|e| e.blocking_failures.is_empty())
    }

    pub fn blocking_failure_count(&self) -> usize {
        self.entities.iter().map(|e| e.blocking_failures.len()).sum()
    }
}

/// Validate a snapshot end to end. Deterministic: the same snapshot
/// always produces the same report, byte for byte once serialized.
pub fn validate(snapshot: &Snapshot) -> ValidationReport {
    let mut resolved = hierarchy::resolve(snapshot);
    let port_warnings = check_ports(snapshot, &mut resolved);

    let mut graph_errors = Vec::new();
    for product in snapshot.products.values() {
        if resolved.is_skipped(&product.id) {
            continue;
        }
        let product_errors = graph::validate_product(product, snapshot);
        // Broken wiring isolates the product from evaluation, same as
        // the hierarchy-level structural findings.
        if !product_errors.is_empty() {
            resolved.skip(&product.id);
        }
        graph_errors.extend(product_errors);
    }

    let mut entities = Vec::new();
    for node in snapshot.iter_nodes() {
        if resolved.is_skipped(node.id()) {
            continue;
        }
        entities.push(evaluate_node(node, &resolved, snapshot));
    }

    let (taint_warnings, dangling_dependencies) = taint::check_propagation(snapshot);

    let report = ValidationReport {
        structural_errors: resolved.errors().to_vec(),
        graph_errors,
        entities,
        taint_warnings,
        dangling_dependencies,
        port_warnings,
    };
    tracing::debug!(
        entities = report.entities.len(),
        structural = report.structural_errors.len(),
        blocking = report.blocking_failure_count(),
        compliant = report.compliant(),
        "snapshot validated"
    );
    report
}

fn evaluate_node(node: &dyn MeshNode, resolved: &hierarchy::Resolved, snapshot: &Snapshot) -> EntityReport {
    let policies = cascade::effective_policies(node, resolved, snapshot);
    let results = evaluate::evaluate_entity(node, &policies);

    let mut report = EntityReport {
        id: node.id().to_string(),
        kind: node.kind(),
        effective_policies: policies.iter().map(|p| p.id.clone()).collect(),
        blocking_failures: Vec::new(),
        warnings: Vec::new(),
        audit_entries: Vec::new(),
        evaluation_errors: Vec::new(),
        passed: 0,
    };
    for result in results {
        match result.outcome {
            Outcome::Passed => report.passed += 1,
            Outcome::Error { .. } => report.evaluation_errors.push(result),
            Outcome::Failed if result.enforcement == Enforcement::Audit => {
                report.audit_entries.push(result)
            }
            Outcome::Failed if result.is_blocking() => report.blocking_failures.push(result),
            Outcome::Failed => report.warnings.push(result),
        }
    }
    report
}

/// Shape-check every declared port. A port missing its family's
/// required field is a structural error and isolates its owner from
/// evaluation; a duplicate port name likewise. Fields from another
/// family are merely warned about.
fn check_ports(snapshot: &Snapshot, resolved: &mut hierarchy::Resolved) -> Vec<PortWarning> {
    let mut warnings = Vec::new();
    for node in snapshot.iter_nodes() {
        let ports = node.ports();
        for (index, port) in ports.iter().enumerate() {
            let missing = port.missing_required();
            if !missing.is_empty() {
                resolved.push_error(StructuralError::MalformedPort {
                    owner_kind: node.kind(),
                    owner: node.id().to_string(),
                    port: port.name.clone(),
                    missing: missing.iter().map(|m| (*m).to_string()).collect(),
                });
                resolved.skip(node.id());
            }
            if ports[..index].iter().any(|earlier| earlier.name == port.name) {
                resolved.push_error(StructuralError::DuplicatePort {
                    owner_kind: node.kind(),
                    owner: node.id().to_string(),
                    port: port.name.clone(),
                });
                resolved.skip(node.id());
            }
            let stray = port.stray_fields();
            if !stray.is_empty() {
                warnings.push(PortWarning {
                    owner: node.id().to_string(),
                    port: port.name.clone(),
                    stray: stray.iter().map(|s| (*s).to_string()).collect(),
                });
            }
        }
    }
    warnings
}
