// evaluate.rs — Constraint evaluation against one entity.
//
// Every constraint in every effective policy is evaluated and recorded
// — no result is ever silently dropped. Three outcomes:
//
//   Passed  — expression evaluated to true
//   Failed  — expression evaluated to false (a clean violation)
//   Error   — expression could not be parsed or evaluated
//
// Failed and Error are deliberately distinct: "constraint violated" and
// "constraint could not be checked" call for different operator action.
// Whether a Failed result blocks the run is enforcement × severity:
// only a blocking policy's error-severity constraint blocks.

use serde::Serialize;

use cma_expr::{eval_bool, parse};
use cma_model::{Constraint, Enforcement, MeshNode, Policy, Severity};

use crate::context::EntityContext;

/// How one constraint evaluation ended.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    /// The constraint could not be evaluated — parse failure or type
    /// mismatch. Surfaced, never blocking.
    Error { detail: String },
}

/// The record of one constraint checked against one entity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConstraintResult {
    /// The owning policy, or None for an entity's standalone
    /// constraints.
    pub policy_id: Option<String>,
    pub expression: String,
    pub message: String,
    pub severity: Severity,
    pub enforcement: Enforcement,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ConstraintResult {
    /// A blocking failure makes the whole run non-compliant.
    pub fn is_blocking(&self) -> bool {
        self.outcome == Outcome::Failed
            && self.enforcement == Enforcement::Blocking
            && self.severity == Severity::Error
    }

    /// Failed, but gated from blocking by enforcement or severity.
    pub fn is_warning(&self) -> bool {
        self.outcome == Outcome::Failed && !self.is_blocking()
    }
}

/// Evaluate every constraint of every effective policy against the
/// entity, then the entity's own standalone constraints.
///
/// Standalone constraints have no owning policy to carry an enforcement
/// mode; they are treated as blocking, so their severity alone decides
/// blocking (error) versus warning.
pub fn evaluate_entity(node: &dyn MeshNode, policies: &[Policy]) -> Vec<ConstraintResult> {
    let context = EntityContext::new(node);
    let mut results = Vec::new();

    for policy in policies {
        for constraint in &policy.constraints {
            results.push(evaluate_one(
                &context,
                constraint,
                Some(policy.id.clone()),
                policy.enforcement,
            ));
        }
    }

    for constraint in node.constraints() {
        results.push(evaluate_one(&context, constraint, None, Enforcement::Blocking));
    }

    tracing::debug!(
        entity = node.id(),
        constraints = results.len(),
        blocking = results.iter().filter(|r| r.is_blocking()).count(),
        "evaluated entity constraints"
    );
    results
}

fn evaluate_one(
    context: &EntityContext<'_>,
    constraint: &Constraint,
    policy_id: Option<String>,
    enforcement: Enforcement,
) -> ConstraintResult {
    let outcome = match parse(&constraint.expression) {
        Ok(expr) => match eval_bool(&expr, context) {
            Ok(true) => Outcome::Passed,
            Ok(false) => Outcome::Failed,
            Err(error) => Outcome::Error {
                detail: error.to_string(),
            },
        },
        Err(error) => Outcome::Error {
            detail: error.to_string(),
        },
    };

    ConstraintResult {
        policy_id,
        expression: constraint.expression.clone(),
        message: constraint.message.clone(),
        severity: constraint.severity,
        enforcement,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixin;
    use cma_model::{Product, Snapshot};

    fn product(yaml: &str) -> Product {
        let snapshot = Snapshot::from_yaml(yaml).unwrap();
        snapshot.products.values().next().unwrap().clone()
    }

    #[test]
    fn pii_product_without_encryption_blocks() {
        // PII tag with encryption at rest explicitly false.
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    tags: ["PII"]
    deployment:
      environment: production
      encryption:
        atRest: false
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let results = evaluate_entity(&product, &policies);

        let blocking: Vec<_> = results.iter().filter(|r| r.is_blocking()).collect();
        // atRest is explicitly false; inTransit and accessLogging are
        // absent, which compares unequal to true.
        assert_eq!(blocking.len(), 3);
        assert!(blocking[0].message.contains("encrypted at rest"));
        // accessLogging.enabled == true on an absent path is a clean
        // false, not an evaluation error.
        assert!(results
            .iter()
            .all(|r| !matches!(r.outcome, Outcome::Error { .. })));
    }

    #[test]
    fn compliant_pii_product_passes_all_mixin_constraints() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    tags: ["PII"]
    deployment:
      environment: production
      encryption:
        atRest: true
        inTransit: true
      accessLogging:
        enabled: true
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let results = evaluate_entity(&product, &policies);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.outcome == Outcome::Passed));
    }

    #[test]
    fn masking_required_outside_production() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    tags: ["PII"]
    deployment:
      environment: staging
      encryption:
        atRest: true
        inTransit: true
      accessLogging:
        enabled: true
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let results = evaluate_entity(&product, &policies);
        let masking = &results[3];
        assert_eq!(masking.outcome, Outcome::Failed);
        assert!(masking.message.contains("masked"));
    }

    #[test]
    fn warning_enforcement_never_blocks() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    policies:
      - id: advisory
        name: "Advisory"
        scope: product
        policyType: quality
        enforcement: warning
        constraints:
          - { expression: "status == 'live'", message: "should be live", severity: error }
    deployment: { environment: production }
"#,
        );
        let policies = product.policies.clone();
        let results = evaluate_entity(&product, &policies);
        assert_eq!(results[0].outcome, Outcome::Failed);
        assert!(!results[0].is_blocking());
        assert!(results[0].is_warning());
    }

    #[test]
    fn warning_severity_in_blocking_policy_does_not_block() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    tags: ["SOC2"]
    deployment:
      environment: production
      monitoring:
        enabled: true
        logRetentionDays: 30
      alerting:
        enabled: true
      changeManagement:
        approvalRequired: true
      incidentResponse:
        documented: true
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let results = evaluate_entity(&product, &policies);
        // Only the warning-severity log retention constraint fails.
        let failed: Vec<_> = results
            .iter()
            .filter(|r| r.outcome == Outcome::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].severity, Severity::Warning);
        assert!(!failed[0].is_blocking());
        assert!(failed[0].is_warning());
    }

    #[test]
    fn unevaluable_constraint_is_error_not_failure() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    constraints:
      - { expression: "deployment.retention.maxDays <= 2555", message: "retention bound" }
    deployment: { environment: production }
"#,
        );
        // retention.maxDays is absent → ordering is a type mismatch.
        let results = evaluate_entity(&product, &[]);
        assert!(matches!(results[0].outcome, Outcome::Error { .. }));
        assert!(!results[0].is_blocking());
        assert!(!results[0].is_warning());
    }

    #[test]
    fn malformed_expression_is_error() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    constraints:
      - { expression: "status == ", message: "broken" }
    deployment: { environment: production }
"#,
        );
        let results = evaluate_entity(&product, &[]);
        match &results[0].outcome {
            Outcome::Error { detail } => assert!(detail.contains("parse error")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn standalone_constraints_follow_policy_results() {
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    status: live
    tags: ["PII"]
    constraints:
      - { expression: "status == 'live'", message: "must be live" }
    deployment:
      environment: production
      encryption: { atRest: true, inTransit: true }
      accessLogging: { enabled: true }
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let results = evaluate_entity(&product, &policies);
        assert_eq!(results.len(), 5);
        let standalone = results.last().unwrap();
        assert_eq!(standalone.policy_id, None);
        assert_eq!(standalone.outcome, Outcome::Passed);
    }

    #[test]
    fn evaluation_is_deterministic_across_runs() {
        // Two runs over the same snapshot must produce identical
        // serialized results.
        let product = product(
            r#"
products:
  p1:
    id: p1
    name: "P1"
    tags: ["PII", "GDPR"]
    deployment:
      environment: production
      encryption: { atRest: true }
"#,
        );
        let policies = mixin::policies_for_tags(&product.tags);
        let first = serde_json::to_string(&evaluate_entity(&product, &policies)).unwrap();
        let second = serde_json::to_string(&evaluate_entity(&product, &policies)).unwrap();
        assert_eq!(first, second);
    }
}
