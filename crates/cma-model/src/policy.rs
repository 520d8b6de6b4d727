// policy.rs — Governance policy and constraint value types.
//
// A Policy bundles an ordered list of Constraints under one enforcement
// mode. Policies are declared locally on any catalog entity and cascade
// down the hierarchy; the cascade itself lives in cma-governance — these
// types carry no behavior beyond classification helpers.

use serde::{Deserialize, Serialize};

/// A governance policy — an enforceable bundle of constraints.
///
/// Declared in the catalog DSL as a `policies` entry on any entity:
/// ```yaml
/// policies:
///   - id: "encryption-baseline"
///     name: "Encryption Baseline"
///     scope: organization
///     policyType: security
///     enforcement: blocking
///     constraints:
///       - expression: "deployment.encryption.atRest == true"
///         message: "Data must be encrypted at rest"
///         severity: error
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Unique within the defining scope; cascaded lists may repeat ids
    /// across scopes (cascading is purely additive).
    pub id: String,

    /// Human-readable policy name.
    pub name: String,

    /// The hierarchy level this policy is intended to govern.
    pub scope: PolicyScope,

    /// What concern the policy addresses.
    pub policy_type: PolicyType,

    /// Whether failures of this policy's constraints can block a run.
    pub enforcement: Enforcement,

    /// The constraints enforced by this policy. Must be non-empty.
    pub constraints: Vec<Constraint>,
}

/// The hierarchy level a policy targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyScope {
    Organization,
    Mesh,
    Domain,
    Product,
    Port,
}

/// The governance concern a policy addresses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    Security,
    Privacy,
    Quality,
    Compliance,
    Cost,
}

/// How strictly a policy's constraint failures are treated.
///
/// Enforcement gates whether *any* failure in the policy can block the
/// run; constraint severity only labels message urgency for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    /// An error-severity failure makes the whole run non-compliant.
    Blocking,
    /// Failures are reported but never block.
    Warning,
    /// Evaluated and recorded, never contributes to pass/fail.
    Audit,
}

impl std::fmt::Display for Enforcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Enforcement::Blocking => write!(f, "blocking"),
            Enforcement::Warning => write!(f, "warning"),
            Enforcement::Audit => write!(f, "audit"),
        }
    }
}

/// A single checkable rule: a boolean expression over the entity's
/// resolved attributes, plus the message shown when it fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Constraint {
    /// Expression in the constraint mini-language (parsed by cma-expr),
    /// e.g. `deployment.encryption.atRest == true`.
    pub expression: String,

    /// Shown to the operator when the constraint fails.
    pub message: String,

    /// Failure urgency. Defaults to error.
    #[serde(default)]
    pub severity: Severity,
}

/// Constraint failure urgency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
