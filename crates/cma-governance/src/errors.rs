// errors.rs — Structural and graph error taxonomy.
//
// Structural errors indicate malformed input: they are always reported,
// never silently dropped, and any of them makes the whole run
// non-compliant. Errors are values in the validation report (hence
// Serialize), not early exits — the engine collects the complete set.

use serde::Serialize;
use thiserror::Error;

use cma_model::EntityKind;

/// Malformed-input errors found while resolving the entity graph.
#[derive(Debug, Clone, Serialize, PartialEq, Error)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum StructuralError {
    /// The same id appears in more than one collection — unqualified
    /// cross-references would be ambiguous.
    #[error("id '{id}' appears in multiple collections: {kinds:?}")]
    DuplicateId { id: String, kinds: Vec<EntityKind> },

    /// A collection key does not match the entity's own id field.
    #[error("{kind} stored under key '{key}' declares id '{id}'")]
    IdMismatch {
        kind: EntityKind,
        key: String,
        id: String,
    },

    /// A parent or membership reference points at a nonexistent entity.
    #[error("{kind} '{id}': field {field} references unknown entity '{target}'")]
    DanglingReference {
        kind: EntityKind,
        id: String,
        field: String,
        target: String,
    },

    /// A dependsOn or template graph contains a cycle.
    #[error("cyclic {kind} dependency: {cycle:?}")]
    CyclicDependency { kind: EntityKind, cycle: Vec<String> },

    /// A component's template reference points at another instance —
    /// templates are flat, not chainable.
    #[error("component '{component}': template '{template}' is itself an instance")]
    TemplateChain { component: String, template: String },

    /// An entity's id or name is an empty string.
    #[error("{kind} '{id}': {field} must not be empty")]
    EmptyField {
        kind: EntityKind,
        id: String,
        field: String,
    },

    /// A policy declares no constraints — it could never be satisfied
    /// or violated, so it is malformed rather than vacuous.
    #[error("{kind} '{id}': policy '{policy}' has no constraints")]
    ConstraintlessPolicy {
        kind: EntityKind,
        id: String,
        policy: String,
    },

    /// A port is missing fields its declared portType requires.
    #[error("{owner_kind} '{owner}': port '{port}' is missing required fields {missing:?}")]
    MalformedPort {
        owner_kind: EntityKind,
        owner: String,
        port: String,
        missing: Vec<String>,
    },

    /// Two ports on the same entity share a name.
    #[error("{owner_kind} '{owner}': duplicate port name '{port}'")]
    DuplicatePort {
        owner_kind: EntityKind,
        owner: String,
        port: String,
    },
}

impl StructuralError {
    /// The id of the entity this error is attached to, used to isolate
    /// that entity from downstream evaluation.
    pub fn entity_id(&self) -> &str {
        match self {
            StructuralError::DuplicateId { id, .. } => id,
            StructuralError::IdMismatch { id, .. } => id,
            StructuralError::DanglingReference { id, .. } => id,
            // Cycles implicate every member; the first stands in.
            StructuralError::CyclicDependency { cycle, .. } => {
                cycle.first().map(String::as_str).unwrap_or("")
            }
            StructuralError::TemplateChain { component, .. } => component,
            StructuralError::EmptyField { id, .. } => id,
            StructuralError::ConstraintlessPolicy { id, .. } => id,
            StructuralError::MalformedPort { owner, .. } => owner,
            StructuralError::DuplicatePort { owner, .. } => owner,
        }
    }
}

/// Component wiring errors for one composite product.
#[derive(Debug, Clone, Serialize, PartialEq, Error)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum GraphError {
    /// An atomic product (≤1 component) declares wiring.
    #[error("product '{product}': componentGraph present but product is atomic")]
    UnexpectedGraph { product: String },

    /// A composite product (>1 component) has no wiring.
    #[error("product '{product}': composite product requires a componentGraph")]
    MissingGraph { product: String },

    /// An edge endpoint is not in the product's components list.
    #[error("product '{product}': edge {edge} references unknown component '{reference}'")]
    UnknownComponentReference {
        product: String,
        edge: usize,
        reference: String,
    },

    /// An edge endpoint port is missing or has an incompatible
    /// direction for its role.
    #[error("product '{product}': edge {edge} port '{port}' on '{component}': {reason}")]
    InvalidPortDirection {
        product: String,
        edge: usize,
        component: String,
        port: String,
        reason: String,
    },

    /// An edge wires a component to itself.
    #[error("product '{product}': edge {edge} is a self-loop on '{component}'")]
    SelfLoopEdge {
        product: String,
        edge: usize,
        component: String,
    },

    /// The component graph contains a cycle.
    #[error("product '{product}': componentGraph cycle {cycle:?}")]
    CyclicComponentGraph { product: String, cycle: Vec<String> },
}
