//! # cma-governance
//!
//! The governance validation engine for Composable Mesh Architecture
//! catalogs: given a [`cma_model::Snapshot`], produce one aggregated
//! [`ValidationReport`] covering structure, policy, wiring, and data
//! sensitivity.
//!
//! The pipeline behind [`validate`]:
//!
//! 1. **Hierarchy resolution** — key/id agreement, duplicate ids,
//!    ancestor chains, dependency cycles, template links.
//! 2. **Port shape checks** — each port carries its family's required
//!    field and no duplicate names.
//! 3. **Component graph validation** — composite products wire their
//!    components into a DAG with direction-compatible ports.
//! 4. **Policy cascade** — explicit policies plus tag-activated
//!    compliance mixins, accumulated root-first down each chain.
//! 5. **Constraint evaluation** — every effective constraint checked
//!    against the entity's resolved attributes; failures partitioned
//!    by enforcement and severity.
//! 6. **Taint propagation** — sensitivity tags flow along dependency
//!    edges as advisory warnings.
//!
//! Nothing fails fast: validation always returns a complete report,
//! and the same snapshot always produces the same report.

pub mod cascade;
pub mod context;
pub mod errors;
pub mod evaluate;
pub mod graph;
pub mod hierarchy;
pub mod mixin;
pub mod report;
pub mod taint;

pub use errors::{GraphError, StructuralError};
pub use evaluate::{ConstraintResult, Outcome};
pub use report::{validate, EntityReport, PortWarning, ValidationReport};
pub use taint::{DanglingDependency, TaintWarning};
