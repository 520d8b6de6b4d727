//! # cma-model
//!
//! Catalog entity model for the Composable Mesh Architecture.
//!
//! Defines the six-level hierarchy (Organization → Mesh → Domain →
//! Product → Component, with [`Port`]s on the bottom two levels), the
//! governance value types ([`Policy`], [`Constraint`]), semantic
//! annotations, the open deployment attribute tree, and the
//! [`Snapshot`] container the governance engine validates.
//!
//! Everything here is pure data: invariant *checking* lives in
//! cma-governance. The one piece of I/O is [`Snapshot::load`], which
//! reads the DSL compiler's YAML/JSON export.

pub mod deployment;
pub mod entity;
pub mod error;
pub mod policy;
pub mod port;
pub mod semantics;
pub mod snapshot;

// Re-export the main types at the crate root for convenience.
pub use deployment::{AttrValue, DeploymentSpec, SourceRepository};
pub use entity::{
    Component, ComponentKind, Domain, EntityKind, Mesh, MeshNode, Organization, Product,
    ProductKind, Status,
};
pub use error::ModelError;
pub use policy::{Constraint, Enforcement, Policy, PolicyScope, PolicyType, Severity};
pub use port::{ComponentEdge, Direction, Port, PortKind};
pub use semantics::{DataClassification, SemanticMetadata};
pub use snapshot::Snapshot;
