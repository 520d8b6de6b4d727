// entity.rs — The six-level catalog hierarchy.
//
// Organization → Mesh → Domain → Product → Component (Ports hang off
// Products and Components). Each level is its own struct because the
// parent-reference field is typed per level — a Domain can only point at
// a Mesh, which is what makes hierarchy cycles impossible by
// construction. The shared capability set (identity, lifecycle,
// governance, semantics, deployment) is exposed through the MeshNode
// trait so the governance engine can treat all levels uniformly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentSpec;
use crate::policy::{Constraint, Policy};
use crate::port::{ComponentEdge, Port};
use crate::semantics::SemanticMetadata;

/// Which hierarchy level an entity belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Organization,
    Mesh,
    Domain,
    Product,
    Component,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Organization => write!(f, "organization"),
            EntityKind::Mesh => write!(f, "mesh"),
            EntityKind::Domain => write!(f, "domain"),
            EntityKind::Product => write!(f, "product"),
            EntityKind::Component => write!(f, "component"),
        }
    }
}

/// Lifecycle status shared by every entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Proposed,
    Experimental,
    Live,
    Deprecated,
    Retired,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Proposed => write!(f, "proposed"),
            Status::Experimental => write!(f, "experimental"),
            Status::Live => write!(f, "live"),
            Status::Deprecated => write!(f, "deprecated"),
            Status::Retired => write!(f, "retired"),
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// The shared capability set of every catalog entity: identity,
/// lifecycle, governance, semantics, deployment.
///
/// Implemented by all five hierarchy levels so the governance engine can
/// cascade policies and evaluate constraints without caring which level
/// it is looking at.
pub trait MeshNode {
    fn kind(&self) -> EntityKind;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn status(&self) -> Status;
    fn owner(&self) -> Option<&str>;
    fn tags(&self) -> &[String];
    fn policies(&self) -> &[Policy];
    fn constraints(&self) -> &[Constraint];
    fn semantics(&self) -> Option<&SemanticMetadata>;
    fn deployment(&self) -> &DeploymentSpec;

    /// The typed parent reference, if this level has one and it is set.
    fn parent_ref(&self) -> Option<(EntityKind, &str)>;

    /// Same-level dependency references (Products and Components only).
    fn depends_on(&self) -> &[String] {
        &[]
    }

    /// Ports owned directly by this entity (Products and Components only).
    fn ports(&self) -> &[Port] {
        &[]
    }
}

// Generates the common-field accessors for a MeshNode impl. The
// per-level methods (parent_ref, depends_on, ports) stay hand-written.
macro_rules! mesh_node_common {
    ($kind:expr) => {
        fn kind(&self) -> EntityKind {
            $kind
        }
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn version(&self) -> &str {
            &self.version
        }
        fn status(&self) -> Status {
            self.status
        }
        fn owner(&self) -> Option<&str> {
            self.owner.as_deref()
        }
        fn tags(&self) -> &[String] {
            &self.tags
        }
        fn policies(&self) -> &[Policy] {
            &self.policies
        }
        fn constraints(&self) -> &[Constraint] {
            &self.constraints
        }
        fn semantics(&self) -> Option<&SemanticMetadata> {
            self.semantics.as_ref()
        }
        fn deployment(&self) -> &DeploymentSpec {
            &self.deployment
        }
    };
}

/// Root of the hierarchy. Has no parent reference by construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<SemanticMetadata>,
    pub deployment: DeploymentSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    /// Two-letter jurisdiction code (e.g., "DE", "US").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    /// Regulatory frameworks the organization is subject to.
    #[serde(default)]
    pub regulatory_framework: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
}

impl MeshNode for Organization {
    mesh_node_common!(EntityKind::Organization);

    fn parent_ref(&self) -> Option<(EntityKind, &str)> {
        None
    }
}

/// A mesh — the federation boundary below an Organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mesh {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<SemanticMetadata>,
    pub deployment: DeploymentSpec,

    /// Parent Organization, if federated under one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl MeshNode for Mesh {
    mesh_node_common!(EntityKind::Mesh);

    fn parent_ref(&self) -> Option<(EntityKind, &str)> {
        self.organization_id
            .as_deref()
            .map(|id| (EntityKind::Organization, id))
    }
}

/// A business domain within a mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<SemanticMetadata>,
    pub deployment: DeploymentSpec,

    /// Parent Mesh, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_id: Option<String>,
}

impl MeshNode for Domain {
    mesh_node_common!(EntityKind::Domain);

    fn parent_ref(&self) -> Option<(EntityKind, &str)> {
        self.mesh_id.as_deref().map(|id| (EntityKind::Mesh, id))
    }
}

/// What a Product delivers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    #[default]
    Dataset,
    Api,
    Stream,
    Dashboard,
    Algorithm,
    Service,
}

/// A data product. Atomic (≤1 component) or composite (>1 component,
/// wired by a componentGraph that must form a DAG).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<SemanticMetadata>,
    pub deployment: DeploymentSpec,

    /// Parent Domain, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(default)]
    pub kind: ProductKind,
    /// Component ids assembled into this product. Empty means atomic.
    #[serde(default)]
    pub components: Vec<String>,
    /// Wiring between components. Required and non-empty iff
    /// `components` has more than one entry.
    #[serde(default)]
    pub component_graph: Vec<ComponentEdge>,
    /// Ports owned directly by the product (componentId unset).
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Other Product ids this product consumes.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl Product {
    /// Composite products carry wiring; atomic ones must not.
    pub fn is_composite(&self) -> bool {
        self.components.len() > 1
    }
}

impl MeshNode for Product {
    mesh_node_common!(EntityKind::Product);

    fn parent_ref(&self) -> Option<(EntityKind, &str)> {
        self.domain_id.as_deref().map(|id| (EntityKind::Domain, id))
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn ports(&self) -> &[Port] {
        &self.ports
    }
}

/// What role a Component plays inside a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Ingestion,
    Transformation,
    Aggregation,
    Serving,
    Orchestration,
    Service,
    Infrastructure,
}

fn default_reusable() -> bool {
    true
}

/// A reusable processing unit. A Component without `template` is itself
/// a template; one with `template` set is an instance of that template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<SemanticMetadata>,
    pub deployment: DeploymentSpec,

    /// Owning Product — set for instances, absent for templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub kind: ComponentKind,
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Other Component ids this component consumes.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// The template this component instantiates. Templates are flat:
    /// the referenced component must not itself have a template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default = "default_reusable")]
    pub reusable: bool,
    /// Execution runtime. The DSL leaves this vocabulary open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl Component {
    /// A component with no `template` reference is itself a template.
    pub fn is_template(&self) -> bool {
        self.template.is_none()
    }
}

impl MeshNode for Component {
    mesh_node_common!(EntityKind::Component);

    fn parent_ref(&self) -> Option<(EntityKind, &str)> {
        self.product_id
            .as_deref()
            .map(|id| (EntityKind::Product, id))
    }

    fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    fn ports(&self) -> &[Port] {
        &self.ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_minimal_yaml() {
        let org: Organization = serde_yaml::from_str(
            r#"
id: acme
name: "ACME Corp"
deployment:
  environment: production
"#,
        )
        .unwrap();
        assert_eq!(org.version, "0.1.0");
        assert_eq!(org.status, Status::Proposed);
        assert!(org.parent_ref().is_none());
        assert!(org.tags.is_empty());
    }

    #[test]
    fn mesh_parent_ref_points_at_organization() {
        let mesh: Mesh = serde_yaml::from_str(
            r#"
id: retail-mesh
name: "Retail Mesh"
organizationId: acme
deployment:
  environment: production
"#,
        )
        .unwrap();
        assert_eq!(
            mesh.parent_ref(),
            Some((EntityKind::Organization, "acme"))
        );
    }

    #[test]
    fn product_defaults_to_atomic_dataset() {
        let product: Product = serde_yaml::from_str(
            r#"
id: customer-360
name: "Customer 360"
domainId: customers
deployment:
  environment: production
"#,
        )
        .unwrap();
        assert_eq!(product.kind, ProductKind::Dataset);
        assert!(!product.is_composite());
        assert!(product.component_graph.is_empty());
        assert_eq!(
            product.parent_ref(),
            Some((EntityKind::Domain, "customers"))
        );
    }

    #[test]
    fn component_template_detection() {
        let template: Component = serde_yaml::from_str(
            r#"
id: kafka-ingest
name: "Kafka Ingestion"
kind: ingestion
deployment:
  environment: production
"#,
        )
        .unwrap();
        assert!(template.is_template());
        assert!(template.reusable);

        let instance: Component = serde_yaml::from_str(
            r#"
id: orders-ingest
name: "Orders Ingestion"
kind: ingestion
productId: orders
template: kafka-ingest
deployment:
  environment: production
"#,
        )
        .unwrap();
        assert!(!instance.is_template());
        assert_eq!(
            instance.parent_ref(),
            Some((EntityKind::Product, "orders"))
        );
    }

    #[test]
    fn status_lifecycle_parses() {
        for (text, status) in [
            ("proposed", Status::Proposed),
            ("experimental", Status::Experimental),
            ("live", Status::Live),
            ("deprecated", Status::Deprecated),
            ("retired", Status::Retired),
        ] {
            let parsed: Status = serde_yaml::from_str(text).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn trait_object_view_is_uniform() {
        let product: Product = serde_yaml::from_str(
            r#"
id: p1
name: "P1"
tags: ["PII"]
dependsOn: ["p0"]
deployment:
  environment: production
"#,
        )
        .unwrap();
        let node: &dyn MeshNode = &product;
        assert_eq!(node.kind(), EntityKind::Product);
        assert_eq!(node.id(), "p1");
        assert_eq!(node.tags(), ["PII".to_string()]);
        assert_eq!(node.depends_on(), ["p0".to_string()]);
    }
}
