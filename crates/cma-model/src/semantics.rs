// semantics.rs — Semantic annotation metadata.
//
// Optional on any catalog entity. The upstream/downstream dependency
// lists feed the taint propagator in cma-governance; the rest is carried
// for downstream consumers (glossary tooling, graph sync) untouched.

use serde::{Deserialize, Serialize};

/// Semantic annotations attached to a catalog entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticMetadata {
    /// RDF class URI for the entity, if one is declared.
    pub rdf_type: Option<String>,

    /// Namespace URI the entity's terms live under.
    pub namespace: Option<String>,

    /// Business glossary terms this entity is linked to.
    pub business_glossary_terms: Vec<String>,

    /// Sensitivity classification of the data this entity carries.
    pub data_classification: Option<DataClassification>,

    /// Entity ids this entity consumes from (taint propagation input).
    pub upstream_dependencies: Vec<String>,

    /// Entity ids known to consume this entity.
    pub downstream_consumers: Vec<String>,
}

/// Data sensitivity classification levels, least to most restrictive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DataClassification {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl std::fmt::Display for DataClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataClassification::Public => write!(f, "public"),
            DataClassification::Internal => write!(f, "internal"),
            DataClassification::Confidential => write!(f, "confidential"),
            DataClassification::Restricted => write!(f, "restricted"),
        }
    }
}
