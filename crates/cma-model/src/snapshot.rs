// snapshot.rs — The validated input unit: one immutable catalog snapshot.
//
// A snapshot is the DSL compiler's export of the full entity set, one
// id-keyed map per hierarchy level. BTreeMap keeps iteration order
// deterministic, which the governance engine relies on for byte-stable
// reports. Snapshots are value snapshots: validation never mutates one,
// a re-validation pass simply starts from a fresh snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{Component, Domain, EntityKind, Mesh, MeshNode, Organization, Product};
use crate::error::ModelError;

/// Flat collections of every catalog entity, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub organizations: BTreeMap<String, Organization>,
    pub meshes: BTreeMap<String, Mesh>,
    pub domains: BTreeMap<String, Domain>,
    pub products: BTreeMap<String, Product>,
    pub components: BTreeMap<String, Component>,
}

impl Snapshot {
    /// Parse a snapshot from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ModelError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a snapshot file, dispatching on its extension.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let data = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&data)?,
            Some("json") => Self::from_json(&data)?,
            _ => {
                return Err(ModelError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        tracing::debug!(
            path = %path.display(),
            entities = snapshot.len(),
            "loaded catalog snapshot"
        );
        Ok(snapshot)
    }

    /// Total entity count across all collections.
    pub fn len(&self) -> usize {
        self.organizations.len()
            + self.meshes.len()
            + self.domains.len()
            + self.products.len()
            + self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an entity in the collection for its level.
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&dyn MeshNode> {
        match kind {
            EntityKind::Organization => self.organizations.get(id).map(|e| e as &dyn MeshNode),
            EntityKind::Mesh => self.meshes.get(id).map(|e| e as &dyn MeshNode),
            EntityKind::Domain => self.domains.get(id).map(|e| e as &dyn MeshNode),
            EntityKind::Product => self.products.get(id).map(|e| e as &dyn MeshNode),
            EntityKind::Component => self.components.get(id).map(|e| e as &dyn MeshNode),
        }
    }

    /// Look up an entity by bare id across all collections.
    ///
    /// Cross-references in the DSL are unqualified id strings; the union
    /// of all ids is required to be unique (duplicates are reported by
    /// the hierarchy resolver), so first match wins here.
    pub fn find(&self, id: &str) -> Option<&dyn MeshNode> {
        self.iter_nodes().find(|n| n.id() == id)
    }

    /// All entities in deterministic order: level by level
    /// (organizations first), each level ordered by id.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &dyn MeshNode> {
        let orgs = self.organizations.values().map(|e| e as &dyn MeshNode);
        let meshes = self.meshes.values().map(|e| e as &dyn MeshNode);
        let domains = self.domains.values().map(|e| e as &dyn MeshNode);
        let products = self.products.values().map(|e| e as &dyn MeshNode);
        let components = self.components.values().map(|e| e as &dyn MeshNode);
        orgs.chain(meshes).chain(domains).chain(products).chain(components)
    }

    /// Ids appearing in more than one collection, with the levels they
    /// appear at. Cross-references are unqualified, so these are
    /// ambiguous and structurally invalid.
    pub fn duplicate_ids(&self) -> Vec<(String, Vec<EntityKind>)> {
        let mut seen: BTreeMap<&str, Vec<EntityKind>> = BTreeMap::new();
        for node in self.iter_nodes() {
            seen.entry(node.id()).or_default().push(node.kind());
        }
        seen.into_iter()
            .filter(|(_, kinds)| kinds.len() > 1)
            .map(|(id, kinds)| (id.to_string(), kinds))
            .collect()
    }
}
