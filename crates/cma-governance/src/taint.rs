// taint.rs — Sensitivity tag propagation along dependency edges.
//
// A sensitivity tag on a dependency taints its consumers: anything
// that reads PII-tagged data handles PII. Propagation is advisory —
// it produces warnings, never blocking failures — because the
// downstream entity may legitimately strip or aggregate away the
// sensitive content. An explicit `exempt:<TAG>` tag on the consumer
// records exactly that decision and suppresses the warning.

use serde::Serialize;

use cma_model::{MeshNode, Snapshot};

use crate::mixin::SENSITIVITY_TAGS;

/// An entity consumes a sensitivity-tagged dependency without carrying
/// (or being exempted from) the tag itself.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaintWarning {
    /// The consuming entity.
    pub entity: String,
    /// The sensitivity tag the entity is missing.
    pub missing_tag: String,
    /// The tagged dependency that triggered the warning.
    pub referenced: String,
}

/// A dependency reference that resolves to no entity in the snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DanglingDependency {
    pub entity: String,
    pub reference: String,
}

/// Walk every entity's dependency references and compare sensitivity
/// tags. Only direct dependencies are inspected; transitive taint
/// arrives for free once the intermediate entity is tagged.
pub fn check_propagation(snapshot: &Snapshot) -> (Vec<TaintWarning>, Vec<DanglingDependency>) {
    let mut warnings = Vec::new();
    let mut dangling = Vec::new();

    for node in snapshot.iter_nodes() {
        for reference in dependency_refs(node) {
            let Some(dependency) = snapshot.find(&reference) else {
                dangling.push(DanglingDependency {
                    entity: node.id().to_string(),
                    reference,
                });
                continue;
            };
            for tag in SENSITIVITY_TAGS {
                if !has_tag(dependency.tags(), tag) {
                    continue;
                }
                if has_tag(node.tags(), tag) || is_exempt(node.tags(), tag) {
                    continue;
                }
                warnings.push(TaintWarning {
                    entity: node.id().to_string(),
                    missing_tag: (*tag).to_string(),
                    referenced: dependency.id().to_string(),
                });
            }
        }
    }

    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "taint propagation warnings");
    }
    (warnings, dangling)
}

/// Declared dependencies plus semantic upstream references, first
/// occurrence order, duplicates removed.
fn dependency_refs(node: &dyn MeshNode) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let upstream = node
        .semantics()
        .map(|s| s.upstream_dependencies.as_slice())
        .unwrap_or(&[]);
    for reference in node.depends_on().iter().chain(upstream) {
        if !refs.iter().any(|seen| seen == reference) {
            refs.push(reference.clone());
        }
    }
    refs
}

fn has_tag(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t == tag)
}

fn is_exempt(tags: &[String], tag: &str) -> bool {
    let marker = format!("exempt:{tag}");
    tags.iter().any(|t| t == &marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(yaml: &str) -> Snapshot {
        Snapshot::from_yaml(yaml).unwrap()
    }

    #[test]
    fn untagged_consumer_of_pii_product_is_warned() {
        let snapshot = snapshot(
            r#"
products:
  customer-profiles:
    id: customer-profiles
    name: "Customer Profiles"
    tags: ["PII"]
    deployment: { environment: production }
  marketing-report:
    id: marketing-report
    name: "Marketing Report"
    dependsOn: ["customer-profiles"]
    deployment: { environment: production }
"#,
        );
        let (warnings, dangling) = check_propagation(&snapshot);
        assert!(dangling.is_empty());
        assert_eq!(
            warnings,
            vec![TaintWarning {
                entity: "marketing-report".into(),
                missing_tag: "PII".into(),
                referenced: "customer-profiles".into(),
            }]
        );
    }

    #[test]
    fn tagged_consumer_is_not_warned() {
        let snapshot = snapshot(
            r#"
products:
  customer-profiles:
    id: customer-profiles
    name: "Customer Profiles"
    tags: ["PII"]
    deployment: { environment: production }
  crm-sync:
    id: crm-sync
    name: "CRM Sync"
    tags: ["PII"]
    dependsOn: ["customer-profiles"]
    deployment: { environment: production }
"#,
        );
        let (warnings, _) = check_propagation(&snapshot);
        assert!(warnings.is_empty());
    }

    #[test]
    fn exemption_tag_suppresses_the_warning() {
        let snapshot = snapshot(
            r#"
products:
  customer-profiles:
    id: customer-profiles
    name: "Customer Profiles"
    tags: ["PII", "GDPR"]
    deployment: { environment: production }
  anonymized-stats:
    id: anonymized-stats
    name: "Anonymized Stats"
    tags: ["exempt:PII"]
    dependsOn: ["customer-profiles"]
    deployment: { environment: production }
"#,
        );
        let (warnings, _) = check_propagation(&snapshot);
        // PII is exempted; GDPR still propagates.
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].missing_tag, "GDPR");
    }

    #[test]
    fn semantic_upstreams_propagate_taint_too() {
        let snapshot = snapshot(
            r#"
products:
  card-transactions:
    id: card-transactions
    name: "Card Transactions"
    tags: ["PCI-DSS"]
    deployment: { environment: production }
  fraud-model:
    id: fraud-model
    name: "Fraud Model"
    semantics:
      upstreamDependencies: ["card-transactions"]
    deployment: { environment: production }
"#,
        );
        let (warnings, _) = check_propagation(&snapshot);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].missing_tag, "PCI-DSS");
    }

    #[test]
    fn duplicate_references_warn_once() {
        let snapshot = snapshot(
            r#"
products:
  customer-profiles:
    id: customer-profiles
    name: "Customer Profiles"
    tags: ["PII"]
    deployment: { environment: production }
  report:
    id: report
    name: "Report"
    dependsOn: ["customer-profiles"]
    semantics:
      upstreamDependencies: ["customer-profiles"]
    deployment: { environment: production }
"#,
        );
        let (warnings, _) = check_propagation(&snapshot);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unresolvable_reference_is_reported_as_dangling() {
        let snapshot = snapshot(
            r#"
products:
  report:
    id: report
    name: "Report"
    dependsOn: ["no-such-product"]
    deployment: { environment: production }
"#,
        );
        let (warnings, dangling) = check_propagation(&snapshot);
        assert!(warnings.is_empty());
        assert_eq!(
            dangling,
            vec![DanglingDependency {
                entity: "report".into(),
                reference: "no-such-product".into(),
            }]
        );
    }

    #[test]
    fn nontransitive_taint_stops_at_untagged_intermediary() {
        let snapshot = snapshot(
            r#"
products:
  raw-pii:
    id: raw-pii
    name: "Raw"
    tags: ["PII"]
    deployment: { environment: production }
  middle:
    id: middle
    name: "Middle"
    dependsOn: ["raw-pii"]
    deployment: { environment: production }
  leaf:
    id: leaf
    name: "Leaf"
    dependsOn: ["middle"]
    deployment: { environment: production }
"#,
        );
        let (warnings, _) = check_propagation(&snapshot);
        // middle is warned about raw-pii; leaf is not, because middle
        // itself carries no tag.
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entity, "middle");
    }
}
