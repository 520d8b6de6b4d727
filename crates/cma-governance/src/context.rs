// context.rs — Field-path resolution for one entity.
//
// Bridges the entity model to the expression language: constraint
// expressions reference `status`, `tags`, `deployment.encryption.atRest`,
// `semantics.dataClassification`, ... and this resolver maps each path
// onto the entity's fields, its deployment attribute tree, and its
// semantic metadata. Anything unmapped resolves to Absent — never an
// error at resolution time.

use cma_expr::{Resolver, Value};
use cma_model::{AttrValue, MeshNode};

/// Resolves constraint field paths against a single entity.
pub struct EntityContext<'a> {
    node: &'a dyn MeshNode,
}

impl<'a> EntityContext<'a> {
    pub fn new(node: &'a dyn MeshNode) -> Self {
        Self { node }
    }
}

impl Resolver for EntityContext<'_> {
    fn resolve(&self, path: &[String]) -> Value {
        let Some((head, rest)) = path.split_first() else {
            return Value::Absent;
        };

        match head.as_str() {
            "id" if rest.is_empty() => Value::from(self.node.id()),
            "name" if rest.is_empty() => Value::from(self.node.name()),
            "version" if rest.is_empty() => Value::from(self.node.version()),
            "status" if rest.is_empty() => Value::from(self.node.status().to_string()),
            "owner" if rest.is_empty() => match self.node.owner() {
                Some(owner) => Value::from(owner),
                None => Value::Absent,
            },
            "tags" if rest.is_empty() => {
                Value::List(self.node.tags().iter().map(|t| Value::from(t.as_str())).collect())
            }
            // `environment` is a shortcut for `deployment.environment`.
            "environment" if rest.is_empty() => {
                Value::from(self.node.deployment().environment.as_str())
            }
            "deployment" => self.resolve_deployment(rest),
            "semantics" => self.resolve_semantics(rest),
            _ => Value::Absent,
        }
    }
}

impl EntityContext<'_> {
    fn resolve_deployment(&self, rest: &[String]) -> Value {
        let deployment = self.node.deployment();
        match rest.first().map(String::as_str) {
            None => Value::Absent,
            Some("environment") if rest.len() == 1 => {
                Value::from(deployment.environment.as_str())
            }
            _ => match deployment.lookup(rest) {
                Some(attr) => attr_to_value(attr),
                None => Value::Absent,
            },
        }
    }

    fn resolve_semantics(&self, rest: &[String]) -> Value {
        let Some(semantics) = self.node.semantics() else {
            return Value::Absent;
        };
        match rest.first().map(String::as_str) {
            Some("dataClassification") if rest.len() == 1 => {
                match semantics.data_classification {
                    Some(classification) => Value::from(classification.to_string()),
                    None => Value::Absent,
                }
            }
            Some("rdfType") if rest.len() == 1 => match &semantics.rdf_type {
                Some(rdf_type) => Value::from(rdf_type.as_str()),
                None => Value::Absent,
            },
            Some("namespace") if rest.len() == 1 => match &semantics.namespace {
                Some(namespace) => Value::from(namespace.as_str()),
                None => Value::Absent,
            },
            Some("businessGlossaryTerms") if rest.len() == 1 => Value::List(
                semantics
                    .business_glossary_terms
                    .iter()
                    .map(|t| Value::from(t.as_str()))
                    .collect(),
            ),
            Some("upstreamDependencies") if rest.len() == 1 => Value::List(
                semantics
                    .upstream_dependencies
                    .iter()
                    .map(|t| Value::from(t.as_str()))
                    .collect(),
            ),
            Some("downstreamConsumers") if rest.len() == 1 => Value::List(
                semantics
                    .downstream_consumers
                    .iter()
                    .map(|t| Value::from(t.as_str()))
                    .collect(),
            ),
            _ => Value::Absent,
        }
    }
}

/// Convert a deployment attribute into an expression value.
fn attr_to_value(attr: &AttrValue) -> Value {
    match attr {
        AttrValue::Bool(b) => Value::Bool(*b),
        AttrValue::Number(n) => Value::Number(*n),
        AttrValue::Str(s) => Value::Str(s.clone()),
        AttrValue::List(items) => Value::List(items.iter().map(attr_to_value).collect()),
        AttrValue::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), attr_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_model::{Product, Snapshot};

    fn product() -> Product {
        let snapshot = Snapshot::from_yaml(
            r#"
products:
  p1:
    id: p1
    name: "Customer Orders"
    status: live
    owner: data-team
    tags: ["PII", "customer"]
    semantics:
      dataClassification: confidential
      upstreamDependencies: ["crm-export"]
    deployment:
      environment: production
      encryption:
        atRest: true
      region: eu-west-1
"#,
        )
        .unwrap();
        snapshot.products["p1"].clone()
    }

    fn resolve(node: &Product, path: &[&str]) -> Value {
        let segments: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        EntityContext::new(node).resolve(&segments)
    }

    #[test]
    fn scalar_fields_resolve() {
        let p = product();
        assert_eq!(resolve(&p, &["id"]), Value::from("p1"));
        assert_eq!(resolve(&p, &["status"]), Value::from("live"));
        assert_eq!(resolve(&p, &["owner"]), Value::from("data-team"));
        assert_eq!(resolve(&p, &["name"]), Value::from("Customer Orders"));
    }

    #[test]
    fn tags_resolve_as_a_list() {
        let p = product();
        assert_eq!(
            resolve(&p, &["tags"]),
            Value::List(vec![Value::from("PII"), Value::from("customer")])
        );
    }

    #[test]
    fn deployment_paths_walk_the_attribute_tree() {
        let p = product();
        assert_eq!(
            resolve(&p, &["deployment", "encryption", "atRest"]),
            Value::Bool(true)
        );
        assert_eq!(
            resolve(&p, &["deployment", "region"]),
            Value::from("eu-west-1")
        );
        assert_eq!(
            resolve(&p, &["deployment", "environment"]),
            Value::from("production")
        );
        assert_eq!(resolve(&p, &["environment"]), Value::from("production"));
    }

    #[test]
    fn missing_paths_are_absent() {
        let p = product();
        assert_eq!(
            resolve(&p, &["deployment", "encryption", "algorithm"]),
            Value::Absent
        );
        assert_eq!(resolve(&p, &["deployment", "monitoring"]), Value::Absent);
        assert_eq!(resolve(&p, &["nonexistent"]), Value::Absent);
    }

    #[test]
    fn semantics_fields_resolve() {
        let p = product();
        assert_eq!(
            resolve(&p, &["semantics", "dataClassification"]),
            Value::from("confidential")
        );
        assert_eq!(
            resolve(&p, &["semantics", "upstreamDependencies"]),
            Value::List(vec![Value::from("crm-export")])
        );
        assert_eq!(resolve(&p, &["semantics", "rdfType"]), Value::Absent);
    }

    #[test]
    fn absent_owner_is_absent_not_empty() {
        let snapshot = Snapshot::from_yaml(
            r#"
products:
  p2:
    id: p2
    name: "P2"
    deployment: { environment: staging }
"#,
        )
        .unwrap();
        let p = snapshot.products["p2"].clone();
        assert_eq!(resolve(&p, &["owner"]), Value::Absent);
        assert_eq!(resolve(&p, &["semantics", "dataClassification"]), Value::Absent);
    }
}
