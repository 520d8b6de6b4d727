// deployment.rs — Deployment specification with an open attribute tree.
//
// The catalog DSL never enumerates every deployment option — constraint
// expressions reference arbitrary nested paths (`deployment.encryption.atRest`,
// `deployment.monitoring.retentionDays`, ...). Only `environment` and
// `source` are declared fields; everything else lands in an open,
// key-path-addressable attribute tree so the constraint evaluator can
// walk whatever paths the input snapshot provides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Deployment specification, required on every catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Target environment (e.g., "production", "staging").
    pub environment: String,

    /// Where the entity's definition/code lives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRepository>,

    /// Everything else: an open attribute tree addressed by dotted paths
    /// in constraint expressions.
    #[serde(flatten)]
    pub extra: BTreeMap<String, AttrValue>,
}

impl DeploymentSpec {
    /// A minimal spec for the given environment, no extra attributes.
    pub fn for_environment(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            source: None,
            extra: BTreeMap::new(),
        }
    }

    /// Walk a dotted path through the attribute tree.
    ///
    /// Returns `None` when any intermediate key is missing or a
    /// non-map value is traversed into — the evaluator maps that to
    /// its absent sentinel.
    pub fn lookup(&self, path: &[String]) -> Option<&AttrValue> {
        let (first, rest) = path.split_first()?;
        let mut current = self.extra.get(first)?;
        for segment in rest {
            current = match current {
                AttrValue::Map(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// A node in the open attribute tree: scalar, list, or nested map.
///
/// `untagged` lets plain YAML/JSON values deserialize directly:
/// `atRest: true` becomes `Bool(true)` without any wrapper syntax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

/// Reference to the repository an entity is built/defined from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceRepository {
    /// Repository URL. The only required field.
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Path within the repository, if the entity lives in a subdirectory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_host_fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_private_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_encryption() -> DeploymentSpec {
        serde_yaml::from_str(
            r#"
environment: production
encryption:
  atRest: true
  inTransit: false
region: eu-west-1
"#,
        )
        .unwrap()
    }

    #[test]
    fn flattened_attributes_land_in_extra() {
        let spec = spec_with_encryption();
        assert_eq!(spec.environment, "production");
        assert!(spec.extra.contains_key("encryption"));
        assert!(spec.extra.contains_key("region"));
    }

    #[test]
    fn lookup_walks_nested_paths() {
        let spec = spec_with_encryption();
        let path = vec!["encryption".to_string(), "atRest".to_string()];
        assert_eq!(spec.lookup(&path), Some(&AttrValue::Bool(true)));

        let path = vec!["region".to_string()];
        assert_eq!(
            spec.lookup(&path),
            Some(&AttrValue::Str("eu-west-1".to_string()))
        );
    }

    #[test]
    fn lookup_missing_key_is_none() {
        let spec = spec_with_encryption();
        let path = vec!["encryption".to_string(), "algorithm".to_string()];
        assert_eq!(spec.lookup(&path), None);
    }

    #[test]
    fn lookup_through_scalar_is_none() {
        let spec = spec_with_encryption();
        // region is a string; descending into it must not panic.
        let path = vec!["region".to_string(), "zone".to_string()];
        assert_eq!(spec.lookup(&path), None);
    }

    #[test]
    fn numbers_deserialize_as_numbers() {
        let spec: DeploymentSpec = serde_yaml::from_str(
            r#"
environment: production
retention:
  maxDays: 2555
"#,
        )
        .unwrap();
        let path = vec!["retention".to_string(), "maxDays".to_string()];
        assert_eq!(spec.lookup(&path), Some(&AttrValue::Number(2555.0)));
    }

    #[test]
    fn source_repository_round_trip() {
        let spec: DeploymentSpec = serde_yaml::from_str(
            r#"
environment: staging
source:
  url: "git@github.com:acme/customer-360.git"
  branch: main
"#,
        )
        .unwrap();
        let source = spec.source.as_ref().unwrap();
        assert_eq!(source.url, "git@github.com:acme/customer-360.git");
        assert_eq!(source.branch.as_deref(), Some("main"));
        assert!(source.tag.is_none());

        let yaml = serde_yaml::to_string(&spec).unwrap();
        let restored: DeploymentSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, restored);
    }
}
