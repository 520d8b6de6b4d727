// mixin.rs — Tag-triggered compliance policy mixins.
//
// Four built-in policies activate off sensitivity tags: PII, GDPR,
// PCI-DSS, SOC2. The tables below are the shipped contract — fixed
// constraint expressions, messages, and severities — and activation is
// set-membership on the tag list: declaring a tag twice changes
// nothing, and activation order is always PII, GDPR, PCI-DSS, SOC2
// regardless of how the tags were declared.
//
// The registry is data, not code: adding a mixin means adding a table
// entry, the cascade algorithm never changes.

use cma_model::{Constraint, Enforcement, Policy, PolicyScope, PolicyType, Severity};

/// The sensitivity tags with built-in policy mixins, in activation order.
pub const SENSITIVITY_TAGS: &[&str] = &["PII", "GDPR", "PCI-DSS", "SOC2"];

/// The mixin policy for a sensitivity tag, if one exists.
pub fn policy_for_tag(tag: &str) -> Option<Policy> {
    match tag {
        "PII" => Some(pii_policy()),
        "GDPR" => Some(gdpr_policy()),
        "PCI-DSS" => Some(pci_dss_policy()),
        "SOC2" => Some(soc2_policy()),
        _ => None,
    }
}

/// All mixin policies activated by an entity's tag list, in the fixed
/// activation order. Duplicate tags are idempotent.
pub fn policies_for_tags(tags: &[String]) -> Vec<Policy> {
    SENSITIVITY_TAGS
        .iter()
        .filter(|tag| tags.iter().any(|t| t == *tag))
        .filter_map(|tag| policy_for_tag(tag))
        .collect()
}

fn constraint(expression: &str, message: &str, severity: Severity) -> Constraint {
    Constraint {
        expression: expression.to_string(),
        message: message.to_string(),
        severity,
    }
}

fn pii_policy() -> Policy {
    Policy {
        id: "mixin-pii".to_string(),
        name: "PII Data Protection".to_string(),
        scope: PolicyScope::Product,
        policy_type: PolicyType::Privacy,
        enforcement: Enforcement::Blocking,
        constraints: vec![
            constraint(
                "deployment.encryption.atRest == true",
                "PII data must be encrypted at rest",
                Severity::Error,
            ),
            constraint(
                "deployment.encryption.inTransit == true",
                "PII data must be encrypted in transit",
                Severity::Error,
            ),
            constraint(
                "deployment.accessLogging.enabled == true",
                "Access to PII data must be logged",
                Severity::Error,
            ),
            constraint(
                "deployment.environment != 'production' implies deployment.masking.enabled == true",
                "PII data must be masked outside production",
                Severity::Error,
            ),
        ],
    }
}

fn gdpr_policy() -> Policy {
    Policy {
        id: "mixin-gdpr".to_string(),
        name: "GDPR Compliance".to_string(),
        scope: PolicyScope::Product,
        policy_type: PolicyType::Compliance,
        enforcement: Enforcement::Blocking,
        constraints: vec![
            constraint(
                "deployment.retention.maxDays <= 2555",
                "GDPR retention must not exceed 2555 days (7 years)",
                Severity::Error,
            ),
            constraint(
                "deployment.erasure.supported == true",
                "GDPR requires the right to erasure",
                Severity::Error,
            ),
            constraint(
                "deployment.dataPortability.supported == true",
                "GDPR requires data portability",
                Severity::Error,
            ),
            constraint(
                "deployment.consent.trackingEnabled == true",
                "GDPR requires consent tracking",
                Severity::Error,
            ),
        ],
    }
}

fn pci_dss_policy() -> Policy {
    Policy {
        id: "mixin-pci-dss".to_string(),
        name: "PCI-DSS Cardholder Data Protection".to_string(),
        scope: PolicyScope::Product,
        policy_type: PolicyType::Security,
        enforcement: Enforcement::Blocking,
        constraints: vec![
            constraint(
                "deployment.encryption.atRest == true and deployment.encryption.algorithm == 'AES-256'",
                "Cardholder data must be encrypted at rest with AES-256",
                Severity::Error,
            ),
            constraint(
                "deployment.encryption.inTransit == true",
                "Cardholder data must be encrypted in transit",
                Severity::Error,
            ),
            constraint(
                "deployment.networkSegmentation == true",
                "PCI-DSS requires network segmentation",
                Severity::Error,
            ),
            constraint(
                "deployment.accessControl.model == 'least-privilege'",
                "PCI-DSS requires least-privilege access control",
                Severity::Error,
            ),
        ],
    }
}

fn soc2_policy() -> Policy {
    Policy {
        id: "mixin-soc2".to_string(),
        name: "SOC2 Operational Controls".to_string(),
        scope: PolicyScope::Product,
        policy_type: PolicyType::Compliance,
        enforcement: Enforcement::Blocking,
        constraints: vec![
            constraint(
                "deployment.monitoring.enabled == true and deployment.alerting.enabled == true",
                "SOC2 requires monitoring and alerting",
                Severity::Error,
            ),
            constraint(
                "deployment.changeManagement.approvalRequired == true",
                "SOC2 requires change-management approval",
                Severity::Error,
            ),
            constraint(
                "deployment.incidentResponse.documented == true",
                "SOC2 requires a documented incident response process",
                Severity::Error,
            ),
            constraint(
                "deployment.monitoring.logRetentionDays >= 365",
                "SOC2 recommends at least 365 days of log retention",
                Severity::Warning,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_expr::parse;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn every_mixin_has_four_parseable_constraints() {
        for tag in SENSITIVITY_TAGS {
            let policy = policy_for_tag(tag).unwrap();
            assert_eq!(policy.constraints.len(), 4, "{} mixin", tag);
            assert_eq!(policy.enforcement, Enforcement::Blocking);
            for constraint in &policy.constraints {
                parse(&constraint.expression)
                    .unwrap_or_else(|e| panic!("{}: {:?}", constraint.expression, e));
            }
        }
    }

    #[test]
    fn activation_order_is_fixed() {
        // Declared out of order, activated in the fixed order.
        let policies = policies_for_tags(&tags(&["SOC2", "PII", "GDPR"]));
        let ids: Vec<&str> = policies.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mixin-pii", "mixin-gdpr", "mixin-soc2"]);
    }

    #[test]
    fn duplicate_tags_are_idempotent() {
        let once = policies_for_tags(&tags(&["PII"]));
        let twice = policies_for_tags(&tags(&["PII", "PII"]));
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_tags_activate_nothing() {
        assert!(policies_for_tags(&tags(&["customer", "internal"])).is_empty());
        assert!(policy_for_tag("HIPAA").is_none());
    }

    #[test]
    fn soc2_log_retention_is_warning_severity() {
        let policy = policy_for_tag("SOC2").unwrap();
        let severities: Vec<_> = policy.constraints.iter().map(|c| c.severity).collect();
        assert_eq!(
            severities,
            vec![
                cma_model::Severity::Error,
                cma_model::Severity::Error,
                cma_model::Severity::Error,
                cma_model::Severity::Warning,
            ]
        );
    }
}
