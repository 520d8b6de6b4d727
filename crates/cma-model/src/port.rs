// port.rs — Ports and component wiring edges.
//
// A Port is the typed interface surface of a Product or Component. The
// DSL models three port families (data/service/event) sharing one record
// shape, so the struct keeps every family's fields optional and the
// shape checks report which required fields are missing for the declared
// `portType` and which present fields belong to a different family.
// Missing required fields are structural errors; stray fields are only
// advisory (the DSL compiler may carry them through harmlessly).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::semantics::DataClassification;

/// A typed interface on a Product (componentId unset) or Component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Unique within the owning entity.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Set when the port belongs to a Component; absent for
    /// product-level ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,

    /// Data flow direction, used by component edge validation.
    pub direction: Direction,

    /// Which port family this is — decides the required fields below.
    pub port_type: PortKind,

    // data ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    // service ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_api_spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,

    // event ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<String>,

    // common optionals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<DataClassification>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sla: BTreeMap<String, String>,
}

/// Data flow direction of a port.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
    Bidirectional,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
            Direction::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// Port family discriminator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Data,
    Service,
    Event,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortKind::Data => write!(f, "data"),
            PortKind::Service => write!(f, "service"),
            PortKind::Event => write!(f, "event"),
        }
    }
}

impl Port {
    /// Whether an edge may read from this port.
    pub fn can_send(&self) -> bool {
        matches!(self.direction, Direction::Output | Direction::Bidirectional)
    }

    /// Whether an edge may write into this port.
    pub fn can_receive(&self) -> bool {
        matches!(self.direction, Direction::Input | Direction::Bidirectional)
    }

    /// Required fields of the declared port family that are missing.
    /// Non-empty means the port is structurally malformed.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self.port_type {
            PortKind::Data => {
                if self.format.is_none() {
                    missing.push("format");
                }
            }
            PortKind::Service => {
                if self.protocol.is_none() {
                    missing.push("protocol");
                }
            }
            PortKind::Event => {
                if self.topic.is_none() {
                    missing.push("topic");
                }
            }
        }
        missing
    }

    /// Present fields that belong to a *different* port family.
    /// Advisory only — surfaced as warnings, never blocking.
    pub fn stray_fields(&self) -> Vec<&'static str> {
        let data = [
            ("format", self.format.is_some()),
            ("schema", self.schema.is_some()),
            ("catalog", self.catalog.is_some()),
        ];
        let service = [
            ("protocol", self.protocol.is_some()),
            ("openApiSpec", self.open_api_spec.is_some()),
            ("authentication", self.authentication.is_some()),
        ];
        let event = [
            ("topic", self.topic.is_some()),
            ("eventSchema", self.event_schema.is_some()),
            ("messageFormat", self.message_format.is_some()),
        ];

        let foreign: Vec<&[(&'static str, bool)]> = match self.port_type {
            PortKind::Data => vec![&service, &event],
            PortKind::Service => vec![&data, &event],
            PortKind::Event => vec![&data, &service],
        };

        foreign
            .into_iter()
            .flatten()
            .filter(|(_, present)| *present)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// A directed wire between two component ports in a composite product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEdge {
    pub source_component: String,
    pub source_port: String,
    pub target_component: String,
    pub target_port: String,

    /// Opaque transformation description — carried, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}
