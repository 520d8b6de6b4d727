// graph.rs — Component graph validation for composite products.
//
// Seven checks, all independent, all collected (never fail-fast) so a
// caller sees the complete error set for a product in one pass:
//
// 1. atomic product with wiring          → UnexpectedGraph
// 2. composite product without wiring    → MissingGraph
// 3. edge endpoint not in components     → UnknownComponentReference
// 4. source port missing/not sendable    → InvalidPortDirection
// 5. target port missing/not receivable  → InvalidPortDirection
// 6. cycle in the edge set               → CyclicComponentGraph
// 7. edge wiring a component to itself   → SelfLoopEdge

use std::collections::BTreeMap;

use cma_model::{Product, Snapshot};

use crate::errors::GraphError;

/// Validate one product's component wiring. Returns every applicable
/// error; an empty list means the graph is a well-formed DAG.
pub fn validate_product(product: &Product, snapshot: &Snapshot) -> Vec<GraphError> {
    let mut errors = Vec::new();

    if !product.is_composite() {
        if !product.component_graph.is_empty() {
            errors.push(GraphError::UnexpectedGraph {
                product: product.id.clone(),
            });
        }
        return errors;
    }

    if product.component_graph.is_empty() {
        errors.push(GraphError::MissingGraph {
            product: product.id.clone(),
        });
        return errors;
    }

    for (index, edge) in product.component_graph.iter().enumerate() {
        for endpoint in [&edge.source_component, &edge.target_component] {
            if !product.components.contains(endpoint) {
                errors.push(GraphError::UnknownComponentReference {
                    product: product.id.clone(),
                    edge: index,
                    reference: endpoint.clone(),
                });
            }
        }

        check_port(
            product,
            index,
            &edge.source_component,
            &edge.source_port,
            PortRole::Source,
            snapshot,
            &mut errors,
        );
        check_port(
            product,
            index,
            &edge.target_component,
            &edge.target_port,
            PortRole::Target,
            snapshot,
            &mut errors,
        );

        if edge.source_component == edge.target_component {
            errors.push(GraphError::SelfLoopEdge {
                product: product.id.clone(),
                edge: index,
                component: edge.source_component.clone(),
            });
        }
    }

    // Cycle detection over the edge set, self-loops excluded (those are
    // already reported per edge above).
    let adjacency: BTreeMap<String, Vec<String>> = {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for edge in &product.component_graph {
            if edge.source_component != edge.target_component {
                map.entry(edge.source_component.clone())
                    .or_default()
                    .push(edge.target_component.clone());
            }
        }
        map
    };
    if let Some(cycle) = find_cycle(&product.components, &adjacency) {
        errors.push(GraphError::CyclicComponentGraph {
            product: product.id.clone(),
            cycle,
        });
    }

    errors
}

enum PortRole {
    Source,
    Target,
}

fn check_port(
    product: &Product,
    edge: usize,
    component_id: &str,
    port_name: &str,
    role: PortRole,
    snapshot: &Snapshot,
    errors: &mut Vec<GraphError>,
) {
    // Unknown components are already reported; a missing component
    // entity (dangling membership) is the hierarchy resolver's finding.
    if !product.components.iter().any(|c| c == component_id) {
        return;
    }
    let Some(component) = snapshot.components.get(component_id) else {
        return;
    };

    let Some(port) = component.ports.iter().find(|p| p.name == port_name) else {
        errors.push(GraphError::InvalidPortDirection {
            product: product.id.clone(),
            edge,
            component: component_id.to_string(),
            port: port_name.to_string(),
            reason: "no such port".to_string(),
        });
        return;
    };

    let compatible = match role {
        PortRole::Source => port.can_send(),
        PortRole::Target => port.can_receive(),
    };
    if !compatible {
        let expected = match role {
            PortRole::Source => "output or bidirectional",
            PortRole::Target => "input or bidirectional",
        };
        errors.push(GraphError::InvalidPortDirection {
            product: product.id.clone(),
            edge,
            component: component_id.to_string(),
            port: port_name.to_string(),
            reason: format!("direction is {}, expected {}", port.direction, expected),
        });
    }
}

/// Three-color DFS cycle detection over an id-indexed adjacency map.
///
/// `order` fixes the visitation order so the reported cycle is
/// deterministic. Edges to ids outside `order` are ignored — dangling
/// references are someone else's finding. Returns the first cycle found
/// as its node sequence.
pub(crate) fn find_cycle(
    order: &[String],
    adjacency: &BTreeMap<String, Vec<String>>,
) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut colors: BTreeMap<&str, Color> =
        order.iter().map(|id| (id.as_str(), Color::White)).collect();
    let mut stack: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        adjacency: &'a BTreeMap<String, Vec<String>>,
        colors: &mut BTreeMap<&'a str, Color>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        colors.insert(node, Color::Gray);
        stack.push(node);
        if let Some(successors) = adjacency.get(node) {
            for succ in successors {
                match colors.get(succ.as_str()).copied() {
                    Some(Color::Gray) => {
                        // Back edge — the cycle is the stack from the
                        // gray node onward.
                        let start = stack.iter().position(|n| *n == succ.as_str())?;
                        return Some(stack[start..].iter().map(|s| s.to_string()).collect());
                    }
                    Some(Color::White) => {
                        if let Some(cycle) = visit(succ.as_str(), adjacency, colors, stack) {
                            return Some(cycle);
                        }
                    }
                    // Black (already explored) or unknown id.
                    _ => {}
                }
            }
        }
        stack.pop();
        colors.insert(node, Color::Black);
        None
    }

    for id in order {
        if colors.get(id.as_str()) == Some(&Color::White) {
            if let Some(cycle) = visit(id.as_str(), adjacency, &mut colors, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cma_model::Snapshot;

    /// Composite product a→b→c with matching component ports.
    fn pipeline_yaml(edges: &str) -> String {
        format!(
            r#"
products:
  pipeline:
    id: pipeline
    name: "Pipeline"
    components: ["a", "b", "c"]
    componentGraph:
{edges}
    deployment: {{ environment: production }}
components:
  a:
    id: a
    name: "A"
    kind: ingestion
    ports:
      - {{ name: out, direction: output, portType: data, format: parquet }}
      - {{ name: in, direction: input, portType: data, format: parquet }}
    deployment: {{ environment: production }}
  b:
    id: b
    name: "B"
    kind: transformation
    ports:
      - {{ name: out, direction: output, portType: data, format: parquet }}
      - {{ name: in, direction: input, portType: data, format: parquet }}
    deployment: {{ environment: production }}
  c:
    id: c
    name: "C"
    kind: serving
    ports:
      - {{ name: out, direction: output, portType: data, format: parquet }}
      - {{ name: in, direction: input, portType: data, format: parquet }}
    deployment: {{ environment: production }}
"#
        )
    }

    fn validate(yaml: &str) -> Vec<GraphError> {
        let snapshot = Snapshot::from_yaml(yaml).unwrap();
        validate_product(&snapshot.products["pipeline"], &snapshot)
    }

    const CHAIN_EDGES: &str = r#"
      - { sourceComponent: a, sourcePort: out, targetComponent: b, targetPort: in }
      - { sourceComponent: b, sourcePort: out, targetComponent: c, targetPort: in }
"#;

    #[test]
    fn valid_dag_has_no_errors() {
        let errors = validate(&pipeline_yaml(CHAIN_EDGES));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn back_edge_produces_exactly_one_cycle_error() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: out, targetComponent: b, targetPort: in }
      - { sourceComponent: b, sourcePort: out, targetComponent: c, targetPort: in }
      - { sourceComponent: c, sourcePort: out, targetComponent: a, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        let cycles: Vec<_> = errors
            .iter()
            .filter(|e| matches!(e, GraphError::CyclicComponentGraph { .. }))
            .collect();
        assert_eq!(cycles.len(), 1);
        match cycles[0] {
            GraphError::CyclicComponentGraph { cycle, .. } => {
                assert_eq!(cycle, &["a", "b", "c"]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn atomic_product_with_wiring_is_unexpected_graph() {
        let errors = validate(
            r#"
products:
  pipeline:
    id: pipeline
    name: "Pipeline"
    components: ["a"]
    componentGraph:
      - { sourceComponent: a, sourcePort: out, targetComponent: a, targetPort: in }
    deployment: { environment: production }
"#,
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], GraphError::UnexpectedGraph { .. }));
    }

    #[test]
    fn composite_without_wiring_is_missing_graph() {
        let errors = validate(
            r#"
products:
  pipeline:
    id: pipeline
    name: "Pipeline"
    components: ["a", "b"]
    deployment: { environment: production }
"#,
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], GraphError::MissingGraph { .. }));
    }

    #[test]
    fn edge_to_undeclared_component_is_unknown_reference() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: out, targetComponent: ghost, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        assert!(errors.iter().any(|e| matches!(
            e,
            GraphError::UnknownComponentReference { reference, .. } if reference == "ghost"
        )));
    }

    #[test]
    fn reading_from_an_input_port_is_invalid_direction() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: in, targetComponent: b, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        assert!(errors.iter().any(|e| matches!(
            e,
            GraphError::InvalidPortDirection { port, reason, .. }
                if port == "in" && reason.contains("expected output")
        )));
    }

    #[test]
    fn writing_into_an_output_port_is_invalid_direction() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: out, targetComponent: b, targetPort: out }
"#;
        let errors = validate(&pipeline_yaml(edges));
        assert!(errors.iter().any(|e| matches!(
            e,
            GraphError::InvalidPortDirection { reason, .. } if reason.contains("expected input")
        )));
    }

    #[test]
    fn missing_port_is_reported_by_name() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: nonexistent, targetComponent: b, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        assert!(errors.iter().any(|e| matches!(
            e,
            GraphError::InvalidPortDirection { port, reason, .. }
                if port == "nonexistent" && reason == "no such port"
        )));
    }

    #[test]
    fn self_loop_is_its_own_error() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: out, targetComponent: a, targetPort: in }
      - { sourceComponent: a, sourcePort: out, targetComponent: b, targetPort: in }
      - { sourceComponent: b, sourcePort: out, targetComponent: c, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        let self_loops: Vec<_> = errors
            .iter()
            .filter(|e| matches!(e, GraphError::SelfLoopEdge { .. }))
            .collect();
        assert_eq!(self_loops.len(), 1);
        // The self-loop must not also count as a cycle.
        assert!(!errors
            .iter()
            .any(|e| matches!(e, GraphError::CyclicComponentGraph { .. })));
    }

    #[test]
    fn all_errors_collected_in_one_pass() {
        let edges = r#"
      - { sourceComponent: a, sourcePort: in, targetComponent: ghost, targetPort: in }
      - { sourceComponent: b, sourcePort: out, targetComponent: b, targetPort: in }
"#;
        let errors = validate(&pipeline_yaml(edges));
        assert!(errors.len() >= 3, "expected several errors, got {:?}", errors);
    }

    #[test]
    fn find_cycle_ignores_unknown_ids() {
        let order = vec!["a".to_string(), "b".to_string()];
        let mut adjacency = BTreeMap::new();
        adjacency.insert("a".to_string(), vec!["missing".to_string(), "b".to_string()]);
        assert_eq!(find_cycle(&order, &adjacency), None);
    }
}
