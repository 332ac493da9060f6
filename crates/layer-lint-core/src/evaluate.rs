//! Rule evaluation over the component graph.
//!
//! Walks every rule in declaration order and classifies edges and cycles
//! as pass or violation. Rules never short-circuit each other: a single
//! edge that breaks several contracts surfaces every one of them.

use tracing::debug;

use crate::cycle::{find_cycles, Cycle};
use crate::error::ConfigError;
use crate::graph::{Graph, Witness};
use crate::report::Violation;
use crate::rule::{DefaultPolicy, Rule, RuleKind, RuleSet};
use crate::types::Severity;

/// Evaluates the rule set against the graph.
///
/// # Errors
///
/// Returns [`ConfigError`] if a rule references a component the graph does
/// not know. Fatal: a report built against unknown components would be
/// misleading, so no partial result is produced.
pub fn evaluate(graph: &Graph, rules: &RuleSet) -> Result<Vec<Violation>, ConfigError> {
    rules.validate(graph.component_set())?;

    let mut violations = Vec::new();

    for rule in rules.rules() {
        match rule {
            // Allow rules grant permission; they are consumed by the
            // default-deny pass below and never violate on their own.
            Rule::Allow { .. } => {}

            Rule::Deny { from, to, severity } => {
                if let Some(edge) = graph.edge(from, to) {
                    violations.push(Violation::for_edge(
                        RuleKind::Deny,
                        rule.to_string(),
                        *severity,
                        from.clone(),
                        to.clone(),
                        edge.witnesses.clone(),
                        format!("dependency `{from} -> {to}` is denied"),
                    ));
                }
            }

            Rule::Isolate {
                component,
                allow,
                severity,
            } => {
                for edge in graph.out_edges(component) {
                    // Intra-component imports are not a layering concern.
                    if edge.is_self_edge() {
                        continue;
                    }
                    if !allow.contains(&edge.to) {
                        violations.push(Violation::for_edge(
                            RuleKind::Isolate,
                            rule.to_string(),
                            *severity,
                            edge.from.clone(),
                            edge.to.clone(),
                            edge.witnesses.clone(),
                            format!(
                                "`{component}` is isolated and may not depend on `{}`",
                                edge.to
                            ),
                        ));
                    }
                }
            }

            Rule::NoCycles { severity } => {
                for cycle in find_cycles(graph, true) {
                    let witnesses = cycle_witnesses(graph, &cycle);
                    violations.push(Violation::for_cycle(
                        rule.to_string(),
                        *severity,
                        &cycle,
                        witnesses,
                    ));
                }
            }
        }
    }

    if rules.default_policy() == DefaultPolicy::Deny {
        for edge in graph.edges() {
            if edge.is_self_edge() {
                continue;
            }
            if !rules.allows(&edge.from, &edge.to) {
                violations.push(Violation::for_edge(
                    RuleKind::DefaultDeny,
                    "default-deny",
                    Severity::Error,
                    edge.from.clone(),
                    edge.to.clone(),
                    edge.witnesses.clone(),
                    format!(
                        "dependency `{} -> {}` is not on the allow-list",
                        edge.from, edge.to
                    ),
                ));
            }
        }
    }

    debug!(
        rules = rules.rules().len(),
        edges = graph.edge_count(),
        violations = violations.len(),
        "rule evaluation finished"
    );

    Ok(violations)
}

/// One witness per edge traversed by the cycle, for diagnostics.
fn cycle_witnesses(graph: &Graph, cycle: &Cycle) -> Vec<Witness> {
    cycle
        .path()
        .windows(2)
        .filter_map(|pair| {
            graph
                .edge(&pair[0], &pair[1])
                .and_then(|edge| edge.witnesses.first().cloned())
        })
        .collect()
}
