//! Orchestration facade tying evaluation and report building together.

use tracing::info;

use crate::error::ConfigError;
use crate::evaluate::evaluate;
use crate::graph::Graph;
use crate::report::Report;
use crate::rule::RuleSet;

/// A single validation run over one graph and one rule set.
///
/// The run owns its graph exclusively; nothing is shared or mutated
/// concurrently, so independent runs may execute on separate threads.
pub struct Validator {
    graph: Graph,
    rules: RuleSet,
}

impl Validator {
    /// Creates a validator for one run.
    #[must_use]
    pub fn new(graph: Graph, rules: RuleSet) -> Self {
        Self { graph, rules }
    }

    /// The graph under validation.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Evaluates every rule and builds the final report.
    ///
    /// Violations never abort the run: a run that finds hundreds of them
    /// still completes and returns the full report.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a rule references an unknown component.
    pub fn run(&self) -> Result<Report, ConfigError> {
        info!(
            components = self.graph.component_set().len(),
            edges = self.graph.edge_count(),
            rules = self.rules.rules().len(),
            "starting validation run"
        );

        let violations = evaluate(&self.graph, &self.rules)?;
        let report = Report::build(violations, self.graph.edge_count());

        info!(
            violations = report.total_violations,
            passed = report.passed,
            "validation run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ComponentName, RawImport};
    use crate::rule::{DefaultPolicy, Rule};
    use crate::types::{Location, Severity};

    fn name(s: &str) -> ComponentName {
        ComponentName::new(s).unwrap()
    }

    #[test]
    fn run_builds_a_full_report() {
        let graph = Graph::builder()
            .components([name("domain"), name("infra")])
            .map_unit("src/domain/svc.rs", name("domain"))
            .map_unit("src/infra/db.rs", name("infra"))
            .imports([RawImport::new(
                "src/domain/svc.rs",
                "src/infra/db.rs",
                Location::new("src/domain/svc.rs", 3),
            )])
            .build()
            .unwrap();

        let rules = RuleSet::new(
            vec![Rule::Deny {
                from: name("domain"),
                to: name("infra"),
                severity: Severity::Error,
            }],
            DefaultPolicy::Allow,
        );

        let report = Validator::new(graph, rules).run().unwrap();
        assert!(!report.passed);
        assert_eq!(report.edges_checked, 1);
        assert_eq!(report.total_violations, 1);
    }

    #[test]
    fn run_with_no_rules_passes() {
        let graph = Graph::builder()
            .components([name("domain")])
            .build()
            .unwrap();
        let report = Validator::new(graph, RuleSet::default()).run().unwrap();
        assert!(report.passed);
    }
}
