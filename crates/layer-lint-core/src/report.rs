//! Violations and the final validation report.
//!
//! The report is a pure transformation of the violation list: sorted by a
//! deterministic composite key so repeated runs over identical input
//! serialize byte-identically, which CI gates rely on.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cycle::Cycle;
use crate::graph::{ComponentName, Witness};
use crate::rule::RuleKind;
use crate::types::Severity;

/// The offending structure behind a violation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Subject {
    /// A single forbidden edge.
    Edge {
        /// Source component.
        from: ComponentName,
        /// Target component.
        to: ComponentName,
    },
    /// A dependency cycle.
    Cycle {
        /// The closed component path.
        path: Vec<ComponentName>,
    },
}

/// A detected breach of a declared architecture rule.
///
/// Created during evaluation, immutable afterwards. Never raised as an
/// error: a run that finds violations still completes with a full report.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Kind of the rule that was broken.
    pub kind: RuleKind,
    /// Identity of the broken rule (e.g. `deny(domain -> infra)`).
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// The offending edge or cycle.
    pub subject: Subject,
    /// Import occurrences proving the breach, in ingestion order.
    pub witnesses: Vec<Witness>,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a violation for a forbidden edge.
    #[must_use]
    pub fn for_edge(
        kind: RuleKind,
        rule: impl Into<String>,
        severity: Severity,
        from: ComponentName,
        to: ComponentName,
        witnesses: Vec<Witness>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            rule: rule.into(),
            severity,
            subject: Subject::Edge { from, to },
            witnesses,
            message: message.into(),
        }
    }

    /// Creates a violation for a dependency cycle.
    #[must_use]
    pub fn for_cycle(
        rule: impl Into<String>,
        severity: Severity,
        cycle: &Cycle,
        witnesses: Vec<Witness>,
    ) -> Self {
        Self {
            kind: RuleKind::NoCycles,
            rule: rule.into(),
            severity,
            subject: Subject::Cycle {
                path: cycle.path().to_vec(),
            },
            witnesses,
            message: format!("dependency cycle detected: {cycle}"),
        }
    }

    /// Composite sort key: (rule kind, from, to, first witness location).
    fn sort_key(&self) -> (RuleKind, String, String, PathBuf, usize) {
        let (from, to) = match &self.subject {
            Subject::Edge { from, to } => (from.to_string(), to.to_string()),
            // A cycle sorts by its entry component on both edge slots.
            Subject::Cycle { path } => {
                let entry = path.first().map_or_else(String::new, ToString::to_string);
                (entry.clone(), entry)
            }
        };
        let (file, line) = self.witnesses.first().map_or_else(
            || (PathBuf::new(), 0),
            |w| (w.location.file.clone(), w.location.line),
        );
        (self.kind, from, to, file, line)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.rule, self.message)
    }
}

/// Final result of a validation run.
///
/// Built once, immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Violations, sorted by the deterministic composite key.
    pub violations: Vec<Violation>,
    /// Number of distinct edges the run checked.
    pub edges_checked: usize,
    /// Total violation count.
    pub total_violations: usize,
    /// Violation counts grouped by rule kind.
    pub by_kind: BTreeMap<String, usize>,
    /// True iff zero violations were found.
    pub passed: bool,
}

impl Report {
    /// Builds a report from the evaluator's violation list.
    ///
    /// Pure transformation: sorts, counts, and freezes the result.
    #[must_use]
    pub fn build(mut violations: Vec<Violation>, edges_checked: usize) -> Self {
        violations.sort_by_key(Violation::sort_key);

        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for violation in &violations {
            *by_kind.entry(violation.kind.to_string()).or_insert(0) += 1;
        }

        let total_violations = violations.len();
        Self {
            violations,
            edges_checked,
            total_violations,
            by_kind,
            passed: total_violations == 0,
        }
    }

    /// Formats the report as a human-readable multi-line summary.
    #[must_use]
    pub fn format_text(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for violation in &self.violations {
            let _ = writeln!(out, "{violation}");
            for witness in &violation.witnesses {
                let _ = writeln!(
                    out,
                    "  = at {}: `{}` imports `{}`",
                    witness.location, witness.from_unit, witness.to_unit
                );
            }
        }

        if !self.by_kind.is_empty() {
            let grouped: Vec<String> = self
                .by_kind
                .iter()
                .map(|(kind, count)| format!("{kind}: {count}"))
                .collect();
            let _ = writeln!(out, "By rule kind: {}", grouped.join(", "));
        }

        let _ = writeln!(
            out,
            "Checked {} edge(s), found {} violation(s): {}",
            self.edges_checked,
            self.total_violations,
            if self.passed { "PASSED" } else { "FAILED" }
        );
        out
    }
}
