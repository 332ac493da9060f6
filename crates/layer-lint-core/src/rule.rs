//! Declarative architecture rules.
//!
//! Rules form a tagged union rather than a trait hierarchy: new invariants
//! are added by extending [`Rule`], and the evaluator matches on it in one
//! place. A [`RuleSet`] is a plain value passed into evaluation; there is
//! no process-wide rule registry.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::graph::ComponentName;
use crate::types::Severity;

/// A declarative constraint over the component graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rule {
    /// The edge `from -> to` is permitted (consumed by default-deny mode).
    Allow {
        /// Source component.
        from: ComponentName,
        /// Target component.
        to: ComponentName,
    },
    /// The edge `from -> to` is forbidden.
    Deny {
        /// Source component.
        from: ComponentName,
        /// Target component.
        to: ComponentName,
        /// Severity of resulting violations.
        severity: Severity,
    },
    /// The component may have no outgoing edges outside its allow-list.
    Isolate {
        /// The isolated component.
        component: ComponentName,
        /// Targets the component may still depend on.
        allow: Vec<ComponentName>,
        /// Severity of resulting violations.
        severity: Severity,
    },
    /// The graph must be a DAG once self-edges are excluded.
    NoCycles {
        /// Severity of resulting violations.
        severity: Severity,
    },
}

impl Rule {
    /// The kind tag of this rule, for grouping and sorting.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Allow { .. } => RuleKind::Allow,
            Self::Deny { .. } => RuleKind::Deny,
            Self::Isolate { .. } => RuleKind::Isolate,
            Self::NoCycles { .. } => RuleKind::NoCycles,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow { from, to } => write!(f, "allow({from} -> {to})"),
            Self::Deny { from, to, .. } => write!(f, "deny({from} -> {to})"),
            Self::Isolate { component, allow, .. } => {
                let allowed: Vec<&str> = allow.iter().map(ComponentName::as_str).collect();
                write!(f, "isolate({component}, allow: [{}])", allowed.join(", "))
            }
            Self::NoCycles { .. } => write!(f, "no-cycles"),
        }
    }
}

/// Rule kind tag.
///
/// The derived `Ord` pins the first element of the report sort key, so the
/// variant order here is part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Explicit allow rule.
    Allow,
    /// Explicit deny rule.
    Deny,
    /// Isolation rule.
    Isolate,
    /// Global acyclicity rule.
    NoCycles,
    /// Implicit deny under the default-deny policy.
    DefaultDeny,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
            Self::Isolate => write!(f, "isolate"),
            Self::NoCycles => write!(f, "no-cycles"),
            Self::DefaultDeny => write!(f, "default-deny"),
        }
    }
}

/// What to do with edges no explicit rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPolicy {
    /// Uncovered edges pass (deny rules are the only restrictions).
    #[default]
    Allow,
    /// Uncovered edges violate unless an `Allow` rule matches
    /// (explicit allow-list mode).
    Deny,
}

/// An ordered rule list plus the default edge policy.
///
/// Rules are evaluated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    default_policy: DefaultPolicy,
}

impl RuleSet {
    /// Creates a rule set.
    #[must_use]
    pub fn new(rules: Vec<Rule>, default_policy: DefaultPolicy) -> Self {
        Self {
            rules,
            default_policy,
        }
    }

    /// The rules, in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The policy for edges no explicit rule covers.
    #[must_use]
    pub fn default_policy(&self) -> DefaultPolicy {
        self.default_policy
    }

    /// Returns true if some `Allow` rule permits the edge `from -> to`.
    #[must_use]
    pub fn allows(&self, from: &ComponentName, to: &ComponentName) -> bool {
        self.rules.iter().any(|rule| {
            matches!(rule, Rule::Allow { from: f, to: t } if f == from && t == to)
        })
    }

    /// Checks every component reference against the declared components.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownComponent`] naming the offending rule.
    /// Fatal for the run: no partial report is produced.
    pub fn validate(&self, components: &BTreeSet<ComponentName>) -> Result<(), ConfigError> {
        // The implicit unclassified component may appear in rules even
        // though no lenient-mode unit forced it into the graph yet.
        let unclassified = ComponentName::unclassified();
        let known = |name: &ComponentName| components.contains(name) || *name == unclassified;

        for rule in &self.rules {
            let mut referenced: Vec<&ComponentName> = Vec::new();
            match rule {
                Rule::Allow { from, to } | Rule::Deny { from, to, .. } => {
                    referenced.push(from);
                    referenced.push(to);
                }
                Rule::Isolate { component, allow, .. } => {
                    referenced.push(component);
                    referenced.extend(allow);
                }
                Rule::NoCycles { .. } => {}
            }
            for name in referenced {
                if !known(name) {
                    return Err(ConfigError::UnknownComponent {
                        context: rule.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
