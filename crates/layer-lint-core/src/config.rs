//! TOML rule-file parsing.
//!
//! The file declares components (with the path patterns the ingestion
//! adapter uses to map units), their allowed dependencies, and global
//! validator flags. Parsing goes through a serde DTO layer and converts
//! into the validated domain model; the path patterns stay opaque strings
//! here because pattern matching is owned by the ingestion adapter.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::graph::{ComponentName, UnmappedPolicy};
use crate::rule::{DefaultPolicy, Rule, RuleSet};
use crate::types::Severity;

/// A declared component with the path patterns that claim units for it.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    /// Component name.
    pub name: ComponentName,
    /// Path patterns (glob syntax, interpreted by the ingestion adapter).
    pub paths: Vec<String>,
}

/// Validated rule-file contents.
#[derive(Debug, Clone)]
pub struct Config {
    /// Declared components, in declaration order.
    pub components: Vec<ComponentSpec>,
    /// Rules derived from the declarations, in declaration order.
    pub rules: RuleSet,
    /// Policy for units no component claims.
    pub unmapped: UnmappedPolicy,
}

/// Errors while loading the rule file.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    /// The TOML is syntactically invalid.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g. `components[0].name`).
        context: String,
        /// The underlying configuration error.
        source: ConfigError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown value for a global flag.
    #[error("validator.{field}: unknown value `{value}`, expected one of: {expected}")]
    UnknownFlag {
        /// The flag name.
        field: &'static str,
        /// The invalid value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    validator: ValidatorSection,
    #[serde(default)]
    components: Vec<ComponentDto>,
    #[serde(default)]
    deny: Vec<DenyDto>,
}

#[derive(Debug, Deserialize)]
struct ValidatorSection {
    #[serde(rename = "default-policy", default = "default_policy_str")]
    default_policy: String,
    #[serde(rename = "no-circular-deps", default = "default_true")]
    no_circular_deps: bool,
    #[serde(rename = "unmapped-units", default = "default_unmapped_str")]
    unmapped_units: String,
}

impl Default for ValidatorSection {
    fn default() -> Self {
        Self {
            default_policy: default_policy_str(),
            no_circular_deps: true,
            unmapped_units: default_unmapped_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentDto {
    name: String,
    #[serde(default)]
    paths: Vec<String>,
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    isolate: bool,
    #[serde(default = "default_severity_str")]
    severity: String,
}

#[derive(Debug, Deserialize)]
struct DenyDto {
    from: String,
    to: String,
    #[serde(default = "default_severity_str")]
    severity: String,
}

fn default_policy_str() -> String {
    "allow".to_string()
}

fn default_unmapped_str() -> String {
    "unclassified".to_string()
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parses and validates a TOML rule file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on invalid TOML, invalid names or severities,
    /// duplicate components, or rules referencing undeclared components.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| LoadError::Parse {
            message: e.to_string(),
        })?;
        convert(raw)
    }

    /// The declared component names, in declaration order.
    #[must_use]
    pub fn component_names(&self) -> Vec<ComponentName> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }
}

fn convert(raw: RawConfig) -> Result<Config, LoadError> {
    let mut components = Vec::new();
    let mut seen = std::collections::BTreeSet::new();

    for (i, dto) in raw.components.iter().enumerate() {
        let ctx = format!("components[{i}]");
        let name = ComponentName::new(&dto.name).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.name"),
            source: e,
        })?;
        if !seen.insert(name.clone()) {
            return Err(LoadError::Validation {
                context: ctx,
                source: ConfigError::DuplicateComponent {
                    name: name.to_string(),
                },
            });
        }
        components.push(ComponentSpec {
            name,
            paths: dto.paths.clone(),
        });
    }

    let known = |name: &ComponentName| seen.contains(name) || *name == ComponentName::unclassified();

    let mut rules = Vec::new();

    // Allowed-dependency declarations become Allow rules (consumed under
    // default-deny) and feed the component's isolate allow-list.
    for (i, dto) in raw.components.iter().enumerate() {
        let ctx = format!("components[{i}]");
        let from = ComponentName::new(&dto.name).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.name"),
            source: e,
        })?;

        let mut allow_list = Vec::new();
        for (j, target) in dto.allow.iter().enumerate() {
            let to = ComponentName::new(target).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.allow[{j}]"),
                source: e,
            })?;
            if !known(&to) {
                return Err(LoadError::Validation {
                    context: format!("{ctx}.allow[{j}]"),
                    source: ConfigError::UnknownComponent {
                        context: format!("component `{from}`"),
                        name: to.to_string(),
                    },
                });
            }
            rules.push(Rule::Allow {
                from: from.clone(),
                to: to.clone(),
            });
            allow_list.push(to);
        }

        if dto.isolate {
            let severity = parse_severity(&dto.severity, &format!("{ctx}.severity"))?;
            rules.push(Rule::Isolate {
                component: from,
                allow: allow_list,
                severity,
            });
        }
    }

    for (i, dto) in raw.deny.into_iter().enumerate() {
        let ctx = format!("deny[{i}]");
        let from = ComponentName::new(&dto.from).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.from"),
            source: e,
        })?;
        let to = ComponentName::new(&dto.to).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.to"),
            source: e,
        })?;
        for name in [&from, &to] {
            if !known(name) {
                return Err(LoadError::Validation {
                    context: ctx.clone(),
                    source: ConfigError::UnknownComponent {
                        context: format!("deny({from} -> {to})"),
                        name: name.to_string(),
                    },
                });
            }
        }
        let severity = parse_severity(&dto.severity, &format!("{ctx}.severity"))?;
        rules.push(Rule::Deny { from, to, severity });
    }

    if raw.validator.no_circular_deps {
        rules.push(Rule::NoCycles {
            severity: Severity::Error,
        });
    }

    let default_policy = match raw.validator.default_policy.as_str() {
        "allow" => DefaultPolicy::Allow,
        "deny" => DefaultPolicy::Deny,
        other => {
            return Err(LoadError::UnknownFlag {
                field: "default-policy",
                value: other.to_string(),
                expected: "allow, deny",
            })
        }
    };

    let unmapped = match raw.validator.unmapped_units.as_str() {
        "unclassified" => UnmappedPolicy::Unclassified,
        "reject" => UnmappedPolicy::Reject,
        other => {
            return Err(LoadError::UnknownFlag {
                field: "unmapped-units",
                value: other.to_string(),
                expected: "unclassified, reject",
            })
        }
    };

    Ok(Config {
        components,
        rules: RuleSet::new(rules, default_policy),
        unmapped,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    match value {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        _ => Err(LoadError::UnknownSeverity {
            context: context.to_string(),
            value: value.to_string(),
        }),
    }
}
