//! # layer-lint-core
//!
//! Dependency-graph construction and architecture rule validation.
//!
//! The engine consumes a component list, a unit-to-component mapping, and
//! raw import edges from an ingestion adapter, then checks the resulting
//! graph against a declarative rule set:
//!
//! - [`Graph`]: deduplicated component dependency graph with witnesses
//! - [`Rule`] / [`RuleSet`]: allow/deny/isolate/no-cycles constraints
//! - [`find_cycles`]: deterministic DFS cycle detection
//! - [`Validator`] / [`Report`]: evaluation and the sorted, serializable
//!   result
//!
//! The whole pipeline is synchronous and free of I/O; configuration
//! parsing works on strings and the report is a plain value. Violations
//! are returned as data, never as errors.
//!
//! ## Example
//!
//! ```
//! use layer_lint_core::{
//!     ComponentName, DefaultPolicy, Graph, Location, RawImport, Rule, RuleSet, Severity,
//!     Validator,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let domain = ComponentName::new("domain")?;
//! let infra = ComponentName::new("infra")?;
//!
//! let graph = Graph::builder()
//!     .components([domain.clone(), infra.clone()])
//!     .map_unit("src/domain/user.rs", domain.clone())
//!     .map_unit("src/infra/db.rs", infra.clone())
//!     .imports([RawImport::new(
//!         "src/domain/user.rs",
//!         "src/infra/db.rs",
//!         Location::new("src/domain/user.rs", 12),
//!     )])
//!     .build()?;
//!
//! let rules = RuleSet::new(
//!     vec![Rule::Deny { from: domain, to: infra, severity: Severity::Error }],
//!     DefaultPolicy::Allow,
//! );
//!
//! let report = Validator::new(graph, rules).run()?;
//! assert!(!report.passed);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod cycle;
mod error;
mod evaluate;
mod graph;
mod report;
mod rule;
mod types;
mod validator;

pub use config::{ComponentSpec, Config, LoadError};
pub use cycle::{find_cycles, Cycle};
pub use error::{ConfigError, IngestionError, ValidateError};
pub use evaluate::evaluate;
pub use graph::{ComponentName, Edge, Graph, GraphBuilder, RawImport, UnmappedPolicy, Witness};
pub use report::{Report, Subject, Violation};
pub use rule::{DefaultPolicy, Rule, RuleKind, RuleSet};
pub use types::{Location, Severity};
pub use validator::Validator;
