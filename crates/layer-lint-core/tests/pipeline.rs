//! Integration test: TOML rule file to report, end to end.
//!
//! Exercises the full pipeline (config parse, graph construction,
//! evaluation, report build) the way a CLI collaborator drives it, and
//! asserts the determinism and monotonicity properties the report
//! contract promises.

use std::collections::BTreeMap;

use layer_lint_core::{
    ComponentName, Config, Graph, Location, RawImport, Report, RuleKind, Validator,
};

const RULE_FILE: &str = r#"
[validator]
default-policy = "deny"
no-circular-deps = true
unmapped-units = "unclassified"

[[components]]
name = "domain"
paths = ["src/domain/**"]
isolate = true

[[components]]
name = "application"
paths = ["src/application/**"]
allow = ["domain"]

[[components]]
name = "infrastructure"
paths = ["src/infrastructure/**"]
allow = ["domain", "application"]

[[components]]
name = "shared"
paths = ["src/shared/**"]
"#;

fn name(s: &str) -> ComponentName {
    ComponentName::new(s).unwrap()
}

/// Builds the mapping a real ingestion adapter would produce.
fn mapping() -> BTreeMap<String, ComponentName> {
    [
        ("src/domain/user.rs", "domain"),
        ("src/domain/order.rs", "domain"),
        ("src/application/create_user.rs", "application"),
        ("src/infrastructure/pg_repo.rs", "infrastructure"),
        ("src/shared/ids.rs", "shared"),
    ]
    .into_iter()
    .map(|(unit, component)| (unit.to_string(), name(component)))
    .collect()
}

fn imports() -> Vec<RawImport> {
    vec![
        // Legal: application -> domain.
        RawImport::new(
            "src/application/create_user.rs",
            "src/domain/user.rs",
            Location::new("src/application/create_user.rs", 3),
        ),
        // Breach: domain -> infrastructure (isolation + default-deny).
        RawImport::new(
            "src/domain/user.rs",
            "src/infrastructure/pg_repo.rs",
            Location::new("src/domain/user.rs", 8),
        ),
        // Intra-component import, exempt everywhere.
        RawImport::new(
            "src/domain/order.rs",
            "src/domain/user.rs",
            Location::new("src/domain/order.rs", 2),
        ),
        // Uncovered under default-deny: shared -> domain.
        RawImport::new(
            "src/shared/ids.rs",
            "src/domain/user.rs",
            Location::new("src/shared/ids.rs", 1),
        ),
    ]
}

fn run() -> Report {
    let config = Config::parse(RULE_FILE).expect("rule file should parse");
    let graph = Graph::builder()
        .components(config.component_names())
        .mapping(mapping())
        .unmapped_policy(config.unmapped)
        .imports(imports())
        .build()
        .expect("graph should build");
    Validator::new(graph, config.rules)
        .run()
        .expect("validation should run")
}

#[test]
fn detects_isolation_and_default_deny_breaches() {
    let report = run();

    assert!(!report.passed);
    assert_eq!(report.edges_checked, 4);
    // domain -> infrastructure breaks isolation and the allow-list;
    // shared -> domain breaks the allow-list.
    assert_eq!(report.total_violations, 3);
    assert_eq!(report.by_kind.get("isolate"), Some(&1));
    assert_eq!(report.by_kind.get("default-deny"), Some(&2));
    assert!(report.by_kind.get("no-cycles").is_none());
}

#[test]
fn violations_carry_their_witnesses() {
    let report = run();

    let isolate = report
        .violations
        .iter()
        .find(|v| v.kind == RuleKind::Isolate)
        .expect("isolation violation expected");
    assert_eq!(isolate.witnesses.len(), 1);
    assert_eq!(
        isolate.witnesses[0].location,
        Location::new("src/domain/user.rs", 8)
    );
    assert_eq!(isolate.witnesses[0].to_unit, "src/infrastructure/pg_repo.rs");
}

#[test]
fn report_is_byte_identical_across_runs() {
    let first = serde_json::to_vec(&run()).expect("report should serialize");
    let second = serde_json::to_vec(&run()).expect("report should serialize");
    assert_eq!(first, second);
}

#[test]
fn allowing_the_edge_removes_only_its_default_deny_violation() {
    let relaxed = RULE_FILE.replace(
        "name = \"shared\"",
        "name = \"shared\"\nallow = [\"domain\"]",
    );

    let config = Config::parse(&relaxed).expect("rule file should parse");
    let graph = Graph::builder()
        .components(config.component_names())
        .mapping(mapping())
        .unmapped_policy(config.unmapped)
        .imports(imports())
        .build()
        .expect("graph should build");
    let report = Validator::new(graph, config.rules)
        .run()
        .expect("validation should run");

    // shared -> domain is now allowed; the domain breaches remain.
    assert_eq!(report.total_violations, 2);
    assert_eq!(report.by_kind.get("isolate"), Some(&1));
    assert_eq!(report.by_kind.get("default-deny"), Some(&1));
}

#[test]
fn cycle_between_components_fails_the_run_report() {
    let mut edges = imports();
    // Close the loop: domain -> application (application -> domain exists).
    edges.push(RawImport::new(
        "src/domain/order.rs",
        "src/application/create_user.rs",
        Location::new("src/domain/order.rs", 9),
    ));

    let config = Config::parse(RULE_FILE).expect("rule file should parse");
    let graph = Graph::builder()
        .components(config.component_names())
        .mapping(mapping())
        .unmapped_policy(config.unmapped)
        .imports(edges)
        .build()
        .expect("graph should build");
    let report = Validator::new(graph, config.rules)
        .run()
        .expect("validation should run");

    assert!(!report.passed);
    assert_eq!(report.by_kind.get("no-cycles"), Some(&1));
    let cycle = report
        .violations
        .iter()
        .find(|v| v.kind == RuleKind::NoCycles)
        .expect("cycle violation expected");
    assert!(cycle.message.contains("application -> domain -> application"));
}

#[test]
fn strict_mode_aborts_on_unknown_unit() {
    let strict = RULE_FILE.replace("unclassified", "reject");
    let config = Config::parse(&strict).expect("rule file should parse");

    let mut edges = imports();
    edges.push(RawImport::new(
        "src/stray.rs",
        "src/domain/user.rs",
        Location::new("src/stray.rs", 1),
    ));

    let result = Graph::builder()
        .components(config.component_names())
        .mapping(mapping())
        .unmapped_policy(config.unmapped)
        .imports(edges)
        .build();
    assert!(result.is_err());
}
