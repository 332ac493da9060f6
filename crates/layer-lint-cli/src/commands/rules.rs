//! Rules command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use layer_lint_core::{Config, DefaultPolicy, UnmappedPolicy};

/// Prints the effective rule set of a config file in declaration order.
pub fn run(config_path: &Path) -> Result<i32> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config: {}", config_path.display()))?;
    let config = Config::parse(&content)
        .with_context(|| format!("failed to load config: {}", config_path.display()))?;

    println!("Components:");
    for name in config.component_names() {
        println!("  {name}");
    }

    println!("\nRules (evaluated in this order):");
    for rule in config.rules.rules() {
        println!("  {rule}");
    }

    let policy = match config.rules.default_policy() {
        DefaultPolicy::Allow => "allow (uncovered edges pass)",
        DefaultPolicy::Deny => "deny (uncovered edges are violations)",
    };
    println!("\nDefault policy: {policy}");

    let unmapped = match config.unmapped {
        UnmappedPolicy::Unclassified => "unclassified (unknown units pool together)",
        UnmappedPolicy::Reject => "reject (unknown units abort the run)",
    };
    println!("Unmapped units: {unmapped}");

    Ok(0)
}
