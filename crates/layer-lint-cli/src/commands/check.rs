//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use layer_lint_core::{Config, Graph, Validator};

use super::output;
use crate::ingest::{self, UnitMapper};
use crate::OutputFormat;

/// Runs the check command. Returns the process exit code.
pub fn run(config_path: &Path, imports_path: &Path, format: OutputFormat) -> Result<i32> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config: {}", config_path.display()))?;
    let config = Config::parse(&content)
        .with_context(|| format!("failed to load config: {}", config_path.display()))?;

    let imports = ingest::load_imports(imports_path)?;
    let mapper = UnitMapper::new(&config.components)?;
    let mapping = mapper.mapping_for(&imports);

    tracing::info!(
        components = config.components.len(),
        imports = imports.len(),
        "building dependency graph"
    );

    let graph = Graph::builder()
        .components(config.component_names())
        .mapping(mapping)
        .unmapped_policy(config.unmapped)
        .imports(imports)
        .build()
        .context("graph construction failed")?;

    let report = Validator::new(graph, config.rules)
        .run()
        .context("rule evaluation failed")?;

    output::print(&report, format)?;

    Ok(i32::from(!report.passed))
}
