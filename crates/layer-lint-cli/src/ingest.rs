//! Ingestion adapter: import-list loading and unit-to-component mapping.
//!
//! The core treats pattern matching as opaque; this module owns it. Units
//! are matched against the components' glob patterns, first match wins in
//! declaration order, so a unit belongs to exactly one component.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use layer_lint_core::{ComponentName, ComponentSpec, Location, RawImport};

/// One import occurrence as produced by an external extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRecord {
    /// The importing compilation unit.
    pub from: String,
    /// The imported compilation unit.
    pub to: String,
    /// Source file of the import statement.
    pub file: PathBuf,
    /// Line of the import statement (1-indexed).
    pub line: usize,
}

/// Loads a JSON import list from disk.
pub fn load_imports(path: &Path) -> Result<Vec<RawImport>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read import list: {}", path.display()))?;
    parse_imports(&content)
        .with_context(|| format!("invalid import list: {}", path.display()))
}

/// Parses a JSON array of import records.
pub fn parse_imports(content: &str) -> Result<Vec<RawImport>> {
    let records: Vec<ImportRecord> =
        serde_json::from_str(content).context("import list must be a JSON array of records")?;
    Ok(records
        .into_iter()
        .map(|r| RawImport::new(r.from, r.to, Location::new(r.file, r.line)))
        .collect())
}

/// Maps compilation units to components via glob path patterns.
#[derive(Debug)]
pub struct UnitMapper {
    patterns: Vec<(glob::Pattern, ComponentName)>,
}

impl UnitMapper {
    /// Compiles the patterns of every component spec.
    pub fn new(components: &[ComponentSpec]) -> Result<Self> {
        let mut patterns = Vec::new();
        for spec in components {
            for raw in &spec.paths {
                let pattern = glob::Pattern::new(raw).with_context(|| {
                    format!("component `{}`: invalid path pattern `{raw}`", spec.name)
                })?;
                patterns.push((pattern, spec.name.clone()));
            }
        }
        Ok(Self { patterns })
    }

    /// Resolves a unit to its component. First matching pattern wins.
    #[must_use]
    pub fn resolve(&self, unit: &str) -> Option<&ComponentName> {
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.matches(unit))
            .map(|(_, component)| component)
    }

    /// Builds the mapping for every unit mentioned in the import list.
    ///
    /// Units no pattern claims are left out; the core's unmapped-units
    /// policy decides what happens to them.
    #[must_use]
    pub fn mapping_for(&self, imports: &[RawImport]) -> BTreeMap<String, ComponentName> {
        let mut mapping = BTreeMap::new();
        for import in imports {
            for unit in [&import.from_unit, &import.to_unit] {
                if !mapping.contains_key(unit.as_str()) {
                    if let Some(component) = self.resolve(unit) {
                        mapping.insert(unit.clone(), component.clone());
                    }
                }
            }
        }
        mapping
    }
}
