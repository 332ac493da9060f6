//! Component dependency graph: construction and read-only queries.
//!
//! A [`Graph`] is built once per validation run from a component list, a
//! unit-to-component mapping, and raw import records. After construction it
//! is immutable; every query returns data in a deterministic order so that
//! repeated runs over identical input produce identical output.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ConfigError, IngestionError, ValidateError};
use crate::types::Location;

/// Name reserved for units that no declared component claims.
const UNCLASSIFIED: &str = "unclassified";

/// A validated component name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    /// Creates a new component name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyComponentName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::InvalidComponentName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// The implicit component that collects unmapped units in lenient mode.
    #[must_use]
    pub fn unclassified() -> Self {
        Self(UNCLASSIFIED.to_string())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.0
    }
}

/// A raw import record handed in by the ingestion adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImport {
    /// The importing compilation unit.
    pub from_unit: String,
    /// The imported compilation unit.
    pub to_unit: String,
    /// Where the import occurs.
    pub location: Location,
}

impl RawImport {
    /// Creates a new raw import record.
    #[must_use]
    pub fn new(from_unit: impl Into<String>, to_unit: impl Into<String>, location: Location) -> Self {
        Self {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            location,
        }
    }
}

/// A concrete import occurrence proving that an edge exists.
///
/// Retained on the deduplicated edge for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// The importing compilation unit.
    pub from_unit: String,
    /// The imported compilation unit.
    pub to_unit: String,
    /// Where the import occurs.
    pub location: Location,
}

/// A directed dependency between two components.
///
/// Multiple raw imports between the same component pair collapse into one
/// edge; the witnesses are kept in ingestion order.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    /// Source component.
    pub from: ComponentName,
    /// Target component.
    pub to: ComponentName,
    /// Import occurrences backing this edge, in ingestion order.
    pub witnesses: Vec<Witness>,
}

impl Edge {
    /// Returns true if source and target are the same component.
    #[must_use]
    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }
}

/// How to treat a unit that no declared component claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    /// Assign the unit to the implicit `unclassified` component.
    #[default]
    Unclassified,
    /// Abort construction with a configuration error (strict mode).
    Reject,
}

/// The component dependency graph for one validation run.
///
/// Exclusively owned by its run; exposes no mutation after construction.
#[derive(Debug, Clone)]
pub struct Graph {
    components: BTreeSet<ComponentName>,
    edges: BTreeMap<(ComponentName, ComponentName), Edge>,
}

impl Graph {
    /// Starts building a graph.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// All components, in lexicographic order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentName> {
        self.components.iter()
    }

    /// Returns true if the component was declared (or synthesized).
    #[must_use]
    pub fn contains(&self, name: &ComponentName) -> bool {
        self.components.contains(name)
    }

    /// Borrow of the underlying component set.
    #[must_use]
    pub fn component_set(&self) -> &BTreeSet<ComponentName> {
        &self.components
    }

    /// All edges, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of distinct edges (self-edges included).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of a component, ordered by target name.
    pub fn out_edges<'a>(&'a self, from: &'a ComponentName) -> impl Iterator<Item = &'a Edge> {
        self.edges
            .values()
            .filter(move |edge| &edge.from == from)
    }

    /// Looks up the edge between two components, if any.
    #[must_use]
    pub fn edge(&self, from: &ComponentName, to: &ComponentName) -> Option<&Edge> {
        self.edges.get(&(from.clone(), to.clone()))
    }
}

/// Builder assembling a [`Graph`] from ingestion-adapter output.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    components: Vec<ComponentName>,
    mapping: BTreeMap<String, ComponentName>,
    unmapped: UnmappedPolicy,
    imports: Vec<RawImport>,
}

impl GraphBuilder {
    /// Declares the components of the graph.
    #[must_use]
    pub fn components<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentName>,
    {
        self.components.extend(components);
        self
    }

    /// Sets the unit-to-component mapping produced by the ingestion adapter.
    #[must_use]
    pub fn mapping(mut self, mapping: BTreeMap<String, ComponentName>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Maps a single unit to a component.
    #[must_use]
    pub fn map_unit(mut self, unit: impl Into<String>, component: ComponentName) -> Self {
        self.mapping.insert(unit.into(), component);
        self
    }

    /// Sets the policy for units absent from the mapping.
    #[must_use]
    pub fn unmapped_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    /// Adds raw import records.
    #[must_use]
    pub fn imports<I>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = RawImport>,
    {
        self.imports.extend(imports);
        self
    }

    /// Builds the graph.
    ///
    /// Construction is O(E) in raw imports. Edges are deduplicated by
    /// `(from, to)`; witnesses are retained in ingestion order.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError`] for malformed import records, and
    /// [`ConfigError`] for duplicate components, mappings to undeclared
    /// components, or (in strict mode) unmapped units.
    pub fn build(self) -> Result<Graph, ValidateError> {
        let mut components = BTreeSet::new();
        for name in self.components {
            if !components.insert(name.clone()) {
                return Err(ConfigError::DuplicateComponent {
                    name: name.to_string(),
                }
                .into());
            }
        }

        for (unit, component) in &self.mapping {
            if !components.contains(component) {
                return Err(ConfigError::UnknownComponent {
                    context: format!("mapping for unit `{unit}`"),
                    name: component.to_string(),
                }
                .into());
            }
        }

        let mut edges: BTreeMap<(ComponentName, ComponentName), Edge> = BTreeMap::new();

        for (index, import) in self.imports.into_iter().enumerate() {
            if import.from_unit.is_empty() || import.to_unit.is_empty() {
                return Err(IngestionError::EmptyUnitName { index }.into());
            }
            if import.location.file.as_os_str().is_empty() || import.location.line == 0 {
                return Err(IngestionError::MissingLocation {
                    from_unit: import.from_unit,
                    to_unit: import.to_unit,
                }
                .into());
            }

            let from = resolve(&self.mapping, self.unmapped, &mut components, &import.from_unit)?;
            let to = resolve(&self.mapping, self.unmapped, &mut components, &import.to_unit)?;

            let witness = Witness {
                from_unit: import.from_unit,
                to_unit: import.to_unit,
                location: import.location,
            };

            edges
                .entry((from.clone(), to.clone()))
                .or_insert_with(|| Edge {
                    from,
                    to,
                    witnesses: Vec::new(),
                })
                .witnesses
                .push(witness);
        }

        Ok(Graph { components, edges })
    }
}

/// Resolves a unit to its component per the unmapped policy.
fn resolve(
    mapping: &BTreeMap<String, ComponentName>,
    policy: UnmappedPolicy,
    components: &mut BTreeSet<ComponentName>,
    unit: &str,
) -> Result<ComponentName, ValidateError> {
    if let Some(component) = mapping.get(unit) {
        return Ok(component.clone());
    }
    match policy {
        UnmappedPolicy::Reject => Err(ConfigError::UnmappedUnit {
            unit: unit.to_string(),
        }
        .into()),
        UnmappedPolicy::Unclassified => {
            let fallback = ComponentName::unclassified();
            components.insert(fallback.clone());
            Ok(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ComponentName {
        ComponentName::new(s).unwrap()
    }

    fn import(from: &str, to: &str, file: &str, line: usize) -> RawImport {
        RawImport::new(from, to, Location::new(file, line))
    }

    // -- ComponentName --

    #[test]
    fn component_name_valid() {
        assert!(ComponentName::new("domain").is_ok());
        assert!(ComponentName::new("infra-db2").is_ok());
    }

    #[test]
    fn component_name_empty_rejected() {
        assert!(matches!(
            ComponentName::new(""),
            Err(ConfigError::EmptyComponentName)
        ));
    }

    #[test]
    fn component_name_invalid_chars_rejected() {
        assert!(matches!(
            ComponentName::new("Domain"),
            Err(ConfigError::InvalidComponentName { .. })
        ));
        assert!(matches!(
            ComponentName::new("my_component"),
            Err(ConfigError::InvalidComponentName { .. })
        ));
    }

    // -- Construction --

    fn two_component_builder() -> GraphBuilder {
        Graph::builder()
            .components([name("domain"), name("infra")])
            .map_unit("src/domain/user.rs", name("domain"))
            .map_unit("src/infra/db.rs", name("infra"))
    }

    #[test]
    fn builds_edge_from_import() {
        let graph = two_component_builder()
            .imports([import(
                "src/domain/user.rs",
                "src/infra/db.rs",
                "src/domain/user.rs",
                3,
            )])
            .build()
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge(&name("domain"), &name("infra")).unwrap();
        assert_eq!(edge.witnesses.len(), 1);
        assert_eq!(edge.witnesses[0].location.line, 3);
    }

    #[test]
    fn deduplicates_edges_and_keeps_witnesses_in_order() {
        let graph = two_component_builder()
            .map_unit("src/domain/order.rs", name("domain"))
            .imports([
                import("src/domain/user.rs", "src/infra/db.rs", "x.rs", 10),
                import("src/domain/order.rs", "src/infra/db.rs", "y.rs", 20),
            ])
            .build()
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge(&name("domain"), &name("infra")).unwrap();
        assert_eq!(edge.witnesses.len(), 2);
        assert_eq!(edge.witnesses[0].location, Location::new("x.rs", 10));
        assert_eq!(edge.witnesses[1].location, Location::new("y.rs", 20));
    }

    #[test]
    fn self_edge_is_recorded() {
        let graph = two_component_builder()
            .map_unit("src/domain/order.rs", name("domain"))
            .imports([import(
                "src/domain/user.rs",
                "src/domain/order.rs",
                "z.rs",
                1,
            )])
            .build()
            .unwrap();

        let edge = graph.edge(&name("domain"), &name("domain")).unwrap();
        assert!(edge.is_self_edge());
    }

    #[test]
    fn out_edges_ordered_by_target() {
        let graph = Graph::builder()
            .components([name("a"), name("b"), name("c")])
            .map_unit("a.rs", name("a"))
            .map_unit("b.rs", name("b"))
            .map_unit("c.rs", name("c"))
            .imports([
                import("a.rs", "c.rs", "a.rs", 1),
                import("a.rs", "b.rs", "a.rs", 2),
            ])
            .build()
            .unwrap();

        let a = name("a");
        let targets: Vec<&str> = graph
            .out_edges(&a)
            .map(|e| e.to.as_str())
            .collect();
        assert_eq!(targets, ["b", "c"]);
    }

    // -- Errors --

    #[test]
    fn duplicate_component_rejected() {
        let result = Graph::builder()
            .components([name("domain"), name("domain")])
            .build();
        assert!(matches!(
            result,
            Err(ValidateError::Config(ConfigError::DuplicateComponent { .. }))
        ));
    }

    #[test]
    fn mapping_to_undeclared_component_rejected() {
        let result = Graph::builder()
            .components([name("domain")])
            .map_unit("src/infra/db.rs", name("infra"))
            .build();
        assert!(matches!(
            result,
            Err(ValidateError::Config(ConfigError::UnknownComponent { .. }))
        ));
    }

    #[test]
    fn empty_unit_rejected() {
        let result = two_component_builder()
            .imports([import("", "src/infra/db.rs", "x.rs", 1)])
            .build();
        assert!(matches!(
            result,
            Err(ValidateError::Ingestion(IngestionError::EmptyUnitName { index: 0 }))
        ));
    }

    #[test]
    fn missing_location_rejected() {
        let result = two_component_builder()
            .imports([import("src/domain/user.rs", "src/infra/db.rs", "", 1)])
            .build();
        assert!(matches!(
            result,
            Err(ValidateError::Ingestion(IngestionError::MissingLocation { .. }))
        ));
    }

    #[test]
    fn strict_mode_rejects_unmapped_unit() {
        let result = two_component_builder()
            .unmapped_policy(UnmappedPolicy::Reject)
            .imports([import("src/unknown.rs", "src/infra/db.rs", "x.rs", 1)])
            .build();
        assert!(matches!(
            result,
            Err(ValidateError::Config(ConfigError::UnmappedUnit { .. }))
        ));
    }

    #[test]
    fn lenient_mode_assigns_unclassified() {
        let graph = two_component_builder()
            .imports([import("src/unknown.rs", "src/infra/db.rs", "x.rs", 1)])
            .build()
            .unwrap();

        assert!(graph.contains(&ComponentName::unclassified()));
        assert!(graph
            .edge(&ComponentName::unclassified(), &name("infra"))
            .is_some());
    }
}
