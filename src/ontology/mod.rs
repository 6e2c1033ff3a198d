//! The Haystack defs ontology as in-memory class sets.
//!
//! An [`OntologyIndex`] is built once from an [`OntologyProvider`] and then
//! shared read-only by every classification call. Nothing here re-queries
//! the provider after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::info;

use crate::error::OntologyError;
use crate::parser::defs::DefGraph;

/// Def whose direct subclasses are the point function facets.
pub const POINT_FUNCTION_TYPE: &str = "pointFunctionType";

/// Answers class-hierarchy questions about a versioned ontology source.
pub trait OntologyProvider {
    /// Every class that is transitively a subclass of `root`, without `root` itself.
    fn closure(&self, root: &str) -> Result<BTreeSet<String>, OntologyError>;

    /// Classes that declare `root` as a direct superclass.
    fn direct_children(&self, root: &str) -> Result<BTreeSet<String>, OntologyError>;

    /// Hyphen-joined compound class names under `namespace`, e.g. `vav-fcu`.
    fn registered_compound_names(&self, namespace: &str) -> Result<BTreeSet<String>, OntologyError>;
}

/// The disjoint roots the classifier reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OntologyRoot {
    Marker,
    Entity,
    Equip,
    Val,
    Phenomenon,
    Quantity,
}

impl OntologyRoot {
    pub const ALL: [Self; 6] = [
        Self::Marker,
        Self::Entity,
        Self::Equip,
        Self::Val,
        Self::Phenomenon,
        Self::Quantity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Entity => "entity",
            Self::Equip => "equip",
            Self::Val => "val",
            Self::Phenomenon => "phenomenon",
            Self::Quantity => "quantity",
        }
    }
}

impl fmt::Display for OntologyRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OntologyIndex {
    closures: BTreeMap<OntologyRoot, BTreeSet<String>>,
    children: BTreeMap<OntologyRoot, BTreeSet<String>>,
    point_function_types: BTreeSet<String>,
    compound_equips: BTreeSet<String>,
    equip_components: Vec<BTreeSet<String>>,
}

impl OntologyIndex {
    /// Run every query the classifier needs against `provider`, once.
    ///
    /// # Errors
    ///
    /// Any provider failure aborts the build; a partial index is never returned.
    pub fn build<P: OntologyProvider + ?Sized>(provider: &P) -> Result<Self, OntologyError> {
        let mut closures = BTreeMap::new();
        let mut children = BTreeMap::new();
        for root in OntologyRoot::ALL {
            closures.insert(root, provider.closure(root.as_str())?);
            children.insert(root, provider.direct_children(root.as_str())?);
        }

        let point_function_types = provider.direct_children(POINT_FUNCTION_TYPE)?;
        let compound_equips = provider.registered_compound_names(OntologyRoot::Equip.as_str())?;

        // One component set per registered equip class; "a-b" and "b-a" collapse
        let equip_components: BTreeSet<BTreeSet<String>> = closures[&OntologyRoot::Equip]
            .iter()
            .map(|name| name.split('-').map(ToString::to_string).collect())
            .collect();

        let index = Self {
            closures,
            children,
            point_function_types,
            compound_equips,
            equip_components: equip_components.into_iter().collect(),
        };

        info!(
            markers = index.closure_of(OntologyRoot::Marker).len(),
            first_class_entities = index.first_class_entities().len(),
            equips = index.closure_of(OntologyRoot::Equip).len(),
            compound_equips = index.compound_equips.len(),
            "ontology index built"
        );
        Ok(index)
    }

    /// Parse a defs document from disk and index it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OntologyError> {
        let graph = DefGraph::load(path)?;
        Self::build(&graph)
    }

    #[must_use]
    pub fn closure_of(&self, root: OntologyRoot) -> &BTreeSet<String> {
        &self.closures[&root]
    }

    #[must_use]
    pub fn direct_children_of(&self, root: OntologyRoot) -> &BTreeSet<String> {
        &self.children[&root]
    }

    /// Direct subclasses of `entity`: equip, point, site, ...
    #[must_use]
    pub fn first_class_entities(&self) -> &BTreeSet<String> {
        self.direct_children_of(OntologyRoot::Entity)
    }

    #[must_use]
    pub fn point_function_types(&self) -> &BTreeSet<String> {
        &self.point_function_types
    }

    /// Component tokens of every registered equip class, e.g. `{vav, fcu}` for `vav-fcu`.
    #[must_use]
    pub fn equipment_component_sets(&self) -> &[BTreeSet<String>] {
        &self.equip_components
    }

    #[must_use]
    pub fn compound_equip_names(&self) -> &BTreeSet<String> {
        &self.compound_equips
    }

    /// Whether `name` is a registered equip subclass, simple or compound.
    #[must_use]
    pub fn is_equip_class(&self, name: &str) -> bool {
        self.closure_of(OntologyRoot::Equip).contains(name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::parser::defs::DefGraph;

    /// A trimmed-down defs hierarchy covering every root.
    pub(crate) fn defs() -> DefGraph {
        DefGraph::from_defs(vec![
            ("val", vec![]),
            ("marker", vec![]),
            ("str", vec!["val"]),
            ("ref", vec!["val"]),
            ("number", vec!["val"]),
            ("id", vec!["ref"]),
            ("equipRef", vec!["ref"]),
            ("dis", vec!["str"]),
            ("navName", vec!["str"]),
            ("unit", vec!["str"]),
            ("area", vec!["number"]),
            ("entity", vec!["marker"]),
            ("equip", vec!["entity"]),
            ("point", vec!["entity"]),
            ("site", vec!["entity"]),
            ("vav", vec!["equip"]),
            ("ahu", vec!["equip"]),
            ("vav-fcu", vec!["equip"]),
            ("fcu", vec!["marker"]),
            ("pointFunctionType", vec!["marker"]),
            ("sensor", vec!["pointFunctionType"]),
            ("cmd", vec!["pointFunctionType"]),
            ("sp", vec!["pointFunctionType"]),
            ("phenomenon", vec!["marker"]),
            ("air", vec!["phenomenon"]),
            ("water", vec!["phenomenon"]),
            ("quantity", vec!["marker"]),
            ("temp", vec!["quantity"]),
            ("pressure", vec!["quantity"]),
            ("zone", vec!["marker"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn indexes_every_root() {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        assert_eq!(index.first_class_entities(), &set(&["equip", "point", "site"]));
        assert_eq!(
            index.closure_of(OntologyRoot::Equip),
            &set(&["ahu", "vav", "vav-fcu"])
        );
        assert_eq!(index.point_function_types(), &set(&["cmd", "sensor", "sp"]));
        assert_eq!(
            index.closure_of(OntologyRoot::Quantity),
            &set(&["pressure", "temp"])
        );
        assert!(index.closure_of(OntologyRoot::Val).contains("equipRef"));
        assert!(!index.closure_of(OntologyRoot::Marker).contains("marker"));
    }

    #[test]
    fn equipment_component_sets_split_compounds() {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        assert_eq!(
            index.equipment_component_sets(),
            &[set(&["ahu"]), set(&["fcu", "vav"]), set(&["vav"])]
        );
        assert_eq!(index.compound_equip_names(), &set(&["vav-fcu"]));
        assert!(index.is_equip_class("vav-fcu"));
        assert!(!index.is_equip_class("fcu-vav"));
    }

    #[test]
    fn reordered_compounds_share_one_component_set() {
        let mut defs: Vec<(&str, Vec<&str>)> = vec![
            ("marker", vec![]),
            ("val", vec![]),
            ("entity", vec!["marker"]),
            ("equip", vec!["entity"]),
            ("phenomenon", vec!["marker"]),
            ("quantity", vec!["marker"]),
            ("pointFunctionType", vec!["marker"]),
        ];
        defs.push(("hot-water", vec!["equip"]));
        defs.push(("water-hot", vec!["equip"]));
        let index = OntologyIndex::build(&DefGraph::from_defs(defs)).unwrap();
        assert_eq!(index.equipment_component_sets(), &[set(&["hot", "water"])]);
    }

    #[test]
    fn missing_root_fails_the_build() {
        let graph = DefGraph::from_defs(vec![("marker", vec![]), ("entity", vec!["marker"])]);
        assert!(matches!(
            OntologyIndex::build(&graph),
            Err(OntologyError::UnknownRoot { .. })
        ));
    }
}
