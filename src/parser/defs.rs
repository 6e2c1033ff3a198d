use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::OntologyError;
use crate::ontology::OntologyProvider;

/// The `is` hierarchy of a Haystack defs document.
///
/// Each def maps to its declared superclasses; the reverse edges are kept
/// so closures can be walked downward from a root.
#[derive(Debug, Default)]
pub struct DefGraph {
    supers: BTreeMap<String, BTreeSet<String>>,
    subs: BTreeMap<String, BTreeSet<String>>,
}

impl DefGraph {
    /// Parse a defs grid in JSON.
    ///
    /// Accepts the v3 encoding (`"def": "y:ahu", "is": ["y:equip"]`), caret
    /// symbols (`"^ahu"`), bare strings and Hayson symbol objects
    /// (`{"_kind": "symbol", "val": "ahu"}`). Columns other than `def` and
    /// `is` are ignored.
    pub fn parse(content: &str) -> Result<Self, OntologyError> {
        let doc: Value = serde_json::from_str(content)?;
        let rows = doc
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| OntologyError::Malformed {
                message: "missing 'rows' array".to_string(),
            })?;

        let mut defs = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let name = row
                .get("def")
                .and_then(parse_symbol)
                .ok_or_else(|| OntologyError::Malformed {
                    message: format!("row {index} has no decodable 'def'"),
                })?;

            let supers = match row.get("is") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(list)) => list
                    .iter()
                    .map(|v| {
                        parse_symbol(v).ok_or_else(|| OntologyError::Malformed {
                            message: format!("def '{name}' has an undecodable 'is' entry"),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                Some(v) => vec![parse_symbol(v).ok_or_else(|| OntologyError::Malformed {
                    message: format!("def '{name}' has an undecodable 'is'"),
                })?],
            };

            defs.push((name, supers));
        }

        debug!(defs = defs.len(), "parsed defs grid");
        Ok(Self::from_defs(defs))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OntologyError> {
        let content = std::fs::read_to_string(&path).map_err(|source| OntologyError::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Build a graph from `(def, superclasses)` pairs.
    pub fn from_defs<I, S>(defs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut graph = Self::default();
        for (name, supers) in defs {
            let name = name.into();
            let entry = graph.supers.entry(name.clone()).or_default();
            for sup in supers {
                let sup = sup.into();
                entry.insert(sup.clone());
                graph.subs.entry(sup).or_default().insert(name.clone());
            }
        }
        graph
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.supers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.supers.contains_key(name)
    }

    fn require(&self, root: &str) -> Result<(), OntologyError> {
        if self.contains(root) || self.subs.contains_key(root) {
            Ok(())
        } else {
            Err(OntologyError::UnknownRoot {
                root: root.to_string(),
            })
        }
    }
}

impl OntologyProvider for DefGraph {
    fn closure(&self, root: &str) -> Result<BTreeSet<String>, OntologyError> {
        self.require(root)?;

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(class) = queue.pop_front() {
            for sub in self.subs.get(class).into_iter().flatten() {
                if seen.insert(sub.clone()) {
                    queue.push_back(sub.as_str());
                }
            }
        }
        // A cycle back through the root must not put it in its own closure
        seen.remove(root);
        Ok(seen)
    }

    fn direct_children(&self, root: &str) -> Result<BTreeSet<String>, OntologyError> {
        self.require(root)?;
        Ok(self.subs.get(root).cloned().unwrap_or_default())
    }

    fn registered_compound_names(&self, namespace: &str) -> Result<BTreeSet<String>, OntologyError> {
        Ok(self
            .closure(namespace)?
            .into_iter()
            .filter(|name| name.contains('-'))
            .collect())
    }
}

fn parse_symbol(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) if obj.get("_kind").and_then(Value::as_str) == Some("symbol") => {
            obj.get("val").and_then(Value::as_str)?
        }
        _ => return None,
    };

    let name = raw
        .strip_prefix("y:")
        .or_else(|| raw.strip_prefix('^'))
        .unwrap_or(raw)
        .trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEFS: &str = r#"{
        "meta": {"ver": "3.0"},
        "cols": [{"name": "def"}, {"name": "is"}],
        "rows": [
            {"def": "y:marker"},
            {"def": "y:entity", "is": ["y:marker"]},
            {"def": "^equip", "is": "^entity"},
            {"def": {"_kind": "symbol", "val": "ahu"}, "is": [{"_kind": "symbol", "val": "equip"}]},
            {"def": "vav", "is": ["equip"], "doc": "Variable air volume terminal"},
            {"def": "y:vav-fcu", "is": ["y:vav"]}
        ]
    }"#;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn decodes_every_symbol_encoding() {
        let graph = DefGraph::parse(DEFS).unwrap();
        assert_eq!(graph.len(), 6);
        assert!(graph.contains("ahu"));
        assert!(graph.contains("vav-fcu"));
    }

    #[test]
    fn closure_is_transitive_and_excludes_root() {
        let graph = DefGraph::parse(DEFS).unwrap();
        assert_eq!(
            graph.closure("marker").unwrap(),
            set(&["ahu", "entity", "equip", "vav", "vav-fcu"])
        );
        assert_eq!(graph.closure("equip").unwrap(), set(&["ahu", "vav", "vav-fcu"]));
        assert_eq!(graph.closure("vav-fcu").unwrap(), BTreeSet::new());
    }

    #[test]
    fn direct_children_stop_at_one_level() {
        let graph = DefGraph::parse(DEFS).unwrap();
        assert_eq!(graph.direct_children("entity").unwrap(), set(&["equip"]));
        assert_eq!(graph.direct_children("equip").unwrap(), set(&["ahu", "vav"]));
    }

    #[test]
    fn compound_names_are_hyphenated_descendants() {
        let graph = DefGraph::parse(DEFS).unwrap();
        assert_eq!(
            graph.registered_compound_names("equip").unwrap(),
            set(&["vav-fcu"])
        );
    }

    #[test]
    fn multiple_inheritance_and_cycles() {
        let graph = DefGraph::from_defs(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["a", "b"]),
            ("a", vec!["c"]),
        ]);
        assert_eq!(graph.closure("a").unwrap(), set(&["b", "c"]));
    }

    #[test]
    fn unknown_root_is_an_error() {
        let graph = DefGraph::parse(DEFS).unwrap();
        assert!(matches!(
            graph.closure("phenomenon"),
            Err(OntologyError::UnknownRoot { root }) if root == "phenomenon"
        ));
    }

    #[test]
    fn malformed_documents() {
        assert!(matches!(
            DefGraph::parse("{\"cols\": []}"),
            Err(OntologyError::Malformed { .. })
        ));
        assert!(matches!(
            DefGraph::parse("{\"rows\": [{\"is\": \"y:marker\"}]}"),
            Err(OntologyError::Malformed { .. })
        ));
        assert!(matches!(
            DefGraph::parse("{\"rows\": [{\"def\": \"a\", \"is\": [42]}]}"),
            Err(OntologyError::Malformed { .. })
        ));
        assert!(matches!(DefGraph::parse("not json"), Err(OntologyError::Json { .. })));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            DefGraph::load("/nonexistent/defs.json"),
            Err(OntologyError::FileRead { .. })
        ));
    }
}
