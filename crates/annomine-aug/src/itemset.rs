//! The mining transaction unit.
//!
//! A visitor grows a [`DraftItemset`] while it walks one declaration, then
//! calls [`DraftItemset::freeze`]. Only the frozen [`Itemset`] crosses into the
//! miner; it has no mutating methods at all.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::AugError;

/// Where a fact-set came from. Metadata only, never part of itemset identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub project: String,
    #[serde(default)]
    pub file: String,
    /// Qualified name of the declaration (class, `Class.method`, ...).
    #[serde(default)]
    pub qualified_name: String,
}

impl Location {
    pub fn new(
        project: impl Into<String>,
        file: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            file: file.into(),
            qualified_name: qualified_name.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.project, self.file, self.qualified_name)
    }
}

// =============================================================================
// Draft
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DraftItemset {
    items: BTreeSet<String>,
    location: Location,
}

impl DraftItemset {
    pub fn new(location: Location) -> Self {
        Self {
            items: BTreeSet::new(),
            location,
        }
    }

    /// Returns `false` if the item was already present.
    pub fn add(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    pub fn add_edge(&mut self, edge: &Edge) -> bool {
        self.add(edge.to_string())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn freeze(self) -> Result<Itemset, AugError> {
        Itemset::new(self.items, self.location)
    }
}

// =============================================================================
// Frozen
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ItemsetRepr", into = "ItemsetRepr")]
pub struct Itemset {
    items: BTreeSet<String>,
    location: Location,
}

#[derive(Serialize, Deserialize)]
struct ItemsetRepr {
    items: BTreeSet<String>,
    #[serde(default)]
    location: Location,
}

impl TryFrom<ItemsetRepr> for Itemset {
    type Error = AugError;

    fn try_from(repr: ItemsetRepr) -> Result<Self, Self::Error> {
        Itemset::new(repr.items, repr.location)
    }
}

impl From<Itemset> for ItemsetRepr {
    fn from(itemset: Itemset) -> Self {
        ItemsetRepr {
            items: itemset.items,
            location: itemset.location,
        }
    }
}

impl Itemset {
    pub fn new(items: BTreeSet<String>, location: Location) -> Result<Self, AugError> {
        if items.is_empty() {
            return Err(AugError::EmptyItemset { location });
        }
        Ok(Self { items, location })
    }

    /// Convenience for building transactions from string literals.
    pub fn from_items<I, S>(items: I, location: Location) -> Result<Self, AugError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(items.into_iter().map(Into::into).collect(), location)
    }

    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// `true` if any item contains `needle` as a substring.
    pub fn matches_any(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.contains(needle))
    }
}

impl PartialEq for Itemset {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Itemset {}

impl Hash for Itemset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use std::collections::HashSet;

    fn loc(project: &str) -> Location {
        Location::new(project, "A.java", "A.f")
    }

    #[test]
    fn freezing_an_empty_draft_fails() {
        let err = DraftItemset::new(loc("p")).freeze().unwrap_err();
        assert!(matches!(err, AugError::EmptyItemset { .. }));
    }

    #[test]
    fn draft_collects_rendered_edges() {
        let mut draft = DraftItemset::new(loc("p"));
        let field = Node::field("org.eclipse.microprofile.config.Config").unwrap();
        let inject = Node::annotation("javax.inject.Inject").unwrap();
        let edge = Edge::annotated_with(field, inject).unwrap();

        assert!(draft.add_edge(&edge));
        assert!(!draft.add_edge(&edge));

        let frozen = draft.freeze().unwrap();
        assert_eq!(frozen.len(), 1);
        assert!(frozen.contains("Field --(annotatedWith)--> Annotation_javax.inject.Inject"));
        assert!(frozen.matches_any("annotatedWith"));
    }

    #[test]
    fn identity_ignores_location() {
        let a = Itemset::from_items(["x", "y"], loc("p1")).unwrap();
        let b = Itemset::from_items(["y", "x"], loc("p2")).unwrap();
        assert_eq!(a, b);

        let set: HashSet<Itemset> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn deserializing_an_empty_itemset_is_rejected() {
        let json = r#"{"items": [], "location": {"project": "p"}}"#;
        assert!(serde_json::from_str::<Itemset>(json).is_err());

        let json = r#"{"items": ["a"]}"#;
        let itemset: Itemset = serde_json::from_str(json).unwrap();
        assert_eq!(itemset.location().project, "");
    }
}
