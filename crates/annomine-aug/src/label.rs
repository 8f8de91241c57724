//! Canonical labels for nodes and edges.
//!
//! The rendered strings are the mining vocabulary: heuristics downstream match
//! on relation names (`hasParam`, `annotatedWith`, ...) and node prefixes
//! (`Annotation_`, `Param_`, `Class`), so the constants below are shared with
//! the miner rather than re-spelled there.

use crate::edge::{Edge, EdgeKind};
use crate::node::{ClassKind, Node};

// -----------------------------------------------------------------------------
// Relation names
// -----------------------------------------------------------------------------

pub const REL_HAS_METHOD: &str = "hasMethod";
pub const REL_HAS_FIELD: &str = "hasField";
pub const REL_BELONGS_TO_CLASS: &str = "belongsToClass";
pub const REL_ANNOTATED_WITH: &str = "annotatedWith";
pub const REL_HAS_PARAM: &str = "hasParam";
pub const REL_HAS_RETURN_TYPE: &str = "hasReturnType";
pub const REL_HAS_TYPE: &str = "hasType";
pub const REL_EXTENDS: &str = "extends";
pub const REL_IMPLEMENTS: &str = "implements";
pub const REL_DEFINED_IN: &str = "definedIn";
pub const REL_DECLARED_IN_BEANS: &str = "declaredInBeans";

// -----------------------------------------------------------------------------
// Node prefixes
// -----------------------------------------------------------------------------

pub const ANNOTATION_PREFIX: &str = "Annotation_";
pub const PARAM_PREFIX: &str = "Param_";
pub const CLASS_LABEL: &str = "Class";
pub const INTERFACE_LABEL: &str = "Interface";
pub const METHOD_LABEL: &str = "Method";
pub const FIELD_LABEL: &str = "Field";
pub const CONSTRUCTOR_LABEL: &str = "Constructor";

/// The ` --(<rel>)--> ` infix that separates source and target in an item.
pub fn relation_marker(rel: &str) -> String {
    format!("--({rel})-->")
}

/// Renders nodes and edges to mining labels.
///
/// A single exhaustive `match` per method; adding a node or edge variant is a
/// compile error here until it gets a label.
pub trait LabelProvider {
    fn node_label(&self, node: &Node) -> String;
    fn edge_label(&self, edge: &Edge) -> &'static str;
}

/// The label set used by every persisted rule file.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseLabelProvider;

impl LabelProvider for BaseLabelProvider {
    fn node_label(&self, node: &Node) -> String {
        match node {
            Node::ClassOrInterface { name, class_kind } => {
                let base = match class_kind {
                    ClassKind::Class => CLASS_LABEL,
                    ClassKind::Interface => INTERFACE_LABEL,
                };
                if name.is_empty() {
                    base.to_string()
                } else {
                    format!("{base}_{name}")
                }
            }
            Node::Method { .. } => METHOD_LABEL.to_string(),
            Node::Constructor { .. } => CONSTRUCTOR_LABEL.to_string(),
            Node::Field { .. } => FIELD_LABEL.to_string(),
            Node::Annotation { name } => format!("{ANNOTATION_PREFIX}{name}"),
            Node::Param { name } if name.is_empty() => format!("{PARAM_PREFIX}void"),
            Node::Param { name } => format!("{PARAM_PREFIX}{name}"),
            Node::Return { type_name } => type_name.clone(),
            Node::ConfigFile { name } => format!("ConfigFile_{name}"),
            Node::BeansFile { name } => name.clone(),
            Node::FieldTypeDecl { .. } => "FieldTypeDecl".to_string(),
            Node::ParamTypeDecl { .. } => "ParamTypeDecl".to_string(),
        }
    }

    fn edge_label(&self, edge: &Edge) -> &'static str {
        match edge.kind() {
            EdgeKind::HasMethod => REL_HAS_METHOD,
            EdgeKind::HasField => REL_HAS_FIELD,
            EdgeKind::BelongsToClass => REL_BELONGS_TO_CLASS,
            EdgeKind::AnnotatedWith => REL_ANNOTATED_WITH,
            EdgeKind::HasParam => REL_HAS_PARAM,
            EdgeKind::Returns => match edge.is_for_method() {
                Some(true) => REL_HAS_RETURN_TYPE,
                _ => REL_HAS_TYPE,
            },
            EdgeKind::Extends => match edge.is_class_extension() {
                Some(true) => REL_EXTENDS,
                _ => REL_IMPLEMENTS,
            },
            EdgeKind::DefinedInConfig => REL_DEFINED_IN,
            EdgeKind::DeclaredInBeans => REL_DECLARED_IN_BEANS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_edge_label() {
        let edge = Edge::returns(
            Node::field("org.eclipse.microprofile.jwt.JsonWebToken").unwrap(),
            Node::returns("org.eclipse.microprofile.jwt.JsonWebToken"),
        )
        .unwrap();
        assert_eq!(
            edge.to_string(),
            "Field --(hasType)--> org.eclipse.microprofile.jwt.JsonWebToken"
        );
    }

    #[test]
    fn annotation_param_edge_label() {
        let edge = Edge::has_param(
            Node::annotation("org.eclipse.microprofile.faulttolerance.Fallback").unwrap(),
            Node::param("fallbackMethod:java.lang.String"),
        )
        .unwrap();
        assert_eq!(
            edge.to_string(),
            "Annotation_org.eclipse.microprofile.faulttolerance.Fallback --(hasParam)--> Param_fallbackMethod:java.lang.String"
        );
    }

    #[test]
    fn implements_and_anonymous_class_labels() {
        let edge = Edge::extends(
            Node::class(""),
            Node::interface("org.eclipse.microprofile.health.HealthCheck"),
        )
        .unwrap();
        assert_eq!(
            edge.to_string(),
            "Class --(implements)--> Interface_org.eclipse.microprofile.health.HealthCheck"
        );
    }

    #[test]
    fn empty_param_renders_void() {
        assert_eq!(BaseLabelProvider.node_label(&Node::param("")), "Param_void");
    }

    #[test]
    fn relation_marker_matches_rendered_edges() {
        let edge = Edge::declared_in_beans(Node::class(""), Node::beans_file("beans.xml")).unwrap();
        assert!(edge
            .to_string()
            .contains(&relation_marker(REL_DECLARED_IN_BEANS)));
    }
}
