//! Typed, directed usage-graph relationships.
//!
//! Every edge kind carries an allow-list of `(source kind, target kind)`
//! pairs. [`Edge::new`] checks the pair up front, so an `Edge` value that
//! exists is always well-formed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::{BaseLabelProvider, LabelProvider};
use crate::node::{Node, NodeKind};
use crate::AugError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    HasMethod,
    HasField,
    BelongsToClass,
    AnnotatedWith,
    HasParam,
    /// Renders as `hasReturnType` from a method, `hasType` from a field.
    Returns,
    /// Renders as `extends` towards a class, `implements` towards an interface.
    Extends,
    DefinedInConfig,
    DeclaredInBeans,
}

impl EdgeKind {
    pub fn allows(self, source: NodeKind, target: NodeKind) -> bool {
        use NodeKind::*;

        match self {
            EdgeKind::HasMethod => source == ClassOrInterface && target == Method,
            EdgeKind::HasField => source == ClassOrInterface && target == Field,
            EdgeKind::BelongsToClass => {
                matches!(source, Field | Method) && target == ClassOrInterface
            }
            EdgeKind::AnnotatedWith => {
                (source.is_construct() || source == Param || source.is_type_decl())
                    && target == Annotation
            }
            EdgeKind::HasParam => {
                matches!(source, Method | Annotation | Constructor) && target == Param
            }
            EdgeKind::Returns => matches!(source, Method | Field) && target == Return,
            EdgeKind::Extends => source == ClassOrInterface && target == ClassOrInterface,
            EdgeKind::DefinedInConfig => source == Param && target == ConfigFile,
            EdgeKind::DeclaredInBeans => source == ClassOrInterface && target == BeansFile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    kind: EdgeKind,
    source: Node,
    target: Node,
}

impl Edge {
    pub fn new(kind: EdgeKind, source: Node, target: Node) -> Result<Self, AugError> {
        if !kind.allows(source.kind(), target.kind()) {
            return Err(AugError::InvalidEndpoints {
                edge: kind,
                from: source.kind(),
                to: target.kind(),
            });
        }
        Ok(Self {
            kind,
            source,
            target,
        })
    }

    pub fn annotated_with(source: Node, annotation: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::AnnotatedWith, source, annotation)
    }

    pub fn has_param(source: Node, param: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::HasParam, source, param)
    }

    pub fn returns(source: Node, ret: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::Returns, source, ret)
    }

    pub fn extends(class: Node, parent: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::Extends, class, parent)
    }

    pub fn defined_in_config(param: Node, config: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::DefinedInConfig, param, config)
    }

    pub fn declared_in_beans(class: Node, beans: Node) -> Result<Self, AugError> {
        Self::new(EdgeKind::DeclaredInBeans, class, beans)
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn source(&self) -> &Node {
        &self.source
    }

    pub fn target(&self) -> &Node {
        &self.target
    }

    /// For `Extends` edges: whether the parent is a class (vs. an interface).
    pub fn is_class_extension(&self) -> Option<bool> {
        match self.kind {
            EdgeKind::Extends => self.target.is_class(),
            _ => None,
        }
    }

    /// For `Returns` edges: whether the source is a method (vs. a field).
    pub fn is_for_method(&self) -> Option<bool> {
        match self.kind {
            EdgeKind::Returns => Some(self.source.kind() == NodeKind::Method),
            _ => None,
        }
    }

    /// `<source> --(<relation>)--> <target>` using the given label provider.
    pub fn render_with(&self, labels: &impl LabelProvider) -> String {
        format!(
            "{} --({})--> {}",
            labels.node_label(&self.source),
            labels.edge_label(self),
            labels.node_label(&self.target)
        )
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&BaseLabelProvider))
    }
}
