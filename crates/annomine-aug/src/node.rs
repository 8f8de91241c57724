//! Typed usage-graph vertices.
//!
//! Nodes are immutable value objects: two nodes with the same variant and the
//! same fields are the same node (derived `Eq`/`Hash` is the node identity).

use serde::{Deserialize, Serialize};

use crate::AugError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
}

/// Variant tag of a [`Node`], used by the edge allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    ClassOrInterface,
    Method,
    Constructor,
    Field,
    Annotation,
    Param,
    Return,
    ConfigFile,
    BeansFile,
    FieldTypeDecl,
    ParamTypeDecl,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// An empty `name` renders as the bare `Class` / `Interface` placeholder.
    ClassOrInterface { name: String, class_kind: ClassKind },
    Method {
        name: String,
        return_type: String,
        parameters: String,
    },
    Constructor { name: String, parameters: String },
    Field { type_name: String },
    /// Fully-qualified annotation name.
    Annotation { name: String },
    /// `name:type` for annotation members, bare type for method parameters.
    Param { name: String },
    Return { type_name: String },
    ConfigFile { name: String },
    BeansFile { name: String },
    /// Declared type of a field whose own declaration carries annotations
    /// (cross-class propagation).
    FieldTypeDecl { name: String },
    ParamTypeDecl { name: String },
}

fn non_empty(value: String, node: NodeKind, field: &'static str) -> Result<String, AugError> {
    if value.is_empty() {
        Err(AugError::EmptyNodeField { node, field })
    } else {
        Ok(value)
    }
}

impl Node {
    pub fn class(name: impl Into<String>) -> Self {
        Node::ClassOrInterface {
            name: name.into(),
            class_kind: ClassKind::Class,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Node::ClassOrInterface {
            name: name.into(),
            class_kind: ClassKind::Interface,
        }
    }

    pub fn method(
        name: impl Into<String>,
        return_type: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Result<Self, AugError> {
        Ok(Node::Method {
            name: non_empty(name.into(), NodeKind::Method, "name")?,
            return_type: non_empty(return_type.into(), NodeKind::Method, "return type")?,
            parameters: parameters.into(),
        })
    }

    pub fn constructor(
        name: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Result<Self, AugError> {
        Ok(Node::Constructor {
            name: non_empty(name.into(), NodeKind::Constructor, "name")?,
            parameters: parameters.into(),
        })
    }

    pub fn field(type_name: impl Into<String>) -> Result<Self, AugError> {
        Ok(Node::Field {
            type_name: non_empty(type_name.into(), NodeKind::Field, "type name")?,
        })
    }

    pub fn annotation(name: impl Into<String>) -> Result<Self, AugError> {
        Ok(Node::Annotation {
            name: non_empty(name.into(), NodeKind::Annotation, "name")?,
        })
    }

    pub fn param(name: impl Into<String>) -> Self {
        Node::Param { name: name.into() }
    }

    pub fn returns(type_name: impl Into<String>) -> Self {
        Node::Return {
            type_name: type_name.into(),
        }
    }

    pub fn config_file(name: impl Into<String>) -> Self {
        Node::ConfigFile { name: name.into() }
    }

    pub fn beans_file(name: impl Into<String>) -> Self {
        Node::BeansFile { name: name.into() }
    }

    pub fn field_type_decl(name: impl Into<String>) -> Self {
        Node::FieldTypeDecl { name: name.into() }
    }

    pub fn param_type_decl(name: impl Into<String>) -> Self {
        Node::ParamTypeDecl { name: name.into() }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::ClassOrInterface { .. } => NodeKind::ClassOrInterface,
            Node::Method { .. } => NodeKind::Method,
            Node::Constructor { .. } => NodeKind::Constructor,
            Node::Field { .. } => NodeKind::Field,
            Node::Annotation { .. } => NodeKind::Annotation,
            Node::Param { .. } => NodeKind::Param,
            Node::Return { .. } => NodeKind::Return,
            Node::ConfigFile { .. } => NodeKind::ConfigFile,
            Node::BeansFile { .. } => NodeKind::BeansFile,
            Node::FieldTypeDecl { .. } => NodeKind::FieldTypeDecl,
            Node::ParamTypeDecl { .. } => NodeKind::ParamTypeDecl,
        }
    }

    /// `true` for `class`, `false` for `interface`, `None` for every other node.
    pub fn is_class(&self) -> Option<bool> {
        match self {
            Node::ClassOrInterface { class_kind, .. } => Some(*class_kind == ClassKind::Class),
            _ => None,
        }
    }

    /// Method signature with the name erased, e.g. `java.lang.String Method(int)`.
    pub fn signature_without_name(&self) -> Option<String> {
        match self {
            Node::Method {
                return_type,
                parameters,
                ..
            } => {
                let params = if parameters.is_empty() {
                    "void"
                } else {
                    parameters.as_str()
                };
                Some(format!("{return_type} Method({params})"))
            }
            _ => None,
        }
    }
}

impl NodeKind {
    /// Declarations that can carry annotations directly.
    pub fn is_construct(self) -> bool {
        matches!(
            self,
            NodeKind::ClassOrInterface | NodeKind::Method | NodeKind::Constructor | NodeKind::Field
        )
    }

    pub fn is_type_decl(self) -> bool {
        matches!(self, NodeKind::FieldTypeDecl | NodeKind::ParamTypeDecl)
    }
}
