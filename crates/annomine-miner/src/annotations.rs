//! Declarations of the target library's own annotations.
//!
//! Only the mandatory parameters are used: the compiler already forces those
//! on every usage, so they are never reported as conventions.

use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::error::MinerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDecl {
    /// Fully-qualified name.
    pub name: String,
    #[serde(default)]
    pub is_qualifier: bool,
    /// Element kinds the annotation may be placed on.
    #[serde(default)]
    pub target: Vec<String>,
    #[serde(default)]
    pub required_params: Vec<RequiredParam>,
}

/// Annotation name -> names of its parameters without a default value.
#[derive(Debug, Clone, Default)]
pub struct RequiredParamIndex {
    required: AHashMap<String, AHashSet<String>>,
}

impl RequiredParamIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, MinerError> {
        let text = std::fs::read_to_string(path).map_err(|source| MinerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decls: Vec<AnnotationDecl> =
            serde_json::from_str(&text).map_err(|source| MinerError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_decls(decls))
    }

    pub fn from_decls(decls: impl IntoIterator<Item = AnnotationDecl>) -> Self {
        let required = decls
            .into_iter()
            .map(|decl| {
                let params = decl.required_params.into_iter().map(|p| p.name).collect();
                (decl.name, params)
            })
            .collect();
        Self { required }
    }

    pub fn is_required(&self, annotation: &str, param: &str) -> bool {
        self.required
            .get(annotation)
            .is_some_and(|params| params.contains(param))
    }

    pub fn annotation_count(&self) -> usize {
        self.required.len()
    }
}
