//! Annotation Usage Graph (AUG)
//!
//! Fact extraction walks a client project's declarations and describes every
//! field, method and constructor as a small typed graph:
//!
//! ```text
//!   Class ──annotatedWith──► Annotation_javax.ws.rs.Path
//!     │
//!     └─hasMethod──► Method ──annotatedWith──► Annotation_...Operation
//!                      │
//!                      └─hasReturnType──► javax.ws.rs.core.Response
//! ```
//!
//! The miner never looks at the graph itself. Each edge is rendered to a
//! canonical label (`Method --(hasReturnType)--> javax.ws.rs.core.Response`)
//! and the labels of one declaration form an [`Itemset`], the transaction unit
//! of the mining pipeline. Two facts are "the same fact" iff their rendered
//! labels are equal.
//!
//! This crate provides:
//! - [`Node`] and [`Edge`]: closed enums with construction-time validation of
//!   the allowed `(source kind, target kind)` pairs,
//! - [`LabelProvider`] / [`BaseLabelProvider`]: the canonical renderer,
//! - [`DraftItemset`] / [`Itemset`]: the growable and frozen transaction types.

pub mod edge;
pub mod itemset;
pub mod label;
pub mod node;

pub use edge::{Edge, EdgeKind};
pub use itemset::{DraftItemset, Itemset, Location};
pub use label::{BaseLabelProvider, LabelProvider};
pub use node::{ClassKind, Node, NodeKind};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AugError {
    #[error("{node:?} node requires a non-empty {field}")]
    EmptyNodeField { node: NodeKind, field: &'static str },

    // `source` is reserved by thiserror for the error cause.
    #[error("{edge:?} edge cannot connect {from:?} -> {to:?}")]
    InvalidEndpoints {
        edge: EdgeKind,
        from: NodeKind,
        to: NodeKind,
    },

    #[error("a frozen itemset needs at least one item ({location})")]
    EmptyItemset { location: Location },
}
