//! Error types shared by the graph, views and storage layers.

use crate::model::{ElementId, ElementKind, RelationshipId};

/// A precondition violation while assembling a model or its views.
///
/// These are never recovered from: whoever assembles the workspace is
/// expected to abort.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),
    #[error("relationship {0} does not exist")]
    UnknownRelationship(RelationshipId),
    #[error("container parent {0} must be a software system, got {1}")]
    InvalidParent(ElementId, ElementKind),
    #[error("cannot add containers inside external system '{0}'")]
    ExternalParent(String),
    #[error("view key '{0}' is already in use")]
    DuplicateViewKey(String),
    #[error("{kind} '{name}' cannot be added to view '{key}'")]
    NotPermittedInView {
        key: String,
        kind: ElementKind,
        name: String,
    },
    #[error("inconsistent workspace: {0}")]
    Inconsistent(String),
}

/// Failures reading or writing workspace documents.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid workspace: {0}")]
    Invalid(#[from] ModelError),
}
