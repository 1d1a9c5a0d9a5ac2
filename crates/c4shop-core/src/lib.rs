//! Architecture-as-code primitives: a C4 model graph, the views derived from
//! it, tag-driven styles, and the workspace document that carries all three
//! to an external renderer.

pub mod dsl;
pub mod error;
pub mod model;
pub mod rules;
pub mod settings;
pub mod storage;
pub mod styles;
pub mod tags;
pub mod views;

use serde::{Deserialize, Serialize};

pub use error::{ModelError, StorageError};
pub use model::{Element, ElementId, ElementKind, Location, Model, Relationship, RelationshipId};
pub use settings::{ExportFormat, ExportSettings};
pub use styles::{Shape, Styles};
pub use views::{PaperSize, View, ViewKind, ViewSet};

/// A model together with its views and styles: the unit handed to exporters.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub views: ViewSet,
}

impl Workspace {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            model: Model::new(),
            views: ViewSet::new(),
        }
    }
}

/// JSON Schema of the workspace document written by [`storage::write_workspace`].
pub fn workspace_schema() -> schemars::Schema {
    schemars::schema_for!(Workspace)
}
