//! Views: named projections of the model that pick which elements and
//! relationships a diagram shows.
//!
//! A view never owns model data. It stores element handles, and its
//! relationship set is recomputed from the model whenever an element is
//! added, so it always holds exactly the relationships whose two endpoints
//! are both on the diagram.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ModelError;
use crate::model::{Element, ElementId, ElementKind, Model, RelationshipId};
use crate::styles::Styles;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    SystemContext,
    Container,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub enum PaperSize {
    #[serde(rename = "A3_Portrait")]
    A3Portrait,
    #[serde(rename = "A3_Landscape")]
    A3Landscape,
    #[serde(rename = "A4_Portrait")]
    A4Portrait,
    #[serde(rename = "A4_Landscape")]
    A4Landscape,
    #[serde(rename = "A5_Portrait")]
    A5Portrait,
    #[serde(rename = "A5_Landscape")]
    A5Landscape,
    #[serde(rename = "Letter_Portrait")]
    LetterPortrait,
    #[serde(rename = "Letter_Landscape")]
    LetterLandscape,
}

impl PaperSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PaperSize::A3Portrait => "A3_Portrait",
            PaperSize::A3Landscape => "A3_Landscape",
            PaperSize::A4Portrait => "A4_Portrait",
            PaperSize::A4Landscape => "A4_Landscape",
            PaperSize::A5Portrait => "A5_Portrait",
            PaperSize::A5Landscape => "A5_Landscape",
            PaperSize::LetterPortrait => "Letter_Portrait",
            PaperSize::LetterLandscape => "Letter_Landscape",
        }
    }
}

/// A relationship lifted onto the nearest ancestors shown in a view.
///
/// Derived for rendering only; never stored in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpliedRelationship {
    pub source_id: ElementId,
    pub destination_id: ElementId,
    /// The model relationship this one was lifted from.
    pub relationship_id: RelationshipId,
    pub description: String,
    pub technology: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub key: String,
    #[serde(default)]
    pub description: String,
    pub kind: ViewKind,
    /// The system in focus (context view) or whose boundary is drawn (container view).
    pub software_system_id: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default)]
    pub(crate) elements: Vec<ElementId>,
    #[serde(default)]
    pub(crate) relationships: Vec<RelationshipId>,
}

impl View {
    fn new(kind: ViewKind, system: ElementId, key: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
            kind,
            software_system_id: system,
            paper_size: None,
            elements: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn relationships(&self) -> &[RelationshipId] {
        &self.relationships
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }

    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.paper_size = Some(paper_size);
    }

    /// Whether `element` may appear on this kind of diagram.
    pub fn permits(&self, element: &Element) -> bool {
        match (self.kind, element.kind) {
            (_, ElementKind::Person) => true,
            (ViewKind::SystemContext, ElementKind::SoftwareSystem) => true,
            (ViewKind::SystemContext, ElementKind::Container) => false,
            (ViewKind::Container, ElementKind::SoftwareSystem) => {
                element.id != self.software_system_id
            }
            (ViewKind::Container, ElementKind::Container) => {
                element.parent_id == Some(self.software_system_id)
            }
        }
    }

    pub fn add(&mut self, model: &Model, id: ElementId) -> Result<(), ModelError> {
        let element = model.element(id).ok_or(ModelError::UnknownElement(id))?;
        if !self.permits(element) {
            return Err(ModelError::NotPermittedInView {
                key: self.key.clone(),
                kind: element.kind,
                name: element.name.clone(),
            });
        }
        if !self.contains(id) {
            self.elements.push(id);
            self.sync_relationships(model);
        }
        Ok(())
    }

    pub fn add_all_people(&mut self, model: &Model) -> Result<(), ModelError> {
        let ids: Vec<ElementId> = model.people().map(|e| e.id).collect();
        self.add_each(model, ids)
    }

    /// Every software system the view permits. A container view skips its own scope.
    pub fn add_all_software_systems(&mut self, model: &Model) -> Result<(), ModelError> {
        let ids: Vec<ElementId> = model
            .software_systems()
            .filter(|e| self.permits(e))
            .map(|e| e.id)
            .collect();
        self.add_each(model, ids)
    }

    /// Every container of the scoped system. Not permitted on a context view.
    pub fn add_all_containers(&mut self, model: &Model) -> Result<(), ModelError> {
        let ids: Vec<ElementId> = model
            .containers_of(self.software_system_id)
            .map(|e| e.id)
            .collect();
        self.add_each(model, ids)
    }

    /// Add the top-level element on the far side of every relationship that
    /// crosses the boundary of the scoped system.
    pub fn add_all_influencers(&mut self, model: &Model) -> Result<(), ModelError> {
        let scope = self.software_system_id;
        let mut influencers = Vec::new();
        for rel in model.relationships() {
            for (inside, outside) in [
                (rel.source_id, rel.destination_id),
                (rel.destination_id, rel.source_id),
            ] {
                if model.is_within(inside, scope) && !model.is_within(outside, scope) {
                    influencers.push(model.top_level(outside));
                }
            }
        }
        self.add_each(model, influencers)
    }

    fn add_each(&mut self, model: &Model, ids: Vec<ElementId>) -> Result<(), ModelError> {
        for id in ids {
            self.add(model, id)?;
        }
        tracing::debug!(view = %self.key, elements = self.elements.len(), "view updated");
        Ok(())
    }

    fn sync_relationships(&mut self, model: &Model) {
        let related: Vec<RelationshipId> = model
            .relationships()
            .filter(|r| self.contains(r.source_id) && self.contains(r.destination_id))
            .map(|r| r.id)
            .collect();
        self.relationships = related;
    }

    fn nearest_in_view(&self, model: &Model, id: ElementId) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.contains(c) {
                return Some(c);
            }
            current = model.parent_of(c);
        }
        None
    }

    /// Relationships whose endpoints are hidden but have an ancestor on the
    /// diagram, lifted to those ancestors. One per source/destination pair;
    /// the first relationship in model order supplies the label.
    pub fn implied_relationships(&self, model: &Model) -> Vec<ImpliedRelationship> {
        let mut seen: HashSet<(ElementId, ElementId)> = self
            .relationships
            .iter()
            .filter_map(|id| model.relationship(*id))
            .map(|r| (r.source_id, r.destination_id))
            .collect();

        let mut implied = Vec::new();
        for rel in model.relationships() {
            if self.relationships.contains(&rel.id) {
                continue;
            }
            let (Some(source), Some(destination)) = (
                self.nearest_in_view(model, rel.source_id),
                self.nearest_in_view(model, rel.destination_id),
            ) else {
                continue;
            };
            if model.is_within(source, destination) || model.is_within(destination, source) {
                continue;
            }
            if seen.insert((source, destination)) {
                implied.push(ImpliedRelationship {
                    source_id: source,
                    destination_id: destination,
                    relationship_id: rel.id,
                    description: rel.description.clone(),
                    technology: rel.technology.clone(),
                });
            }
        }
        implied
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Configuration {
    #[serde(default)]
    pub styles: Styles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ViewSet {
    #[serde(default)]
    pub(crate) views: Vec<View>,
    #[serde(default)]
    pub configuration: Configuration,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context view around `system`. The system itself is added immediately.
    pub fn create_system_context_view(
        &mut self,
        model: &Model,
        system: ElementId,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ModelError> {
        self.check_new_view(model, system, key)?;
        let mut view = View::new(ViewKind::SystemContext, system, key, description);
        view.add(model, system)?;
        Ok(self.push(view))
    }

    /// Create a container view drawing the boundary of `system`. Starts empty.
    pub fn create_container_view(
        &mut self,
        model: &Model,
        system: ElementId,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ModelError> {
        self.check_new_view(model, system, key)?;
        Ok(self.push(View::new(ViewKind::Container, system, key, description)))
    }

    fn check_new_view(
        &self,
        model: &Model,
        system: ElementId,
        key: &str,
    ) -> Result<(), ModelError> {
        let element = model
            .element(system)
            .ok_or(ModelError::UnknownElement(system))?;
        if element.kind != ElementKind::SoftwareSystem {
            return Err(ModelError::NotPermittedInView {
                key: key.to_string(),
                kind: element.kind,
                name: element.name.clone(),
            });
        }
        if self.view(key).is_some() {
            return Err(ModelError::DuplicateViewKey(key.to_string()));
        }
        Ok(())
    }

    fn push(&mut self, view: View) -> &mut View {
        tracing::debug!(key = %view.key, kind = ?view.kind, "view created");
        self.views.push(view);
        let last = self.views.len() - 1;
        &mut self.views[last]
    }

    pub fn view(&self, key: &str) -> Option<&View> {
        self.views.iter().find(|v| v.key == key)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> + '_ {
        self.views.iter()
    }

    pub fn styles(&self) -> &Styles {
        &self.configuration.styles
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.configuration.styles
    }
}
