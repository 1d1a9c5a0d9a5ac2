//! The architecture graph: an arena of elements and an arena of directed
//! relationships between them.
//!
//! Elements and relationships are addressed by opaque handles issued in
//! insertion order. Nothing is ever removed, so a handle stays valid for the
//! lifetime of the model that issued it. Relationships are additive: the same
//! pair of elements may be connected any number of times, in either
//! direction, and cycles are allowed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::ModelError;
use crate::tags::{self, Tags};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct ElementId(u32);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct RelationshipId(u32);

impl ElementId {
    pub(crate) fn slot(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl RelationshipId {
    pub(crate) fn slot(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
}

impl ElementKind {
    /// The tag every element of this kind carries from creation.
    pub fn default_tag(self) -> &'static str {
        match self {
            ElementKind::Person => tags::PERSON,
            ElementKind::SoftwareSystem => tags::SOFTWARE_SYSTEM,
            ElementKind::Container => tags::CONTAINER,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Person => "person",
            ElementKind::SoftwareSystem => "software system",
            ElementKind::Container => "container",
        })
    }
}

/// Whether an actor or system sits inside the organisation being diagrammed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub enum Location {
    Internal,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Set for persons and software systems. Containers sit inside their parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    #[serde(default)]
    pub tags: Tags,
}

impl Element {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn add_tags(&mut self, tags: &[&str]) {
        for tag in tags {
            self.tags.add(tag);
        }
    }

    pub fn is_external(&self) -> bool {
        self.location == Some(Location::External)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_id: ElementId,
    pub destination_id: ElementId,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

impl Relationship {
    /// True when this relationship joins `a` and `b`, in either direction.
    pub fn connects(&self, a: ElementId, b: ElementId) -> bool {
        (self.source_id == a && self.destination_id == b)
            || (self.source_id == b && self.destination_id == a)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    pub(crate) elements: Vec<Element>,
    #[serde(default)]
    pub(crate) relationships: Vec<Relationship>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, location: Location, name: &str, description: &str) -> ElementId {
        self.push_element(ElementKind::Person, name, description, Some(location), None, None)
    }

    pub fn add_software_system(
        &mut self,
        location: Location,
        name: &str,
        description: &str,
    ) -> ElementId {
        self.push_element(
            ElementKind::SoftwareSystem,
            name,
            description,
            Some(location),
            None,
            None,
        )
    }

    /// Add a container inside `parent`, which must be an internal software system.
    pub fn add_container(
        &mut self,
        parent: ElementId,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<ElementId, ModelError> {
        let system = self
            .element(parent)
            .ok_or(ModelError::UnknownElement(parent))?;
        if system.kind != ElementKind::SoftwareSystem {
            return Err(ModelError::InvalidParent(parent, system.kind));
        }
        if system.is_external() {
            return Err(ModelError::ExternalParent(system.name.clone()));
        }
        Ok(self.push_element(
            ElementKind::Container,
            name,
            description,
            None,
            non_empty(technology),
            Some(parent),
        ))
    }

    /// Add a directed relationship. Both endpoints must already exist.
    pub fn add_relationship(
        &mut self,
        source: ElementId,
        destination: ElementId,
        description: &str,
        technology: &str,
    ) -> Result<RelationshipId, ModelError> {
        for endpoint in [source, destination] {
            if self.element(endpoint).is_none() {
                return Err(ModelError::UnknownElement(endpoint));
            }
        }
        let id = RelationshipId(self.relationships.len() as u32 + 1);
        tracing::debug!(%id, %source, %destination, description, "relationship added");
        self.relationships.push(Relationship {
            id,
            source_id: source,
            destination_id: destination,
            description: description.to_string(),
            technology: non_empty(technology),
            tags: [tags::RELATIONSHIP].into_iter().collect(),
        });
        Ok(id)
    }

    pub fn add_tags(&mut self, id: ElementId, tags: &[&str]) -> Result<(), ModelError> {
        let element = self
            .element_mut(id)
            .ok_or(ModelError::UnknownElement(id))?;
        element.add_tags(tags);
        Ok(())
    }

    fn push_element(
        &mut self,
        kind: ElementKind,
        name: &str,
        description: &str,
        location: Option<Location>,
        technology: Option<String>,
        parent_id: Option<ElementId>,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u32 + 1);
        tracing::debug!(%id, %kind, name, "element added");
        self.elements.push(Element {
            id,
            kind,
            name: name.to_string(),
            description: description.to_string(),
            location,
            technology,
            parent_id,
            tags: [tags::ELEMENT, kind.default_tag()].into_iter().collect(),
        });
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.slot()?).filter(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.slot()?).filter(|e| e.id == id)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(id.slot()?).filter(|r| r.id == id)
    }

    /// First element with the given name, in insertion order.
    pub fn find_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    pub fn people(&self) -> impl Iterator<Item = &Element> + '_ {
        self.of_kind(ElementKind::Person)
    }

    pub fn software_systems(&self) -> impl Iterator<Item = &Element> + '_ {
        self.of_kind(ElementKind::SoftwareSystem)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Element> + '_ {
        self.of_kind(ElementKind::Container)
    }

    pub fn containers_of(&self, system: ElementId) -> impl Iterator<Item = &Element> + '_ {
        self.containers()
            .filter(move |c| c.parent_id == Some(system))
    }

    fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter().filter(move |e| e.kind == kind)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.iter()
    }

    /// Relationships joining `a` and `b` in either direction, in insertion order.
    pub fn relationships_between(
        &self,
        a: ElementId,
        b: ElementId,
    ) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.iter().filter(move |r| r.connects(a, b))
    }

    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent_id)
    }

    /// True when `id` is `ancestor` or nested somewhere beneath it.
    pub fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    /// The outermost ancestor of `id` (itself when it has no parent).
    pub fn top_level(&self, id: ElementId) -> ElementId {
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        current
    }
}

impl Index<ElementId> for Model {
    type Output = Element;

    /// # Panics
    ///
    /// Panics when `id` was not issued by this model.
    fn index(&self, id: ElementId) -> &Element {
        self.element(id)
            .unwrap_or_else(|| panic!("element {id} does not exist"))
    }
}

impl IndexMut<ElementId> for Model {
    fn index_mut(&mut self, id: ElementId) -> &mut Element {
        self.element_mut(id)
            .unwrap_or_else(|| panic!("element {id} does not exist"))
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> (Model, ElementId, ElementId) {
        let mut model = Model::new();
        let shop = model.add_software_system(Location::Internal, "Shop", "sells things");
        let bank = model.add_software_system(Location::External, "Bank", "moves money");
        (model, shop, bank)
    }

    #[test]
    fn elements_carry_default_tags() {
        let (mut model, shop, _) = shop();
        let web = model.add_container(shop, "Web", "frontend", "React").unwrap();
        assert!(model[shop].has_tag(tags::ELEMENT));
        assert!(model[shop].has_tag(tags::SOFTWARE_SYSTEM));
        assert!(model[web].has_tag(tags::CONTAINER));
        assert_eq!(model[web].technology.as_deref(), Some("React"));
        assert_eq!(model[web].parent_id, Some(shop));
    }

    #[test]
    fn container_requires_existing_internal_system() {
        let (mut model, shop, bank) = shop();
        let web = model.add_container(shop, "Web", "", "").unwrap();

        let missing = ElementId(99);
        assert_eq!(
            model.add_container(missing, "X", "", ""),
            Err(ModelError::UnknownElement(missing))
        );
        assert_eq!(
            model.add_container(web, "X", "", ""),
            Err(ModelError::InvalidParent(web, ElementKind::Container))
        );
        assert_eq!(
            model.add_container(bank, "X", "", ""),
            Err(ModelError::ExternalParent("Bank".into()))
        );
    }

    #[test]
    fn relationship_endpoints_must_exist() {
        let (mut model, shop, _) = shop();
        let err = model
            .add_relationship(shop, ElementId(42), "uses", "")
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownElement(ElementId(42)));
        assert_eq!(model.relationships().count(), 0);
    }

    #[test]
    fn parallel_and_inverse_relationships_are_kept() {
        let (mut model, shop, bank) = shop();
        model.add_relationship(shop, bank, "pays", "REST").unwrap();
        model.add_relationship(shop, bank, "refunds", "REST").unwrap();
        model.add_relationship(bank, shop, "notifies", "Webhook").unwrap();

        let between: Vec<_> = model
            .relationships_between(bank, shop)
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(between, vec!["pays", "refunds", "notifies"]);
        assert!(model
            .relationships()
            .all(|r| r.has_tag(tags::RELATIONSHIP)));
    }

    #[test]
    fn empty_technology_is_omitted() {
        let (mut model, shop, bank) = shop();
        let id = model.add_relationship(shop, bank, "pays", " ").unwrap();
        assert_eq!(model.relationship(id).unwrap().technology, None);
    }

    #[test]
    fn ancestry_walks_parents() {
        let (mut model, shop, bank) = shop();
        let web = model.add_container(shop, "Web", "", "").unwrap();
        assert!(model.is_within(web, shop));
        assert!(model.is_within(shop, shop));
        assert!(!model.is_within(web, bank));
        assert_eq!(model.top_level(web), shop);
        assert_eq!(model.containers_of(shop).count(), 1);
        assert_eq!(model.containers_of(bank).count(), 0);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (model, _, _) = shop();
        assert!(model.element(ElementId(0)).is_none());
        assert!(model.element(ElementId(3)).is_none());
        assert!(model.relationship(RelationshipId(1)).is_none());
    }
}
