use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Element, Relationship};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub enum Shape {
    Box,
    RoundedBox,
    Circle,
    Ellipse,
    Hexagon,
    Cylinder,
    Pipe,
    Person,
    Robot,
    Folder,
    WebBrowser,
    MobileDevicePortrait,
    Component,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Visual attributes applied to every element carrying `tag`.
/// Unset fields leave whatever an earlier rule (or the default) chose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl ElementStyle {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            background: None,
            color: None,
            shape: None,
            font_size: None,
        }
    }

    pub fn background(&mut self, hex: &str) -> &mut Self {
        self.background = Some(hex.to_string());
        self
    }

    pub fn color(&mut self, hex: &str) -> &mut Self {
        self.color = Some(hex.to_string());
        self
    }

    pub fn shape(&mut self, shape: Shape) -> &mut Self {
        self.shape = Some(shape);
        self
    }

    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.font_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStyle {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
}

impl RelationshipStyle {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            thickness: None,
            color: None,
            font_size: None,
            dashed: None,
        }
    }

    pub fn thickness(&mut self, thickness: u32) -> &mut Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn color(&mut self, hex: &str) -> &mut Self {
        self.color = Some(hex.to_string());
        self
    }

    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.font_size = Some(size);
        self
    }

    pub fn dashed(&mut self, dashed: bool) -> &mut Self {
        self.dashed = Some(dashed);
        self
    }
}

/// The style an element actually renders with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElementStyle {
    pub background: String,
    pub color: String,
    pub shape: Shape,
    pub font_size: u32,
}

impl Default for ResolvedElementStyle {
    fn default() -> Self {
        Self {
            background: "#dddddd".to_string(),
            color: "#000000".to_string(),
            shape: Shape::Box,
            font_size: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelationshipStyle {
    pub thickness: u32,
    pub color: String,
    pub font_size: u32,
    pub dashed: bool,
}

impl Default for ResolvedRelationshipStyle {
    fn default() -> Self {
        Self {
            thickness: 2,
            color: "#707070".to_string(),
            font_size: 24,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Styles {
    #[serde(default)]
    elements: Vec<ElementStyle>,
    #[serde(default)]
    relationships: Vec<RelationshipStyle>,
}

impl Styles {
    pub fn add_element_style(&mut self, tag: &str) -> &mut ElementStyle {
        self.elements.push(ElementStyle::new(tag));
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    pub fn add_relationship_style(&mut self, tag: &str) -> &mut RelationshipStyle {
        self.relationships.push(RelationshipStyle::new(tag));
        let last = self.relationships.len() - 1;
        &mut self.relationships[last]
    }

    pub fn element_styles(&self) -> &[ElementStyle] {
        &self.elements
    }

    pub fn relationship_styles(&self) -> &[RelationshipStyle] {
        &self.relationships
    }

    /// Apply every rule whose tag the element carries, in registration order.
    pub fn resolve_element(&self, element: &Element) -> ResolvedElementStyle {
        let mut resolved = ResolvedElementStyle::default();
        for style in self.elements.iter().filter(|s| element.has_tag(&s.tag)) {
            if let Some(background) = &style.background {
                resolved.background = background.clone();
            }
            if let Some(color) = &style.color {
                resolved.color = color.clone();
            }
            if let Some(shape) = style.shape {
                resolved.shape = shape;
            }
            if let Some(size) = style.font_size {
                resolved.font_size = size;
            }
        }
        resolved
    }

    pub fn resolve_relationship(&self, relationship: &Relationship) -> ResolvedRelationshipStyle {
        let mut resolved = ResolvedRelationshipStyle::default();
        for style in self
            .relationships
            .iter()
            .filter(|s| relationship.has_tag(&s.tag))
        {
            if let Some(thickness) = style.thickness {
                resolved.thickness = thickness;
            }
            if let Some(color) = &style.color {
                resolved.color = color.clone();
            }
            if let Some(size) = style.font_size {
                resolved.font_size = size;
            }
            if let Some(dashed) = style.dashed {
                resolved.dashed = dashed;
            }
        }
        resolved
    }
}
