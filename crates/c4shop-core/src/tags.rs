use serde::{Deserialize, Serialize};

pub const ELEMENT: &str = "Element";
pub const PERSON: &str = "Person";
pub const SOFTWARE_SYSTEM: &str = "Software System";
pub const CONTAINER: &str = "Container";
pub const RELATIONSHIP: &str = "Relationship";

/// Ordered set of tags. Insertion order is kept; duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn add(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.contains(tag) {
            self.0.push(tag.to_string());
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Tags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tags = Tags::default();
        for tag in iter {
            tags.add(tag);
        }
        tags
    }
}
