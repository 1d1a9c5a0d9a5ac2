//! Structural rules a workspace must satisfy.
//!
//! Building through [`Model`](crate::Model) and [`ViewSet`](crate::ViewSet)
//! upholds these already; [`validate`] exists for documents read back from
//! disk, where nothing guarantees them.

use std::collections::HashSet;

use crate::error::ModelError;
use crate::model::{ElementKind, Model};
use crate::views::ViewSet;
use crate::Workspace;

pub fn validate(workspace: &Workspace) -> Result<(), ModelError> {
    validate_model(&workspace.model)?;
    validate_views(&workspace.model, &workspace.views)
}

fn validate_model(model: &Model) -> Result<(), ModelError> {
    for (slot, element) in model.elements.iter().enumerate() {
        if element.id.slot() != Some(slot) {
            return Err(ModelError::Inconsistent(format!(
                "element '{}' has id {} at position {}",
                element.name,
                element.id,
                slot + 1
            )));
        }
        match (element.kind, element.parent_id) {
            (ElementKind::Container, Some(parent)) => {
                let system = model
                    .element(parent)
                    .ok_or(ModelError::UnknownElement(parent))?;
                if system.kind != ElementKind::SoftwareSystem {
                    return Err(ModelError::InvalidParent(parent, system.kind));
                }
                if system.is_external() {
                    return Err(ModelError::ExternalParent(system.name.clone()));
                }
            }
            (ElementKind::Container, None) => {
                return Err(ModelError::Inconsistent(format!(
                    "container '{}' has no parent system",
                    element.name
                )));
            }
            (kind, Some(_)) => {
                return Err(ModelError::Inconsistent(format!(
                    "{} '{}' must be top-level",
                    kind, element.name
                )));
            }
            (_, None) => {}
        }
    }

    for (slot, rel) in model.relationships.iter().enumerate() {
        if rel.id.slot() != Some(slot) {
            return Err(ModelError::Inconsistent(format!(
                "relationship id {} at position {}",
                rel.id,
                slot + 1
            )));
        }
        for endpoint in [rel.source_id, rel.destination_id] {
            if model.element(endpoint).is_none() {
                return Err(ModelError::UnknownElement(endpoint));
            }
        }
    }
    Ok(())
}

fn validate_views(model: &Model, views: &ViewSet) -> Result<(), ModelError> {
    let mut keys = HashSet::new();
    for view in views.views() {
        if !keys.insert(view.key.as_str()) {
            return Err(ModelError::DuplicateViewKey(view.key.clone()));
        }
        let system = model
            .element(view.software_system_id)
            .ok_or(ModelError::UnknownElement(view.software_system_id))?;
        if system.kind != ElementKind::SoftwareSystem {
            return Err(ModelError::NotPermittedInView {
                key: view.key.clone(),
                kind: system.kind,
                name: system.name.clone(),
            });
        }
        let mut listed = HashSet::new();
        for id in view.elements() {
            if !listed.insert(*id) {
                return Err(ModelError::Inconsistent(format!(
                    "view '{}' lists element {} twice",
                    view.key, id
                )));
            }
            let element = model.element(*id).ok_or(ModelError::UnknownElement(*id))?;
            if !view.permits(element) {
                return Err(ModelError::NotPermittedInView {
                    key: view.key.clone(),
                    kind: element.kind,
                    name: element.name.clone(),
                });
            }
        }
        for id in view.relationships() {
            let rel = model
                .relationship(*id)
                .ok_or(ModelError::UnknownRelationship(*id))?;
            if !view.contains(rel.source_id) || !view.contains(rel.destination_id) {
                return Err(ModelError::Inconsistent(format!(
                    "view '{}' shows relationship {} without both endpoints",
                    view.key, id
                )));
            }
        }
        // Every model relationship between shown elements, in model order.
        let expected = model
            .relationships()
            .filter(|r| view.contains(r.source_id) && view.contains(r.destination_id))
            .map(|r| r.id);
        if !expected.eq(view.relationships().iter().copied()) {
            return Err(ModelError::Inconsistent(format!(
                "view '{}' relationships do not match its elements",
                view.key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn workspace() -> Workspace {
        let mut ws = Workspace::new("Shop", "");
        let user = ws.model.add_person(Location::External, "User", "");
        let shop = ws
            .model
            .add_software_system(Location::Internal, "Shop", "");
        let web = ws.model.add_container(shop, "Web", "", "").unwrap();
        ws.model.add_relationship(user, web, "uses", "").unwrap();
        let view = ws
            .views
            .create_container_view(&ws.model, shop, "Containers", "")
            .unwrap();
        view.add_all_containers(&ws.model).unwrap();
        view.add_all_influencers(&ws.model).unwrap();
        ws
    }

    #[test]
    fn assembled_workspace_is_valid() {
        assert_eq!(validate(&workspace()), Ok(()));
    }

    #[test]
    fn dangling_relationship_is_rejected() {
        let mut ws = workspace();
        let missing: crate::ElementId = serde_json::from_str("99").unwrap();
        ws.model.relationships[0].destination_id = missing;
        assert_eq!(validate(&ws), Err(ModelError::UnknownElement(missing)));
    }

    #[test]
    fn orphan_container_is_rejected() {
        let mut ws = workspace();
        ws.model.elements[2].parent_id = None;
        assert!(matches!(validate(&ws), Err(ModelError::Inconsistent(_))));
    }

    #[test]
    fn duplicate_view_key_is_rejected() {
        let mut ws = workspace();
        let copy = ws.views.views[0].clone();
        ws.views.views.push(copy);
        assert_eq!(
            validate(&ws),
            Err(ModelError::DuplicateViewKey("Containers".into()))
        );
    }

    #[test]
    fn element_listed_twice_is_rejected() {
        let mut ws = workspace();
        let web = ws.views.views[0].elements[0];
        ws.views.views[0].elements.push(web);
        assert_eq!(
            validate(&ws),
            Err(ModelError::Inconsistent("view 'Containers' lists element 3 twice".into()))
        );
    }

    #[test]
    fn missing_view_relationship_is_rejected() {
        let mut ws = workspace();
        ws.views.views[0].relationships.clear();
        assert_eq!(
            validate(&ws),
            Err(ModelError::Inconsistent(
                "view 'Containers' relationships do not match its elements".into()
            ))
        );
    }

    #[test]
    fn view_relationships_out_of_model_order_are_rejected() {
        let mut ws = workspace();
        let shop = ws.model.elements[1].id;
        let api = ws.model.add_container(shop, "Api", "", "").unwrap();
        let web = ws.model.elements[2].id;
        ws.model.add_relationship(web, api, "calls", "").unwrap();
        let view = &mut ws.views.views[0];
        view.add(&ws.model, api).unwrap();
        assert_eq!(validate(&ws), Ok(()));

        ws.views.views[0].relationships.reverse();
        assert!(matches!(validate(&ws), Err(ModelError::Inconsistent(_))));
    }
}
