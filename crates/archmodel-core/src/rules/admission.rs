//! View admission policy
//!
//! Decides whether an element may appear on a view, keyed on the view kind,
//! the view scope and the element kind. Rejections are
//! `ElementNotPermitted` errors carrying a human-readable reason; bulk view
//! operations swallow them.

use crate::errors::{ArchModelError, Result};
use crate::model::{Element, ElementKind};
use crate::ops::Model;
use crate::traversal::software_system_of;
use crate::views::{View, ViewKind};

/// Check that `element_id` may be added to `view`
///
/// # Errors
/// * `ElementNotFound` - If the element (or an element it refers to) is unknown
/// * `ElementNotPermitted` - If the view's policy rejects the element
pub fn check_element_can_be_added(model: &Model, view: &View, element_id: &str) -> Result<()> {
    let element = model.get_element(element_id)?;

    match &view.kind {
        ViewKind::SystemLandscape => check_people_and_systems(element, "a system landscape view"),
        ViewKind::SystemContext => check_people_and_systems(element, "a system context view"),
        ViewKind::Container => check_container_view(view, element),
        ViewKind::Component { container_id } => {
            check_component_view(model, container_id, element)
        }
        ViewKind::Dynamic { element_id: scope, .. } => {
            check_dynamic_view(model, view, scope.as_deref(), element)
        }
        ViewKind::Deployment { environment } => {
            check_deployment_view(model, view, environment, element)
        }
    }
}

/// Convenience wrapper returning a plain verdict
pub fn can_be_added(model: &Model, view: &View, element_id: &str) -> bool {
    check_element_can_be_added(model, view, element_id).is_ok()
}

fn check_people_and_systems(element: &Element, view_name: &str) -> Result<()> {
    match element.kind() {
        ElementKind::Person | ElementKind::SoftwareSystem => Ok(()),
        _ => Err(ArchModelError::not_permitted(format!(
            "Only people and software systems can be added to {}.",
            view_name
        ))),
    }
}

fn check_container_view(view: &View, element: &Element) -> Result<()> {
    match element.kind() {
        ElementKind::Person | ElementKind::Container => Ok(()),
        ElementKind::SoftwareSystem => {
            if view.software_system_id.as_deref() == Some(element.id.as_str()) {
                Err(ArchModelError::not_permitted(
                    "The software system in scope cannot be added to a container view.",
                ))
            } else {
                Ok(())
            }
        }
        _ => Err(ArchModelError::not_permitted(
            "Only people, software systems, and containers can be added to a container view.",
        )),
    }
}

fn check_component_view(model: &Model, container_id: &str, element: &Element) -> Result<()> {
    match element.kind() {
        ElementKind::Person | ElementKind::Component => Ok(()),
        ElementKind::SoftwareSystem => {
            let scope_parent = model.get_element(container_id)?.parent_id.as_deref();
            if scope_parent == Some(element.id.as_str()) {
                Err(ArchModelError::not_permitted(
                    "The software system in scope cannot be added to a component view.",
                ))
            } else {
                Ok(())
            }
        }
        ElementKind::Container => {
            if element.id == container_id {
                Err(ArchModelError::not_permitted(
                    "The container in scope cannot be added to a component view.",
                ))
            } else {
                Ok(())
            }
        }
        _ => Err(ArchModelError::not_permitted(
            "Only people, software systems, containers, and components can be added to a component view.",
        )),
    }
}

fn check_dynamic_view(
    model: &Model,
    view: &View,
    scope_id: Option<&str>,
    element: &Element,
) -> Result<()> {
    let kind = element.kind();
    if !kind.is_static_structure() {
        return Err(ArchModelError::not_permitted(
            "Only people, software systems, containers and components can be added to dynamic views.",
        ));
    }
    if kind == ElementKind::Person {
        return Ok(());
    }

    let Some(scope_id) = scope_id else {
        return if kind == ElementKind::SoftwareSystem {
            Ok(())
        } else {
            Err(ArchModelError::not_permitted(
                "Only people and software systems can be added to this dynamic view.",
            ))
        };
    };

    let scope = model.get_element(scope_id)?;
    let already_scope = || {
        ArchModelError::not_permitted(format!(
            "{} is already the scope of this view and cannot be added to it.",
            element.name
        ))
    };

    match scope.kind() {
        ElementKind::SoftwareSystem => {
            if element.id == scope.id {
                return Err(already_scope());
            }
            if kind == ElementKind::Component {
                return Err(ArchModelError::not_permitted(
                    "Components can't be added to a dynamic view when the scope is a software system.",
                ));
            }
            check_parent_and_children_absent(model, view, element)
        }
        ElementKind::Container => {
            if element.id == scope.id || scope.parent_id.as_deref() == Some(element.id.as_str()) {
                return Err(already_scope());
            }
            check_parent_and_children_absent(model, view, element)
        }
        _ => Ok(()),
    }
}

fn check_parent_and_children_absent(model: &Model, view: &View, element: &Element) -> Result<()> {
    if let Some(parent_id) = element.parent_id.as_deref() {
        if view.contains_element(parent_id) {
            return Err(ArchModelError::not_permitted(format!(
                "The parent of {} is already in this view.",
                element.name
            )));
        }
    }

    let child_present = view.element_ids().any(|id| {
        model
            .get_element(id)
            .is_ok_and(|e| e.parent_id.as_deref() == Some(element.id.as_str()))
    });
    if child_present {
        return Err(ArchModelError::not_permitted(format!(
            "The child of {} is already in this view.",
            element.name
        )));
    }
    Ok(())
}

fn check_deployment_view(
    model: &Model,
    view: &View,
    environment: &str,
    element: &Element,
) -> Result<()> {
    let kind = element.kind();
    if !kind.is_deployment() {
        return Err(ArchModelError::not_permitted(
            "Only deployment nodes, infrastructure nodes, software system instances, and container instances can be added to deployment views.",
        ));
    }
    if element.environment() != Some(environment) {
        return Err(ArchModelError::not_permitted(format!(
            "Only elements in the {} deployment environment can be added to this view.",
            environment
        )));
    }

    match kind {
        ElementKind::SoftwareSystemInstance => {
            let system_id = software_system_of(model, &element.id)?;
            if system_id.is_some() && system_id == view.software_system_id {
                return Err(ArchModelError::not_permitted(
                    "The software system in scope cannot be added to a deployment view.",
                ));
            }
            if present_systems_of_kind(model, view, ElementKind::ContainerInstance)
                .contains(&system_id)
            {
                return Err(ArchModelError::not_permitted(format!(
                    "A child of {} is already in this view.",
                    model.display_name(&element.id)?
                )));
            }
            Ok(())
        }
        ElementKind::ContainerInstance => {
            let system_id = software_system_of(model, &element.id)?;
            if present_systems_of_kind(model, view, ElementKind::SoftwareSystemInstance)
                .contains(&system_id)
            {
                return Err(ArchModelError::not_permitted(format!(
                    "The parent of {} is already in this view.",
                    model.display_name(&element.id)?
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Software systems behind the instances of `kind` already on the view
fn present_systems_of_kind(model: &Model, view: &View, kind: ElementKind) -> Vec<Option<String>> {
    view.element_ids()
        .filter(|id| model.get_element(id).is_ok_and(|e| e.kind() == kind))
        .filter_map(|id| software_system_of(model, id).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::element_ops::{
        add_component, add_container, add_container_instance, add_deployment_node, add_person,
        add_software_system, add_software_system_instance,
    };
    use crate::views::ElementView;

    fn view(kind: ViewKind, system: Option<&str>) -> View {
        View::new("key", kind, system.map(str::to_string), "").unwrap()
    }

    fn reason(result: Result<()>) -> String {
        match result {
            Err(ArchModelError::ElementNotPermitted { reason }) => reason,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_context_view_rejects_containers() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let v = view(ViewKind::SystemContext, Some(&s));

        assert!(can_be_added(&model, &v, &s));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &c)),
            "Only people and software systems can be added to a system context view."
        );
    }

    #[test]
    fn test_container_view_rejects_scope() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let other = add_software_system(&mut model, "Other", "").unwrap();
        let v = view(ViewKind::Container, Some(&s));

        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &s)),
            "The software system in scope cannot be added to a container view."
        );
        assert!(can_be_added(&model, &v, &other));
    }

    #[test]
    fn test_component_view_rejects_scope_and_parent() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let c2 = add_container(&mut model, &s, "C2", "", "").unwrap();
        let k = add_component(&mut model, &c, "K", "", "").unwrap();
        let v = view(
            ViewKind::Component {
                container_id: c.clone(),
            },
            Some(&s),
        );

        assert!(!can_be_added(&model, &v, &s));
        assert!(!can_be_added(&model, &v, &c));
        assert!(can_be_added(&model, &v, &c2));
        assert!(can_be_added(&model, &v, &k));
    }

    #[test]
    fn test_unscoped_dynamic_view_allows_people_and_systems() {
        let mut model = Model::new();
        let u = add_person(&mut model, "U", "").unwrap();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let v = view(
            ViewKind::Dynamic {
                element_id: None,
                sequence: Default::default(),
            },
            None,
        );

        assert!(can_be_added(&model, &v, &u));
        assert!(can_be_added(&model, &v, &s));
        assert!(!can_be_added(&model, &v, &c));
    }

    #[test]
    fn test_system_scoped_dynamic_view_checks_parent_and_children() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let other = add_software_system(&mut model, "Other", "").unwrap();
        let oc = add_container(&mut model, &other, "OC", "", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let k = add_component(&mut model, &c, "K", "", "").unwrap();

        let mut v = view(
            ViewKind::Dynamic {
                element_id: Some(s.clone()),
                sequence: Default::default(),
            },
            Some(&s),
        );
        assert!(!can_be_added(&model, &v, &s));
        assert!(!can_be_added(&model, &v, &k));
        assert!(can_be_added(&model, &v, &c));

        v.elements.push(ElementView::new(other.clone()));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &oc)),
            "The parent of OC is already in this view."
        );

        v.elements.clear();
        v.elements.push(ElementView::new(oc.clone()));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &other)),
            "The child of Other is already in this view."
        );
    }

    #[test]
    fn test_container_scoped_dynamic_view_rejects_container_and_system() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let k = add_component(&mut model, &c, "K", "", "").unwrap();
        let v = view(
            ViewKind::Dynamic {
                element_id: Some(c.clone()),
                sequence: Default::default(),
            },
            Some(&s),
        );

        assert!(!can_be_added(&model, &v, &c));
        assert!(!can_be_added(&model, &v, &s));
        assert!(can_be_added(&model, &v, &k));
    }

    #[test]
    fn test_deployment_view_environment_and_instance_exclusivity() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let c = add_container(&mut model, &s, "C", "", "").unwrap();
        let live = add_deployment_node(&mut model, "Live", "Server", "", "", 1).unwrap();
        let dev = add_deployment_node(&mut model, "Dev", "Laptop", "", "", 1).unwrap();
        let ssi = add_software_system_instance(&mut model, &live, &s, None).unwrap();
        let ci = add_container_instance(&mut model, &live, &c, None).unwrap();

        let mut v = view(
            ViewKind::Deployment {
                environment: "Live".to_string(),
            },
            None,
        );
        assert!(can_be_added(&model, &v, &live));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &dev)),
            "Only elements in the Live deployment environment can be added to this view."
        );

        v.elements.push(ElementView::new(ci.clone()));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &ssi)),
            "A child of S is already in this view."
        );

        v.elements.clear();
        v.elements.push(ElementView::new(ssi.clone()));
        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &ci)),
            "The parent of C is already in this view."
        );
    }

    #[test]
    fn test_deployment_view_rejects_scoped_system_instance() {
        let mut model = Model::new();
        let s = add_software_system(&mut model, "S", "").unwrap();
        let live = add_deployment_node(&mut model, "Live", "Server", "", "", 1).unwrap();
        let ssi = add_software_system_instance(&mut model, &live, &s, None).unwrap();
        let v = view(
            ViewKind::Deployment {
                environment: "Live".to_string(),
            },
            Some(&s),
        );

        assert_eq!(
            reason(check_element_can_be_added(&model, &v, &ssi)),
            "The software system in scope cannot be added to a deployment view."
        );
    }
}
