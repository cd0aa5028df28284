mod common;

use archmodel_core::ops::element_ops::{add_container, add_person, add_software_system};
use archmodel_core::rules::admission::can_be_added;
use archmodel_core::views::projection::add_element;
use archmodel_core::{ArchModelError, ViewSet};
use common::{hierarchy, live_deployment, new_model};

fn rejection_reason(result: archmodel_core::Result<()>) -> String {
    match result {
        Err(ArchModelError::ElementNotPermitted { reason }) => reason,
        other => panic!("Expected ElementNotPermitted, got {:?}", other),
    }
}

// ===== STATIC VIEWS =====

#[test]
fn test_landscape_rejects_containers() {
    let mut model = new_model();
    let ids = hierarchy(&mut model, "A");
    let mut views = ViewSet::new();
    let view = views.create_system_landscape_view("landscape", "").unwrap();

    let reason = rejection_reason(add_element(&model, view, &ids.container, true));
    assert_eq!(
        reason,
        "Only people and software systems can be added to a system landscape view."
    );
}

#[test]
fn test_container_view_rejects_its_scope() {
    let mut model = new_model();
    let ids = hierarchy(&mut model, "A");
    let other = add_software_system(&mut model, "Other", "").unwrap();
    let mut views = ViewSet::new();
    let view = views
        .create_container_view(&model, "containers", &ids.system, "")
        .unwrap();

    let reason = rejection_reason(add_element(&model, view, &ids.system, true));
    assert_eq!(
        reason,
        "The software system in scope cannot be added to a container view."
    );
    assert!(add_element(&model, view, &other, true).is_ok());
    assert!(add_element(&model, view, &ids.container, true).is_ok());
    assert!(!can_be_added(&model, view, &ids.component));
}

#[test]
fn test_component_view_rejects_scope_and_its_system() {
    let mut model = new_model();
    let ids = hierarchy(&mut model, "A");
    let sibling = add_container(&mut model, &ids.system, "Sibling", "", "").unwrap();
    let mut views = ViewSet::new();
    let view = views
        .create_component_view(&model, "components", &ids.container, "")
        .unwrap();

    let reason = rejection_reason(add_element(&model, view, &ids.system, true));
    assert_eq!(
        reason,
        "The software system in scope cannot be added to a component view."
    );
    let reason = rejection_reason(add_element(&model, view, &ids.container, true));
    assert_eq!(
        reason,
        "The container in scope cannot be added to a component view."
    );
    assert!(add_element(&model, view, &sibling, true).is_ok());
    assert!(add_element(&model, view, &ids.component, true).is_ok());
}

// ===== DYNAMIC VIEWS =====

#[test]
fn test_unscoped_dynamic_view_accepts_people_and_systems_only() {
    let mut model = new_model();
    let user = add_person(&mut model, "User", "").unwrap();
    let ids = hierarchy(&mut model, "A");
    let mut views = ViewSet::new();
    let view = views.create_dynamic_view("dynamic", "").unwrap();

    assert!(can_be_added(&model, view, &user));
    assert!(can_be_added(&model, view, &ids.system));
    assert!(!can_be_added(&model, view, &ids.container));
}

#[test]
fn test_system_scoped_dynamic_view() {
    let mut model = new_model();
    let ids = hierarchy(&mut model, "A");
    let other = hierarchy(&mut model, "B");
    let mut views = ViewSet::new();
    let view = views
        .create_dynamic_view_for(&model, "dynamic", &ids.system, "")
        .unwrap();

    let reason = rejection_reason(add_element(&model, view, &ids.system, false));
    assert_eq!(
        reason,
        "A is already the scope of this view and cannot be added to it."
    );
    assert!(!can_be_added(&model, view, &ids.component));

    add_element(&model, view, &other.container, false).unwrap();
    let reason = rejection_reason(add_element(&model, view, &other.system, false));
    assert_eq!(reason, "The child of B is already in this view.");
}

#[test]
fn test_container_scoped_dynamic_view_rejects_parent_system() {
    let mut model = new_model();
    let ids = hierarchy(&mut model, "A");
    let other = hierarchy(&mut model, "B");
    let mut views = ViewSet::new();
    let view = views
        .create_dynamic_view_for(&model, "dynamic", &ids.container, "")
        .unwrap();

    assert!(!can_be_added(&model, view, &ids.container));
    assert!(!can_be_added(&model, view, &ids.system));
    assert!(can_be_added(&model, view, &ids.component));

    add_element(&model, view, &other.system, false).unwrap();
    let reason = rejection_reason(add_element(&model, view, &other.container, false));
    assert_eq!(reason, "The parent of BB is already in this view.");
}

// ===== DEPLOYMENT VIEWS =====

#[test]
fn test_deployment_view_rejects_other_environment_and_static_elements() {
    let mut model = new_model();
    let live = live_deployment(&mut model);
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view("staging", "", "Staging")
        .unwrap();

    let reason = rejection_reason(add_element(&model, view, &live.web_instance, true));
    assert_eq!(
        reason,
        "Only elements in the Staging deployment environment can be added to this view."
    );
    assert!(!can_be_added(&model, view, &live.web));
}

#[test]
fn test_system_and_container_instances_are_exclusive() {
    let mut model = new_model();
    let live = live_deployment(&mut model);
    let system_instance = archmodel_core::ops::element_ops::add_software_system_instance(
        &mut model,
        &live.ec2,
        &live.system,
        None,
    )
    .unwrap();
    let mut views = ViewSet::new();
    let view = views.create_deployment_view("live", "", "Live").unwrap();

    add_element(&model, view, &live.web_instance, true).unwrap();
    let reason = rejection_reason(add_element(&model, view, &system_instance, true));
    assert_eq!(reason, "A child of Internet Banking is already in this view.");
}

#[test]
fn test_scoped_deployment_view_rejects_own_system_instance() {
    let mut model = new_model();
    let live = live_deployment(&mut model);
    let system_instance = archmodel_core::ops::element_ops::add_software_system_instance(
        &mut model,
        &live.ec2,
        &live.system,
        None,
    )
    .unwrap();
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view_for(&model, "live", &live.system, "", "Live")
        .unwrap();

    assert!(!can_be_added(&model, view, &system_instance));
    assert!(can_be_added(&model, view, &live.web_instance));
}
