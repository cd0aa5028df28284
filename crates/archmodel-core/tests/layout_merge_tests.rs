mod common;

use archmodel_core::layout_merge::{copy_layout, merge_workspaces};
use archmodel_core::ops::element_ops::{
    add_container, add_container_instance, add_deployment_node, add_person, add_software_system,
    set_name,
};
use archmodel_core::ops::relationship_ops::uses;
use archmodel_core::views::dynamic::add_interaction;
use archmodel_core::views::projection::{add_all_elements, add_element};
use archmodel_core::views::{PaperSize, Routing, Vertex};
use archmodel_core::{Model, View, ViewKind, Workspace};
use common::new_model;

/// A model with `padding` throwaway people (to shift ids), a software system
/// and one container, plus a container view showing the container
fn container_model(
    padding: usize,
    system_name: &str,
    container_name: &str,
    description: &str,
) -> (Model, View, String) {
    let mut model = new_model();
    for i in 0..padding {
        add_person(&mut model, &format!("Padding {i}"), "").unwrap();
    }
    let system = add_software_system(&mut model, system_name, "").unwrap();
    let container = add_container(&mut model, &system, container_name, description, "").unwrap();

    let mut view = View::new("containers", ViewKind::Container, Some(system), "").unwrap();
    add_element(&model, &mut view, &container, true).unwrap();
    (model, view, container)
}

fn place(view: &mut View, element_id: &str, x: i64, y: i64) {
    let ev = view.element_view_mut(element_id).unwrap();
    ev.x = x;
    ev.y = y;
}

fn position(view: &View, element_id: &str) -> (i64, i64) {
    let ev = view.element_view(element_id).unwrap();
    (ev.x, ev.y)
}

// ===== ELEMENT MATCHING TIERS =====

#[test]
fn test_match_by_canonical_name() {
    let (old_model, mut old_view, old_id) = container_model(0, "S", "Web.App", "old");
    place(&mut old_view, &old_id, 100, 200);

    let (new_model, mut new_view, new_id) = container_model(1, "S", "WebApp", "new");
    assert_ne!(old_id, new_id);

    let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(report.matched_elements, 1);
    assert_eq!(position(&new_view, &new_id), (100, 200));
}

#[test]
fn test_match_by_kind_and_name() {
    let (old_model, mut old_view, old_id) = container_model(0, "S", "Web", "old");
    place(&mut old_view, &old_id, 10, 20);

    let (new_model, mut new_view, new_id) = container_model(1, "Renamed", "Web", "new");

    copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(position(&new_view, &new_id), (10, 20));
}

#[test]
fn test_match_by_kind_and_description() {
    let (old_model, mut old_view, old_id) = container_model(0, "S", "Web", "Serves pages");
    place(&mut old_view, &old_id, 30, 40);

    let (new_model, mut new_view, new_id) = container_model(1, "S", "Website", "Serves pages");

    copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(position(&new_view, &new_id), (30, 40));
}

#[test]
fn test_match_by_kind_and_id() {
    let (old_model, mut old_view, old_id) = container_model(0, "S", "Web", "old");
    place(&mut old_view, &old_id, 50, 60);

    let (new_model, mut new_view, new_id) = container_model(0, "S", "Website", "new");
    assert_eq!(old_id, new_id);

    copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(position(&new_view, &new_id), (50, 60));
}

#[test]
fn test_no_match_keeps_origin() {
    let (old_model, mut old_view, old_id) = container_model(0, "S", "Web", "old");
    place(&mut old_view, &old_id, 70, 80);

    let (new_model, mut new_view, new_id) = container_model(1, "S", "Website", "new");

    let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(report.matched_elements, 0);
    assert_eq!(position(&new_view, &new_id), (0, 0));
    assert_eq!(
        report.diagnostics,
        vec!["There is no layout information for the element named Website on view containers"]
    );
}

#[test]
fn test_name_tier_wins_over_id_tier() {
    let mut old_model = new_model();
    let system = add_software_system(&mut old_model, "S", "").unwrap();
    let first = add_container(&mut old_model, &system, "First", "", "").unwrap();
    let second = add_container(&mut old_model, &system, "Second", "", "").unwrap();
    let mut old_view = View::new("containers", ViewKind::Container, Some(system), "").unwrap();
    add_all_elements(&old_model, &mut old_view).unwrap();
    place(&mut old_view, &first, 1, 1);
    place(&mut old_view, &second, 2, 2);

    // "Second" reuses the id of the old "First"
    let mut new_model = new_model();
    let system = add_software_system(&mut new_model, "T", "").unwrap();
    let renamed = add_container(&mut new_model, &system, "Second", "", "").unwrap();
    assert_eq!(renamed, first);
    let mut new_view = View::new("containers", ViewKind::Container, Some(system), "").unwrap();
    add_all_elements(&new_model, &mut new_view).unwrap();

    copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(position(&new_view, &renamed), (2, 2));
}

/// A container instance on a node, shown on a deployment view
fn instance_model(padding: usize, node_name: &str, container_name: &str) -> (Model, View, String) {
    let mut model = new_model();
    for i in 0..padding {
        add_person(&mut model, &format!("Padding {i}"), "").unwrap();
    }
    let system = add_software_system(&mut model, "S", "").unwrap();
    let container = add_container(&mut model, &system, container_name, "", "").unwrap();
    let node = add_deployment_node(&mut model, "Live", node_name, "", "", 1).unwrap();
    let instance = add_container_instance(&mut model, &node, &container, None).unwrap();

    let kind = ViewKind::Deployment {
        environment: "Live".to_string(),
    };
    let mut view = View::new("live", kind, None, "").unwrap();
    add_element(&model, &mut view, &instance, false).unwrap();
    (model, view, instance)
}

#[test]
fn test_instance_matches_by_name_of_renamed_container() {
    let (mut old_model, mut old_view, old_id) = instance_model(0, "EC2", "Web");
    let container = old_model
        .get_element(&old_id)
        .unwrap()
        .instance()
        .unwrap()
        .element_id
        .clone();
    set_name(&mut old_model, &container, "Frontend").unwrap();
    place(&mut old_view, &old_id, 15, 25);

    // the node changed too, so canonical names differ
    let (new_model, mut new_view, new_id) = instance_model(1, "Compute", "Frontend");
    assert_ne!(old_id, new_id);

    let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
    assert_eq!(position(&new_view, &new_id), (15, 25));
    // only the instance; the renamed node has nothing to match
    assert_eq!(report.matched_elements, 1);
}

// ===== RELATIONSHIPS AND PAPER SIZE =====

fn context_workspace() -> (Model, View, String) {
    let mut model = new_model();
    let user = add_person(&mut model, "User", "").unwrap();
    let system = add_software_system(&mut model, "Banking", "").unwrap();
    let relationship = uses(&mut model, &user, &system, "Uses").unwrap().unwrap();
    let mut view = View::new("context", ViewKind::SystemContext, Some(system), "").unwrap();
    add_all_elements(&model, &mut view).unwrap();
    (model, view, relationship)
}

#[test]
fn test_relationship_layout_copied() {
    let (old_model, mut old_view, old_relationship) = context_workspace();
    old_view.paper_size = Some(PaperSize::A5Landscape);
    let rv = old_view.relationship_view_mut(&old_relationship).unwrap();
    rv.vertices = vec![Vertex::new(10, 10), Vertex::new(20, 30)];
    rv.routing = Some(Routing::Orthogonal);
    rv.position = Some(70);

    let (new_model, mut new_view, new_relationship) = context_workspace();
    let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();

    assert_eq!(report.matched_relationships, 1);
    assert_eq!(new_view.paper_size, Some(PaperSize::A5Landscape));
    let rv = new_view.relationship_view(&new_relationship).unwrap();
    assert_eq!(rv.vertices, vec![Vertex::new(10, 10), Vertex::new(20, 30)]);
    assert_eq!(rv.routing, Some(Routing::Orthogonal));
    assert_eq!(rv.position, Some(70));
}

#[test]
fn test_dynamic_relationships_match_on_description_and_order() {
    fn dynamic() -> (Model, View) {
        let mut model = new_model();
        let user = add_person(&mut model, "User", "").unwrap();
        let system = add_software_system(&mut model, "Banking", "").unwrap();
        uses(&mut model, &user, &system, "Uses").unwrap();
        let mut view = View::new(
            "dynamic",
            ViewKind::Dynamic {
                element_id: None,
                sequence: Default::default(),
            },
            None,
            "",
        )
        .unwrap();
        add_interaction(&model, &mut view, &user, "Logs in", &system).unwrap();
        add_interaction(&model, &mut view, &user, "Views balance", &system).unwrap();
        (model, view)
    }

    let (old_model, mut old_view) = dynamic();
    old_view.relationship_views_mut()[1].vertices = vec![Vertex::new(5, 5)];

    let (new_model, mut new_view) = dynamic();
    let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();

    assert_eq!(report.matched_relationships, 2);
    let views = new_view.relationship_views();
    assert!(views[0].vertices.is_empty());
    assert_eq!(views[1].vertices, vec![Vertex::new(5, 5)]);
}

// ===== WORKSPACES =====

#[test]
fn test_merge_workspaces_by_view_key() {
    fn workspace() -> Workspace {
        let mut workspace = Workspace::new("Banking", "");
        let user = add_person(&mut workspace.model, "User", "").unwrap();
        let system = add_software_system(&mut workspace.model, "Banking", "").unwrap();
        uses(&mut workspace.model, &user, &system, "Uses").unwrap();
        let view = workspace.views.create_system_landscape_view("landscape", "").unwrap();
        add_all_elements(&workspace.model, view).unwrap();
        workspace.views.create_dynamic_view("only-new", "").unwrap();
        workspace
    }

    let mut old = workspace();
    let user_id = old.model.people().next().unwrap().id.clone();
    let view = old.views.get_mut("landscape").unwrap();
    view.element_view_mut(&user_id).unwrap().x = 400;

    let mut new = workspace();
    let reports = merge_workspaces(&old, &mut new).unwrap();

    assert_eq!(reports.len(), 2);
    let view = new.views.get("landscape").unwrap();
    assert_eq!(view.element_view(&user_id).unwrap().x, 400);
}
