//! Populating views from the model
//!
//! Every function takes the model the view belongs to. Single-element
//! operations report admission rejections as errors; bulk operations
//! (`add_all_*`, nearest neighbours, default elements) skip rejected
//! elements and log the reason at `debug`.

use std::time::Instant;

use super::deployment;
use super::view::{ElementView, RelationshipView, View, ViewKind};
use crate::errors::{ArchModelError, Result};
use crate::model::ElementKind;
use crate::ops::relationship_ops::{efferent_relationships, has_efferent_relationship, has_relationships};
use crate::ops::Model;
use crate::rules::admission::check_element_can_be_added;
use crate::{log_op_end, log_op_error, log_op_start};

/// Add an element to a view
///
/// With `include_relationships`, relationships between the element and
/// elements already on the view are added in both directions. On deployment
/// views, deployment nodes pull in their contents and leaves pull in their
/// ancestor nodes (see [`crate::views::deployment`]).
///
/// # Errors
/// * `ElementNotInModel` - If the element does not exist in `model`
/// * `ElementNotPermitted` - If the view's admission policy rejects it
pub fn add_element(
    model: &Model,
    view: &mut View,
    element_id: &str,
    include_relationships: bool,
) -> Result<()> {
    if view.is_deployment() {
        return deployment::add_deployment_element(model, view, element_id, include_relationships);
    }
    add_single_element(model, view, element_id, include_relationships)
}

/// Add exactly one element, without deployment hierarchy handling
pub(crate) fn add_single_element(
    model: &Model,
    view: &mut View,
    element_id: &str,
    include_relationships: bool,
) -> Result<()> {
    if !model.contains_element(element_id) {
        return Err(ArchModelError::ElementNotInModel {
            name: element_id.to_string(),
        });
    }

    if !view.contains_element(element_id) {
        check_element_can_be_added(model, view, element_id)?;
        view.elements.push(ElementView::new(element_id));
    }

    if include_relationships {
        add_relationships_touching(model, view, element_id);
    }
    Ok(())
}

/// Add relationship views between `element_id` and everything already shown
fn add_relationships_touching(model: &Model, view: &mut View, element_id: &str) {
    let mut found = Vec::new();

    for relationship in efferent_relationships(model, element_id) {
        if view.contains_element(&relationship.destination_id) {
            found.push(relationship.id.clone());
        }
    }

    for present in view.element_ids() {
        for relationship in efferent_relationships(model, present) {
            if relationship.destination_id == element_id {
                found.push(relationship.id.clone());
            }
        }
    }

    for relationship_id in found {
        if !view.contains_relationship(&relationship_id) {
            view.relationships.push(RelationshipView::new(relationship_id));
        }
    }
}

/// Remove an element and every relationship view touching it
///
/// Removing a deployment node from a deployment view removes its contents.
/// Unknown ids are ignored.
pub fn remove_element(model: &Model, view: &mut View, element_id: &str) {
    if view.is_deployment() {
        deployment::remove_deployment_element(model, view, element_id);
        return;
    }
    remove_single_element(model, view, element_id);
}

pub(crate) fn remove_single_element(model: &Model, view: &mut View, element_id: &str) {
    view.elements.retain(|ev| ev.element_id != element_id);
    view.relationships.retain(|rv| {
        model
            .get_relationship(&rv.relationship_id)
            .map(|r| r.source_id != element_id && r.destination_id != element_id)
            .unwrap_or(false)
    });
}

/// Add a relationship when both of its endpoints are shown
///
/// On dynamic views both endpoints are added first (without their other
/// relationships) and the relationship receives the next order token.
///
/// # Returns
/// Whether the relationship is on the view afterwards
///
/// # Errors
/// * `RelationshipNotFound` - If the id is unknown
/// * `ElementNotPermitted` - If a dynamic view rejects an endpoint
pub fn add_relationship(model: &Model, view: &mut View, relationship_id: &str) -> Result<bool> {
    let relationship = model.get_relationship(relationship_id)?;

    if let ViewKind::Dynamic { .. } = view.kind {
        add_single_element(model, view, &relationship.source_id, false)?;
        add_single_element(model, view, &relationship.destination_id, false)?;
        let order = super::dynamic::next_order(view)?;
        let mut relationship_view = RelationshipView::new(relationship_id);
        relationship_view.order = Some(order);
        view.relationships.push(relationship_view);
        return Ok(true);
    }

    if !view.contains_element(&relationship.source_id)
        || !view.contains_element(&relationship.destination_id)
    {
        return Ok(false);
    }
    if !view.contains_relationship(relationship_id) {
        view.relationships
            .push(RelationshipView::new(relationship_id));
    }
    Ok(true)
}

/// Drop every view of a relationship
pub fn remove_relationship(view: &mut View, relationship_id: &str) {
    view.relationships
        .retain(|rv| rv.relationship_id != relationship_id);
}

/// Add an element plus every element of `kind` it shares a relationship with
///
/// Rejections are skipped. If the focal element itself is rejected nothing
/// else is added.
///
/// # Errors
/// * `ElementNotInModel` - If the focal element does not exist
pub fn add_nearest_neighbours(
    model: &Model,
    view: &mut View,
    element_id: &str,
    kind: ElementKind,
) -> Result<()> {
    if let Err(err) = add_single_element(model, view, element_id, true) {
        return swallow_rejection(err, element_id);
    }

    let mut neighbours = Vec::new();
    for relationship in model.relationships() {
        if relationship.source_id == element_id {
            neighbours.push(relationship.destination_id.clone());
        }
        if relationship.destination_id == element_id {
            neighbours.push(relationship.source_id.clone());
        }
    }

    for neighbour in neighbours {
        let matches = model.get_element(&neighbour).is_ok_and(|e| e.kind() == kind);
        if matches {
            try_add(model, view, &neighbour);
        }
    }
    Ok(())
}

/// Nearest neighbours of every kind the view shows
///
/// # Errors
/// * `ElementNotInModel` - If the focal element does not exist
/// * `UnsupportedViewOperation` - On dynamic and deployment views
pub fn add_all_nearest_neighbours(model: &Model, view: &mut View, element_id: &str) -> Result<()> {
    let kinds: &[ElementKind] = match view.kind {
        ViewKind::SystemLandscape | ViewKind::SystemContext => {
            &[ElementKind::SoftwareSystem, ElementKind::Person]
        }
        ViewKind::Container => &[
            ElementKind::Person,
            ElementKind::SoftwareSystem,
            ElementKind::Container,
        ],
        ViewKind::Component { .. } => &[
            ElementKind::Person,
            ElementKind::SoftwareSystem,
            ElementKind::Container,
            ElementKind::Component,
        ],
        ViewKind::Dynamic { .. } | ViewKind::Deployment { .. } => {
            return Err(view.unsupported("add_all_nearest_neighbours"))
        }
    };
    for kind in kinds {
        add_nearest_neighbours(model, view, element_id, *kind)?;
    }
    Ok(())
}

/// Add every person the view accepts
pub fn add_all_people(model: &Model, view: &mut View) {
    let people: Vec<String> = model.people().map(|p| p.id.clone()).collect();
    for id in people {
        try_add(model, view, &id);
    }
}

/// Add every software system the view accepts
pub fn add_all_software_systems(model: &Model, view: &mut View) {
    let systems: Vec<String> = model.software_systems().map(|s| s.id.clone()).collect();
    for id in systems {
        try_add(model, view, &id);
    }
}

/// Add the containers of the scoped software system, or every container
/// when the view has no scope
pub fn add_all_containers(model: &Model, view: &mut View) {
    let containers: Vec<String> = match view.software_system_id.as_deref() {
        Some(system_id) => model
            .children_of_kind(system_id, ElementKind::Container)
            .map(|c| c.id.clone())
            .collect(),
        None => model
            .elements_of_kind(ElementKind::Container)
            .map(|c| c.id.clone())
            .collect(),
    };
    for id in containers {
        try_add(model, view, &id);
    }
}

/// Add the components of the scoped container, or every component when the
/// view is not a component view
pub fn add_all_components(model: &Model, view: &mut View) {
    let components: Vec<String> = match &view.kind {
        ViewKind::Component { container_id } => model
            .children_of_kind(container_id, ElementKind::Component)
            .map(|c| c.id.clone())
            .collect(),
        _ => model
            .elements_of_kind(ElementKind::Component)
            .map(|c| c.id.clone())
            .collect(),
    };
    for id in components {
        try_add(model, view, &id);
    }
}

/// Add everything a view of this kind can show
///
/// # Errors
/// * `UnsupportedViewOperation` - On dynamic views
pub fn add_all_elements(model: &Model, view: &mut View) -> Result<()> {
    match view.kind {
        ViewKind::SystemLandscape | ViewKind::SystemContext => {
            add_all_software_systems(model, view);
            add_all_people(model, view);
        }
        ViewKind::Container => {
            add_all_software_systems(model, view);
            add_all_people(model, view);
            add_all_containers(model, view);
        }
        ViewKind::Component { .. } => {
            add_all_software_systems(model, view);
            add_all_people(model, view);
            add_all_containers(model, view);
            add_all_components(model, view);
        }
        ViewKind::Deployment { .. } => deployment::add_all_deployment_nodes(model, view)?,
        ViewKind::Dynamic { .. } => return Err(view.unsupported("add_all_elements")),
    }
    Ok(())
}

/// Populate a view with the elements a reader would expect by default
///
/// * System landscape: every person and software system
/// * System context: the scope plus its people and software system neighbours
/// * Container: containers of the scope that take part in a relationship,
///   plus their people and software system neighbours
/// * Component: components of the scope that take part in a relationship,
///   sibling containers linked to them, plus their people and software system
///   neighbours
/// * Deployment: every top-level deployment node of the environment
/// * Dynamic: nothing
///
/// # Errors
/// * `ElementNotFound` - If the view scope is missing from the model
pub fn add_default_elements(model: &Model, view: &mut View) -> Result<()> {
    let start = Instant::now();
    log_op_start!("add_default_elements", view_key = view.key());

    let result = populate_defaults(model, view);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => log_op_end!(
            "add_default_elements",
            duration_ms = duration_ms,
            view_key = view.key(),
            element_count = view.element_views().len(),
            relationship_count = view.relationship_views().len()
        ),
        Err(err) => log_op_error!(
            "add_default_elements",
            err.clone(),
            duration_ms = duration_ms,
            view_key = view.key()
        ),
    }
    result
}

fn populate_defaults(model: &Model, view: &mut View) -> Result<()> {
    match view.kind.clone() {
        ViewKind::SystemLandscape => {
            add_all_people(model, view);
            add_all_software_systems(model, view);
        }
        ViewKind::SystemContext => {
            let system_id = scope_of(model, view)?;
            add_nearest_neighbours(model, view, &system_id, ElementKind::Person)?;
            add_nearest_neighbours(model, view, &system_id, ElementKind::SoftwareSystem)?;
        }
        ViewKind::Container => {
            let system_id = scope_of(model, view)?;
            let containers: Vec<String> = model
                .children_of_kind(&system_id, ElementKind::Container)
                .filter(|c| has_relationships(model, &c.id))
                .map(|c| c.id.clone())
                .collect();
            for container_id in containers {
                try_add(model, view, &container_id);
                add_nearest_neighbours(model, view, &container_id, ElementKind::Person)?;
                add_nearest_neighbours(model, view, &container_id, ElementKind::SoftwareSystem)?;
            }
        }
        ViewKind::Component { container_id } => {
            let system_id = scope_of(model, view)?;
            let components: Vec<String> = model
                .children_of_kind(&container_id, ElementKind::Component)
                .filter(|c| has_relationships(model, &c.id))
                .map(|c| c.id.clone())
                .collect();
            let containers: Vec<String> = model
                .children_of_kind(&system_id, ElementKind::Container)
                .map(|c| c.id.clone())
                .collect();

            for component_id in components {
                try_add(model, view, &component_id);
                for sibling in &containers {
                    if has_efferent_relationship(model, sibling, &component_id, None)
                        || has_efferent_relationship(model, &component_id, sibling, None)
                    {
                        try_add(model, view, sibling);
                    }
                }
                add_nearest_neighbours(model, view, &component_id, ElementKind::Person)?;
                add_nearest_neighbours(model, view, &component_id, ElementKind::SoftwareSystem)?;
            }
        }
        ViewKind::Deployment { .. } => deployment::add_all_deployment_nodes(model, view)?,
        ViewKind::Dynamic { .. } => {}
    }
    Ok(())
}

fn scope_of(model: &Model, view: &View) -> Result<String> {
    let system_id = view
        .software_system_id
        .clone()
        .ok_or_else(|| ArchModelError::Internal {
            message: format!("view {} has no software system in scope", view.key()),
        })?;
    model.get_element(&system_id)?;
    Ok(system_id)
}

/// Add with relationships, skipping (and logging) admission rejections
pub(crate) fn try_add(model: &Model, view: &mut View, element_id: &str) {
    match add_single_element(model, view, element_id, true) {
        Ok(()) => {}
        Err(err) if err.is_not_permitted() => {
            tracing::debug!(element_id, reason = %err, "element skipped");
        }
        Err(err) => {
            tracing::warn!(element_id, error = %err, "element could not be added");
        }
    }
}

fn swallow_rejection(err: ArchModelError, element_id: &str) -> Result<()> {
    if err.is_not_permitted() {
        tracing::debug!(element_id, reason = %err, "element skipped");
        Ok(())
    } else {
        Err(err)
    }
}
