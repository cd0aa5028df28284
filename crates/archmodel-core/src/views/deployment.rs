//! Deployment view hierarchy
//!
//! A deployment view never shows a disconnected tree: leaves bring their
//! ancestor deployment nodes, and a deployment node is only shown when
//! something inside it is.

use super::projection::{add_single_element, remove_single_element};
use super::view::View;
use crate::errors::{ArchModelError, Result};
use crate::model::ElementKind;
use crate::ops::Model;
use crate::rules::admission::check_element_can_be_added;
use crate::traversal::{ancestors, software_system_of};

pub(crate) fn add_deployment_element(
    model: &Model,
    view: &mut View,
    element_id: &str,
    include_relationships: bool,
) -> Result<()> {
    let kind = model
        .get_element(element_id)
        .map_err(|_| ArchModelError::ElementNotInModel {
            name: element_id.to_string(),
        })?
        .kind();

    match kind {
        ElementKind::DeploymentNode => {
            check_element_can_be_added(model, view, element_id)?;
            if add_contents(model, view, element_id, include_relationships)? {
                add_ancestor_nodes(model, view, element_id, include_relationships)?;
            } else {
                tracing::debug!(element_id, "deployment node has nothing to show, skipped");
            }
            Ok(())
        }
        ElementKind::InfrastructureNode
        | ElementKind::SoftwareSystemInstance
        | ElementKind::ContainerInstance => {
            add_single_element(model, view, element_id, include_relationships)?;
            add_ancestor_nodes(model, view, element_id, include_relationships)
        }
        _ => add_single_element(model, view, element_id, include_relationships),
    }
}

/// Add a node's contents depth-first; the node itself is added last and only
/// when something inside it was
fn add_contents(
    model: &Model,
    view: &mut View,
    node_id: &str,
    include_relationships: bool,
) -> Result<bool> {
    let mut has_contents = false;

    let system_instances = child_ids(model, node_id, ElementKind::SoftwareSystemInstance);
    for id in system_instances {
        has_contents |= add_skipping_rejection(model, view, &id, include_relationships)?;
    }

    let container_instances = child_ids(model, node_id, ElementKind::ContainerInstance);
    for id in container_instances {
        let in_scope = match view.software_system_id.as_deref() {
            None => true,
            Some(scope) => software_system_of(model, &id)?.as_deref() == Some(scope),
        };
        if in_scope {
            has_contents |= add_skipping_rejection(model, view, &id, include_relationships)?;
        }
    }

    let infrastructure = child_ids(model, node_id, ElementKind::InfrastructureNode);
    for id in infrastructure {
        add_single_element(model, view, &id, include_relationships)?;
        has_contents = true;
    }

    let children = child_ids(model, node_id, ElementKind::DeploymentNode);
    for id in children {
        has_contents |= add_contents(model, view, &id, include_relationships)?;
    }

    if has_contents {
        add_single_element(model, view, node_id, include_relationships)?;
    }
    Ok(has_contents)
}

fn add_skipping_rejection(
    model: &Model,
    view: &mut View,
    element_id: &str,
    include_relationships: bool,
) -> Result<bool> {
    match add_single_element(model, view, element_id, include_relationships) {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_permitted() => {
            tracing::debug!(element_id, reason = %err, "element skipped");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Innermost first
fn add_ancestor_nodes(
    model: &Model,
    view: &mut View,
    element_id: &str,
    include_relationships: bool,
) -> Result<()> {
    for parent_id in ancestors(model, element_id)? {
        add_single_element(model, view, &parent_id, include_relationships)?;
    }
    Ok(())
}

fn child_ids(model: &Model, parent_id: &str, kind: ElementKind) -> Vec<String> {
    model
        .children_of_kind(parent_id, kind)
        .map(|e| e.id.clone())
        .collect()
}

pub(crate) fn remove_deployment_element(model: &Model, view: &mut View, element_id: &str) {
    let is_node = model
        .get_element(element_id)
        .is_ok_and(|e| e.kind() == ElementKind::DeploymentNode);
    if is_node {
        let children: Vec<String> = model
            .children_of(element_id)
            .map(|e| e.id.clone())
            .collect();
        for child in children {
            remove_deployment_element(model, view, &child);
        }
    }
    remove_single_element(model, view, element_id);
}

/// Add every top-level deployment node of the view's environment
///
/// # Errors
/// Propagates lookup failures from the model.
pub fn add_all_deployment_nodes(model: &Model, view: &mut View) -> Result<()> {
    let environment = view.environment().map(str::to_string);
    let nodes: Vec<String> = model
        .deployment_nodes()
        .filter(|n| n.parent_id.is_none())
        .filter(|n| environment.is_none() || n.environment() == environment.as_deref())
        .map(|n| n.id.clone())
        .collect();

    for node_id in nodes {
        add_deployment_element(model, view, &node_id, true)?;
    }
    Ok(())
}
