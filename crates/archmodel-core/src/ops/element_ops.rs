use super::store::Model;
use crate::errors::{ArchModelError, Result};
use crate::model::health_check::{
    DEFAULT_HEALTH_CHECK_INTERVAL_SECONDS, DEFAULT_HEALTH_CHECK_TIMEOUT_MILLISECONDS,
};
use crate::model::{
    Element, ElementDetails, ElementKind, HttpHealthCheck, InstanceDetails, Location,
    DEFAULT_DEPLOYMENT_ENVIRONMENT,
};
use crate::rules::validation::validate_name;

// ========== Static structure ==========

/// Add a person to the model
///
/// # Arguments
/// * `model` - Mutable reference to the Model
/// * `name` - Must not be blank and must be unique among people
/// * `description` - Free text, may be empty
///
/// # Returns
/// The id of the new person
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `DuplicateElement` - If a person with this name already exists
pub fn add_person(model: &mut Model, name: &str, description: &str) -> Result<String> {
    add_top_level(
        model,
        name,
        description,
        ElementDetails::Person {
            location: Location::Unspecified,
        },
    )
}

/// Add a software system to the model
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `DuplicateElement` - If a software system with this name already exists
pub fn add_software_system(model: &mut Model, name: &str, description: &str) -> Result<String> {
    add_top_level(
        model,
        name,
        description,
        ElementDetails::SoftwareSystem {
            location: Location::Unspecified,
        },
    )
}

fn add_top_level(
    model: &mut Model,
    name: &str,
    description: &str,
    details: ElementDetails,
) -> Result<String> {
    validate_name("name", name)?;
    let kind = details.kind();
    if find_top_level(model, kind, name).is_some() {
        return Err(ArchModelError::DuplicateElement {
            name: name.to_string(),
        });
    }

    let element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        details,
    );
    Ok(insert(model, element))
}

/// Add a container to a software system
///
/// A container with the same name already inside the system wins; its id is
/// returned and nothing is created.
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `ElementNotFound` - If the system id is unknown
/// * `InvalidParent` - If the parent is not a software system
pub fn add_container(
    model: &mut Model,
    software_system_id: &str,
    name: &str,
    description: &str,
    technology: &str,
) -> Result<String> {
    validate_name("name", name)?;
    require_parent(model, software_system_id, ElementKind::SoftwareSystem, name)?;

    if let Some(existing) = find_child(model, software_system_id, ElementKind::Container, name) {
        return Ok(existing);
    }

    let mut element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        ElementDetails::Container {
            technology: technology.to_string(),
        },
    );
    element.parent_id = Some(software_system_id.to_string());
    Ok(insert(model, element))
}

/// Add a component to a container
///
/// First write wins for components sharing a name inside one container.
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `ElementNotFound` - If the container id is unknown
/// * `InvalidParent` - If the parent is not a container
pub fn add_component(
    model: &mut Model,
    container_id: &str,
    name: &str,
    description: &str,
    technology: &str,
) -> Result<String> {
    validate_name("name", name)?;
    require_parent(model, container_id, ElementKind::Container, name)?;

    if let Some(existing) = find_child(model, container_id, ElementKind::Component, name) {
        return Ok(existing);
    }

    let mut element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        ElementDetails::Component {
            technology: technology.to_string(),
        },
    );
    element.parent_id = Some(container_id.to_string());
    Ok(insert(model, element))
}

// ========== Deployment ==========

/// Add a top-level deployment node
///
/// A blank environment means [`DEFAULT_DEPLOYMENT_ENVIRONMENT`]. A top-level
/// node with the same name in the same environment wins.
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `InvalidInstanceCount` - If `instances` is zero
pub fn add_deployment_node(
    model: &mut Model,
    environment: &str,
    name: &str,
    description: &str,
    technology: &str,
    instances: u32,
) -> Result<String> {
    validate_name("name", name)?;
    validate_instances(instances)?;
    let environment = if environment.trim().is_empty() {
        DEFAULT_DEPLOYMENT_ENVIRONMENT.to_string()
    } else {
        environment.to_string()
    };

    let existing = model
        .deployment_nodes()
        .find(|n| {
            n.parent_id.is_none() && n.name == name && n.environment() == Some(environment.as_str())
        })
        .map(|n| n.id.clone());
    if let Some(existing) = existing {
        return Ok(existing);
    }

    let element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        ElementDetails::DeploymentNode {
            environment,
            technology: technology.to_string(),
            instances,
        },
    );
    Ok(insert(model, element))
}

/// Add a deployment node nested inside another; the environment is inherited
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `InvalidInstanceCount` - If `instances` is zero
/// * `ElementNotFound` - If the parent id is unknown
/// * `InvalidParent` - If the parent is not a deployment node
pub fn add_child_deployment_node(
    model: &mut Model,
    parent_id: &str,
    name: &str,
    description: &str,
    technology: &str,
    instances: u32,
) -> Result<String> {
    validate_name("name", name)?;
    validate_instances(instances)?;
    let environment = require_parent(model, parent_id, ElementKind::DeploymentNode, name)?;

    if let Some(existing) = find_child(model, parent_id, ElementKind::DeploymentNode, name) {
        return Ok(existing);
    }

    let mut element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        ElementDetails::DeploymentNode {
            environment,
            technology: technology.to_string(),
            instances,
        },
    );
    element.parent_id = Some(parent_id.to_string());
    Ok(insert(model, element))
}

/// Add an infrastructure node (load balancer, firewall, DNS, ...) to a
/// deployment node
///
/// # Errors
/// * `InvalidName` - If the name is blank
/// * `ElementNotFound` - If the parent id is unknown
/// * `InvalidParent` - If the parent is not a deployment node
pub fn add_infrastructure_node(
    model: &mut Model,
    deployment_node_id: &str,
    name: &str,
    description: &str,
    technology: &str,
) -> Result<String> {
    validate_name("name", name)?;
    let environment =
        require_parent(model, deployment_node_id, ElementKind::DeploymentNode, name)?;

    if let Some(existing) =
        find_child(model, deployment_node_id, ElementKind::InfrastructureNode, name)
    {
        return Ok(existing);
    }

    let mut element = Element::new(
        model.next_id(),
        name.to_string(),
        description.to_string(),
        ElementDetails::InfrastructureNode {
            environment,
            technology: technology.to_string(),
        },
    );
    element.parent_id = Some(deployment_node_id.to_string());
    Ok(insert(model, element))
}

/// Deploy a software system onto a deployment node
///
/// Instance ids are 1-based and counted per software system per environment.
///
/// # Errors
/// * `ElementNotFound` - If either id is unknown
/// * `InvalidParent` - If the node is not a deployment node
/// * `WrongElementKind` - If `software_system_id` is not a software system
pub fn add_software_system_instance(
    model: &mut Model,
    deployment_node_id: &str,
    software_system_id: &str,
    deployment_group: Option<&str>,
) -> Result<String> {
    add_instance(
        model,
        deployment_node_id,
        software_system_id,
        ElementKind::SoftwareSystem,
        deployment_group,
    )
}

/// Deploy a container onto a deployment node
///
/// # Errors
/// * `ElementNotFound` - If either id is unknown
/// * `InvalidParent` - If the node is not a deployment node
/// * `WrongElementKind` - If `container_id` is not a container
pub fn add_container_instance(
    model: &mut Model,
    deployment_node_id: &str,
    container_id: &str,
    deployment_group: Option<&str>,
) -> Result<String> {
    add_instance(
        model,
        deployment_node_id,
        container_id,
        ElementKind::Container,
        deployment_group,
    )
}

fn add_instance(
    model: &mut Model,
    deployment_node_id: &str,
    element_id: &str,
    expected: ElementKind,
    deployment_group: Option<&str>,
) -> Result<String> {
    let instantiated = model.get_element(element_id)?;
    ensure_kind(instantiated, expected)?;
    let name = instantiated.name.clone();
    let description = instantiated.description.clone();

    let environment =
        require_parent(model, deployment_node_id, ElementKind::DeploymentNode, &name)?;

    let instance_id = model
        .elements()
        .filter_map(Element::instance)
        .filter(|i| i.element_id == element_id && i.environment == environment)
        .count() as u32
        + 1;

    let instance = InstanceDetails {
        environment,
        element_id: element_id.to_string(),
        instance_id,
        deployment_group: deployment_group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string),
        health_checks: Vec::new(),
    };
    let details = match expected {
        ElementKind::SoftwareSystem => ElementDetails::SoftwareSystemInstance(instance),
        _ => ElementDetails::ContainerInstance(instance),
    };

    let mut element = Element::new(model.next_id(), name, description, details);
    element.parent_id = Some(deployment_node_id.to_string());
    Ok(insert(model, element))
}

// ========== Setters ==========

/// Rename an element
///
/// Canonical names of the element and its descendants change with it; ids do
/// not.
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
/// * `InvalidName` - If the name is blank
/// * `DuplicateElement` - If a person or software system would clash
/// * `ElementNotPermitted` - If the element is an instance
pub fn set_name(model: &mut Model, element_id: &str, name: &str) -> Result<()> {
    validate_name("name", name)?;
    let kind = model.get_element(element_id)?.kind();
    if kind.is_instance() {
        return Err(ArchModelError::not_permitted(
            "Instances take their name from the element they instantiate.",
        ));
    }
    if matches!(kind, ElementKind::Person | ElementKind::SoftwareSystem) {
        if let Some(existing) = find_top_level(model, kind, name) {
            if existing != element_id {
                return Err(ArchModelError::DuplicateElement {
                    name: name.to_string(),
                });
            }
        }
    }
    model.get_element_mut(element_id)?.name = name.to_string();
    Ok(())
}

/// # Errors
/// * `ElementNotFound` - If the id is unknown
pub fn set_description(model: &mut Model, element_id: &str, description: &str) -> Result<()> {
    model.get_element_mut(element_id)?.description = description.to_string();
    Ok(())
}

/// Set or clear (blank input) an element URL
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
/// * `InvalidUrl` - If the value is not a well-formed URL
pub fn set_url(model: &mut Model, element_id: &str, url: &str) -> Result<()> {
    model.get_element_mut(element_id)?.set_url(url)
}

/// # Errors
/// * `ElementNotFound` - If the id is unknown
pub fn set_group(model: &mut Model, element_id: &str, group: Option<&str>) -> Result<()> {
    model.get_element_mut(element_id)?.set_group(group);
    Ok(())
}

/// Mark a person or software system as internal or external
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
/// * `WrongElementKind` - For any other kind of element
pub fn set_location(model: &mut Model, element_id: &str, location: Location) -> Result<()> {
    let element = model.get_element_mut(element_id)?;
    match &mut element.details {
        ElementDetails::Person { location: current }
        | ElementDetails::SoftwareSystem { location: current } => {
            *current = location;
            Ok(())
        }
        _ => Err(ArchModelError::WrongElementKind {
            element_id: element_id.to_string(),
            expected: "Person or Software System".to_string(),
            actual: element.kind().to_string(),
        }),
    }
}

/// # Errors
/// * `ElementNotFound` - If the id is unknown
pub fn add_tags(model: &mut Model, element_id: &str, tags: &[&str]) -> Result<()> {
    model.get_element_mut(element_id)?.add_tags(tags);
    Ok(())
}

/// Remove a user tag; required tags and instance tags stay
///
/// # Returns
/// Whether a tag was removed
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
pub fn remove_tag(model: &mut Model, element_id: &str, tag: &str) -> Result<bool> {
    Ok(model.get_element_mut(element_id)?.remove_tag(tag))
}

/// Set a free-form property, replacing any previous value
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
/// * `InvalidName` - If the key is blank
pub fn add_property(model: &mut Model, element_id: &str, key: &str, value: &str) -> Result<()> {
    validate_name("property name", key)?;
    model
        .get_element_mut(element_id)?
        .properties
        .insert(key.to_string(), value.to_string());
    Ok(())
}

/// Attach an HTTP health check with the default interval and timeout
///
/// # Errors
/// See [`add_health_check_with`].
pub fn add_health_check(model: &mut Model, instance_id: &str, name: &str, url: &str) -> Result<()> {
    add_health_check_with(
        model,
        instance_id,
        name,
        url,
        DEFAULT_HEALTH_CHECK_INTERVAL_SECONDS,
        DEFAULT_HEALTH_CHECK_TIMEOUT_MILLISECONDS,
    )
}

/// Attach an HTTP health check to a software system or container instance
///
/// # Errors
/// * `ElementNotFound` - If the id is unknown
/// * `WrongElementKind` - If the element is not an instance
/// * `InvalidHealthCheck` / `InvalidUrl` - If validation fails
pub fn add_health_check_with(
    model: &mut Model,
    instance_id: &str,
    name: &str,
    url: &str,
    interval: i64,
    timeout: i64,
) -> Result<()> {
    let element = model.get_element_mut(instance_id)?;
    let kind = element.kind();
    let instance = element
        .instance_mut()
        .ok_or_else(|| ArchModelError::WrongElementKind {
            element_id: instance_id.to_string(),
            expected: "Software System Instance or Container Instance".to_string(),
            actual: kind.to_string(),
        })?;

    let check = HttpHealthCheck::new(name, url, interval, timeout)?;
    instance.health_checks.push(check);
    Ok(())
}

// ========== Helpers ==========

fn insert(model: &mut Model, element: Element) -> String {
    let id = element.id.clone();
    tracing::debug!(
        element_id = %id,
        kind = %element.kind(),
        name = %element.name,
        "element added"
    );
    model.insert_element(element);
    id
}

fn find_top_level(model: &Model, kind: ElementKind, name: &str) -> Option<String> {
    model
        .elements_of_kind(kind)
        .find(|e| e.parent_id.is_none() && e.name == name)
        .map(|e| e.id.clone())
}

fn find_child(model: &Model, parent_id: &str, kind: ElementKind, name: &str) -> Option<String> {
    model
        .children_of_kind(parent_id, kind)
        .find(|e| e.name == name)
        .map(|e| e.id.clone())
}

/// Check the parent kind, returning the parent's environment (empty for
/// static structure parents)
fn require_parent(
    model: &Model,
    parent_id: &str,
    expected: ElementKind,
    child_name: &str,
) -> Result<String> {
    let parent = model.get_element(parent_id)?;
    if parent.kind() != expected {
        return Err(ArchModelError::InvalidParent {
            name: child_name.to_string(),
            reason: format!("{} is a {}, expected a {}", parent.name, parent.kind(), expected),
        });
    }
    Ok(parent.environment().unwrap_or_default().to_string())
}

fn ensure_kind(element: &Element, expected: ElementKind) -> Result<()> {
    if element.kind() == expected {
        Ok(())
    } else {
        Err(ArchModelError::WrongElementKind {
            element_id: element.id.clone(),
            expected: expected.to_string(),
            actual: element.kind().to_string(),
        })
    }
}

fn validate_instances(instances: u32) -> Result<()> {
    if instances == 0 {
        return Err(ArchModelError::InvalidInstanceCount { count: instances });
    }
    Ok(())
}
