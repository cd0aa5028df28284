//! Built-in tag names
//!
//! Required tags are derived from the element kind and are always reported
//! first, in this order, ahead of any user tags.

use super::element::ElementKind;

pub const ELEMENT: &str = "Element";
pub const PERSON: &str = "Person";
pub const SOFTWARE_SYSTEM: &str = "Software System";
pub const CONTAINER: &str = "Container";
pub const COMPONENT: &str = "Component";
pub const DEPLOYMENT_NODE: &str = "Deployment Node";
pub const INFRASTRUCTURE_NODE: &str = "Infrastructure Node";
pub const SOFTWARE_SYSTEM_INSTANCE: &str = "Software System Instance";
pub const CONTAINER_INSTANCE: &str = "Container Instance";

pub const RELATIONSHIP: &str = "Relationship";
pub const SYNCHRONOUS: &str = "Synchronous";
pub const ASYNCHRONOUS: &str = "Asynchronous";

/// Tags every element of `kind` carries and that can never be removed
///
/// Instances have none: their kind tag is an ordinary tag added at creation,
/// and instance tags are frozen altogether.
pub fn required_tags(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::Person => &[ELEMENT, PERSON],
        ElementKind::SoftwareSystem => &[ELEMENT, SOFTWARE_SYSTEM],
        ElementKind::Container => &[ELEMENT, CONTAINER],
        ElementKind::Component => &[ELEMENT, COMPONENT],
        ElementKind::DeploymentNode => &[ELEMENT, DEPLOYMENT_NODE],
        ElementKind::InfrastructureNode => &[ELEMENT, INFRASTRUCTURE_NODE],
        ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance => &[],
    }
}

/// Split a comma-separated tag string, trimming blanks away
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
