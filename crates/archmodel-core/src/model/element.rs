use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::health_check::HttpHealthCheck;
use super::tags;
use crate::errors::Result;
use crate::rules::validation::{normalize_group, validate_url};

/// Default deployment environment name
pub const DEFAULT_DEPLOYMENT_ENVIRONMENT: &str = "Default";

/// Kind discriminator for elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
    DeploymentNode,
    InfrastructureNode,
    SoftwareSystemInstance,
    ContainerInstance,
}

impl ElementKind {
    /// Human-readable type name, also used as the kind tag
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Person => tags::PERSON,
            ElementKind::SoftwareSystem => tags::SOFTWARE_SYSTEM,
            ElementKind::Container => tags::CONTAINER,
            ElementKind::Component => tags::COMPONENT,
            ElementKind::DeploymentNode => tags::DEPLOYMENT_NODE,
            ElementKind::InfrastructureNode => tags::INFRASTRUCTURE_NODE,
            ElementKind::SoftwareSystemInstance => tags::SOFTWARE_SYSTEM_INSTANCE,
            ElementKind::ContainerInstance => tags::CONTAINER_INSTANCE,
        }
    }

    /// People, software systems, containers and components
    pub fn is_static_structure(&self) -> bool {
        matches!(
            self,
            ElementKind::Person
                | ElementKind::SoftwareSystem
                | ElementKind::Container
                | ElementKind::Component
        )
    }

    /// Anything that lives in a deployment environment
    pub fn is_deployment(&self) -> bool {
        !self.is_static_structure()
    }

    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Whether a person or software system sits inside the modelled enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Unspecified,
    Internal,
    External,
}

/// Data shared by software system and container instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDetails {
    pub environment: String,
    /// Id of the software system or container this is an instance of
    pub element_id: String,
    /// 1-based, counted per instantiated element and environment
    pub instance_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_checks: Vec<HttpHealthCheck>,
}

/// Variant-specific element data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementDetails {
    Person {
        location: Location,
    },
    SoftwareSystem {
        location: Location,
    },
    Container {
        technology: String,
    },
    Component {
        technology: String,
    },
    DeploymentNode {
        environment: String,
        technology: String,
        instances: u32,
    },
    InfrastructureNode {
        environment: String,
        technology: String,
    },
    SoftwareSystemInstance(InstanceDetails),
    ContainerInstance(InstanceDetails),
}

impl ElementDetails {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementDetails::Person { .. } => ElementKind::Person,
            ElementDetails::SoftwareSystem { .. } => ElementKind::SoftwareSystem,
            ElementDetails::Container { .. } => ElementKind::Container,
            ElementDetails::Component { .. } => ElementKind::Component,
            ElementDetails::DeploymentNode { .. } => ElementKind::DeploymentNode,
            ElementDetails::InfrastructureNode { .. } => ElementKind::InfrastructureNode,
            ElementDetails::SoftwareSystemInstance(_) => ElementKind::SoftwareSystemInstance,
            ElementDetails::ContainerInstance(_) => ElementKind::ContainerInstance,
        }
    }
}

/// A node in the architecture model
///
/// Elements are owned by the model arena and refer to their parent by id.
/// Identity across snapshots is the canonical name (see [`crate::naming`]),
/// which is derived from `name` and the parent chain on every call. There is
/// no `PartialEq`; compare elements with [`crate::naming::same_element`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,

    /// Own name; instances report the instantiated element's name instead
    /// (see `Model::display_name`)
    pub name: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,

    /// User tags in insertion order (required tags are implied by the kind)
    #[serde(default)]
    tags: Vec<String>,

    /// None for people, software systems and top-level deployment nodes
    pub parent_id: Option<String>,

    /// Outgoing relationship ids in creation order
    #[serde(default)]
    pub relationship_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    pub details: ElementDetails,
}

impl Element {
    /// Create an element record
    ///
    /// Normal callers go through the factory functions in
    /// [`crate::ops::element_ops`], which assign ids and enforce uniqueness.
    pub fn new(id: String, name: String, description: String, details: ElementDetails) -> Self {
        let mut element = Self {
            id,
            name,
            description,
            url: None,
            group: None,
            tags: Vec::new(),
            parent_id: None,
            relationship_ids: Vec::new(),
            properties: BTreeMap::new(),
            details,
        };
        if element.kind().is_instance() {
            element.tags.push(element.kind().type_name().to_string());
        }
        element
    }

    pub fn kind(&self) -> ElementKind {
        self.details.kind()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Set the URL; blank input clears it
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the value is not a well-formed URL.
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            self.url = None;
            return Ok(());
        }
        validate_url(url)?;
        self.url = Some(url.to_string());
        Ok(())
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Set the group; surrounding whitespace is trimmed and blank means none
    pub fn set_group(&mut self, group: Option<&str>) {
        self.group = group.and_then(normalize_group);
    }

    /// Required tags followed by user tags, without duplicates
    pub fn tags(&self) -> Vec<String> {
        let mut all: Vec<String> = tags::required_tags(self.kind())
            .iter()
            .map(|t| t.to_string())
            .collect();
        for tag in &self.tags {
            if !all.contains(tag) {
                all.push(tag.clone());
            }
        }
        all
    }

    /// Tags joined with commas, as written to snapshots and exports
    pub fn tags_string(&self) -> String {
        self.tags().join(",")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    /// Add user tags; blanks and duplicates are ignored
    pub fn add_tags(&mut self, new_tags: &[&str]) {
        for tag in new_tags {
            let tag = tag.trim();
            if tag.is_empty() || self.has_tag(tag) {
                continue;
            }
            self.tags.push(tag.to_string());
        }
    }

    /// Remove a user tag, returning whether anything was removed
    ///
    /// Required tags stay. Instance tags mirror the instantiated element and
    /// are never removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        if self.kind().is_instance() || tags::required_tags(self.kind()).contains(&tag) {
            return false;
        }
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before != self.tags.len()
    }

    /// Deployment environment, for deployment elements
    pub fn environment(&self) -> Option<&str> {
        match &self.details {
            ElementDetails::DeploymentNode { environment, .. }
            | ElementDetails::InfrastructureNode { environment, .. } => Some(environment),
            ElementDetails::SoftwareSystemInstance(instance)
            | ElementDetails::ContainerInstance(instance) => Some(&instance.environment),
            _ => None,
        }
    }

    pub fn technology(&self) -> Option<&str> {
        match &self.details {
            ElementDetails::Container { technology }
            | ElementDetails::Component { technology }
            | ElementDetails::DeploymentNode { technology, .. }
            | ElementDetails::InfrastructureNode { technology, .. } => Some(technology),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match &self.details {
            ElementDetails::Person { location } | ElementDetails::SoftwareSystem { location } => {
                Some(*location)
            }
            _ => None,
        }
    }

    pub fn instance(&self) -> Option<&InstanceDetails> {
        match &self.details {
            ElementDetails::SoftwareSystemInstance(instance)
            | ElementDetails::ContainerInstance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn instance_mut(&mut self) -> Option<&mut InstanceDetails> {
        match &mut self.details {
            ElementDetails::SoftwareSystemInstance(instance)
            | ElementDetails::ContainerInstance(instance) => Some(instance),
            _ => None,
        }
    }
}
