//! Canonical names
//!
//! A canonical name is the identity of an element across model snapshots: a
//! type prefix plus the sanitized names along the element's parent chain.
//! Static structure uses `.` between levels, deployment uses `/`; both
//! characters are stripped from every name component so the result is
//! unambiguous.
//!
//! Names are derived on every call and never cached, so renaming an ancestor
//! is reflected immediately.

use crate::errors::{ArchModelError, Result};
use crate::model::ElementKind;
use crate::ops::Model;
use crate::traversal::ancestors;

const STATIC_SEPARATOR: &str = ".";
const DEPLOYMENT_SEPARATOR: &str = "/";

/// Type prefix of a canonical name
pub fn canonical_prefix(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Person => "Person://",
        ElementKind::SoftwareSystem => "SoftwareSystem://",
        ElementKind::Container => "Container://",
        ElementKind::Component => "Component://",
        ElementKind::DeploymentNode => "DeploymentNode://",
        ElementKind::InfrastructureNode => "InfrastructureNode://",
        ElementKind::SoftwareSystemInstance => "SoftwareSystemInstance://",
        ElementKind::ContainerInstance => "ContainerInstance://",
    }
}

/// Strip both separator characters from a name component
pub fn format_name(name: &str) -> String {
    name.replace(STATIC_SEPARATOR, "")
        .replace(DEPLOYMENT_SEPARATOR, "")
}

/// Compute the canonical name of an element
///
/// # Errors
/// Returns `ElementNotFound` if the element, an ancestor, or an instantiated
/// element is missing, and `InvalidParent` if a deployment leaf has no
/// deployment node parent.
pub fn canonical_name(model: &Model, element_id: &str) -> Result<String> {
    let element = model.get_element(element_id)?;
    let kind = element.kind();
    let prefix = canonical_prefix(kind);

    let name = match kind {
        ElementKind::Person | ElementKind::SoftwareSystem => {
            format!("{}{}", prefix, format_name(&element.name))
        }
        ElementKind::Container | ElementKind::Component => {
            format!("{}{}", prefix, static_path(model, element_id)?)
        }
        ElementKind::DeploymentNode => {
            format!("{}{}", prefix, deployment_path(model, element_id)?)
        }
        ElementKind::InfrastructureNode => format!(
            "{}{}{}{}",
            prefix,
            parent_deployment_path(model, element_id)?,
            DEPLOYMENT_SEPARATOR,
            format_name(&element.name)
        ),
        ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance => {
            let instance = element
                .instance()
                .ok_or_else(|| ArchModelError::Internal {
                    message: format!("element {} has no instance details", element_id),
                })?;
            format!(
                "{}{}{}{}[{}]",
                prefix,
                parent_deployment_path(model, element_id)?,
                DEPLOYMENT_SEPARATOR,
                static_path(model, &instance.element_id)?,
                instance.instance_id
            )
        }
    };

    Ok(name)
}

/// `system[.container[.component]]`, without prefix
fn static_path(model: &Model, element_id: &str) -> Result<String> {
    let mut parts = Vec::new();
    for id in ancestors::ancestor_chain(model, element_id)? {
        parts.push(format_name(&model.get_element(&id)?.name));
    }
    parts.reverse();
    Ok(parts.join(STATIC_SEPARATOR))
}

/// `environment/outermost/.../node`, without prefix
fn deployment_path(model: &Model, node_id: &str) -> Result<String> {
    let node = model.get_element(node_id)?;
    let environment = node.environment().unwrap_or_default();

    let mut parts = Vec::new();
    for id in ancestors::ancestor_chain(model, node_id)? {
        parts.push(format_name(&model.get_element(&id)?.name));
    }
    parts.push(format_name(environment));
    parts.reverse();
    Ok(parts.join(DEPLOYMENT_SEPARATOR))
}

fn parent_deployment_path(model: &Model, element_id: &str) -> Result<String> {
    let element = model.get_element(element_id)?;
    let parent_id = element
        .parent_id
        .as_deref()
        .ok_or_else(|| ArchModelError::InvalidParent {
            name: element.name.clone(),
            reason: "deployment elements must live inside a deployment node".to_string(),
        })?;
    deployment_path(model, parent_id)
}

/// Find an element by canonical name
pub fn find_by_canonical_name<'a>(model: &'a Model, canonical: &str) -> Option<&'a str> {
    model
        .elements()
        .find(|e| canonical_name(model, &e.id).is_ok_and(|n| n == canonical))
        .map(|e| e.id.as_str())
}

/// Identity of an element across models
///
/// `Element` carries no equality of its own: two models built separately
/// give the same element different ids and descriptions, so field equality
/// says nothing useful. Compare keys instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical name of an element as a comparable key
///
/// # Errors
/// Same as [`canonical_name`].
pub fn canonical_key(model: &Model, element_id: &str) -> Result<CanonicalKey> {
    canonical_name(model, element_id).map(CanonicalKey)
}

/// Whether two elements, possibly in different models, are the same element
///
/// # Errors
/// Same as [`canonical_name`], for either side.
pub fn same_element(
    model_a: &Model,
    element_a: &str,
    model_b: &Model,
    element_b: &str,
) -> Result<bool> {
    Ok(canonical_key(model_a, element_a)? == canonical_key(model_b, element_b)?)
}
