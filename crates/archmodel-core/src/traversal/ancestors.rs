use crate::errors::{ArchModelError, Result};
use crate::model::ElementKind;
use crate::ops::Model;

/// Ancestor chain of an element, the element itself first
///
/// Follows parent ids upward until a root is reached.
///
/// # Errors
/// * `ElementNotFound` - if the element or any parent id is unknown
/// * `Internal` - if the parent links form a cycle
pub fn ancestor_chain(model: &Model, element_id: &str) -> Result<Vec<String>> {
    let mut chain = Vec::new();
    let mut current = Some(element_id);

    while let Some(id) = current {
        if chain.len() > model.element_count() {
            return Err(ArchModelError::Internal {
                message: format!("parent chain of {} contains a cycle", element_id),
            });
        }
        let element = model.get_element(id)?;
        chain.push(id.to_string());
        current = element.parent_id.as_deref();
    }

    Ok(chain)
}

/// Ancestors only, innermost first
///
/// # Errors
/// Same as [`ancestor_chain`].
pub fn ancestors(model: &Model, element_id: &str) -> Result<Vec<String>> {
    let mut chain = ancestor_chain(model, element_id)?;
    chain.remove(0);
    Ok(chain)
}

/// True if `ancestor_id` appears strictly above `element_id` in the tree
///
/// People never take part in ancestry.
pub fn is_ancestor_of(model: &Model, ancestor_id: &str, element_id: &str) -> bool {
    let is_person = |id: &str| {
        model
            .get_element(id)
            .is_ok_and(|e| e.kind() == ElementKind::Person)
    };
    if is_person(ancestor_id) || is_person(element_id) {
        return false;
    }
    ancestors(model, element_id)
        .map(|chain| chain.iter().any(|id| id == ancestor_id))
        .unwrap_or(false)
}

/// Software system an element belongs to, if any
///
/// Resolves containers and components through their parents, and instances
/// through the element they instantiate.
///
/// # Errors
/// Returns `ElementNotFound` for dangling ids.
pub fn software_system_of(model: &Model, element_id: &str) -> Result<Option<String>> {
    let element = model.get_element(element_id)?;
    match element.kind() {
        ElementKind::SoftwareSystem => Ok(Some(element.id.clone())),
        ElementKind::Container | ElementKind::Component => {
            for id in ancestors(model, element_id)? {
                if model.get_element(&id)?.kind() == ElementKind::SoftwareSystem {
                    return Ok(Some(id));
                }
            }
            Ok(None)
        }
        ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance => {
            match element.instance() {
                Some(instance) => software_system_of(model, &instance.element_id),
                None => Ok(None),
            }
        }
        _ => Ok(None),
    }
}
