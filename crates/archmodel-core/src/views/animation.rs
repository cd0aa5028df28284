use super::view::{AnimationStep, View};
use crate::errors::{ArchModelError, Result};
use crate::ops::Model;
use crate::traversal::ancestors;

/// Append an animation step revealing the given elements
///
/// Elements not on the view, or revealed by an earlier step, are ignored. On
/// deployment views each revealed element also reveals its enclosing
/// deployment nodes. A relationship joins the step when one endpoint is
/// revealed now and the other now or earlier.
///
/// # Errors
/// * `EmptyAnimationStep` - If no element ids are given, or none of them
///   would be newly revealed
/// * `UnsupportedViewOperation` - On dynamic views
pub fn add_animation_step(model: &Model, view: &mut View, element_ids: &[&str]) -> Result<()> {
    if view.is_dynamic() {
        return Err(view.unsupported("add_animation_step"));
    }
    if element_ids.is_empty() {
        return Err(ArchModelError::EmptyAnimationStep {
            reason: "One or more elements must be specified.".to_string(),
        });
    }

    let mut revealed: Vec<String> = view
        .animations
        .iter()
        .flat_map(|step| step.elements.iter().cloned())
        .collect();
    let mut step_elements: Vec<String> = Vec::new();

    for element_id in element_ids {
        if !view.contains_element(element_id) || revealed.iter().any(|id| id == element_id) {
            continue;
        }
        revealed.push(element_id.to_string());
        step_elements.push(element_id.to_string());

        if view.is_deployment() {
            for node_id in ancestors(model, element_id)? {
                if !revealed.contains(&node_id) {
                    revealed.push(node_id.clone());
                    step_elements.push(node_id);
                }
            }
        }
    }

    if step_elements.is_empty() {
        return Err(ArchModelError::EmptyAnimationStep {
            reason: "None of the specified elements exist in this view.".to_string(),
        });
    }

    let mut step_relationships: Vec<String> = Vec::new();
    for relationship_view in &view.relationships {
        let Ok(relationship) = model.get_relationship(&relationship_view.relationship_id) else {
            continue;
        };
        let source_now = step_elements.contains(&relationship.source_id);
        let destination_now = step_elements.contains(&relationship.destination_id);
        let source_seen = revealed.contains(&relationship.source_id);
        let destination_seen = revealed.contains(&relationship.destination_id);

        if ((source_now && destination_seen) || (source_seen && destination_now))
            && !step_relationships.contains(&relationship.id)
        {
            step_relationships.push(relationship.id.clone());
        }
    }

    let order = view.animations.len() as u32 + 1;
    tracing::debug!(
        view_key = view.key(),
        order,
        element_count = step_elements.len(),
        relationship_count = step_relationships.len(),
        "animation step added"
    );
    view.animations.push(AnimationStep {
        order,
        elements: step_elements,
        relationships: step_relationships,
    });
    Ok(())
}
