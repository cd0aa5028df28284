//! Dynamic view interactions
//!
//! A dynamic view records an ordered conversation between elements. Each
//! interaction refers to an existing model relationship, either in its own
//! direction or, as a response, against it.

use super::projection::add_single_element;
use super::view::{RelationshipView, View, ViewKind};
use crate::errors::{ArchModelError, Result};
use crate::ops::relationship_ops::get_efferent_relationship_with;
use crate::ops::Model;
use crate::rules::admission::check_element_can_be_added;

/// Claim the next order token of a dynamic view
pub(crate) fn next_order(view: &mut View) -> Result<String> {
    match &mut view.kind {
        ViewKind::Dynamic { sequence, .. } => Ok(sequence.next_token()),
        _ => Err(view.unsupported("next_order")),
    }
}

/// Add an interaction using the next order token
///
/// # Returns
/// The id of the model relationship the interaction refers to
///
/// # Errors
/// * `ElementNotInModel` - If either element is unknown
/// * `ElementNotPermitted` - If the view rejects either element
/// * `RelationshipNotInModel` - If no relationship links the two elements in
///   either direction
/// * `UnsupportedViewOperation` - If the view is not dynamic
pub fn add_interaction(
    model: &Model,
    view: &mut View,
    source_id: &str,
    description: &str,
    destination_id: &str,
) -> Result<String> {
    add_interaction_inner(model, view, source_id, description, destination_id, None)
}

/// Add an interaction with an explicit order token
///
/// The view's own counter is not advanced.
pub fn add_interaction_with_order(
    model: &Model,
    view: &mut View,
    source_id: &str,
    description: &str,
    destination_id: &str,
    order: &str,
) -> Result<String> {
    add_interaction_inner(
        model,
        view,
        source_id,
        description,
        destination_id,
        Some(order),
    )
}

fn add_interaction_inner(
    model: &Model,
    view: &mut View,
    source_id: &str,
    description: &str,
    destination_id: &str,
    order: Option<&str>,
) -> Result<String> {
    if !view.is_dynamic() {
        return Err(view.unsupported("add_interaction"));
    }

    for element_id in [source_id, destination_id] {
        if !model.contains_element(element_id) {
            return Err(ArchModelError::ElementNotInModel {
                name: element_id.to_string(),
            });
        }
        if !view.contains_element(element_id) {
            check_element_can_be_added(model, view, element_id)?;
        }
    }

    let (relationship_id, response) =
        match get_efferent_relationship_with(model, source_id, destination_id) {
            Some(relationship) => (relationship.id.clone(), false),
            None => match get_efferent_relationship_with(model, destination_id, source_id) {
                Some(relationship) => (relationship.id.clone(), true),
                None => {
                    return Err(ArchModelError::RelationshipNotInModel {
                        source_name: model.display_name(source_id)?.to_string(),
                        destination_name: model.display_name(destination_id)?.to_string(),
                    })
                }
            },
        };

    add_single_element(model, view, source_id, false)?;
    add_single_element(model, view, destination_id, false)?;

    let order = match order {
        Some(order) => order.to_string(),
        None => next_order(view)?,
    };

    let mut relationship_view = RelationshipView::new(relationship_id.clone());
    if !description.trim().is_empty() {
        relationship_view.description = Some(description.to_string());
    }
    relationship_view.order = Some(order);
    relationship_view.response = response;

    tracing::debug!(
        view_key = view.key(),
        relationship_id = %relationship_id,
        order = relationship_view.order.as_deref(),
        response,
        "interaction added"
    );
    view.relationships.push(relationship_view);
    Ok(relationship_id)
}

/// Open a parallel sequence; interactions until the matching end share the
/// next top-level number
///
/// # Errors
/// Returns `UnsupportedViewOperation` if the view is not dynamic.
pub fn start_parallel_sequence(view: &mut View) -> Result<()> {
    match &mut view.kind {
        ViewKind::Dynamic { sequence, .. } => {
            sequence.start_parallel_sequence();
            Ok(())
        }
        _ => Err(view.unsupported("start_parallel_sequence")),
    }
}

/// Close the innermost parallel sequence
///
/// # Errors
/// * `ParallelSequenceNotStarted` - If no parallel sequence is open
/// * `UnsupportedViewOperation` - If the view is not dynamic
pub fn end_parallel_sequence(view: &mut View) -> Result<()> {
    let key = view.key().to_string();
    match &mut view.kind {
        ViewKind::Dynamic { sequence, .. } => {
            if sequence.end_parallel_sequence() {
                Ok(())
            } else {
                Err(ArchModelError::ParallelSequenceNotStarted { key })
            }
        }
        _ => Err(view.unsupported("end_parallel_sequence")),
    }
}

/// Relationship views in display order
///
/// Dynamic views sort by order token: numerically when every token is a
/// finite number, otherwise as strings. Ties keep insertion order. Other views keep
/// insertion order.
pub fn ordered_relationships(view: &View) -> Vec<&RelationshipView> {
    let mut ordered: Vec<&RelationshipView> = view.relationship_views().iter().collect();
    if !view.is_dynamic() {
        return ordered;
    }

    let numeric: Option<Vec<f64>> = ordered
        .iter()
        .map(|rv| finite_order(rv.order.as_deref().unwrap_or("")))
        .collect();

    if numeric.is_some() {
        ordered.sort_by(|a, b| {
            let a = numeric_order(a);
            let b = numeric_order(b);
            a.total_cmp(&b)
        });
    } else {
        ordered.sort_by(|a, b| {
            a.order
                .as_deref()
                .unwrap_or("")
                .cmp(b.order.as_deref().unwrap_or(""))
        });
    }
    ordered
}

fn numeric_order(rv: &RelationshipView) -> f64 {
    rv.order
        .as_deref()
        .and_then(finite_order)
        .unwrap_or(0.0)
}

// "NaN" and "inf" parse as f64 but have no place in a sequence
fn finite_order(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::element_ops::{add_container, add_person, add_software_system};
    use crate::ops::relationship_ops::uses;

    fn dynamic_view(scope: Option<&str>) -> View {
        View::new(
            "dynamic",
            ViewKind::Dynamic {
                element_id: scope.map(str::to_string),
                sequence: Default::default(),
            },
            scope.map(str::to_string),
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_interaction_against_relationship_is_a_response() {
        let mut model = Model::new();
        let user = add_person(&mut model, "User", "").unwrap();
        let system = add_software_system(&mut model, "System", "").unwrap();
        let r = uses(&mut model, &user, &system, "Uses").unwrap().unwrap();

        let mut view = dynamic_view(None);
        add_interaction(&model, &mut view, &user, "Requests", &system).unwrap();
        add_interaction(&model, &mut view, &system, "Replies", &user).unwrap();

        let views = view.relationship_views();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|rv| rv.relationship_id == r));
        assert!(!views[0].response);
        assert!(views[1].response);
        assert_eq!(views[1].order.as_deref(), Some("2"));
        assert_eq!(views[1].description.as_deref(), Some("Replies"));
    }

    #[test]
    fn test_interaction_without_relationship_rejected() {
        let mut model = Model::new();
        let user = add_person(&mut model, "User", "").unwrap();
        let system = add_software_system(&mut model, "System", "").unwrap();

        let mut view = dynamic_view(None);
        let err = add_interaction(&model, &mut view, &user, "Uses", &system).unwrap_err();
        assert_eq!(
            err.to_string(),
            "A relationship between User and System does not exist in model."
        );
        assert!(view.element_views().is_empty());
    }

    #[test]
    fn test_parallel_sequence_tokens() {
        let mut model = Model::new();
        let system = add_software_system(&mut model, "S", "").unwrap();
        let a = add_container(&mut model, &system, "A", "", "").unwrap();
        let b = add_container(&mut model, &system, "B", "", "").unwrap();
        let c = add_container(&mut model, &system, "C", "", "").unwrap();
        uses(&mut model, &a, &b, "Calls").unwrap();
        uses(&mut model, &a, &c, "Calls").unwrap();

        let mut view = dynamic_view(Some(&system));
        add_interaction(&model, &mut view, &a, "", &b).unwrap();
        start_parallel_sequence(&mut view).unwrap();
        add_interaction(&model, &mut view, &a, "", &c).unwrap();
        add_interaction(&model, &mut view, &b, "", &a).unwrap();
        end_parallel_sequence(&mut view).unwrap();
        add_interaction(&model, &mut view, &a, "", &b).unwrap();

        let tokens: Vec<&str> = ordered_relationships(&view)
            .iter()
            .filter_map(|rv| rv.order.as_deref())
            .collect();
        assert_eq!(tokens, vec!["1", "2.1", "2.2", "3"]);

        assert!(matches!(
            end_parallel_sequence(&mut view),
            Err(ArchModelError::ParallelSequenceNotStarted { .. })
        ));
    }

    #[test]
    fn test_ordering_falls_back_to_strings() {
        let mut model = Model::new();
        let user = add_person(&mut model, "User", "").unwrap();
        let system = add_software_system(&mut model, "System", "").unwrap();
        uses(&mut model, &user, &system, "Uses").unwrap();

        let mut view = dynamic_view(None);
        add_interaction_with_order(&model, &mut view, &user, "", &system, "b").unwrap();
        add_interaction_with_order(&model, &mut view, &user, "", &system, "10").unwrap();
        add_interaction_with_order(&model, &mut view, &user, "", &system, "a").unwrap();

        let tokens: Vec<&str> = ordered_relationships(&view)
            .iter()
            .filter_map(|rv| rv.order.as_deref())
            .collect();
        assert_eq!(tokens, vec!["10", "a", "b"]);
    }

    #[test]
    fn test_numeric_ordering() {
        let mut model = Model::new();
        let user = add_person(&mut model, "User", "").unwrap();
        let system = add_software_system(&mut model, "System", "").unwrap();
        uses(&mut model, &user, &system, "Uses").unwrap();

        let mut view = dynamic_view(None);
        for order in ["10", "2", "1.5"] {
            add_interaction_with_order(&model, &mut view, &user, "", &system, order).unwrap();
        }

        let tokens: Vec<&str> = ordered_relationships(&view)
            .iter()
            .filter_map(|rv| rv.order.as_deref())
            .collect();
        assert_eq!(tokens, vec!["1.5", "2", "10"]);
    }
}
